//! Upload, estimate, and retrieval integration tests.
//!
//! Run with: `cargo test -p resizer-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{create_noisy_png, create_test_png};
use helpers::{local_path, resize_form, setup_test_app, setup_test_app_with};
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_upload_pixels_with_medium_preset() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = resize_form(
        create_test_png(1000, 1000),
        &[("width", "1000"), ("height", "1000"), ("unit", "px"), ("quality", "medium")],
    );
    let response = client.post("/upload").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["width"], 1000);
    assert_eq!(body["height"], 1000);
    assert_eq!(body["quality"], 70);

    let preview_url = body["previewUrl"].as_str().unwrap();
    let download_url = body["downloadUrl"].as_str().unwrap();
    assert!(preview_url.starts_with("http://resizer.test/preview/output-"));
    assert!(download_url.starts_with("http://resizer.test/download/output-"));

    let preview = client.get(&local_path(preview_url)).await;
    preview.assert_status_ok();
    assert_eq!(preview.header("content-type"), "image/jpeg");

    let decoded = image::load_from_memory(preview.as_bytes()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1000, 1000));

    let stored_kb = (preview.as_bytes().len() as u64 + 512) / 1024;
    assert_eq!(body["actualSizeKB"], stored_kb);
}

#[tokio::test]
async fn test_upload_centimeters() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(400, 300),
        &[("width", "10"), ("height", "5"), ("unit", "cm"), ("quality", "high")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["width"], 378);
    assert_eq!(body["height"], 189);
    assert_eq!(body["quality"], 90);

    let download = app
        .client()
        .get(&local_path(body["downloadUrl"].as_str().unwrap()))
        .await;
    download.assert_status_ok();
    let decoded = image::load_from_memory(download.as_bytes()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (378, 189));
}

#[tokio::test]
async fn test_upload_inches() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(200, 200),
        &[("width", "2"), ("height", "1.5"), ("unit", "inch"), ("quality", "low")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["width"], 192);
    assert_eq!(body["height"], 144);
    assert_eq!(body["quality"], 40);
}

#[tokio::test]
async fn test_download_forces_fixed_filename() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(64, 64),
        &[("width", "32"), ("height", "32"), ("unit", "px"), ("quality", "medium")],
    );
    let body: Value = app.client().post("/upload").multipart(form).await.json();

    let download = app
        .client()
        .get(&local_path(body["downloadUrl"].as_str().unwrap()))
        .await;

    download.assert_status_ok();
    assert_eq!(download.header("content-type"), "image/jpeg");
    assert_eq!(
        download.header("content-disposition"),
        "attachment; filename=\"resized-image.jpg\""
    );
}

#[tokio::test]
async fn test_identical_uploads_produce_distinct_artifacts() {
    let app = setup_test_app().await;
    let client = app.client();
    let png = create_test_png(120, 80);
    let fields = [("width", "60"), ("height", "40"), ("unit", "px"), ("quality", "medium")];

    let first: Value = client
        .post("/upload")
        .multipart(resize_form(png.clone(), &fields))
        .await
        .json();
    let second: Value = client
        .post("/upload")
        .multipart(resize_form(png, &fields))
        .await
        .json();

    assert_ne!(first["filename"], second["filename"]);
    assert_ne!(first["downloadUrl"], second["downloadUrl"]);

    for body in [&first, &second] {
        client
            .get(&local_path(body["downloadUrl"].as_str().unwrap()))
            .await
            .assert_status_ok();
    }
    assert_eq!(app.stored_count().await, 2);
}

#[tokio::test]
async fn test_size_budget_met_at_top_quality() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(64, 64),
        &[("width", "64"), ("height", "64"), ("unit", "px"), ("sizeOption", "500")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["quality"], 90);
    assert!(body["actualSizeKB"].as_u64().unwrap() <= 500);
}

#[tokio::test]
async fn test_unreachable_size_budget_still_succeeds() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_noisy_png(400, 400),
        &[("width", "400"), ("height", "400"), ("unit", "px"), ("sizeOption", "5")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let quality = body["quality"].as_u64().unwrap();
    assert!((10..=90).contains(&quality));
    assert_eq!(quality % 5, 0);
}

#[tokio::test]
async fn test_invalid_dimensions_rejected() {
    let app = setup_test_app().await;

    for (width, height) in [("0", "10"), ("-5", "10"), ("abc", "10"), ("10", "0")] {
        let form = resize_form(
            create_test_png(10, 10),
            &[("width", width), ("height", height), ("unit", "px"), ("quality", "low")],
        );
        let response = app.client().post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "INVALID_DIMENSION", "width={} height={}", width, height);
        assert!(body["error"].as_str().is_some());
    }
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_invalid_unit_rejected() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(10, 10),
        &[("width", "10"), ("height", "10"), ("unit", "furlong"), ("quality", "low")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_UNIT");
}

#[tokio::test]
async fn test_quality_fields_validated() {
    let app = setup_test_app().await;
    let cases: [&[(&str, &str)]; 4] = [
        &[("quality", "ultra")],
        &[("quality", "low"), ("sizeOption", "50")],
        &[],
        &[("sizeOption", "1")],
    ];

    for extra in cases {
        let mut fields = vec![("width", "10"), ("height", "10"), ("unit", "px")];
        fields.extend_from_slice(extra);
        let form = resize_form(create_test_png(10, 10), &fields);
        let response = app.client().post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_QUALITY", "{:?}", extra);
    }
}

#[tokio::test]
async fn test_missing_image_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("width", "10")
        .add_text("height", "10")
        .add_text("unit", "px")
        .add_text("quality", "low");
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_unsupported_content_type_rejected() {
    let app = setup_test_app().await;

    let part = Part::bytes(bytes::Bytes::from_static(b"%PDF-1.4"))
        .file_name("doc.pdf")
        .mime_type("application/pdf");
    let form = MultipartForm::new()
        .add_part("image", part)
        .add_text("width", "10")
        .add_text("height", "10")
        .add_text("unit", "px")
        .add_text("quality", "low");
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_corrupt_image_is_encode_failure() {
    let app = setup_test_app().await;

    let form = resize_form(
        b"\x89PNG\r\n\x1a\ntruncated".to_vec(),
        &[("width", "10"), ("height", "10"), ("unit", "px"), ("quality", "low")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "ENCODE_FAILURE");
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let app = setup_test_app_with(|config| config.max_file_size_bytes = 1024).await;

    let form = resize_form(
        create_noisy_png(200, 200),
        &[("width", "10"), ("height", "10"), ("unit", "px"), ("quality", "low")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"].as_str().is_some());
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_oversized_body_rejected_before_handler() {
    let app = setup_test_app_with(|config| config.max_file_size_bytes = 1024).await;

    // Far past the body limit, and not a valid form either.
    let response = app
        .client()
        .post("/upload")
        .content_type("multipart/form-data; boundary=X")
        .bytes(bytes::Bytes::from(vec![b'x'; 256 * 1024]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_output_area_is_capped() {
    let app = setup_test_app().await;

    // Each edge is allowed on its own; together they are 400 MP.
    let form = resize_form(
        create_test_png(1, 1),
        &[("width", "20000"), ("height", "20000"), ("unit", "px"), ("quality", "low")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_DIMENSION");
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_output_area_cap_is_configurable() {
    let app = setup_test_app_with(|config| config.resize.max_output_pixels = 50 * 50).await;

    let over = resize_form(
        create_test_png(10, 10),
        &[("width", "51"), ("height", "50"), ("unit", "px"), ("quality", "low")],
    );
    let response = app.client().post("/estimate").multipart(over).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_DIMENSION");

    let at_cap = resize_form(
        create_test_png(10, 10),
        &[("width", "50"), ("height", "50"), ("unit", "px"), ("quality", "low")],
    );
    app.client()
        .post("/estimate")
        .multipart(at_cap)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_dimension_error_reported_before_quality_error() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(10, 10),
        &[("width", "0"), ("height", "10"), ("unit", "px")],
    );
    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_DIMENSION");
}

#[tokio::test]
async fn test_error_details_follow_environment() {
    let fields = [("width", "10"), ("height", "10"), ("unit", "furlong"), ("quality", "low")];

    let dev = setup_test_app().await;
    let response = dev
        .client()
        .post("/upload")
        .multipart(resize_form(create_test_png(10, 10), &fields))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["details"].as_str().is_some());

    let prod = setup_test_app_with(|config| {
        config.base.environment = "production".to_string();
        config.base.cors_origins = vec!["https://resizer.test".to_string()];
    })
    .await;
    let response = prod
        .client()
        .post("/upload")
        .multipart(resize_form(create_test_png(10, 10), &fields))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_UNIT");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_unknown_artifacts_are_not_found() {
    let app = setup_test_app().await;

    for path in [
        "/preview/output-00000000-0000-4000-8000-000000000000.jpg",
        "/download/output-00000000-0000-4000-8000-000000000000.jpg",
        "/preview/not-an-artifact.jpg",
        "/download/..%2F..%2Fetc%2Fpasswd",
    ] {
        let response = app.client().get(path).await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "File not found", "{}", path);
    }
}

#[tokio::test]
async fn test_estimate_does_not_store() {
    let app = setup_test_app().await;

    let form = resize_form(
        create_test_png(300, 300),
        &[("width", "150"), ("height", "150"), ("unit", "px"), ("quality", "medium")],
    );
    let response = app.client().post("/estimate").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["estimatedSizeKB"].as_u64().is_some());
    assert_eq!(body["quality"], 70);
    assert_eq!(body["width"], 150);
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_estimate_can_be_disabled() {
    let app = setup_test_app_with(|config| config.estimate_enabled = false).await;

    let form = resize_form(
        create_test_png(10, 10),
        &[("width", "10"), ("height", "10"), ("unit", "px"), ("quality", "low")],
    );
    let response = app.client().post("/estimate").multipart(form).await;

    response.assert_status(StatusCode::NOT_FOUND);
}
