//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p resizer-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use resizer_api::setup::{routes, services};
use resizer_api::AppState;
use resizer_core::Config;
use resizer_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://resizer.test";

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of artifacts currently in the Output Store.
    pub async fn stored_count(&self) -> usize {
        self.state.storage.list().await.unwrap().len()
    }
}

/// Setup test app with an isolated output directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, adjusting the default configuration first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.output_dir = temp_dir.path().join("outputs");
    config.base.public_base_url = BASE_URL.to_string();
    configure(&mut config);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&config.output_dir)
            .await
            .expect("Failed to create local storage"),
    );
    let state = services::initialize_services(&config, storage);
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with an image part and the given text fields.
pub fn resize_form(image: Vec<u8>, fields: &[(&str, &str)]) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(image))
        .file_name("photo.png")
        .mime_type("image/png");
    fields
        .iter()
        .fold(MultipartForm::new().add_part("image", part), |form, (name, value)| {
            form.add_text(name.to_string(), value.to_string())
        })
}

/// Strip the public base URL so the path can be requested from the test server.
pub fn local_path(url: &str) -> String {
    url.strip_prefix(BASE_URL)
        .unwrap_or_else(|| panic!("URL {} does not start with {}", url, BASE_URL))
        .to_string()
}
