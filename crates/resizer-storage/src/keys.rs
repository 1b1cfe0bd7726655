use resizer_core::constants::{ARTIFACT_EXTENSION, ARTIFACT_PREFIX};
use uuid::Uuid;

/// Filename for the artifact with the given id.
pub fn artifact_filename(id: Uuid) -> String {
    format!("{}{}.{}", ARTIFACT_PREFIX, id, ARTIFACT_EXTENSION)
}

/// Recover the id from an artifact filename.
///
/// Only the exact form produced by `artifact_filename` is accepted, so path
/// separators, `..`, and alternative uuid spellings all yield `None`.
pub fn parse_artifact_filename(filename: &str) -> Option<Uuid> {
    let id = filename
        .strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_EXTENSION)?
        .strip_suffix('.')?;
    let id = Uuid::parse_str(id).ok()?;
    (artifact_filename(id) == filename).then_some(id)
}

/// Name of the in-progress file an artifact is written to before being renamed into place.
pub fn temp_filename(id: Uuid) -> String {
    format!(".{}.tmp", artifact_filename(id))
}

/// Recover the id from an in-progress file name.
pub fn parse_temp_filename(filename: &str) -> Option<Uuid> {
    filename
        .strip_prefix('.')?
        .strip_suffix(".tmp")
        .and_then(parse_artifact_filename)
}
