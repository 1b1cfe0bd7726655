pub mod error_body;

pub use error_body::{error_body_middleware, ErrorBodyConfig};
