pub mod download;
pub mod estimate;
pub mod health;
pub mod preview;
pub mod upload;
