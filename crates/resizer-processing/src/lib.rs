//! Resizer Processing Library
//!
//! Decode, resize, and re-encode uploads, choosing the encoder quality from a
//! preset or a size budget:
//! - `codec`: decode + resize once, then JPEG-encode at any quality
//! - `quality`: the Quality Resolver (presets, verified search, linear estimate)
//! - `pipeline`: runs codec and resolver off the async runtime
//! - `validator`: upload checks performed before decoding

pub mod codec;
pub mod pipeline;
pub mod quality;
pub mod validator;

pub use codec::{CodecError, FrameEncoder, JpegCodec, PreparedImage};
pub use pipeline::{ProcessingError, ResizeJob, ResizeOutput, ResizePipeline};
pub use quality::{QualityResolver, ResolvedQuality};
pub use validator::{UploadValidator, ValidationError};
