//! Image domain module

mod format;
mod normalizer;
mod payload;

pub use format::{ClipboardFormat, NormalizedImage};
pub use normalizer::{flatten_onto_white, DecodedImage, ImageNormalizer, BMP_FILE_HEADER_LEN};
pub use payload::{ImagePayload, MIN_PAYLOAD_BYTES};
