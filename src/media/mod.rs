pub mod detection;
pub mod types;

pub use detection::{OCTET_STREAM, detect_mime, normalize_mime};
pub use types::MediaRef;
