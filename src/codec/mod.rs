//! Transaction image codec.
//!
//! # Data Flow
//! ```text
//! AnnouncementDetails
//!     → image.rs (7 × 32-byte words, `data` replaced by its keccak)
//!     → TransactionImage bytes (224)
//!     → envelope.rs (0x19 ‖ 0x01 ‖ domain separator ‖ keccak(image))
//!     → keccak(hash image) = txHash announced by the module
//! ```
//!
//! # Design Decisions
//! - Encoding is pure; the layout is a versioned wire format (`ImageFormat`)
//! - Raw call data never travels inside the image, only its digest
//! - Decoding never recovers `data`; callers resolve it from the store

pub mod digest;
pub mod envelope;
pub mod image;
pub mod types;

pub use digest::ContentDigest;
pub use envelope::HashImage;
pub use image::{decode, encode, ImageFormat, TransactionImage, IMAGE_LEN};
pub use types::{AnnouncementDetails, DecodeError, Operation};
