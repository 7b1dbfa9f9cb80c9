//! Asset domain module.
//!
//! Pure logic for the images embedded in proposals: classifying and
//! resolving stored references ahead of URL signing, and validating
//! submitted signature renders before upload.

mod reference;
mod signature_image;

pub use reference::{AssetRef, AssetResolver, ResolvedAsset};
pub use signature_image::{SignatureImage, MAX_SIGNATURE_BYTES, MIN_SIGNATURE_BYTES};
