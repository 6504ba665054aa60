//! Plaintext encodings of the folder/entry tree.
//!
//! - **text**: the canonical, human-legible indented format (`ALOCK_V1`)
//! - **json**: a tagged structured format (`ALOCK_J1`)

pub mod json;
pub mod text;

pub use text::{decode, encode};
