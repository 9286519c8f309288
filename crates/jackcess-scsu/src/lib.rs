//! Standard Compression Scheme for Unicode (UTR #6) encoder/decoder, bit-exact
//! with the command tables and window-selection rules Access uses for its
//! compressed text columns.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod tables;

pub use decoder::{DecodeResult, ScsuDecoder};
pub use encoder::{EncodeResult, ScsuEncoder};
pub use error::ScsuError;
