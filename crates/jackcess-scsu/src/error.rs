use thiserror::Error;

/// Unrecoverable error for the current SCSU stream. `EndOfInput` and
/// `EndOfOutput` are not part of this enum: they are recoverable outcomes
/// reported through `DecodeResult`/`EncodeResult` so callers can resume
/// rather than unwind.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ScsuError {
    #[error("illegal SCSU input: {0}")]
    IllegalInput(String),
}
