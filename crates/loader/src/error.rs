//! Error taxonomy for the load pipeline.
//!
//! Decode errors are values produced on worker threads and carried through
//! the completion queue; construction errors happen on the consumer thread.
//! Programmer errors (invalid handle, double unload, notify on an unknown
//! batch) panic instead and are deliberately absent here.

use thiserror::Error;

/// Worker-side failure: the asset could not be read or parsed.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// I/O or parse failure reported by a decoder.
    #[error("decode failed: {0}")]
    Malformed(String),
    /// The decode job panicked; the panic was contained at the worker
    /// boundary and turned into this value. Nothing unwinds across the
    /// queue.
    #[error("decode job panicked: {0}")]
    Panicked(String),
}

impl DecodeError {
    /// Collapse an `anyhow` chain from the `asset` parsers into one
    /// transportable message.
    pub fn from_parse(err: anyhow::Error) -> Self {
        Self::Malformed(format!("{err:#}"))
    }
}

/// Consumer-side failure: the backend could not build the engine-resident
/// object from decoded data.
#[derive(Debug, Error)]
#[error("construction failed: {message}")]
pub struct ConstructError {
    message: String,
}

impl ConstructError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-item error channel of a batch report: either stage can fail, the
/// batch completes regardless.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Construct(#[from] ConstructError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_keep_their_context_chain() {
        let err = anyhow::anyhow!("root cause").context("while decoding foo.png");
        let decode = DecodeError::from_parse(err);
        let text = decode.to_string();
        assert!(text.contains("while decoding foo.png"));
        assert!(text.contains("root cause"));
    }

    #[test]
    fn load_error_wraps_both_stages() {
        let d: LoadError = DecodeError::Malformed("bad magic".into()).into();
        let c: LoadError = ConstructError::new("device lost").into();
        assert!(matches!(d, LoadError::Decode(_)));
        assert!(matches!(c, LoadError::Construct(_)));
    }
}
