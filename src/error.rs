use thiserror::Error;

/// Fatal failures while reading a playback log. Each one aborts the
/// pipeline before any statistic is computed.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed playback log: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    /// Bytes are neither UTF-8 nor BOM-marked UTF-16.
    #[error("playback log is not UTF-8 or UTF-16 text")]
    UnsupportedEncoding,

    /// An `Entry` has no nested `Item` element, or the `Item` carries no `Path`.
    #[error("entry #{position} (ID {id}) has no Item/Path reference")]
    MissingItemReference { position: usize, id: String },
}

/// Per-file metadata failure. Recorded on the entry, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverFailure {
    #[error("File not found")]
    NotFound,

    #[error("Could not read metadata: {0}")]
    DecodeError(String),
}
