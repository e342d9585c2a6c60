use std::io;

/// Errors surfaced by the compression pipeline and the file layer.
#[derive(Debug, thiserror::Error)]
pub enum HuffError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input is not valid UTF-8 (first invalid byte at offset {position})")]
    Encoding { position: usize },

    #[error("corrupt artifact: {reason}")]
    CorruptArtifact { reason: String },

    #[error("input contains no symbols")]
    EmptyInput,

    #[error("symbol {0:?} has no assigned code")]
    MissingCode(char),
}
