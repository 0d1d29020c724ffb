#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The uploaded bytes are not a decodable image. Holds the decoder detail.
    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
