/// Errors raised while loading images, animations and sprite sheets.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The file could not be read.
    Io(String),
    /// The data was read but is not a usable image or sheet.
    Decode(String),
    /// A numbered file range that cannot be expanded.
    InvalidSequence { first: String, last: String },
    /// An animation was requested with no frames.
    EmptyAnimation,
    /// Malformed JSON frame data.
    Json(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Decode(e) => write!(f, "Decode error: {e}"),
            Self::InvalidSequence { first, last } => {
                write!(f, "Invalid file sequence: {first} .. {last}")
            }
            Self::EmptyAnimation => write!(f, "Animation has no frames"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
