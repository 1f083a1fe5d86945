use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidlingoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Error extracting audio: {0}")]
    Extraction(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Translation to {language} failed: {message}")]
    Translation { language: String, message: String },

    #[error("Structural drift in {language} translation: {detail}")]
    StructuralDrift { language: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure classes reported at the pipeline boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Extraction,
    Transcription,
    Translation,
    StructuralDrift,
    Unexpected,
}

impl VidlingoError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::Extraction(_) => FailureKind::Extraction,
            Self::Transcription(_) => FailureKind::Transcription,
            Self::Translation { .. } => FailureKind::Translation,
            Self::StructuralDrift { .. } => FailureKind::StructuralDrift,
            Self::Config(_) | Self::Io(_) | Self::Json(_) | Self::Toml(_) | Self::Http(_) => {
                FailureKind::Unexpected
            }
        }
    }

    /// Message shown to the person who triggered the run. The underlying
    /// diagnostic is always kept.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::Validation => self.to_string(),
            FailureKind::Unexpected => format!("An unexpected error occurred: {}", self),
            _ => format!("Processing error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, VidlingoError>;
