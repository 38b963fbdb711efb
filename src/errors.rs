use thiserror::Error;

/// Application-level error type.
///
/// Expected conditions (missing artifact, budget not met, marker not found)
/// are carried inside result payloads, not raised; this enum covers the
/// conditions that genuinely abort an operation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
