/// Crate-wide result alias.
pub type MainshotResult<T> = Result<T, MainshotError>;

/// Errors surfaced by template loading, rendering and collaborator calls.
///
/// Permissive configuration problems (bad hex colors, missing optional fields) never reach this
/// type; they are resolved to defaults where they are parsed.
#[derive(thiserror::Error, Debug)]
pub enum MainshotError {
    /// Malformed template, options or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable or undecodable input (product image, logo, template file).
    #[error("input error: {0}")]
    Input(String),

    /// External collaborator failure (background generation, background removal).
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// JSON parse or serialize failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MainshotError {
    /// Build a [`MainshotError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MainshotError::Input`].
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`MainshotError::Collaborator`].
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Build a [`MainshotError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for failures of an external collaborator.
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::Collaborator(_))
    }
}

impl From<image::ImageError> for MainshotError {
    fn from(e: image::ImageError) -> Self {
        Self::Input(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
