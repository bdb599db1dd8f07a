pub type KeepsakeResult<T> = Result<T, KeepsakeError>;

#[derive(thiserror::Error, Debug)]
pub enum KeepsakeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeepsakeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }
}
