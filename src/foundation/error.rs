pub type ThumbResult<T> = Result<T, ThumbError>;

#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("collaborator error: {0}")]
    Collaborator(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for errors caused by user input rather than by the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for ThumbError {
    fn from(err: reqwest::Error) -> Self {
        Self::Collaborator(err.to_string())
    }
}
