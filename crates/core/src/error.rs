/// Result alias that carries the custom [`AltarError`] type.
pub type Result<T> = std::result::Result<T, AltarError>;

/// Common error type for the core crate.
///
/// Control preconditions (lighting while chanting, resetting an empty altar)
/// are not represented here. The session ignores disabled controls the same
/// way a disabled button swallows a click.
#[derive(Debug, thiserror::Error)]
pub enum AltarError {
    /// Free-form message for failures that do not deserve their own variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// A decorative asset id was never registered.
    #[error("unknown asset `{0}`")]
    UnknownAsset(String),
}

impl AltarError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for AltarError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for AltarError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
