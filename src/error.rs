use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model load error: {0}")]
    Model(String),

    #[error("Malformed JSON: {0}")]
    Parse(String),

    #[error("Invalid or missing fields: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("Model inference error: {0}")]
    Inference(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Ping error: {0}")]
    Ping(String),

    #[error("Invalid session transition: {current} with {event}")]
    Session { current: String, event: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn ping(msg: impl Into<String>) -> Self {
        Self::Ping(msg.into())
    }

    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable category name reported to clients next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Model(_) => "model",
            Self::Parse(_) => "parse",
            Self::Validation { .. } => "validation",
            Self::Inference(_) => "inference",
            Self::Channel(_) => "channel",
            Self::Ping(_) => "ping",
            Self::Session { .. } => "session",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::AddrParse(_) => "address",
        }
    }

    /// Field names for validation failures, empty otherwise.
    pub fn fields(&self) -> &[String] {
        match self {
            Self::Validation { fields } => fields,
            _ => &[],
        }
    }
}
