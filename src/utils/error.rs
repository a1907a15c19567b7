use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("unable to get url {url}: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    StatusError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrlError { url: String, reason: String },

    #[error("unexpected payload from {url}: {reason}")]
    PayloadError { url: String, reason: String },

    #[error("response from {url} failed validation: {}", violations.join("; "))]
    ValidationError {
        url: String,
        violations: Vec<String>,
    },

    #[error("extraction source field '{field}' missing from response")]
    ExtractionError { field: String },

    #[error("division by zero while computing '{result_field}'")]
    DivisionByZero { result_field: String },

    #[error("calculation '{result_field}' references missing or non-numeric operand '{operand}'")]
    MissingOperand {
        result_field: String,
        operand: String,
    },

    #[error("calculation '{result_field}' produced a non-finite result")]
    NonFiniteResult { result_field: String },

    #[error("unresolved template placeholder '{placeholder}'")]
    TemplateError { placeholder: String },

    #[error("invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
