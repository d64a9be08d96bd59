use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("unexpected markup at {url}: {message}")]
    Markup { url: String, message: String },

    #[error("schedule column {position}: expected `{expected}`, found `{found}`")]
    Schema {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cannot parse {field} from `{value}`")]
    Parse { field: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn fetch(url: &str, message: impl Into<String>) -> Self {
        PipelineError::Fetch {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn markup(url: &str, message: impl Into<String>) -> Self {
        PipelineError::Markup {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn parse(field: &'static str, value: &str) -> Self {
        PipelineError::Parse {
            field,
            value: value.to_string(),
        }
    }
}
