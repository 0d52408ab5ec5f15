/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the router can
/// turn every failure into a chat-visible message the same way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("You are not authorized to use this command")]
    Unauthorized,

    #[error("Expired")]
    Expired,

    /// A command was invoked without its required argument; carries the hint shown to the user.
    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("AI backend returned no content")]
    EmptyResponse,

    #[error("upload registration failed: {status} {body}")]
    UploadRegistrationFailed { status: u16, body: String },

    #[error("upload failed: {status} {body}")]
    UploadFailed { status: u16, body: String },

    #[error("post creation failed: {status} {body}")]
    PostCreationFailed { status: u16, body: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// True for failures of the image half of a publish (register or upload).
    pub fn is_image_upload_failure(&self) -> bool {
        matches!(
            self,
            Error::UploadRegistrationFailed { .. } | Error::UploadFailed { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

const MAX_DIAGNOSTIC_CHARS: usize = 500;

/// Trim an upstream response body before carrying it inside an error.
pub fn diagnostic_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        return body.to_string();
    }
    format!(
        "{}...",
        body.chars().take(MAX_DIAGNOSTIC_CHARS).collect::<String>()
    )
}

pub type Result<T> = std::result::Result<T, Error>;
