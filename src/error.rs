use thiserror::Error;

/// A backend failure, already normalized to the message shown to the user.
///
/// Raw transport errors never leave the `api` module; they are logged there
/// and folded into one of these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("API is not reachable")]
    Unreachable,

    /// The server replied with a non-2xx status. Holds its `detail` message,
    /// or the operation's fallback when there was none.
    #[error("{0}")]
    Rejected(String),

    #[error("No response from server. Please check your connection.")]
    NoResponse,

    /// The request could not be built or sent, or the reply could not be read.
    #[error("{0}")]
    RequestFailed(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
