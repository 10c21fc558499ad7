use thiserror::Error;

/// Failure of a storage adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 400
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// 401, missing token or failed login
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// 403, invalid token or wrong role
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 418, the update touched nothing
    #[error("Nothing was changed: {0}")]
    NoChange(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("No user logged in")]
    NotLoggedIn,

    #[error("The shopping cart is empty")]
    EmptyCart,

    #[error("The root account cannot be deleted")]
    RootAccount,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type WebResult<T> = Result<T, WebError>;
