use axum::{extract::multipart::MultipartError, http::StatusCode, response::Json};
use burgerhaus_types::{dates::DateParseError, ErrorBody};
use diesel_async::pooled_connection::deadpool::PoolError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Forbidden")]
    Forbidden,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Nothing was changed")]
    NoChange,
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Database unavailable: {0}")]
    Pool(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoChange => StatusCode::IM_A_TEAPOT,
            ApiError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        ApiError::Pool(err.to_string())
    }
}

impl From<DateParseError> for ApiError {
    fn from(err: DateParseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart request: {}", err.body_text()))
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let (message, error) = match &self {
            ApiError::BadRequest(msg) => (msg.clone(), None),
            ApiError::AuthenticationFailed => ("Authentication failed".to_string(), None),
            ApiError::InvalidToken => ("Invalid token".to_string(), None),
            ApiError::Forbidden => ("Forbidden".to_string(), None),
            ApiError::NotFound(msg) => (msg.clone(), None),
            ApiError::NoChange => ("Nothing was changed".to_string(), None),
            ApiError::Database(diesel::result::Error::NotFound) => {
                ("Not found".to_string(), None)
            }
            ApiError::Database(err) => ("Database error".to_string(), Some(err.to_string())),
            ApiError::Pool(msg) => ("Database unavailable".to_string(), Some(msg.clone())),
            ApiError::Internal(msg) => ("Internal server error".to_string(), Some(msg.clone())),
        };

        (status, Json(ErrorBody { message, error })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AuthenticationFailed.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NoChange.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            ApiError::from(diesel::result::Error::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(diesel::result::Error::RollbackTransaction).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Pool("x".into()).status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_date_errors_are_bad_requests() {
        let err: ApiError = DateParseError("32.13.2024".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
