use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::error;

/// Domain errors surfaced to clients as `{"error": …}` JSON.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    /// 401 with the login-specific message; the payload was well-formed,
    /// the secret was wrong.
    InvalidCredentials,
    Forbidden,
    NotFound(&'static str),
    Conflict(&'static str),
    /// 422 with either a single message or a list of field errors.
    Validation(Value),
    CsrfMismatch,
    Internal,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(Value::String(message.into()))
    }

    pub fn validation_list(messages: Vec<String>) -> Self {
        Self::Validation(json!(messages))
    }

    pub fn from_db(err: sqlx::Error) -> Self {
        error!(?err, "database error");
        Self::Internal
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // 419 has no named constant in http.
            ApiError::CsrfMismatch => {
                StatusCode::from_u16(419).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY)
            }
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> Value {
        match self {
            ApiError::Unauthorized => Value::String("Unauthorized".to_string()),
            ApiError::InvalidCredentials => Value::String("Invalid credentials.".to_string()),
            ApiError::Forbidden => Value::String("Forbidden".to_string()),
            ApiError::NotFound(message) | ApiError::Conflict(message) => {
                Value::String((*message).to_string())
            }
            ApiError::Validation(value) => value.clone(),
            ApiError::CsrfMismatch => Value::String("CSRF verification failed".to_string()),
            ApiError::Internal => Value::String("Internal server error".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from_db(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::validation("x").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::CsrfMismatch.status().as_u16(), 419);
        assert_eq!(
            ApiError::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_list_keeps_every_message() {
        let err = ApiError::validation_list(vec![
            "email is required.".to_string(),
            "cv is required.".to_string(),
        ]);
        assert_eq!(
            err.message(),
            json!(["email is required.", "cv is required."])
        );
    }
}
