use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found with id: {0}")]
    NotFound(Uuid),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProductError {
    pub fn duplicate_name(name: &str) -> Self {
        ProductError::BadRequest(format!("Product with name '{}' already exists", name))
    }
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::BadRequest(msg) => AppError::BadRequest(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_message_names_the_id() {
        let id = Uuid::nil();
        assert_eq!(
            ProductError::NotFound(id).to_string(),
            "Product not found with id: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProductError::NotFound(Uuid::now_v7()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProductError::duplicate_name("Desk").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProductError::Internal("lock".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
