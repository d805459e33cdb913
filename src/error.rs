use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use uuid::Uuid;

use crate::models::ErrorResponse;

/// Errors surfaced by gateways and services.
///
/// Gateways translate "no rows" into `Option::None` or [`CatalogError::NotFound`];
/// services pass everything else through untouched so the HTTP layer can map it.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("brand not found")]
    InvalidReference(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("blocking worker failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),

    #[error("request cancelled")]
    Cancelled,
}

impl CatalogError {
    pub fn brand_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "brand", id }
    }

    pub fn product_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "product", id }
    }

    pub fn brand_in_use() -> Self {
        Self::Conflict("cannot delete brand: it is being used by products".to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Backend faults whose detail must not reach clients.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Pool(_) | Self::Blocking(_))
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidReference(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) | Self::Pool(_) | Self::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            log::error!("{self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}
