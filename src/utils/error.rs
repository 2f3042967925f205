use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::Role;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    Config(String),
    NotFound(String),
    InvalidRequest(String),
    Conflict(String),
    Forbidden(String),
    /// Caller's role is not in the route's allow-list.
    InsufficientRole(Vec<Role>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "{}", msg),
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::Forbidden(msg) => write!(f, "{}", msg),
            AppError::InsufficientRole(_) => write!(f, "Forbidden – insufficient permissions"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden(_) | AppError::InsufficientRole(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InsufficientRole(required) => HttpResponse::Forbidden().json(serde_json::json!({
                "message": self.to_string(),
                "required_roles": required
            })),
            AppError::DatabaseError(msg) => {
                log::error!("❌ {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal server error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "message": self.to_string()
            })),
        }
    }
}
