use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use thiserror::Error;
use tracing::error;

use crate::{
    flash::{self, Category, Flash},
    views,
};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Empty or malformed form field.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Username already exists.")]
    AlreadyExists,

    #[error("Please log in first.")]
    Unauthenticated,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn category(&self) -> Category {
        match self {
            AppError::Unauthenticated => Category::Warning,
            _ => Category::Danger,
        }
    }

    /// Attach the form the user is sent back to when this error is recovered.
    pub fn back_to(self, path: &'static str) -> FormError {
        FormError { error: self, path }
    }
}

/// An error raised while handling a form, together with where to send the user.
#[derive(Debug)]
pub struct FormError {
    pub error: AppError,
    pub path: &'static str,
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        match self.error {
            AppError::Internal(e) => {
                error!(error = %e, path = self.path, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::internal_error()),
                )
                    .into_response()
            }
            other => {
                let notice = Flash::new(other.category(), other.to_string());
                let jar = flash::push(CookieJar::new(), &notice);
                (jar, views::found(self.path)).into_response()
            }
        }
    }
}
