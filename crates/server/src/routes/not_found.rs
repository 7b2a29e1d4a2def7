use axum::http::Uri;

use crate::error::AppError;

/// Fallback for unknown paths
pub async fn handler(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
