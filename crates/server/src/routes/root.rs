//! Root banner endpoint

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Banner {
    message: &'static str,
}

/// GET / - Confirm the backend is up
pub async fn get() -> Json<Banner> {
    Json(Banner {
        message: "MedSupply Backend is running",
    })
}
