//! Hospital directory endpoint

use axum::{
    Json,
    extract::{Path, State},
};
use medsupply_core::HospitalRecord;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HospitalsResponse {
    state: String,
    hospitals: Vec<HospitalRecord>,
}

/// GET /api/hospitals/{state} - Hospitals for a state; empty list when nothing is found
pub async fn list(
    State(app): State<AppState>,
    Path(state): Path<String>,
) -> Json<HospitalsResponse> {
    let hospitals = app.hospitals.search(&state).await;
    tracing::info!(state = %state, count = hospitals.len(), "Hospital lookup complete");

    Json(HospitalsResponse { state, hospitals })
}
