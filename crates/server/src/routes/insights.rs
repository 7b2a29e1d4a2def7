//! Location intelligence endpoint (weather + health trends)

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use medsupply_core::{HealthInsight, WeatherSnapshot};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppError;

/// Query parameters for `/api/insights`
#[derive(Debug, Deserialize)]
pub struct InsightsParams {
    lat: f64,
    lon: f64,
    city: String,
    state: String,
}

#[derive(Serialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
pub struct LocationInfo {
    city: String,
    state: String,
    coordinates: Coordinates,
}

#[derive(Serialize)]
pub struct InsightsResponse {
    location: LocationInfo,
    environment: Option<WeatherSnapshot>,
    health_intelligence: HealthInsight,
}

/// GET /api/insights?lat=&lon=&city=&state=
///
/// Weather and health trends are fetched concurrently. Weather is `null`
/// when Open-Meteo is unreachable; the health summary always has a value.
pub async fn get(
    State(app): State<AppState>,
    params: Result<Query<InsightsParams>, QueryRejection>,
) -> Result<Json<InsightsResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // district granularity is not available; the city stands in for it
    let (environment, health_intelligence) = tokio::join!(
        app.weather.fetch(params.lat, params.lon),
        app.insights.resolve(&params.city, &params.city, &params.state),
    );

    Ok(Json(InsightsResponse {
        location: LocationInfo {
            city: params.city,
            state: params.state,
            coordinates: Coordinates {
                lat: params.lat,
                lon: params.lon,
            },
        },
        environment,
        health_intelligence,
    }))
}
