//! Best-effort client geolocation from edge proxy headers

use axum::{Json, http::HeaderMap};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    success: bool,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|v| !v.is_empty())
}

/// GET /api/location - Pass through the `x-vercel-ip-*` geo headers
pub async fn get(headers: HeaderMap) -> Json<LocationResponse> {
    let city = header(&headers, "x-vercel-ip-city");
    let latitude = header(&headers, "x-vercel-ip-latitude");
    let longitude = header(&headers, "x-vercel-ip-longitude");
    let success = city.is_some() && latitude.is_some() && longitude.is_some();

    Json(LocationResponse {
        city,
        region: header(&headers, "x-vercel-ip-country-region"),
        country: header(&headers, "x-vercel-ip-country"),
        latitude,
        longitude,
        success,
    })
}
