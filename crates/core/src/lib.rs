//! medsupply-core: Shared domain types and pure logic
//!
//! This crate provides the record types returned by the MedSupply API
//! (hospitals, weather, health insights), the provider error taxonomy,
//! the repair stage that coerces free-form model output into JSON, and
//! the deterministic synthetic health-insight generator.

pub mod error;
pub mod hospital;
pub mod insight;
pub mod repair;
pub mod search;
pub mod synthetic;
pub mod weather;

pub use error::ProviderError;
pub use hospital::{HospitalRecord, HospitalType};
pub use insight::HealthInsight;
pub use search::SearchResultItem;
pub use weather::{WeatherCondition, WeatherSnapshot};
