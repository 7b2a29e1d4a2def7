//! Deterministic stand-in for model-generated health insights
//!
//! The generator is seeded from `{city}-{YYYY-MM-DD}`, so repeated calls for
//! the same city on the same day agree while other days and cities diverge.
//! The generator is ChaCha8 and sampling draws one `next_u64` per pick, so
//! the output depends on no `rand` algorithm that may change between releases.

use chrono::NaiveDate;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::insight::{HealthInsight, INSIGHT_LIST_LEN};

pub const DISEASE_POOL: [&str; 9] = [
    "Seasonal Viral Fever",
    "Dengue",
    "Malaria",
    "Typhoid",
    "Respiratory Infection",
    "Gastroenteritis",
    "Conjunctivitis",
    "Chikungunya",
    "Pollen Allergy",
];

pub const MEDICINE_POOL: [&str; 10] = [
    "Azithromycin 500mg",
    "Dolo 650",
    "ORS Packets",
    "Cetirizine",
    "Amoxicillin",
    "Oflomac-OZ",
    "Montelukast",
    "Levo-Cetirizine",
    "Paracetamol IV",
    "Ibuprofen",
];

pub fn seed_key(city: &str, date: NaiveDate) -> String {
    format!("{city}-{}", date.format("%Y-%m-%d"))
}

/// FNV-1a; stable across processes and toolchains, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Draw distinct entries without replacement, one `next_u64` per draw.
fn sample<R: RngCore>(pool: &[&str], rng: &mut R) -> Vec<String> {
    let mut remaining = pool.to_vec();
    (0..INSIGHT_LIST_LEN.min(pool.len()))
        .map(|_| {
            let index = (rng.next_u64() % remaining.len() as u64) as usize;
            remaining.remove(index).to_string()
        })
        .collect()
}

/// Generate a plausible insight for `city` on `date`.
pub fn synthetic_insight(city: &str, date: NaiveDate) -> HealthInsight {
    let mut rng = ChaCha8Rng::seed_from_u64(fnv1a(seed_key(city, date).as_bytes()));

    let prevalent_diseases = sample(&DISEASE_POOL, &mut rng);
    let high_demand_medicines = sample(&MEDICINE_POOL, &mut rng);
    let health_alert = format!(
        "Increased reports of {} in {city}. Monitor hydration and hygiene.",
        prevalent_diseases[0]
    );

    HealthInsight {
        prevalent_diseases,
        high_demand_medicines,
        health_alert,
    }
}
