// ==================== MOCK INFERENCE / STORAGE ====================
// Stand-ins for the computer-vision model and object storage. All randomness
// flows through `RandomSource` so tests can pin the output with a seed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::Engine;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::Uuid;

use crate::models::{MlExtractedData, DEFAULT_VIOLATION_TYPE};

pub const PLACEHOLDER_IMAGE_URL: &str = "https://mockstorage.local/placeholders/complaint.jpg";
pub const MOCK_STORAGE_BASE: &str = "https://mockstorage.local";

pub const CONFIDENCE_MIN: f64 = 0.78;
pub const CONFIDENCE_MAX: f64 = 0.97;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLocation {
    pub geotag: &'static str,
    pub zone: &'static str,
}

pub const MOCK_LOCATIONS: [MockLocation; 5] = [
    MockLocation { geotag: "28.6139,77.2090", zone: "Central Delhi" },
    MockLocation { geotag: "12.9716,77.5946", zone: "Bengaluru Urban" },
    MockLocation { geotag: "19.0760,72.8777", zone: "South Mumbai" },
    MockLocation { geotag: "13.0827,80.2707", zone: "Chennai Central" },
    MockLocation { geotag: "17.3850,78.4867", zone: "Hyderabad Core" },
];

/// Canonical violation category and what the mock model "sees" for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationProfile {
    pub manual_type: &'static str,
    pub violation_type_ai: &'static str,
    pub vehicle_type: &'static str,
}

pub const VIOLATION_PROFILES: [ViolationProfile; 6] = [
    ViolationProfile { manual_type: "Signal Jump", violation_type_ai: "Red Light", vehicle_type: "Motorcycle" },
    ViolationProfile { manual_type: "Overspeeding", violation_type_ai: "Overspeeding", vehicle_type: "Sedan" },
    ViolationProfile { manual_type: "Wrong Parking", violation_type_ai: "Illegal Parking", vehicle_type: "Hatchback" },
    ViolationProfile { manual_type: "No Helmet", violation_type_ai: "Helmet Violation", vehicle_type: "Scooter" },
    ViolationProfile { manual_type: "Lane Cutting", violation_type_ai: "Unsafe Lane Change", vehicle_type: "SUV" },
    ViolationProfile { manual_type: DEFAULT_VIOLATION_TYPE, violation_type_ai: "General Violation", vehicle_type: "Sedan" },
];

pub const LICENSE_PLATES: [&str; 5] = ["DL03AB1234", "KA05MN7788", "MH14QZ4400", "TN09JK9900", "TS10BD7700"];

/// Shared random generator for mock generation, injected into handlers.
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Reproducible sequence, for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Random v4 UUID drawn from this generator.
    pub fn uuid(&self) -> Uuid {
        uuid::Builder::from_random_bytes(self.lock().gen()).into_uuid()
    }
}

pub fn violation_profile(manual_type: &str) -> Option<&'static ViolationProfile> {
    VIOLATION_PROFILES.iter().find(|p| p.manual_type == manual_type)
}

pub fn auto_location(rng: &RandomSource) -> MockLocation {
    MOCK_LOCATIONS.choose(&mut *rng.lock()).copied().unwrap_or(MOCK_LOCATIONS[0])
}

/// Mock inference for a complaint. Unknown or missing manual types get a random category.
pub fn generate_ml_payload(rng: &RandomSource, complaint_id: &str, manual_type: Option<&str>) -> MlExtractedData {
    let mut rng = rng.lock();

    let profile = match manual_type.and_then(violation_profile) {
        Some(profile) => *profile,
        None => VIOLATION_PROFILES.choose(&mut *rng).copied().unwrap_or(VIOLATION_PROFILES[5]),
    };
    let license_plate = LICENSE_PLATES.choose(&mut *rng).copied().unwrap_or(LICENSE_PLATES[0]);
    let confidence: f64 = rng.gen_range(CONFIDENCE_MIN..=CONFIDENCE_MAX);

    MlExtractedData {
        id: None,
        complaint_id: complaint_id.to_string(),
        license_plate: license_plate.to_string(),
        vehicle_type: profile.vehicle_type.to_string(),
        violation_type_ai: profile.violation_type_ai.to_string(),
        confidence_score: (confidence * 100.0).round() / 100.0,
    }
}

/// Pretends to upload an image. Accepts raw base64 or a data URL, line-wrapped or not.
///
/// Valid payloads get a fresh URL; empty or undecodable ones, or any payload
/// when mock storage is disabled, get the placeholder.
pub fn store_image_mock(rng: &RandomSource, image_base64: Option<&str>, allow_mock_storage: bool) -> String {
    let payload = match image_base64 {
        Some(raw) if allow_mock_storage && !raw.is_empty() => raw,
        _ => return PLACEHOLDER_IMAGE_URL.to_string(),
    };

    let encoded: String = payload
        .rsplit(',')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) if !bytes.is_empty() => format!("{}/{}.jpg", MOCK_STORAGE_BASE, rng.uuid()),
        Ok(_) => PLACEHOLDER_IMAGE_URL.to_string(),
        Err(e) => {
            log::debug!("Rejected image payload: {}", e);
            PLACEHOLDER_IMAGE_URL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overspeeding_maps_to_sedan() {
        let rng = RandomSource::from_entropy();
        for _ in 0..50 {
            let ml = generate_ml_payload(&rng, "c1", Some("Overspeeding"));
            assert_eq!(ml.vehicle_type, "Sedan");
            assert_eq!(ml.violation_type_ai, "Overspeeding");
            assert_eq!(ml.complaint_id, "c1");
            assert!(ml.confidence_score >= CONFIDENCE_MIN && ml.confidence_score <= CONFIDENCE_MAX);
            assert!(LICENSE_PLATES.contains(&ml.license_plate.as_str()));
        }
    }

    #[test]
    fn test_unmapped_type_picks_random_category() {
        let rng = RandomSource::seeded(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let ml = generate_ml_payload(&rng, "c1", Some("Honking"));
            let profile = VIOLATION_PROFILES
                .iter()
                .find(|p| p.violation_type_ai == ml.violation_type_ai)
                .expect("category from the table");
            assert_eq!(ml.vehicle_type, profile.vehicle_type);
            seen.insert(ml.violation_type_ai);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_same_seed_replays_same_payloads() {
        let first = RandomSource::seeded(42);
        let second = RandomSource::seeded(42);
        for _ in 0..10 {
            assert_eq!(
                generate_ml_payload(&first, "c", None),
                generate_ml_payload(&second, "c", None)
            );
            assert_eq!(auto_location(&first), auto_location(&second));
            assert_eq!(first.uuid(), second.uuid());
        }
    }

    #[test]
    fn test_confidence_is_rounded_to_two_decimals() {
        let rng = RandomSource::seeded(3);
        for _ in 0..50 {
            let score = generate_ml_payload(&rng, "c", None).confidence_score;
            assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-9);
            assert!((CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&score));
        }
    }

    #[test]
    fn test_auto_location_uses_fixed_pairs() {
        let rng = RandomSource::seeded(11);
        for _ in 0..20 {
            let loc = auto_location(&rng);
            assert!(MOCK_LOCATIONS.contains(&loc));
        }
    }

    #[test]
    fn test_store_image_mock() {
        let rng = RandomSource::from_entropy();
        let valid = "data:image/jpeg;base64,aGVsbG8gd29ybGQ=";

        let url = store_image_mock(&rng, Some(valid), true);
        assert!(url.starts_with("https://mockstorage.local/"));
        assert!(url.ends_with(".jpg"));
        assert_ne!(url, PLACEHOLDER_IMAGE_URL);
        assert_ne!(url, store_image_mock(&rng, Some(valid), true));

        assert_eq!(store_image_mock(&rng, Some("aGVsbG8gd29ybGQ="), false), PLACEHOLDER_IMAGE_URL);
        assert_eq!(store_image_mock(&rng, Some("not base64!!"), true), PLACEHOLDER_IMAGE_URL);
        assert_eq!(store_image_mock(&rng, Some(""), true), PLACEHOLDER_IMAGE_URL);
        assert_eq!(store_image_mock(&rng, None, true), PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_line_wrapped_base64_is_accepted() {
        let rng = RandomSource::seeded(1);

        let wrapped = store_image_mock(&rng, Some("aGVsbG8g\nd29ybGQ="), true);
        assert_ne!(wrapped, PLACEHOLDER_IMAGE_URL);

        let wrapped_data_url = store_image_mock(&rng, Some("data:image/png;base64, aGVs\r\nbG8="), true);
        assert_ne!(wrapped_data_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_uuid_is_v4() {
        let id = RandomSource::seeded(5).uuid();
        assert_eq!(id.get_version_num(), 4);
    }
}
