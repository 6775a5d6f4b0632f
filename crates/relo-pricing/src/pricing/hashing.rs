//! Deterministic input fingerprinting. The hash covers the pricing-
//! relevant view of the input only: addresses and customer identity are
//! excluded, numeric fields are rounded to stable precision, and object
//! keys serialize in sorted order so equal inputs always hash equally.

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::pricing::domain::{EstimateInput, LocationDetails};

/// Version stamp mixed into every hash. Bump when the payload shape or
/// the engine's pricing semantics change.
pub const ENGINE_VERSION: &str = "2024.2";

/// Hash function used for the input fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Fnv1a,
}

/// Fingerprints the pricing-relevant view of an input.
pub fn input_hash(input: &EstimateInput, algorithm: HashAlgorithm) -> String {
    let payload = canonical_json(&hash_payload(input));
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(payload.as_bytes());
            format!("{:x}", hasher.finalize())
        }
        HashAlgorithm::Fnv1a => format!("{:016x}", fnv1a64(payload.as_bytes())),
    }
}

fn hash_payload(input: &EstimateInput) -> serde_json::Value {
    json!({
        "additional_services": {
            "debris_removal": input.additional_services.debris_removal,
            "disassembly": input.additional_services.disassembly,
            "packing": input.additional_services.packing,
            "reassembly": input.additional_services.reassembly,
            "storage": input.additional_services.storage,
            "unpacking": input.additional_services.unpacking,
        },
        "crew_size": input.crew_size,
        "date": input.move_date.map(|date| date.date_naive().to_string()),
        "delivery": location_descriptor(&input.delivery),
        "distance": round2(input.distance_miles),
        "engine_version": ENGINE_VERSION,
        "is_holiday": input.is_holiday,
        "is_peak_season": input.is_peak_season,
        "is_weekend": input.is_weekend,
        "pickup": location_descriptor(&input.pickup),
        "requires_specialty_crew": input.requires_specialty_crew,
        "service": input.service_type.label(),
        "special_items": {
            "antique_count": input.special_items.antique_count,
            "artwork_count": input.special_items.artwork_count,
            "fragile_items": input.special_items.fragile_items,
            "piano_count": input.special_items.piano_count,
            "valuable_items": input.special_items.valuable_items,
        },
        "volume": round2(input.total_volume_cuft),
        "weight": input.total_weight_lbs.round() as i64,
    })
}

fn location_descriptor(location: &LocationDetails) -> serde_json::Value {
    json!({
        "access_difficulty": location.access_difficulty.label(),
        "floor_level": location.floor_level,
        "has_elevator": location.has_elevator,
        "long_carry": location.long_carry,
        "narrow_hallways": location.narrow_hallways,
        "parking_distance_feet": location.parking_distance_feet,
        "stairs_count": location.stairs_count,
    })
}

/// Renders a value as JSON with object keys in sorted order at every
/// nesting level.
fn canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| {
                    let quoted = serde_json::Value::String(key.clone());
                    format!("{}:{}", quoted, canonical_json(&map[key]))
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        serde_json::Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        leaf => leaf.to_string(),
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = OFFSET;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
