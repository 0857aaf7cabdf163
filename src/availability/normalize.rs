//! Status normalizer
//!
//! Maps each upstream's vocabulary onto [`AvailabilityStatus`]. Nothing in
//! here fails: anything unrecognized is `Unknown`.

use crate::types::AvailabilityStatus;

/// Registrar `available` flag
pub fn from_registrar_flag(available: bool) -> AvailabilityStatus {
    if available {
        AvailabilityStatus::Available
    } else {
        AvailabilityStatus::Taken
    }
}

/// DNS heuristic: any A record means someone registered the name.
///
/// Parked domains without records read as available; that imprecision is
/// accepted in exchange for needing no credentials.
pub fn from_dns_answer_count(answers: usize) -> AvailabilityStatus {
    if answers > 0 {
        AvailabilityStatus::Taken
    } else {
        AvailabilityStatus::Available
    }
}

/// Free-form status label (`inactive`, `active`, `registered`, ...)
pub fn from_label(label: &str) -> AvailabilityStatus {
    match label.trim().to_ascii_lowercase().as_str() {
        "available" | "inactive" => AvailabilityStatus::Available,
        "taken" | "active" | "registered" => AvailabilityStatus::Taken,
        _ => AvailabilityStatus::Unknown,
    }
}
