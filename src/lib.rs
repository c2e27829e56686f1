//! Tutor Match - accessibility-aware student-tutor matching service
//!
//! This library provides the compatibility matcher that ranks tutors for a
//! student with disabilities, plus the record decoding, storage clients and
//! HTTP routes that surround it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchResult, has_availability_overlap, slots_overlap};
pub use models::{decode_student, decode_tutor, AvailabilitySlot, ScoredTutor, ScoringWeights, StudentRecord, TutorRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let a = AvailabilitySlot::parse("Mon", "09:00", "10:00").unwrap();
        let b = AvailabilitySlot::parse("Mon", "09:30", "10:30").unwrap();
        assert!(slots_overlap(&a, &b));
        assert!(Matcher::default().rank(&StudentRecord::default(), vec![]).is_empty());
    }
}
