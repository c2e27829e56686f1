// Core algorithm exports
pub mod availability;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use availability::{has_availability_overlap, slots_overlap};
pub use filters::{passes_hard_filters, shared_subjects, shares_availability, shares_subject};
pub use matcher::{MatchResult, Matcher};
pub use scoring::{calculate_compatibility_score, HYBRID_MODALITY};
