// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod wire;

pub use domain::{AvailabilitySlot, Day, LearningPreferences, ScoreBreakdown, ScoredTutor, ScoringWeights, SlotError, StudentRecord, TimeOfDay, TutorRecord};
pub use requests::{FindMatchesRequest, HistoryQuery, PreviewRequest};
pub use responses::{AssignedTutor, ErrorResponse, FindMatchesResponse, HealthResponse, HistoryResponse, PreviewResponse};
pub use wire::{decode_student, decode_tutor, decode_tutors, unwrap_tagged};
