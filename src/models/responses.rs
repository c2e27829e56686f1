use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredTutor;
use crate::services::MatchAssignment;

/// The tutor written back onto the student record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTutor {
    pub tutor_id: String,
    pub display_name: String,
    pub compatibility_score: u32,
}

/// Response for find matches endpoint
///
/// `assigned` is `None` when no tutor is viable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub student_id: String,
    pub matches: Vec<ScoredTutor>,
    pub assigned: Option<AssignedTutor>,
    pub total_candidates: usize,
}

/// Response for the stateless preview endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub matches: Vec<ScoredTutor>,
    pub total_candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub student_id: String,
    pub assignments: Vec<MatchAssignment>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
