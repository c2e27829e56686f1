use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Request to match a stored student against the tutor roster
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to rank caller-supplied records without touching storage
///
/// Records may use either the plain or the tagged encoding.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PreviewRequest {
    pub student: Value,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub tutors: Vec<Value>,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query for a student's past assignments
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HistoryQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub limit: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_request_accepts_both_key_styles() {
        let camel: FindMatchesRequest = serde_json::from_str(r#"{"studentId": "1"}"#).unwrap();
        let snake: FindMatchesRequest =
            serde_json::from_str(r#"{"student_id": "1", "limit": 3}"#).unwrap();

        assert_eq!(camel.student_id, "1");
        assert_eq!(camel.limit, None);
        assert_eq!(snake.limit, Some(3));
    }

    #[test]
    fn test_empty_student_id_rejected() {
        let req = FindMatchesRequest {
            student_id: String::new(),
            limit: None,
        };
        assert!(req.validate().is_err());
    }
}
