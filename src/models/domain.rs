use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::wire::{lenient, slot_list, string_set};

/// Errors raised while parsing availability data at the record boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Unknown day: {0}")]
    InvalidDay(String),

    #[error("Invalid time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Empty window: {start} is not before {end}")]
    EmptyWindow { start: TimeOfDay, end: TimeOfDay },
}

/// Day of the week an availability window falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl FromStr for Day {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            "saturday" | "sat" => Ok(Day::Saturday),
            "sunday" | "sun" => Ok(Day::Sunday),
            _ => Err(SlotError::InvalidDay(s.to_string())),
        }
    }
}

/// Wall-clock time within a day, stored as minutes since midnight.
///
/// Ordering matches the lexicographic ordering of the zero-padded `HH:MM`
/// form, which is how stored records express times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self(hour * 60 + minute))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    /// Accepts `HH:MM` and normalizes single-digit hours (`9:00` -> `09:00`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&hour.len()) || minute.len() != 2 || !all_digits(hour) || !all_digits(minute) {
            return Err(invalid());
        }

        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single weekly availability window. `start_time < end_time` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SlotFields")]
pub struct AvailabilitySlot {
    pub day: Day,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl AvailabilitySlot {
    pub fn new(day: Day, start_time: TimeOfDay, end_time: TimeOfDay) -> Result<Self, SlotError> {
        if start_time >= end_time {
            return Err(SlotError::EmptyWindow { start: start_time, end: end_time });
        }
        Ok(Self { day, start_time, end_time })
    }

    /// Parse a slot from its stored string fields
    pub fn parse(day: &str, start_time: &str, end_time: &str) -> Result<Self, SlotError> {
        Self::new(day.parse()?, start_time.parse()?, end_time.parse()?)
    }
}

#[derive(Deserialize)]
struct SlotFields {
    day: String,
    start_time: String,
    end_time: String,
}

impl TryFrom<SlotFields> for AvailabilitySlot {
    type Error = SlotError;

    fn try_from(fields: SlotFields) -> Result<Self, Self::Error> {
        Self::parse(&fields.day, &fields.start_time, &fields.end_time)
    }
}

/// How a student prefers to be taught
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPreferences {
    #[serde(default, deserialize_with = "lenient")]
    pub format: String,
    #[serde(default, deserialize_with = "lenient")]
    pub modality: String,
    #[serde(default, deserialize_with = "lenient")]
    pub style: String,
}

/// Student profile as read from the record store.
///
/// Deserialization never fails on a field: anything missing or of the wrong
/// shape degrades to an empty value. Use [`crate::models::wire::decode_student`]
/// to also accept the tagged encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub student_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_disability: String,
    #[serde(default, deserialize_with = "string_set")]
    pub preferred_subjects: BTreeSet<String>,
    #[serde(default, deserialize_with = "string_set")]
    pub accommodations_needed: BTreeSet<String>,
    #[serde(default, deserialize_with = "slot_list")]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default, deserialize_with = "lenient")]
    pub learning_preferences: LearningPreferences,
    #[serde(default, deserialize_with = "lenient")]
    pub additional_info: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub assigned_tutor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub assigned_tutor_name: Option<String>,
}

/// Tutor profile as read from the record store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub tutor_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(default, deserialize_with = "string_set")]
    pub subjects: BTreeSet<String>,
    #[serde(default, deserialize_with = "string_set")]
    pub accommodation_skills: BTreeSet<String>,
    #[serde(default, deserialize_with = "string_set")]
    pub experience_with_disabilities: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_format: String,
    #[serde(default, deserialize_with = "string_set")]
    pub supported_modalities: BTreeSet<String>,
    #[serde(default, deserialize_with = "slot_list")]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default, deserialize_with = "lenient")]
    pub tutoring_style: String,
    #[serde(default, deserialize_with = "string_set")]
    pub tools_or_technologies: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub additional_info: String,
}

/// Which soft criteria a tutor satisfied, and the resulting score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub score: u32,
    pub shared_subjects: Vec<String>,
    pub matched_accommodations: Vec<String>,
    pub disability_experience: bool,
    pub format_match: bool,
    pub modality_match: bool,
}

/// A viable tutor together with its compatibility score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTutor {
    pub tutor: TutorRecord,
    pub compatibility_score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Points awarded per soft criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Per accommodation the tutor is skilled in
    pub accommodation: u32,
    /// Flat bonus when the tutor has worked with the student's disability
    pub disability: u32,
    pub format: u32,
    pub modality: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            accommodation: 10,
            disability: 15,
            format: 5,
            modality: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_time_parse_and_display() {
        assert_eq!(time("09:30").minutes(), 570);
        assert_eq!(time("23:59").to_string(), "23:59");
        assert_eq!(time("00:00").minutes(), 0);
    }

    #[test]
    fn test_time_normalizes_single_digit_hour() {
        assert_eq!(time("9:05"), time("09:05"));
        assert_eq!(time("9:05").to_string(), "09:05");
    }

    #[test]
    fn test_time_rejects_malformed() {
        for bad in ["", "0900", "9:5", "24:00", "12:60", "ab:cd", "123:00", "-1:00", "12:00:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_time_order_matches_padded_strings() {
        let samples = ["00:00", "08:59", "09:00", "09:30", "10:00", "12:15", "19:45", "23:59"];
        for a in samples {
            for b in samples {
                assert_eq!(time(a).cmp(&time(b)), a.cmp(b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_day_parse() {
        assert_eq!("Monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("mon".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!(" SUNDAY ".parse::<Day>().unwrap(), Day::Sunday);
        assert!("Funday".parse::<Day>().is_err());
    }

    #[test]
    fn test_slot_requires_start_before_end() {
        assert!(AvailabilitySlot::parse("Mon", "09:00", "10:00").is_ok());
        assert!(matches!(
            AvailabilitySlot::parse("Mon", "10:00", "10:00"),
            Err(SlotError::EmptyWindow { .. })
        ));
        assert!(AvailabilitySlot::parse("Mon", "11:00", "10:00").is_err());
    }

    #[test]
    fn test_slot_serializes_as_stored() {
        let slot = AvailabilitySlot::parse("tue", "9:00", "10:30").unwrap();
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"day": "Tuesday", "start_time": "09:00", "end_time": "10:30"})
        );
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.accommodation, 10);
        assert_eq!(weights.disability, 15);
        assert_eq!(weights.format, 5);
        assert_eq!(weights.modality, 5);
    }
}
