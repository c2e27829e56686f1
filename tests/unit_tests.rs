// Unit tests for Tutor Match

use std::collections::BTreeSet;
use tutor_match::core::{
    availability::{has_availability_overlap, slots_overlap},
    filters::passes_hard_filters,
    scoring::calculate_compatibility_score,
    Matcher,
};
use tutor_match::models::{AvailabilitySlot, Day, LearningPreferences, ScoringWeights, StudentRecord, TimeOfDay, TutorRecord};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn slot(day: &str, start: &str, end: &str) -> AvailabilitySlot {
    AvailabilitySlot::parse(day, start, end).unwrap()
}

fn student() -> StudentRecord {
    StudentRecord {
        student_id: "10000001".to_string(),
        primary_disability: "Autism".to_string(),
        preferred_subjects: set(&["Science"]),
        accommodations_needed: set(&["Quiet space", "Visual schedule", "Breaks", "Extra time"]),
        availability: vec![slot("Sat", "10:00", "12:00")],
        learning_preferences: LearningPreferences {
            format: "Small group".to_string(),
            modality: "In-person".to_string(),
            style: "Kinesthetic".to_string(),
        },
        ..Default::default()
    }
}

fn tutor(skills: &[&str]) -> TutorRecord {
    TutorRecord {
        tutor_id: "20000001".to_string(),
        subjects: set(&["Science"]),
        accommodation_skills: set(skills),
        availability: vec![slot("Sat", "11:00", "13:00")],
        ..Default::default()
    }
}

#[test]
fn test_overlap_symmetric_over_grid() {
    let times = ["08:00", "09:00", "09:30", "10:00", "11:00"];
    let mut slots = Vec::new();
    for day in ["Mon", "Tue"] {
        for (i, start) in times.iter().enumerate() {
            for end in &times[i + 1..] {
                slots.push(slot(day, start, end));
            }
        }
    }

    for a in &slots {
        for b in &slots {
            assert_eq!(slots_overlap(a, b), slots_overlap(b, a), "{:?} vs {:?}", a, b);
            if a.day != b.day {
                assert!(!slots_overlap(a, b));
            }
        }
    }
}

#[test]
fn test_identical_times_on_different_days() {
    assert!(!has_availability_overlap(
        &[slot("Monday", "09:00", "10:00")],
        &[slot("Tuesday", "09:00", "10:00")]
    ));
}

#[test]
fn test_slot_fields_parse() {
    let parsed = slot("sat", "7:05", "19:30");
    assert_eq!(parsed.day, Day::Saturday);
    assert_eq!(parsed.start_time, TimeOfDay::from_hm(7, 5).unwrap());
    assert_eq!(parsed.end_time.to_string(), "19:30");
}

#[test]
fn test_disjoint_subjects_excluded_regardless_of_bonuses() {
    let mut t = tutor(&["Quiet space", "Visual schedule", "Breaks", "Extra time"]);
    t.subjects = set(&["Art"]);
    t.experience_with_disabilities = set(&["Autism"]);
    t.preferred_format = "Small group".to_string();
    t.supported_modalities = set(&["Hybrid"]);

    assert!(!passes_hard_filters(&student(), &t));
    assert_eq!(Matcher::default().score(&student(), &t), 0);
    assert!(Matcher::default().rank(&student(), vec![t]).is_empty());
}

#[test]
fn test_no_shared_window_excluded() {
    let mut t = tutor(&["Quiet space"]);
    t.availability = vec![slot("Sat", "12:00", "13:00"), slot("Sun", "10:00", "12:00")];

    assert_eq!(Matcher::default().score(&student(), &t), 0);
}

#[test]
fn test_accommodation_score_monotonic() {
    let needs = ["Quiet space", "Visual schedule", "Breaks", "Extra time"];
    let matcher = Matcher::default();
    let s = student();

    let mut previous = matcher.score(&s, &tutor(&[]));
    for count in 1..=needs.len() {
        let score = matcher.score(&s, &tutor(&needs[..count]));
        assert_eq!(score, previous + 10);
        previous = score;
    }
}

#[test]
fn test_soft_score_matches_matcher_score() {
    let s = student();
    let mut t = tutor(&["Breaks"]);
    t.experience_with_disabilities = set(&["Autism"]);
    t.supported_modalities = set(&["Hybrid"]);

    let breakdown = calculate_compatibility_score(&s, &t, &ScoringWeights::default());

    assert_eq!(breakdown.score, 10 + 15 + 5);
    assert_eq!(Matcher::default().score(&s, &t), breakdown.score);
}

#[test]
fn test_empty_tutor_collection() {
    let result = Matcher::default().find_matches(&student(), Vec::new(), Some(10));
    assert!(result.matches.is_empty());
    assert_eq!(result.total_candidates, 0);
}
