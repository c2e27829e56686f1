use crate::models::{ScoreBreakdown, ScoringWeights, StudentRecord, TutorRecord};

/// Modality that satisfies any student modality preference
pub const HYBRID_MODALITY: &str = "Hybrid";

/// Calculate the soft compatibility score for a tutor
///
/// Scoring formula:
/// score = (
///     matched_accommodations * accommodation +  # each need the tutor is skilled in
///     disability_experience  * disability +     # flat, not per item
///     format_match           * format +         # preferred formats equal
///     modality_match         * modality         # modality supported, or tutor is Hybrid
/// )
///
/// Hard filters are not applied here; see [`crate::core::filters`]. String
/// comparisons are exact.
pub fn calculate_compatibility_score(
    student: &StudentRecord,
    tutor: &TutorRecord,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let matched_accommodations: Vec<String> = student
        .accommodations_needed
        .intersection(&tutor.accommodation_skills)
        .cloned()
        .collect();

    let disability_experience = tutor
        .experience_with_disabilities
        .contains(&student.primary_disability);

    let format_match = tutor.preferred_format == student.learning_preferences.format;

    let modality_match = tutor
        .supported_modalities
        .contains(&student.learning_preferences.modality)
        || tutor.supported_modalities.contains(HYBRID_MODALITY);

    // Saturates on oversized configured weights
    let matched = u32::try_from(matched_accommodations.len()).unwrap_or(u32::MAX);
    let mut score = weights.accommodation.saturating_mul(matched);
    if disability_experience {
        score = score.saturating_add(weights.disability);
    }
    if format_match {
        score = score.saturating_add(weights.format);
    }
    if modality_match {
        score = score.saturating_add(weights.modality);
    }

    ScoreBreakdown {
        score,
        shared_subjects: Vec::new(),
        matched_accommodations,
        disability_experience,
        format_match,
        modality_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LearningPreferences;

    fn set(items: &[&str]) -> std::collections::BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_student() -> StudentRecord {
        StudentRecord {
            student_id: "10000001".to_string(),
            primary_disability: "ADHD".to_string(),
            accommodations_needed: set(&["Extra time"]),
            learning_preferences: LearningPreferences {
                format: "1-on-1".to_string(),
                modality: "Online".to_string(),
                style: "Visual".to_string(),
            },
            ..Default::default()
        }
    }

    fn create_test_tutor() -> TutorRecord {
        TutorRecord {
            tutor_id: "20000001".to_string(),
            accommodation_skills: set(&["Extra time"]),
            experience_with_disabilities: set(&["ADHD"]),
            preferred_format: "1-on-1".to_string(),
            supported_modalities: set(&["Online"]),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_criteria() {
        let breakdown = calculate_compatibility_score(
            &create_test_student(),
            &create_test_tutor(),
            &ScoringWeights::default(),
        );

        assert_eq!(breakdown.score, 35);
        assert_eq!(breakdown.matched_accommodations, vec!["Extra time"]);
        assert!(breakdown.disability_experience);
        assert!(breakdown.format_match);
        assert!(breakdown.modality_match);
    }

    #[test]
    fn test_each_accommodation_adds_ten() {
        let weights = ScoringWeights::default();
        let mut student = create_test_student();
        let mut tutor = create_test_tutor();
        let base = calculate_compatibility_score(&student, &tutor, &weights).score;

        student.accommodations_needed.insert("Screen reader".to_string());
        tutor.accommodation_skills.insert("Screen reader".to_string());
        let one_more = calculate_compatibility_score(&student, &tutor, &weights).score;

        assert_eq!(one_more, base + 10);
    }

    #[test]
    fn test_unneeded_skills_add_nothing() {
        let weights = ScoringWeights::default();
        let student = create_test_student();
        let mut tutor = create_test_tutor();
        let base = calculate_compatibility_score(&student, &tutor, &weights).score;

        tutor.accommodation_skills.insert("Sign language".to_string());
        assert_eq!(calculate_compatibility_score(&student, &tutor, &weights).score, base);
    }

    #[test]
    fn test_disability_bonus_is_flat() {
        let mut tutor = create_test_tutor();
        tutor.experience_with_disabilities = set(&["ADHD", "Dyslexia", "Autism"]);

        let breakdown =
            calculate_compatibility_score(&create_test_student(), &tutor, &ScoringWeights::default());
        assert_eq!(breakdown.score, 35);
    }

    #[test]
    fn test_hybrid_tutor_matches_any_modality() {
        let mut tutor = create_test_tutor();
        tutor.supported_modalities = set(&[HYBRID_MODALITY]);
        let mut student = create_test_student();
        student.learning_preferences.modality = "In-person".to_string();

        let breakdown = calculate_compatibility_score(&student, &tutor, &ScoringWeights::default());
        assert!(breakdown.modality_match);
    }

    #[test]
    fn test_no_soft_criteria() {
        let tutor = TutorRecord {
            preferred_format: "Group".to_string(),
            supported_modalities: set(&["In-person"]),
            ..Default::default()
        };

        let breakdown =
            calculate_compatibility_score(&create_test_student(), &tutor, &ScoringWeights::default());
        assert_eq!(breakdown.score, 0);
    }

    #[test]
    fn test_comparisons_are_case_sensitive() {
        let mut tutor = create_test_tutor();
        tutor.experience_with_disabilities = set(&["adhd"]);
        tutor.preferred_format = "1-ON-1".to_string();

        let breakdown =
            calculate_compatibility_score(&create_test_student(), &tutor, &ScoringWeights::default());
        assert_eq!(breakdown.score, 15);
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            accommodation: 1,
            disability: 2,
            format: 3,
            modality: 4,
        };

        let breakdown =
            calculate_compatibility_score(&create_test_student(), &create_test_tutor(), &weights);
        assert_eq!(breakdown.score, 10);
    }

    #[test]
    fn test_large_weights_saturate() {
        let weights = ScoringWeights {
            accommodation: 3_000_000_000,
            ..ScoringWeights::default()
        };
        let mut student = create_test_student();
        let mut tutor = create_test_tutor();
        student.accommodations_needed.insert("Breaks".to_string());
        tutor.accommodation_skills.insert("Breaks".to_string());

        let breakdown = calculate_compatibility_score(&student, &tutor, &weights);
        assert_eq!(breakdown.score, u32::MAX);
        assert_eq!(breakdown.matched_accommodations.len(), 2);
    }
}
