use crate::core::{
    filters::{passes_hard_filters, shared_subjects},
    scoring::calculate_compatibility_score,
};
use crate::models::{ScoreBreakdown, ScoredTutor, ScoringWeights, StudentRecord, TutorRecord};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredTutor>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Subject overlap filter
/// 2. Availability overlap filter
/// 3. Soft-criteria scoring
/// 4. Viability cut (`score > 0`) and stable ranking
///
/// The matcher holds no state beyond its weights and never mutates its
/// inputs, so a single instance is shared by every request.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single tutor. Tutors failing a hard filter score 0.
    pub fn score(&self, student: &StudentRecord, tutor: &TutorRecord) -> u32 {
        self.evaluate(student, tutor).map_or(0, |breakdown| breakdown.score)
    }

    fn evaluate(&self, student: &StudentRecord, tutor: &TutorRecord) -> Option<ScoreBreakdown> {
        if !passes_hard_filters(student, tutor) {
            return None;
        }

        let mut breakdown = calculate_compatibility_score(student, tutor, &self.weights);
        breakdown.shared_subjects = shared_subjects(student, tutor);
        Some(breakdown)
    }

    /// Find compatible tutors for a student
    ///
    /// # Arguments
    /// * `student` - The student being matched
    /// * `tutors` - Every candidate tutor
    /// * `limit` - Maximum number of matches to return, if any
    ///
    /// # Returns
    /// MatchResult with viable tutors, highest score first. Tutors with equal
    /// scores keep their input order. Only tutors scoring above zero are
    /// viable, so a tutor passing both hard filters but meeting no soft
    /// criterion is excluded too.
    pub fn find_matches(
        &self,
        student: &StudentRecord,
        tutors: Vec<TutorRecord>,
        limit: Option<usize>,
    ) -> MatchResult {
        let total_candidates = tutors.len();

        let mut matches: Vec<ScoredTutor> = tutors
            .into_iter()
            .filter_map(|tutor| {
                let breakdown = self.evaluate(student, &tutor)?;
                (breakdown.score > 0).then(|| ScoredTutor {
                    tutor,
                    compatibility_score: breakdown.score,
                    breakdown,
                })
            })
            .collect();

        // Vec::sort_by is stable
        matches.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        MatchResult {
            matches,
            total_candidates,
        }
    }

    /// Rank tutors for a student, dropping non-viable ones
    pub fn rank(&self, student: &StudentRecord, tutors: Vec<TutorRecord>) -> Vec<TutorRecord> {
        self.find_matches(student, tutors, None)
            .matches
            .into_iter()
            .map(|scored| scored.tutor)
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
