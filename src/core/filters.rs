use crate::core::availability::has_availability_overlap;
use crate::models::{StudentRecord, TutorRecord};

/// Subjects the student wants that the tutor teaches
pub fn shared_subjects(student: &StudentRecord, tutor: &TutorRecord) -> Vec<String> {
    student
        .preferred_subjects
        .intersection(&tutor.subjects)
        .cloned()
        .collect()
}

#[inline]
pub fn shares_subject(student: &StudentRecord, tutor: &TutorRecord) -> bool {
    !student.preferred_subjects.is_disjoint(&tutor.subjects)
}

#[inline]
pub fn shares_availability(student: &StudentRecord, tutor: &TutorRecord) -> bool {
    has_availability_overlap(&student.availability, &tutor.availability)
}

/// Check the eligibility conditions a tutor must meet before scoring
///
/// A tutor must teach at least one of the student's subjects and share at
/// least one availability window.
#[inline]
pub fn passes_hard_filters(student: &StudentRecord, tutor: &TutorRecord) -> bool {
    shares_subject(student, tutor) && shares_availability(student, tutor)
}
