use crate::models::AvailabilitySlot;

/// Check whether two weekly windows overlap
///
/// Windows are half-open: a slot ending at 10:00 does not overlap one
/// starting at 10:00. Slots on different days never overlap.
#[inline]
pub fn slots_overlap(a: &AvailabilitySlot, b: &AvailabilitySlot) -> bool {
    a.day == b.day && a.start_time < b.end_time && b.start_time < a.end_time
}

/// Check whether any window in `a` overlaps any window in `b`
///
/// Neither list needs to be sorted; the scan stops at the first overlapping
/// pair.
pub fn has_availability_overlap(a: &[AvailabilitySlot], b: &[AvailabilitySlot]) -> bool {
    a.iter().any(|x| b.iter().any(|y| slots_overlap(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: &str, start: &str, end: &str) -> AvailabilitySlot {
        AvailabilitySlot::parse(day, start, end).unwrap()
    }

    #[test]
    fn test_partial_overlap() {
        assert!(slots_overlap(
            &slot("Mon", "09:00", "10:00"),
            &slot("Mon", "09:30", "10:30")
        ));
    }

    #[test]
    fn test_containment() {
        assert!(slots_overlap(
            &slot("Wed", "08:00", "18:00"),
            &slot("Wed", "12:00", "13:00")
        ));
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        assert!(!slots_overlap(
            &slot("Mon", "09:00", "10:00"),
            &slot("Mon", "10:00", "11:00")
        ));
    }

    #[test]
    fn test_different_days_never_overlap() {
        assert!(!slots_overlap(
            &slot("Mon", "09:00", "10:00"),
            &slot("Tue", "09:00", "10:00")
        ));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let slots = [
            slot("Mon", "09:00", "10:00"),
            slot("Mon", "09:59", "12:00"),
            slot("Mon", "10:00", "11:00"),
            slot("Mon", "07:00", "23:00"),
            slot("Fri", "09:00", "10:00"),
        ];
        for a in &slots {
            for b in &slots {
                assert_eq!(slots_overlap(a, b), slots_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_any_pair_unsorted() {
        let student = [slot("Fri", "15:00", "16:00"), slot("Mon", "09:00", "10:00")];
        let tutor = [slot("Sun", "09:00", "10:00"), slot("Fri", "15:30", "17:00")];
        assert!(has_availability_overlap(&student, &tutor));
        assert!(has_availability_overlap(&tutor, &student));
    }

    #[test]
    fn test_empty_lists() {
        let some = [slot("Mon", "09:00", "10:00")];
        assert!(!has_availability_overlap(&[], &some));
        assert!(!has_availability_overlap(&some, &[]));
        assert!(!has_availability_overlap(&[], &[]));
    }
}
