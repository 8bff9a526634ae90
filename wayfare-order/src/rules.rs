use chrono::{Months, NaiveDate};
use wayfare_core::booking::TravelerType;

/// Allowed age in whole years.
pub fn age_window(traveler_type: TravelerType) -> (u32, u32) {
    match traveler_type {
        TravelerType::Adult => (12, 180),
        TravelerType::Child => (2, 11),
        TravelerType::HeldInfant | TravelerType::SeatedInfant => (0, 1),
    }
}

/// True when `today - max < date_of_birth <= today - min`.
///
/// The young end includes the birthday itself: an infant born today, a child
/// turning two and an adult turning twelve all qualify.
pub fn is_valid_date_of_birth(
    traveler_type: TravelerType,
    date_of_birth: NaiveDate,
    today: NaiveDate,
) -> bool {
    let (min_years, max_years) = age_window(traveler_type);

    let (Some(youngest), Some(oldest)) = (
        today.checked_sub_months(Months::new(min_years * 12)),
        today.checked_sub_months(Months::new(max_years * 12)),
    ) else {
        return false;
    };

    oldest < date_of_birth && date_of_birth <= youngest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_adult_window() {
        let today = date(2024, 2, 1);
        assert!(is_valid_date_of_birth(TravelerType::Adult, date(1994, 2, 1), today));
        assert!(!is_valid_date_of_birth(TravelerType::Adult, date(2019, 2, 1), today));
        // twelfth birthday
        assert!(is_valid_date_of_birth(TravelerType::Adult, date(2012, 2, 1), today));
        assert!(!is_valid_date_of_birth(TravelerType::Adult, date(2012, 2, 2), today));
        assert!(!is_valid_date_of_birth(TravelerType::Adult, date(1844, 2, 1), today));
    }

    #[test]
    fn test_child_window() {
        let today = date(2024, 2, 1);
        assert!(is_valid_date_of_birth(TravelerType::Child, date(2019, 2, 1), today));
        assert!(is_valid_date_of_birth(TravelerType::Child, date(2022, 2, 1), today));
        assert!(!is_valid_date_of_birth(TravelerType::Child, date(2022, 2, 2), today));
        assert!(!is_valid_date_of_birth(TravelerType::Child, date(2013, 2, 1), today));
    }

    #[test]
    fn test_infant_window() {
        let today = date(2024, 2, 1);
        assert!(is_valid_date_of_birth(TravelerType::HeldInfant, date(2023, 8, 15), today));
        assert!(is_valid_date_of_birth(TravelerType::SeatedInfant, date(2024, 1, 31), today));
        // born today
        assert!(is_valid_date_of_birth(TravelerType::HeldInfant, date(2024, 2, 1), today));
        assert!(!is_valid_date_of_birth(TravelerType::SeatedInfant, date(2024, 2, 2), today));
        assert!(!is_valid_date_of_birth(TravelerType::HeldInfant, date(2023, 2, 1), today));
    }

    #[test]
    fn test_leap_day_birthday() {
        // Feb 29 minus a year clamps to Feb 28
        let today = date(2024, 2, 29);
        assert!(!is_valid_date_of_birth(TravelerType::HeldInfant, date(2023, 2, 28), today));
        assert!(is_valid_date_of_birth(TravelerType::HeldInfant, date(2023, 3, 1), today));
    }
}
