use chrono::{Local, NaiveDate};

/// The valuation date for "today": the local calendar date of the host.
pub fn valuation_date_today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_days_between_is_inclusive_and_gapless() {
        let days = get_days_between(d(2024, 2, 27), d(2024, 3, 2));
        assert_eq!(
            days,
            vec![
                d(2024, 2, 27),
                d(2024, 2, 28),
                d(2024, 2, 29),
                d(2024, 3, 1),
                d(2024, 3, 2)
            ]
        );
    }

    #[test]
    fn test_days_between_reversed_range_is_empty() {
        assert!(get_days_between(d(2024, 3, 2), d(2024, 3, 1)).is_empty());
    }

    #[test]
    fn test_days_between_single_day() {
        assert_eq!(get_days_between(d(2024, 1, 1), d(2024, 1, 1)), vec![d(2024, 1, 1)]);
    }
}
