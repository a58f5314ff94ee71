#[cfg(test)]
mod tests {
    use dexus::libs::duration::{compute_total_duration, minutes_to_time, time_to_minutes, Duration};

    #[test]
    fn parses_regular_times() {
        assert_eq!(time_to_minutes("00:00"), 0);
        assert_eq!(time_to_minutes("08:30"), 510);
        assert_eq!(time_to_minutes("23:59"), 1439);
        assert_eq!(time_to_minutes("137:45"), 137 * 60 + 45);
    }

    #[test]
    fn malformed_parts_count_as_zero() {
        assert_eq!(time_to_minutes(""), 0);
        assert_eq!(time_to_minutes("abc"), 0);
        assert_eq!(time_to_minutes("xx:30"), 30);
        assert_eq!(time_to_minutes("02:yy"), 120);
        assert_eq!(time_to_minutes("3"), 180);
        assert_eq!(time_to_minutes("1a:2b"), 62);
        assert_eq!(time_to_minutes("01:15:59"), 75);
    }

    #[test]
    fn oversized_hours_count_as_zero() {
        let huge = "99999999999999999999:00";
        assert_eq!(time_to_minutes(huge), 0);
        assert_eq!(time_to_minutes("153722867280912931:00"), 0);
        assert_eq!(compute_total_duration("08:00", "09:00", Some(huge), None), "01:00");
        assert_eq!(compute_total_duration(huge, "09:00", None, Some(huge)), "09:00");
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let big = Duration::parse("153722867280912930:00");
        assert_eq!(big.minutes(), 153722867280912930 * 60);

        let total: Duration = [big, big].into_iter().sum();
        assert_eq!(total.minutes(), i64::MAX);
        assert_eq!((Duration::from_minutes(i64::MIN) - big).minutes(), i64::MIN);
    }

    #[test]
    fn formats_without_wrapping_hours() {
        assert_eq!(minutes_to_time(0), "00:00");
        assert_eq!(minutes_to_time(59), "00:59");
        assert_eq!(minutes_to_time(60), "01:00");
        assert_eq!(minutes_to_time(24 * 60), "24:00");
        assert_eq!(minutes_to_time(100 * 60 + 5), "100:05");
    }

    #[test]
    fn negative_minutes_keep_minute_field_in_range() {
        assert_eq!(minutes_to_time(-30), "-1:30");
    }

    #[test]
    fn round_trips_two_digit_hours() {
        for hours in 0..100 {
            for minutes in [0, 1, 30, 59] {
                let text = format!("{:02}:{:02}", hours, minutes);
                assert_eq!(minutes_to_time(time_to_minutes(&text)), text);
            }
        }
    }

    #[test]
    fn total_with_discount_and_transfer() {
        assert_eq!(compute_total_duration("08:00", "17:00", Some("01:00"), Some("00:30")), "08:30");
    }

    #[test]
    fn total_rolls_over_midnight_once() {
        assert_eq!(compute_total_duration("22:00", "02:00", None, None), "04:00");
        assert_eq!(compute_total_duration("23:30", "00:15", Some(""), Some("")), "00:45");
    }

    #[test]
    fn empty_optional_fields_are_ignored() {
        assert_eq!(compute_total_duration("09:00", "12:00", Some(""), None), "03:00");
    }

    #[test]
    fn duration_sum_and_display() {
        let total: Duration = ["01:00", "02:30", "00:30"].iter().map(|t| Duration::parse(t)).sum();
        assert_eq!(total.to_string(), "04:00");
        assert_eq!((total - Duration::parse("03:30")).to_string(), "00:30");
    }

    #[test]
    fn duration_serializes_as_text() {
        let json = serde_json::to_string(&Duration::from_minutes(95)).unwrap();
        assert_eq!(json, "\"01:35\"");
        let back: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(back.minutes(), 95);
    }
}
