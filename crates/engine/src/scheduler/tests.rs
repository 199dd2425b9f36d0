//! Tests for the scheduler module.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::scheduler::cron::{normalize_cron, to_schedule_syntax, upcoming, validate};

    // -- normalize_cron ----------------------------------------------------

    #[test]
    fn normalize_cron_5_to_6_fields() {
        assert_eq!(normalize_cron("*/15 * * * *"), "0 */15 * * * *");
        assert_eq!(normalize_cron("0 6 * * 1-5"), "0 0 6 * * 1-5");
        assert_eq!(normalize_cron("30 2 1 * *"), "0 30 2 1 * *");
    }

    #[test]
    fn normalize_cron_already_6_fields() {
        assert_eq!(normalize_cron("0 */15 * * * *"), "0 */15 * * * *");
    }

    #[test]
    fn normalize_cron_trims_whitespace() {
        assert_eq!(normalize_cron("  */5 * * * *  "), "0 */5 * * * *");
    }

    // -- to_schedule_syntax ------------------------------------------------

    #[test]
    fn weekday_numbers_become_names() {
        assert_eq!(to_schedule_syntax("0 9 * * 1-5"), "0 0 9 * * Mon-Fri");
        assert_eq!(to_schedule_syntax("0 9 * * 0"), "0 0 9 * * Sun");
        assert_eq!(to_schedule_syntax("0 9 * * 7"), "0 0 9 * * Sun");
        assert_eq!(to_schedule_syntax("0 9 * * 1,3,5"), "0 0 9 * * Mon,Wed,Fri");
    }

    #[test]
    fn weekday_wildcards_and_steps_untouched() {
        assert_eq!(to_schedule_syntax("0 9 * * *"), "0 0 9 * * *");
        assert_eq!(to_schedule_syntax("0 9 * * */2"), "0 0 9 * * */2");
        assert_eq!(to_schedule_syntax("0 9 * * 1-5/2"), "0 0 9 * * Mon-Fri/2");
    }

    #[test]
    fn other_fields_keep_their_numbers() {
        assert_eq!(
            to_schedule_syntax("5 4 1 1,4,7,10 *"),
            "0 5 4 1 1,4,7,10 *"
        );
    }

    // -- validate ----------------------------------------------------------

    #[test]
    fn validate_accepts_synthesized_expressions() {
        for expr in [
            "0 9 * * 1-5",
            "0 9 * * *",
            "0 9 * * 1",
            "0 9 1 * *",
            "0 9 1 1,4,7,10 *",
            "30-59/5 9 * * *",
            "30 9-23/2 * * *",
            "0 4 1 1 0",
        ] {
            assert!(validate(expr).is_ok(), "{expr}");
        }
    }

    #[test]
    fn validate_rejects_garbage() {
        let err = validate("61 25 * * *").unwrap_err();
        assert!(err.to_string().contains("61 25 * * *"));
        assert!(validate("not a cron").is_err());
    }

    // -- upcoming ----------------------------------------------------------

    #[test]
    fn upcoming_skips_weekends() {
        // 2024-01-05 is a Friday.
        let after = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let runs = upcoming("0 9 * * 1-5", after, 2).unwrap();
        assert_eq!(
            runs,
            vec![
                Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 9, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn upcoming_quarterly() {
        let after = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let runs = upcoming("0 9 1 1,4,7,10 *", after, 2).unwrap();
        assert_eq!(
            runs,
            vec![
                Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn upcoming_respects_count() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(upcoming("0 9 * * *", after, 0).unwrap().is_empty());
        assert_eq!(upcoming("0 9 * * *", after, 5).unwrap().len(), 5);
    }
}
