use chrono::{Datelike, Local, Timelike};

use crate::model::break_schedule::BreakSchedule;

/// True when `hour` falls inside the day's lunch window. The window is
/// half-open, so a 15..16 schedule covers 15:00:00 through 15:59:59 and
/// `start_hour == end_hour` disables the break for that day.
pub fn is_break_time(schedule: &BreakSchedule, hour: u8) -> bool {
    hour >= schedule.start_hour && hour < schedule.end_hour
}

/// Weekday index as the schedule table stores it, 0 = Sunday.
pub fn local_day_of_week() -> u8 {
    Local::now().weekday().num_days_from_sunday() as u8
}

pub fn local_hour() -> u8 {
    Local::now().hour() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_boundaries() {
        let schedule = BreakSchedule::default_for(1);
        assert!(!is_break_time(&schedule, 14));
        assert!(is_break_time(&schedule, 15));
        assert!(!is_break_time(&schedule, 16));
        assert!(!is_break_time(&schedule, 17));
    }

    #[test]
    fn start_is_inclusive_end_is_exclusive() {
        let schedule = BreakSchedule {
            day_of_week: 3,
            start_hour: 12,
            end_hour: 14,
        };
        assert!(!is_break_time(&schedule, 11));
        assert!(is_break_time(&schedule, 12));
        assert!(is_break_time(&schedule, 13));
        assert!(!is_break_time(&schedule, 14));
    }

    #[test]
    fn empty_window_never_matches() {
        let schedule = BreakSchedule {
            day_of_week: 0,
            start_hour: 15,
            end_hour: 15,
        };
        for hour in 0..24 {
            assert!(!is_break_time(&schedule, hour));
        }
    }
}
