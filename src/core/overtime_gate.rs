use crate::core::session::REQUIRED_DAILY_SECS;

pub const MAX_OVERTIME_HOURS: f64 = 3.0;
pub const OVERTIME_STEP_HOURS: f64 = 0.5;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OvertimeDenial {
    DayNotComplete,
    NonPositiveHours,
    OverMaximum,
    OffStep,
}

impl OvertimeDenial {
    pub fn message(&self) -> &'static str {
        match self {
            OvertimeDenial::DayNotComplete => {
                "Complete 8 working hours before requesting overtime"
            }
            OvertimeDenial::NonPositiveHours => "Hours must be greater than 0",
            OvertimeDenial::OverMaximum => {
                "Maximum 3 hours can be requested. For more, contact management directly."
            }
            OvertimeDenial::OffStep => "Hours must be in steps of 0.5",
        }
    }
}

/// Admits an overtime request only after the daily target is met and the
/// asked hours are a half-hour multiple in (0, 3]. Runs before anything
/// is written, so a denied request leaves no row behind.
pub fn check_overtime(today_total_seconds: u32, hours: f64) -> Result<(), OvertimeDenial> {
    if today_total_seconds < REQUIRED_DAILY_SECS {
        return Err(OvertimeDenial::DayNotComplete);
    }
    if hours <= 0.0 {
        return Err(OvertimeDenial::NonPositiveHours);
    }
    if hours > MAX_OVERTIME_HOURS {
        return Err(OvertimeDenial::OverMaximum);
    }
    let steps = hours / OVERTIME_STEP_HOURS;
    if (steps - steps.round()).abs() > f64::EPSILON {
        return Err(OvertimeDenial::OffStep);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_before_daily_target() {
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS - 1, 1.0),
            Err(OvertimeDenial::DayNotComplete)
        );
    }

    #[test]
    fn allowed_exactly_at_daily_target() {
        assert_eq!(check_overtime(REQUIRED_DAILY_SECS, 1.0), Ok(()));
    }

    #[test]
    fn all_half_hour_steps_up_to_three_pass() {
        for steps in 1..=6 {
            let hours = steps as f64 * 0.5;
            assert_eq!(check_overtime(REQUIRED_DAILY_SECS, hours), Ok(()));
        }
    }

    #[test]
    fn more_than_three_hours_is_rejected() {
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS, 3.5),
            Err(OvertimeDenial::OverMaximum)
        );
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS, 8.0),
            Err(OvertimeDenial::OverMaximum)
        );
    }

    #[test]
    fn zero_and_negative_hours_are_rejected() {
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS, 0.0),
            Err(OvertimeDenial::NonPositiveHours)
        );
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS, -1.0),
            Err(OvertimeDenial::NonPositiveHours)
        );
    }

    #[test]
    fn off_step_hours_are_rejected() {
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS, 1.25),
            Err(OvertimeDenial::OffStep)
        );
        assert_eq!(
            check_overtime(REQUIRED_DAILY_SECS, 2.1),
            Err(OvertimeDenial::OffStep)
        );
    }

    #[test]
    fn day_completion_is_checked_first() {
        assert_eq!(
            check_overtime(0, 8.0),
            Err(OvertimeDenial::DayNotComplete)
        );
    }
}
