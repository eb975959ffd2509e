use chrono::{DateTime, NaiveDate, Utc};

use crate::model::attendance::SessionStatus;

/// Continuous inactivity allowed before the tracker checks the user out.
pub const IDLE_LIMIT_SECS: u32 = 15 * 60;

/// Daily working-time target; reaching it ends the session for the day.
pub const REQUIRED_DAILY_SECS: u32 = 8 * 60 * 60;

/// Why a session ended. Maps one-to-one onto the terminal row statuses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CheckoutReason {
    Completed,
    Idle,
    Lunch,
    System,
}

impl CheckoutReason {
    pub fn status(&self) -> SessionStatus {
        match self {
            CheckoutReason::Completed => SessionStatus::Completed,
            CheckoutReason::Idle => SessionStatus::IdleCheckout,
            CheckoutReason::Lunch => SessionStatus::LunchCheckout,
            CheckoutReason::System => SessionStatus::SystemCheckout,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    Continue,
    Checkout(CheckoutReason),
}

/// In-memory state of one running attendance session.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub record_id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub checked_in_at: DateTime<Utc>,
    /// Seconds banked by earlier sessions on the same date.
    pub prior_seconds: u32,
    pub working_seconds: u32,
    pub idle_seconds: u32,
    pub is_wfh: bool,
}

impl ActiveSession {
    pub fn new(
        record_id: u64,
        user_id: u64,
        date: NaiveDate,
        checked_in_at: DateTime<Utc>,
        prior_seconds: u32,
        is_wfh: bool,
    ) -> Self {
        ActiveSession {
            record_id,
            user_id,
            date,
            checked_in_at,
            prior_seconds,
            working_seconds: 0,
            idle_seconds: 0,
            is_wfh,
        }
    }

    /// Seconds worked today across all of the day's sessions.
    pub fn today_total(&self) -> u32 {
        self.prior_seconds + self.working_seconds
    }

    /// Marks user activity. Only the idle clock resets.
    pub fn touch(&mut self) {
        self.idle_seconds = 0;
    }

    /// Advances the session by one second.
    ///
    /// A tick inside the lunch window ends the session without counting.
    /// Otherwise both counters advance and the daily target is checked
    /// before the idle limit, so a tick that crosses both ends the day.
    pub fn tick(&mut self, in_break: bool) -> TickOutcome {
        if in_break {
            return TickOutcome::Checkout(CheckoutReason::Lunch);
        }

        self.working_seconds += 1;
        self.idle_seconds += 1;

        if self.today_total() >= REQUIRED_DAILY_SECS {
            return TickOutcome::Checkout(CheckoutReason::System);
        }
        if self.idle_seconds >= IDLE_LIMIT_SECS {
            return TickOutcome::Checkout(CheckoutReason::Idle);
        }
        TickOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(prior_seconds: u32) -> ActiveSession {
        ActiveSession::new(
            1,
            7,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 4, 0, 0).unwrap(),
            prior_seconds,
            false,
        )
    }

    #[test]
    fn tick_advances_both_counters() {
        let mut s = session(0);
        assert_eq!(s.tick(false), TickOutcome::Continue);
        assert_eq!(s.working_seconds, 1);
        assert_eq!(s.idle_seconds, 1);
    }

    #[test]
    fn working_seconds_never_decrease() {
        let mut s = session(0);
        let mut last = 0;
        for i in 0..100 {
            if i % 7 == 0 {
                s.touch();
            }
            s.tick(false);
            assert!(s.working_seconds > last);
            last = s.working_seconds;
        }
    }

    #[test]
    fn touch_resets_idle_only() {
        let mut s = session(0);
        for _ in 0..10 {
            s.tick(false);
        }
        s.touch();
        assert_eq!(s.idle_seconds, 0);
        assert_eq!(s.working_seconds, 10);
    }

    #[test]
    fn idle_limit_triggers_idle_checkout() {
        let mut s = session(0);
        for _ in 0..IDLE_LIMIT_SECS - 1 {
            assert_eq!(s.tick(false), TickOutcome::Continue);
        }
        assert_eq!(s.tick(false), TickOutcome::Checkout(CheckoutReason::Idle));
        assert_eq!(s.idle_seconds, IDLE_LIMIT_SECS);
        assert_eq!(s.working_seconds, IDLE_LIMIT_SECS);
    }

    #[test]
    fn touch_keeps_session_alive_past_idle_limit() {
        let mut s = session(0);
        for _ in 0..IDLE_LIMIT_SECS - 1 {
            s.tick(false);
        }
        s.touch();
        for _ in 0..IDLE_LIMIT_SECS - 1 {
            assert_eq!(s.tick(false), TickOutcome::Continue);
        }
    }

    #[test]
    fn daily_target_triggers_system_checkout() {
        let mut s = session(REQUIRED_DAILY_SECS - 1);
        assert_eq!(s.tick(false), TickOutcome::Checkout(CheckoutReason::System));
        assert_eq!(s.working_seconds, 1);
        assert_eq!(s.today_total(), REQUIRED_DAILY_SECS);
    }

    #[test]
    fn daily_target_wins_over_idle_limit() {
        // prior picked so both limits land on the same tick
        let mut s = session(REQUIRED_DAILY_SECS - IDLE_LIMIT_SECS);
        for _ in 0..IDLE_LIMIT_SECS - 1 {
            assert_eq!(s.tick(false), TickOutcome::Continue);
        }
        assert_eq!(s.tick(false), TickOutcome::Checkout(CheckoutReason::System));
    }

    #[test]
    fn break_tick_checks_out_without_counting() {
        let mut s = session(0);
        s.tick(false);
        assert_eq!(s.tick(true), TickOutcome::Checkout(CheckoutReason::Lunch));
        assert_eq!(s.working_seconds, 1);
        assert_eq!(s.idle_seconds, 1);
    }

    #[test]
    fn today_total_includes_prior_sessions() {
        let mut s = session(3600);
        for _ in 0..30 {
            s.tick(false);
        }
        assert_eq!(s.today_total(), 3630);
    }

    #[test]
    fn checkout_reason_maps_to_terminal_status() {
        assert_eq!(CheckoutReason::Completed.status(), SessionStatus::Completed);
        assert_eq!(CheckoutReason::Idle.status(), SessionStatus::IdleCheckout);
        assert_eq!(CheckoutReason::Lunch.status(), SessionStatus::LunchCheckout);
        assert_eq!(CheckoutReason::System.status(), SessionStatus::SystemCheckout);
    }
}
