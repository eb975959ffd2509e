use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use actix_web::web;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::core::break_window;
use crate::core::session::{ActiveSession, CheckoutReason, TickOutcome};
use crate::utils::break_cache;

/// Registry slot for one user. `Starting` holds the key while the
/// check-in row is written; `CheckingOut` parks the session while its
/// final row update is in flight.
#[derive(Debug)]
enum Slot {
    Starting,
    Active(ActiveSession),
    CheckingOut(ActiveSession),
}

/// A checkout decision waiting to be written back to its attendance row.
#[derive(Debug, Clone)]
pub struct CheckoutJob {
    pub user_id: u64,
    pub record_id: u64,
    pub reason: CheckoutReason,
    pub session_seconds: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CheckoutOutcome {
    /// The row was finalized by this checkout.
    Written,
    /// The row was no longer active; the session was dropped anyway.
    AlreadyClosed,
    /// The write failed; the session keeps running and the next tick retries.
    Failed,
}

/// Shared in-memory registry of running sessions, one slot per user.
/// Every state transition goes through the registry, so a user can never
/// hold two live sessions at once.
#[derive(Default)]
pub struct SessionEngine {
    slots: Mutex<HashMap<u64, Slot>>,
}

impl SessionEngine {
    pub fn new() -> Self {
        SessionEngine {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Claims the user's slot ahead of the check-in insert. Fails when a
    /// session is already running or another check-in is in flight.
    pub fn try_reserve(&self, user_id: u64) -> bool {
        let mut slots = self.slots.lock().unwrap();
        if slots.contains_key(&user_id) {
            return false;
        }
        slots.insert(user_id, Slot::Starting);
        true
    }

    /// Drops a reservation whose check-in never produced a row.
    pub fn release(&self, user_id: u64) {
        let mut slots = self.slots.lock().unwrap();
        if matches!(slots.get(&user_id), Some(Slot::Starting)) {
            slots.remove(&user_id);
        }
    }

    /// Promotes the caller's reservation to a live session.
    pub fn install(&self, session: ActiveSession) {
        let mut slots = self.slots.lock().unwrap();
        slots.insert(session.user_id, Slot::Active(session));
    }

    pub fn snapshot(&self, user_id: u64) -> Option<ActiveSession> {
        let slots = self.slots.lock().unwrap();
        match slots.get(&user_id) {
            Some(Slot::Active(session)) => Some(session.clone()),
            _ => None,
        }
    }

    /// Resets the idle clock. Returns false when no session is running.
    pub fn touch(&self, user_id: u64) -> bool {
        let mut slots = self.slots.lock().unwrap();
        match slots.get_mut(&user_id) {
            Some(Slot::Active(session)) => {
                session.touch();
                true
            }
            _ => false,
        }
    }

    /// Moves a running session into the checkout phase and hands back the
    /// write job. `None` when the user has no running session.
    pub fn begin_checkout(&self, user_id: u64, reason: CheckoutReason) -> Option<CheckoutJob> {
        let mut slots = self.slots.lock().unwrap();
        match slots.remove(&user_id) {
            Some(Slot::Active(session)) => {
                let job = CheckoutJob {
                    user_id,
                    record_id: session.record_id,
                    reason,
                    session_seconds: session.working_seconds,
                };
                slots.insert(user_id, Slot::CheckingOut(session));
                Some(job)
            }
            Some(other) => {
                slots.insert(user_id, other);
                None
            }
            None => None,
        }
    }

    /// Advances every running session by one second and collects the
    /// checkouts the tick produced. Sessions already checking out are
    /// left untouched until their write settles.
    pub fn tick_all(&self, in_break: bool) -> Vec<CheckoutJob> {
        let mut slots = self.slots.lock().unwrap();
        let mut jobs = Vec::new();
        for (user_id, slot) in slots.iter_mut() {
            if let Slot::Active(session) = slot {
                if let TickOutcome::Checkout(reason) = session.tick(in_break) {
                    jobs.push(CheckoutJob {
                        user_id: *user_id,
                        record_id: session.record_id,
                        reason,
                        session_seconds: session.working_seconds,
                    });
                    let parked = session.clone();
                    *slot = Slot::CheckingOut(parked);
                }
            }
        }
        jobs
    }

    /// Finishes a checkout whose row update settled.
    pub fn confirm_checkout(&self, user_id: u64) {
        let mut slots = self.slots.lock().unwrap();
        match slots.remove(&user_id) {
            Some(Slot::CheckingOut(_)) | None => {}
            Some(other) => {
                slots.insert(user_id, other);
            }
        }
    }

    /// Reverts a failed checkout; the session keeps its counters and the
    /// next tick produces the job again.
    pub fn abort_checkout(&self, user_id: u64) {
        let mut slots = self.slots.lock().unwrap();
        match slots.remove(&user_id) {
            Some(Slot::CheckingOut(session)) => {
                slots.insert(user_id, Slot::Active(session));
            }
            Some(other) => {
                slots.insert(user_id, other);
            }
            None => {}
        }
    }
}

/// Finalizes one attendance row. Returns false when the row was no
/// longer active, e.g. a manual checkout raced the ticker.
pub async fn persist_checkout(pool: &MySqlPool, job: &CheckoutJob) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?, total_working_seconds = ?, status = ?
        WHERE id = ? AND status = 'active'
        "#,
    )
    .bind(Utc::now())
    .bind(job.session_seconds)
    .bind(job.reason.status().as_str())
    .bind(job.record_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Runs a checkout to completion against the registry: confirmed once
/// the row settles, aborted on a write error so the next tick retries.
pub async fn complete_checkout(
    engine: &SessionEngine,
    pool: &MySqlPool,
    job: &CheckoutJob,
) -> CheckoutOutcome {
    match persist_checkout(pool, job).await {
        Ok(true) => {
            engine.confirm_checkout(job.user_id);
            CheckoutOutcome::Written
        }
        Ok(false) => {
            tracing::warn!(
                user_id = job.user_id,
                record_id = job.record_id,
                "Attendance row already finalized, dropping session"
            );
            engine.confirm_checkout(job.user_id);
            CheckoutOutcome::AlreadyClosed
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                user_id = job.user_id,
                record_id = job.record_id,
                "Checkout write failed"
            );
            engine.abort_checkout(job.user_id);
            CheckoutOutcome::Failed
        }
    }
}

/// Once-a-second driver behind every running session. Resolves the lunch
/// window for the current local weekday, advances the registry and writes
/// out whatever checkouts the tick produced.
pub async fn run_ticker(engine: web::Data<SessionEngine>, pool: MySqlPool) {
    let mut interval = actix_web::rt::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;

        let day = break_window::local_day_of_week();
        let hour = break_window::local_hour();
        let schedule = break_cache::schedule_for(&pool, day).await;
        let in_break = break_window::is_break_time(&schedule, hour);

        for job in engine.tick_all(in_break) {
            complete_checkout(&engine, &pool, &job).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{IDLE_LIMIT_SECS, REQUIRED_DAILY_SECS};
    use chrono::{NaiveDate, TimeZone};

    fn session(user_id: u64, record_id: u64, prior_seconds: u32) -> ActiveSession {
        ActiveSession::new(
            record_id,
            user_id,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 4, 0, 0).unwrap(),
            prior_seconds,
            false,
        )
    }

    #[test]
    fn reservation_blocks_second_check_in() {
        let engine = SessionEngine::new();
        assert!(engine.try_reserve(7));
        assert!(!engine.try_reserve(7));
        assert!(engine.try_reserve(8));
    }

    #[test]
    fn release_frees_a_reservation() {
        let engine = SessionEngine::new();
        assert!(engine.try_reserve(7));
        engine.release(7);
        assert!(engine.try_reserve(7));
    }

    #[test]
    fn release_leaves_live_sessions_alone() {
        let engine = SessionEngine::new();
        assert!(engine.try_reserve(7));
        engine.install(session(7, 1, 0));
        engine.release(7);
        assert!(engine.snapshot(7).is_some());
    }

    #[test]
    fn install_makes_the_session_visible() {
        let engine = SessionEngine::new();
        assert!(engine.try_reserve(7));
        assert!(engine.snapshot(7).is_none());
        engine.install(session(7, 1, 120));
        let snap = engine.snapshot(7).unwrap();
        assert_eq!(snap.record_id, 1);
        assert_eq!(snap.prior_seconds, 120);
    }

    #[test]
    fn touch_resets_idle_but_not_working() {
        let engine = SessionEngine::new();
        engine.install(session(7, 1, 0));
        engine.tick_all(false);
        engine.tick_all(false);
        assert!(engine.touch(7));
        let snap = engine.snapshot(7).unwrap();
        assert_eq!(snap.idle_seconds, 0);
        assert_eq!(snap.working_seconds, 2);
    }

    #[test]
    fn touch_without_session_reports_false() {
        let engine = SessionEngine::new();
        assert!(!engine.touch(7));
    }

    #[test]
    fn manual_checkout_takes_the_session_out_of_ticking() {
        let engine = SessionEngine::new();
        engine.install(session(7, 1, 0));
        engine.tick_all(false);

        let job = engine.begin_checkout(7, CheckoutReason::Completed).unwrap();
        assert_eq!(job.record_id, 1);
        assert_eq!(job.session_seconds, 1);
        assert_eq!(job.reason, CheckoutReason::Completed);

        assert!(engine.snapshot(7).is_none());
        assert!(engine.begin_checkout(7, CheckoutReason::Completed).is_none());
        assert!(engine.tick_all(false).is_empty());
    }

    #[test]
    fn confirm_empties_the_slot() {
        let engine = SessionEngine::new();
        engine.install(session(7, 1, 0));
        engine.begin_checkout(7, CheckoutReason::Completed).unwrap();
        engine.confirm_checkout(7);
        assert!(engine.try_reserve(7));
    }

    #[test]
    fn abort_restores_the_running_session() {
        let engine = SessionEngine::new();
        engine.install(session(7, 1, 0));
        engine.tick_all(false);
        engine.begin_checkout(7, CheckoutReason::Completed).unwrap();
        engine.abort_checkout(7);

        let snap = engine.snapshot(7).unwrap();
        assert_eq!(snap.working_seconds, 1);
        assert!(engine.begin_checkout(7, CheckoutReason::Completed).is_some());
    }

    #[test]
    fn idle_limit_surfaces_as_a_tick_job() {
        let engine = SessionEngine::new();
        engine.install(session(7, 3, 0));
        for _ in 0..IDLE_LIMIT_SECS - 1 {
            assert!(engine.tick_all(false).is_empty());
        }
        let jobs = engine.tick_all(false);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].reason, CheckoutReason::Idle);
        assert_eq!(jobs[0].record_id, 3);
        assert_eq!(jobs[0].session_seconds, IDLE_LIMIT_SECS);
    }

    #[test]
    fn daily_target_surfaces_as_a_system_job() {
        let engine = SessionEngine::new();
        engine.install(session(7, 3, REQUIRED_DAILY_SECS - 1));
        let jobs = engine.tick_all(false);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].reason, CheckoutReason::System);
        assert_eq!(jobs[0].session_seconds, 1);
    }

    #[test]
    fn break_tick_checks_out_every_running_session() {
        let engine = SessionEngine::new();
        engine.install(session(7, 1, 0));
        engine.install(session(8, 2, 0));
        let mut jobs = engine.tick_all(true);
        jobs.sort_by_key(|j| j.user_id);
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.reason == CheckoutReason::Lunch));
        assert_eq!(jobs[0].session_seconds, 0);
    }

    #[test]
    fn parked_sessions_do_not_tick_again() {
        let engine = SessionEngine::new();
        engine.install(session(7, 1, REQUIRED_DAILY_SECS - 1));
        assert_eq!(engine.tick_all(false).len(), 1);
        assert!(engine.tick_all(false).is_empty());
        assert!(engine.tick_all(false).is_empty());
    }
}
