use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::break_schedule::BreakSchedule;

/// Weekday -> lunch window. The ticker hits this once a second, so the
/// short TTL keeps schedule edits visible without hammering the table.
static BREAK_CACHE: Lazy<Cache<u8, BreakSchedule>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(7)
        .time_to_live(Duration::from_secs(30))
        .build()
});

/// Lunch window for a weekday. Falls back to the default window when no
/// row is configured or the lookup fails.
pub async fn schedule_for(pool: &MySqlPool, day_of_week: u8) -> BreakSchedule {
    BREAK_CACHE
        .get_with(day_of_week, load_schedule(pool, day_of_week))
        .await
}

async fn load_schedule(pool: &MySqlPool, day_of_week: u8) -> BreakSchedule {
    let row = sqlx::query_as::<_, BreakSchedule>(
        r#"
        SELECT day_of_week, start_hour, end_hour
        FROM break_schedule
        WHERE day_of_week = ?
        "#,
    )
    .bind(day_of_week)
    .fetch_optional(pool)
    .await;

    match row {
        Ok(Some(schedule)) => schedule,
        Ok(None) => BreakSchedule::default_for(day_of_week),
        Err(e) => {
            tracing::error!(error = %e, day_of_week, "Break schedule lookup failed");
            BreakSchedule::default_for(day_of_week)
        }
    }
}

/// Drop a cached day after its schedule row changes.
pub async fn invalidate(day_of_week: u8) {
    BREAK_CACHE.invalidate(&day_of_week).await;
}
