use crate::auth::auth::AuthUser;
use crate::core::break_window;
use crate::core::session::ActiveSession;
use crate::core::session::CheckoutReason;
use crate::engine::{CheckoutOutcome, SessionEngine, complete_checkout};
use crate::model::attendance::AttendanceRecord;
use crate::utils::break_cache;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    /// Working from home today
    #[schema(example = false)]
    #[serde(default)]
    pub is_wfh: bool,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    #[schema(example = 1000)]
    /// Filter by user ID (HR/Admin only, employees always get their own)
    pub user_id: Option<u64>,
    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    /// Filter by date
    pub date: Option<NaiveDate>,
    #[schema(example = "completed")]
    /// Filter by session status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
    Date(NaiveDate),
}

#[derive(FromRow)]
struct ActiveRow {
    id: u64,
    check_in: DateTime<Utc>,
    is_wfh: bool,
}

/// Seconds already written for the day across all of its session rows.
/// The running row carries 0 until checkout, so this is the banked total.
async fn prior_seconds_today(
    pool: &MySqlPool,
    user_id: u64,
    date: NaiveDate,
) -> Result<u32, sqlx::Error> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT CAST(COALESCE(SUM(total_working_seconds), 0) AS SIGNED)
        FROM attendance
        WHERE user_id = ? AND date = ?
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(total.max(0) as u32)
}

async fn display_name(pool: &MySqlPool, user_id: u64, email: &str) -> Result<String, sqlx::Error> {
    let name = sqlx::query_scalar::<_, String>("SELECT name FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(name.unwrap_or_else(|| email.to_string()))
}

/// Puts a row left `active` by a server restart back into the registry.
/// Counters restart at zero; seconds never written before the crash stay
/// lost, only the banked rows count toward the day.
async fn adopt_active_row(
    engine: &SessionEngine,
    pool: &MySqlPool,
    user_id: u64,
    today: NaiveDate,
) -> Result<Option<ActiveSession>, sqlx::Error> {
    let row = sqlx::query_as::<_, ActiveRow>(
        r#"
        SELECT id, check_in, is_wfh
        FROM attendance
        WHERE user_id = ? AND date = ? AND status = 'active'
        "#,
    )
    .bind(user_id)
    .bind(today)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let prior = prior_seconds_today(pool, user_id, today).await?;
    let session = ActiveSession::new(row.id, user_id, today, row.check_in, prior, row.is_wfh);
    engine.install(session.clone());
    tracing::info!(user_id, record_id = row.id, "Adopted active attendance row");
    Ok(Some(session))
}

fn session_body(session: &ActiveSession, in_break: bool) -> serde_json::Value {
    serde_json::json!({
        "active": true,
        "record_id": session.record_id,
        "date": session.date,
        "check_in": session.checked_in_at,
        "working_seconds": session.working_seconds,
        "idle_seconds": session.idle_seconds,
        "today_total_seconds": session.today_total(),
        "is_wfh": session.is_wfh,
        "is_break_time": in_break,
    })
}

/* =========================
Check-in
========================= */
/// Swagger doc for check_in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(
        content = CheckInReq,
        description = "Check-in payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "record_id": 42,
            "today_total_seconds": 3600
        })),
        (status = 400, description = "Already checked in today or inside the break window", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    engine: web::Data<SessionEngine>,
    payload: web::Json<CheckInReq>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    // 1️⃣ the lunch window rejects new sessions outright
    let schedule =
        break_cache::schedule_for(pool.get_ref(), break_window::local_day_of_week()).await;
    if break_window::is_break_time(&schedule, break_window::local_hour()) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Check-in is not allowed during break hours"
        })));
    }

    // 2️⃣ claim the registry slot before touching the table
    if !engine.try_reserve(user_id) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already checked in today"
        })));
    }

    // 3️⃣ hand the slot back when no session came out of it
    match start_session(engine.get_ref(), pool.get_ref(), &auth, payload.is_wfh).await {
        Ok(response) => Ok(response),
        Err(e) => {
            engine.release(user_id);
            Err(e)
        }
    }
}

async fn start_session(
    engine: &SessionEngine,
    pool: &MySqlPool,
    auth: &AuthUser,
    is_wfh: bool,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = auth.user_id;
    let today = Local::now().date_naive();

    // a row left active by a restart counts as today's check-in
    let adopted = adopt_active_row(engine, pool, user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Check-in lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    if adopted.is_some() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already checked in today"
        })));
    }

    let prior = prior_seconds_today(pool, user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Day total lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let user_name = display_name(pool, user_id, &auth.email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Profile lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (user_id, user_name, date, check_in, total_working_seconds, status, is_wfh)
        VALUES (?, ?, ?, ?, 0, 'active', ?)
        "#,
    )
    .bind(user_id)
    .bind(&user_name)
    .bind(today)
    .bind(now)
    .bind(is_wfh)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Check-in failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let record_id = result.last_insert_id();
    engine.install(ActiveSession::new(
        record_id, user_id, today, now, prior, is_wfh,
    ));

    tracing::info!(user_id, record_id, is_wfh, "Checked in");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked in successfully",
        "record_id": record_id,
        "today_total_seconds": prior
    })))
}

/* =========================
Check-out
========================= */
/// Swagger doc for check_out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully",
            "session_seconds": 14400
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    engine: web::Data<SessionEngine>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    // 1️⃣ normal path, the session lives in the registry
    if let Some(job) = engine.begin_checkout(user_id, CheckoutReason::Completed) {
        return match complete_checkout(engine.get_ref(), pool.get_ref(), &job).await {
            CheckoutOutcome::Written => Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Checked out successfully",
                "session_seconds": job.session_seconds
            }))),
            CheckoutOutcome::AlreadyClosed => {
                Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "No active check-in found for today"
                })))
            }
            CheckoutOutcome::Failed => Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            )),
        };
    }

    // 2️⃣ fallback, a row left active by a restart is closed as it stands
    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?, status = 'completed'
        WHERE user_id = ? AND date = ? AND status = 'active'
        "#,
    )
    .bind(Utc::now())
    .bind(user_id)
    .bind(Local::now().date_naive())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

/* =========================
Activity ping
========================= */
/// Swagger doc for record_activity endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/activity",
    responses(
        (status = 200, description = "Idle clock reset", body = Object, example = json!({
            "message": "Activity recorded"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_activity(
    auth: AuthUser,
    engine: web::Data<SessionEngine>,
) -> actix_web::Result<impl Responder> {
    if !engine.touch(auth.user_id) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Activity recorded"
    })))
}

/* =========================
Current session
========================= */
/// Swagger doc for current_session endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/session",
    responses(
        (status = 200, description = "Running session state, or the day total when none is running", body = Object, example = json!({
            "active": true,
            "record_id": 42,
            "date": "2026-03-02",
            "check_in": "2026-03-02T04:10:00Z",
            "working_seconds": 520,
            "idle_seconds": 3,
            "today_total_seconds": 4120,
            "is_wfh": false,
            "is_break_time": false
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn current_session(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    engine: web::Data<SessionEngine>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;
    let today = Local::now().date_naive();

    let schedule =
        break_cache::schedule_for(pool.get_ref(), break_window::local_day_of_week()).await;
    let in_break = break_window::is_break_time(&schedule, break_window::local_hour());

    if let Some(session) = engine.snapshot(user_id) {
        return Ok(HttpResponse::Ok().json(session_body(&session, in_break)));
    }

    // nothing in the registry, try to adopt a row left over by a restart
    if engine.try_reserve(user_id) {
        match adopt_active_row(engine.get_ref(), pool.get_ref(), user_id, today).await {
            Ok(Some(session)) => {
                return Ok(HttpResponse::Ok().json(session_body(&session, in_break)));
            }
            Ok(None) => engine.release(user_id),
            Err(e) => {
                engine.release(user_id);
                tracing::error!(error = %e, user_id, "Session lookup failed");
                return Err(actix_web::error::ErrorInternalServerError(
                    "Internal Server Error",
                ));
            }
        }
    }

    let total = prior_seconds_today(pool.get_ref(), user_id, today)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Day total lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "active": false,
        "today_total_seconds": total,
        "is_break_time": in_break,
    })))
}

/* =========================
Attendance report
========================= */
/// Swagger doc for attendance_list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance rows, newest day first", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    // employees only ever see their own rows
    let user_id = if auth.is_employee() {
        Some(auth.user_id)
    } else {
        query.user_id
    };

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(uid) = user_id {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::U64(uid));
    }

    if let Some(date) = query.date {
        where_sql.push_str(" AND date = ?");
        args.push(FilterValue::Date(date));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM attendance{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count attendance rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, user_id, user_name, date, check_in, check_out,
               total_working_seconds, status, is_wfh, created_at
        FROM attendance
        {}
        ORDER BY date DESC, check_in DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch attendance rows");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // -------------------------
    // Response
    // -------------------------
    let response = AttendanceListResponse {
        data: rows,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Live attendance (HR/Admin)
========================= */
/// Swagger doc for live_attendance endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/live",
    responses(
        (status = 200, description = "Rows still active today", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn live_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let rows = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, user_id, user_name, date, check_in, check_out,
               total_working_seconds, status, is_wfh, created_at
        FROM attendance
        WHERE date = ? AND status = 'active'
        ORDER BY check_in
        "#,
    )
    .bind(Local::now().date_naive())
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch live attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}
