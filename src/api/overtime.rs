use crate::auth::auth::AuthUser;
use crate::core::overtime_gate::check_overtime;
use crate::engine::SessionEngine;
use crate::model::overtime::OvertimeRequest;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateOvertime {
    #[schema(example = "Billing migration")]
    pub project: String,
    #[schema(example = 1.5)]
    pub hours: f64,
    #[schema(example = "Release cutover ran past the deadline")]
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
pub struct OvertimeListResponse {
    pub data: Vec<OvertimeRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct OvertimeFilter {
    #[schema(example = 1000)]
    /// Filter by user ID
    pub user_id: Option<u64>,
    #[schema(example = "Pending")]
    /// Filter by request status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

const OVERTIME_COLUMNS: &str =
    "id, user_id, user_name, project, hours, reason, status, date, created_at";

/* =========================
Create overtime request
========================= */
/// Swagger doc for create_overtime endpoint
#[utoipa::path(
    post,
    path = "/api/v1/overtime",
    request_body(
        content = CreateOvertime,
        description = "Overtime request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Overtime request submitted successfully",
         body = Object,
         example = json!({
            "message": "Overtime request submitted",
            "status": "Pending"
         })
        ),
        (status = 400, description = "Gate rejected the request", body = Object, example = json!({
            "message": "Complete 8 working hours before requesting overtime"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn create_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    engine: web::Data<SessionEngine>,
    payload: web::Json<CreateOvertime>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    // 1️⃣ validate text fields
    let project = payload.project.trim();
    let reason = payload.reason.trim();
    if project.is_empty() || reason.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Project and reason are required"
        })));
    }

    // 2️⃣ today's total = banked rows plus the running session
    let today = Local::now().date_naive();
    let banked = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT CAST(COALESCE(SUM(total_working_seconds), 0) AS SIGNED)
        FROM attendance
        WHERE user_id = ? AND date = ?
        "#,
    )
    .bind(user_id)
    .bind(today)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Day total lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut today_total = banked.max(0) as u32;
    if let Some(session) = engine.snapshot(user_id) {
        today_total += session.working_seconds;
    }

    // 3️⃣ the gate decides, nothing is written on a denial
    if let Err(denial) = check_overtime(today_total, payload.hours) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": denial.message()
        })));
    }

    // 4️⃣ display name is denormalized onto the request row
    let user_name = sqlx::query_scalar::<_, String>("SELECT name FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Profile lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .unwrap_or_else(|| auth.email.clone());

    // 5️⃣ insert request
    sqlx::query(
        r#"
        INSERT INTO overtime_requests
            (user_id, user_name, project, hours, reason, status, date)
        VALUES (?, ?, ?, ?, ?, 'Pending', ?)
        "#,
    )
    .bind(user_id)
    .bind(&user_name)
    .bind(project)
    .bind(payload.hours)
    .bind(reason)
    .bind(today)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to create overtime request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Overtime request submitted",
        "status": "Pending"
    })))
}

/* =========================
Own overtime requests
========================= */
/// Swagger doc for my_overtime endpoint
#[utoipa::path(
    get,
    path = "/api/v1/overtime/mine",
    responses(
        (status = 200, description = "Caller's overtime requests, newest first", body = [OvertimeRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn my_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let sql = format!(
        "SELECT {} FROM overtime_requests WHERE user_id = ? ORDER BY created_at DESC",
        OVERTIME_COLUMNS
    );
    let rows = sqlx::query_as::<_, OvertimeRequest>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch overtime requests");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(rows))
}

/* =========================
Approve overtime (HR/Admin)
========================= */
/// Swagger doc for approve_overtime endpoint
#[utoipa::path(
    put,
    path = "/api/v1/overtime/{overtime_id}/approve",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime request to approve")
    ),
    responses(
        (status = 200, description = "Overtime approved successfully", body = Object, example = json!({
            "message": "Overtime approved"
        })),
        (status = 400, description = "Overtime request not found or already processed", body = Object, example = json!({
            "message": "Overtime request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let overtime_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE overtime_requests
        SET status = 'Approved'
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(overtime_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, overtime_id, "Approve overtime failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Overtime request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Overtime approved"
    })))
}

/* =========================
Reject overtime (HR/Admin)
========================= */
/// Swagger doc for reject_overtime endpoint
#[utoipa::path(
    put,
    path = "/api/v1/overtime/{overtime_id}/reject",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime request to reject")
    ),
    responses(
        (status = 200, description = "Overtime rejected successfully", body = Object, example = json!({
            "message": "Overtime rejected"
        })),
        (status = 400, description = "Overtime request not found or already processed", body = Object, example = json!({
            "message": "Overtime request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn reject_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let overtime_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE overtime_requests
        SET status = 'Rejected'
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(overtime_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, overtime_id, "Reject overtime failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Overtime request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Overtime rejected"
    })))
}

/// for getting overtime requests endpoint
#[utoipa::path(
    get,
    path = "/api/v1/overtime",
    params(OvertimeFilter),
    responses(
        (status = 200, description = "Paginated overtime list", body = OvertimeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn overtime_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<OvertimeFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

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

    if let Some(uid) = query.user_id {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::U64(uid));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM overtime_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count overtime requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT {}
        FROM overtime_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        OVERTIME_COLUMNS, where_sql
    );

    let mut data_q = sqlx::query_as::<_, OvertimeRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch overtime list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // -------------------------
    // Response
    // -------------------------
    let response = OvertimeListResponse {
        data: rows,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
