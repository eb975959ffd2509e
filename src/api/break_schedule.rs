use crate::auth::auth::AuthUser;
use crate::model::break_schedule::BreakSchedule;
use crate::utils::break_cache;
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

/* =========================
Week schedule
========================= */
/// Swagger doc for list_breaks endpoint
#[utoipa::path(
    get,
    path = "/api/v1/breaks",
    responses(
        (status = 200, description = "Lunch window for all seven weekdays, defaults fill unconfigured days", body = [BreakSchedule]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Breaks"
)]
pub async fn list_breaks(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, BreakSchedule>(
        "SELECT day_of_week, start_hour, end_hour FROM break_schedule",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch break schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // one entry per weekday, Sunday first
    let week: Vec<BreakSchedule> = (0u8..7)
        .map(|day| {
            rows.iter()
                .find(|r| r.day_of_week == day)
                .cloned()
                .unwrap_or_else(|| BreakSchedule::default_for(day))
        })
        .collect();

    Ok(HttpResponse::Ok().json(week))
}

/* =========================
Upsert one weekday (HR/Admin)
========================= */
/// Swagger doc for upsert_break endpoint
#[utoipa::path(
    put,
    path = "/api/v1/breaks",
    request_body(
        content = BreakSchedule,
        description = "Lunch window for one weekday, equal hours disable the break",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Break schedule updated", body = Object, example = json!({
            "message": "Break schedule updated"
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Breaks"
)]
pub async fn upsert_break(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<BreakSchedule>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    // 1️⃣ validate the window
    if payload.day_of_week > 6 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "day_of_week must be between 0 (Sunday) and 6 (Saturday)"
        })));
    }
    if payload.start_hour > 24 || payload.end_hour > 24 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Hours must be between 0 and 24"
        })));
    }
    if payload.start_hour > payload.end_hour {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_hour cannot be after end_hour"
        })));
    }

    // 2️⃣ one row per weekday
    sqlx::query(
        r#"
        INSERT INTO break_schedule (day_of_week, start_hour, end_hour)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE
            start_hour = VALUES(start_hour),
            end_hour = VALUES(end_hour)
        "#,
    )
    .bind(payload.day_of_week)
    .bind(payload.start_hour)
    .bind(payload.end_hour)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, day_of_week = payload.day_of_week, "Failed to upsert break schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // 3️⃣ the ticker picks the change up on its next cache miss
    break_cache::invalidate(payload.day_of_week).await;

    tracing::info!(
        day_of_week = payload.day_of_week,
        start_hour = payload.start_hour,
        end_hour = payload.end_hour,
        "Break schedule updated"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Break schedule updated"
    })))
}
