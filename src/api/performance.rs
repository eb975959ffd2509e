use crate::auth::auth::AuthUser;
use crate::model::performance::PerformanceReview;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateReview {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 8)]
    pub work_performance: u8,
    #[schema(example = 7)]
    pub quality_results: u8,
    #[schema(example = 9)]
    pub attendance_behavior: u8,
    #[schema(example = 8)]
    pub office_policies: u8,
    #[schema(example = 7)]
    pub team_contribution: u8,
    #[schema(example = "Strong quarter, keep mentoring the juniors")]
    pub comments: Option<String>,
}

/// Review row plus the average the employee sees.
#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    #[serde(flatten)]
    pub review: PerformanceReview,
    #[schema(example = 7.8)]
    pub overall: f64,
}

const REVIEW_COLUMNS: &str = "id, user_id, reviewer_id, work_performance, quality_results, \
     attendance_behavior, office_policies, team_contribution, comments, review_date, created_at";

fn with_overall(rows: Vec<PerformanceReview>) -> Vec<ReviewResponse> {
    rows.into_iter()
        .map(|review| {
            let overall = review.overall();
            ReviewResponse { review, overall }
        })
        .collect()
}

/* =========================
Create review (HR/Admin)
========================= */
/// Swagger doc for create_review endpoint
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body(
        content = CreateReview,
        description = "Performance review payload, five scores of 1..10",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Review recorded", body = Object, example = json!({
            "message": "Review recorded"
        })),
        (status = 400, description = "Bad request", body = Object, example = json!({
            "message": "Scores must be between 1 and 10"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Performance"
)]
pub async fn create_review(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateReview>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    // 1️⃣ every category score sits on the same 1..10 scale
    let scores = [
        payload.work_performance,
        payload.quality_results,
        payload.attendance_behavior,
        payload.office_policies,
        payload.team_contribution,
    ];
    if scores.iter().any(|s| !(1..=10).contains(s)) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Scores must be between 1 and 10"
        })));
    }

    // 2️⃣ the reviewed user must exist
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE user_id = ?)",
    )
    .bind(payload.user_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = payload.user_id, "Profile lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    }

    let comments = payload
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    // 3️⃣ insert review
    sqlx::query(
        r#"
        INSERT INTO performance_reviews
            (user_id, reviewer_id, work_performance, quality_results,
             attendance_behavior, office_policies, team_contribution,
             comments, review_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.user_id)
    .bind(auth.user_id)
    .bind(payload.work_performance)
    .bind(payload.quality_results)
    .bind(payload.attendance_behavior)
    .bind(payload.office_policies)
    .bind(payload.team_contribution)
    .bind(comments)
    .bind(Local::now().date_naive())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = payload.user_id, "Failed to create review");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Review recorded"
    })))
}

/* =========================
Own reviews
========================= */
/// Swagger doc for my_reviews endpoint
#[utoipa::path(
    get,
    path = "/api/v1/reviews/mine",
    responses(
        (status = 200, description = "Caller's reviews, newest first", body = [ReviewResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Performance"
)]
pub async fn my_reviews(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let sql = format!(
        "SELECT {} FROM performance_reviews WHERE user_id = ? ORDER BY review_date DESC, id DESC",
        REVIEW_COLUMNS
    );
    let rows = sqlx::query_as::<_, PerformanceReview>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch reviews");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(with_overall(rows)))
}

/* =========================
Reviews for one user (HR/Admin)
========================= */
/// Swagger doc for user_reviews endpoint
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User whose reviews to fetch")
    ),
    responses(
        (status = 200, description = "Reviews for the user, newest first", body = [ReviewResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Performance"
)]
pub async fn user_reviews(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let user_id = path.into_inner();
    let sql = format!(
        "SELECT {} FROM performance_reviews WHERE user_id = ? ORDER BY review_date DESC, id DESC",
        REVIEW_COLUMNS
    );
    let rows = sqlx::query_as::<_, PerformanceReview>(&sql)
        .bind(user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "Failed to fetch reviews");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(with_overall(rows)))
}
