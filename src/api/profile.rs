use crate::auth::auth::AuthUser;
use crate::model::profile::Profile;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{MySqlPool, prelude::FromRow};
use tracing::{debug, error};
use utoipa::ToSchema;

/// Columns a user may change on their own profile row.
const PROFILE_FIELDS: &[&str] = &["name", "department", "phone_number", "birthday", "avatar"];

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfile {
    #[schema(example = "Sara Malik")]
    pub name: Option<String>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "+8801712345678")]
    pub phone_number: Option<String>,
    #[schema(example = "1995-06-14", format = "date", value_type = String)]
    pub birthday: Option<NaiveDate>,
    #[schema(example = "https://cdn.example.com/avatars/1000.png")]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DirectoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub role_id: Option<u8>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct DirectoryEntry {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = "Sara Malik")]
    pub name: String,
    #[schema(example = "sara.malik@acme.io")]
    pub email: String,
    #[schema(example = 3)]
    pub role_id: u8,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "2026-01-05T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct DirectoryListResponse {
    pub data: Vec<DirectoryEntry>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/* =========================
Own profile
========================= */
/// Swagger doc for get_profile endpoint
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Caller's profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found", body = Object, example = json!({
            "message": "Profile not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, name, department, phone_number, birthday, avatar, created_at
        FROM profiles
        WHERE user_id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match profile {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Profile not found"
        }))),
    }
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated successfully"),
        (status = 400, description = "Unknown field in payload"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let update = build_update_sql("profiles", &body, PROFILE_FIELDS, "user_id", auth.user_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Profile not found"));
    }

    Ok(HttpResponse::Ok().body("Profile updated successfully"))
}

// -------------------- Directory --------------------

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(
        ("page",  Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("role_id", Query, description = "Filter by role (1 Admin, 2 HR, 3 Employee)"),
        ("department", Query, description = "Filter by department"),
        ("search", Query, description = "Search by name or email")
    ),
    responses(
        (status = 200, description = "Paginated employee directory", body = DirectoryListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn employee_directory(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DirectoryQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<sqlx::types::JsonValue> = Vec::new();

    if let Some(role_id) = query.role_id {
        conditions.push("u.role_id = ?");
        bindings.push(role_id.into());
    }

    if let Some(department) = &query.department {
        conditions.push("p.department = ?");
        bindings.push(department.clone().into());
    }

    if let Some(search) = &query.search {
        conditions.push("(p.name LIKE ? OR u.email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!(
        "SELECT COUNT(*) as total FROM profiles p JOIN users u ON u.id = p.user_id {}",
        where_clause
    );
    debug!(sql = %count_sql, bindings = ?bindings, "Counting directory entries");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count directory entries");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        r#"
        SELECT p.user_id, p.name, u.email, u.role_id, p.department, p.created_at
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        {}
        ORDER BY p.name
        LIMIT ? OFFSET ?
        "#,
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching directory entries");

    let mut data_query = sqlx::query_as::<_, DirectoryEntry>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let entries = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch directory entries");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(DirectoryListResponse {
        data: entries,
        page,
        per_page,
        total,
    }))
}
