use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OvertimeRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = "Sara Malik")]
    pub user_name: String,

    #[schema(example = "Billing migration")]
    pub project: String,

    #[schema(example = 1.5)]
    pub hours: f64,

    #[schema(example = "Release cutover ran past the deadline")]
    pub reason: String,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-03-02T14:10:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
