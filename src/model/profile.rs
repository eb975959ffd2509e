use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = "Sara Malik")]
    pub name: String,

    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone_number: Option<String>,

    #[schema(example = "1995-06-14", value_type = String, format = "date", nullable = true)]
    pub birthday: Option<NaiveDate>,

    #[schema(example = "https://cdn.example.com/avatars/1000.png", nullable = true)]
    pub avatar: Option<String>,

    #[schema(example = "2026-01-05T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
