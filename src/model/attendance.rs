use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// One attendance session. A day can hold several rows when the user
/// checks back in after an idle or lunch checkout; `total_working_seconds`
/// counts this session only, so the day total is the SUM over its rows.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "user_id": 1000,
        "user_name": "Sara Malik",
        "date": "2026-03-02",
        "check_in": "2026-03-02T04:10:00Z",
        "check_out": "2026-03-02T12:10:00Z",
        "total_working_seconds": 28800,
        "status": "completed",
        "is_wfh": false,
        "created_at": "2026-03-02T04:10:00Z"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = "Sara Malik")]
    pub user_name: String,

    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-03-02T04:10:00Z", value_type = String, format = "date-time")]
    pub check_in: DateTime<Utc>,

    #[schema(example = "2026-03-02T12:10:00Z", value_type = String, format = "date-time", nullable = true)]
    pub check_out: Option<DateTime<Utc>>,

    #[schema(example = 28800)]
    pub total_working_seconds: u32,

    #[schema(example = "completed")]
    pub status: String,

    #[schema(example = false)]
    pub is_wfh: bool,

    #[schema(example = "2026-03-02T04:10:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
pub enum SessionStatus {
    #[serde(rename = "active")]
    #[strum(serialize = "active")]
    Active,
    #[serde(rename = "completed")]
    #[strum(serialize = "completed")]
    Completed,
    #[serde(rename = "idle-checkout")]
    #[strum(serialize = "idle-checkout")]
    IdleCheckout,
    #[serde(rename = "lunch-checkout")]
    #[strum(serialize = "lunch-checkout")]
    LunchCheckout,
    #[serde(rename = "system-checkout")]
    #[strum(serialize = "system-checkout")]
    SystemCheckout,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::IdleCheckout => "idle-checkout",
            SessionStatus::LunchCheckout => "lunch-checkout",
            SessionStatus::SystemCheckout => "system-checkout",
        }
    }
}
