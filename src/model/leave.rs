use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = "Sara Malik")]
    pub user_name: String,

    #[schema(example = "Annual")]
    pub leave_type: String,

    #[schema(example = "2026-03-09", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-03-13", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "Family trip")]
    pub reason: String,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(example = "2026-03-02T04:10:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub enum LeaveType {
    Sick,
    Casual,
    Annual,
}

impl LeaveType {
    pub const ALL: [LeaveType; 3] = [LeaveType::Sick, LeaveType::Casual, LeaveType::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Sick => "Sick",
            LeaveType::Casual => "Casual",
            LeaveType::Annual => "Annual",
        }
    }

    /// Days granted per calendar year.
    pub fn entitled_days(&self) -> i64 {
        match self {
            LeaveType::Sick => 10,
            LeaveType::Casual => 10,
            LeaveType::Annual => 14,
        }
    }
}

/// Shared by leave and overtime requests. New rows always start Pending.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}
