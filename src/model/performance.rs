use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Five category scores, each 1..=10. The overall score shown to the
/// employee is their plain average.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PerformanceReview {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = 2)]
    pub reviewer_id: u64,

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

    #[schema(example = "Strong quarter, keep mentoring the juniors", nullable = true)]
    pub comments: Option<String>,

    #[schema(example = "2026-03-31", value_type = String, format = "date")]
    pub review_date: NaiveDate,

    #[schema(example = "2026-03-31T10:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PerformanceReview {
    pub fn overall(&self) -> f64 {
        let sum = self.work_performance as f64
            + self.quality_results as f64
            + self.attendance_behavior as f64
            + self.office_policies as f64
            + self.team_contribution as f64;
        sum / 5.0
    }
}
