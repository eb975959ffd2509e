use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_BREAK_START_HOUR: u8 = 15;
pub const DEFAULT_BREAK_END_HOUR: u8 = 16;

/// Company-wide lunch window for one weekday, hours in local time.
/// `start_hour == end_hour` means no break that day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BreakSchedule {
    /// 0 = Sunday .. 6 = Saturday
    #[schema(example = 1)]
    pub day_of_week: u8,

    #[schema(example = 15)]
    pub start_hour: u8,

    #[schema(example = 16)]
    pub end_hour: u8,
}

impl BreakSchedule {
    /// Fallback used when no row has been configured for a weekday.
    pub fn default_for(day_of_week: u8) -> Self {
        BreakSchedule {
            day_of_week,
            start_hour: DEFAULT_BREAK_START_HOUR,
            end_hour: DEFAULT_BREAK_END_HOUR,
        }
    }
}
