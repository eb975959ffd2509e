pub mod attendance;
pub mod break_schedule;
pub mod leave_request;
pub mod overtime;
pub mod performance;
pub mod profile;
