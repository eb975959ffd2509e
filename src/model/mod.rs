pub mod attendance;
pub mod break_schedule;
pub mod leave;
pub mod overtime;
pub mod performance;
pub mod profile;
pub mod role;
