pub mod break_window;
pub mod leave_balance;
pub mod overtime_gate;
pub mod session;
