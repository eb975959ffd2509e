use crate::api::attendance::{AttendanceFilter, AttendanceListResponse, CheckInReq};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse};
use crate::api::overtime::{CreateOvertime, OvertimeFilter, OvertimeListResponse};
use crate::api::performance::{CreateReview, ReviewResponse};
use crate::api::profile::{DirectoryEntry, DirectoryListResponse, DirectoryQuery, UpdateProfile};
use crate::model::attendance::AttendanceRecord;
use crate::model::break_schedule::BreakSchedule;
use crate::model::leave::{LeaveRequest, LeaveType};
use crate::model::overtime::OvertimeRequest;
use crate::model::performance::PerformanceReview;
use crate::model::profile::Profile;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StaffHub API",
        version = "1.0.0",
        description = r#"
## StaffHub Attendance & HR Self-Service

This API powers **StaffHub**, an employee attendance tracker and HR self-service portal.

### 🔹 Key Features
- **Attendance Tracking**
  - Check-in / check-out with a once-a-second session clock
  - Automatic checkout on 15 minutes of inactivity, during the lunch window, and when the 8 hour day completes
  - Live view of everyone currently checked in
- **Leave Management**
  - Apply for Sick / Casual / Annual leave, approve/reject requests, per-type balances
- **Overtime Management**
  - Requests gated on a completed 8 hour day, half-hour steps up to 3 hours
- **Break Windows**
  - Per-weekday lunch window, editable by HR/Admin
- **Performance Reviews**
  - Five-category scores with an overall average

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Only authorized roles such as **Admin** or **HR** can access sensitive operations.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

### 🚀 Usage
Use this API to build:
- Attendance dashboards
- Employee self-service portals
- Team management consoles

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::record_activity,
        crate::api::attendance::current_session,
        crate::api::attendance::attendance_list,
        crate::api::attendance::live_attendance,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::leave_balances,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::overtime::create_overtime,
        crate::api::overtime::my_overtime,
        crate::api::overtime::overtime_list,
        crate::api::overtime::approve_overtime,
        crate::api::overtime::reject_overtime,

        crate::api::break_schedule::list_breaks,
        crate::api::break_schedule::upsert_break,

        crate::api::performance::create_review,
        crate::api::performance::my_reviews,
        crate::api::performance::user_reviews,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile,
        crate::api::profile::employee_directory
    ),
    components(
        schemas(
            CheckInReq,
            AttendanceFilter,
            AttendanceRecord,
            AttendanceListResponse,
            CreateLeave,
            LeaveType,
            LeaveFilter,
            LeaveRequest,
            LeaveListResponse,
            CreateOvertime,
            OvertimeFilter,
            OvertimeRequest,
            OvertimeListResponse,
            BreakSchedule,
            CreateReview,
            PerformanceReview,
            ReviewResponse,
            Profile,
            UpdateProfile,
            DirectoryQuery,
            DirectoryEntry,
            DirectoryListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance session APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Overtime", description = "Overtime request APIs"),
        (name = "Breaks", description = "Break window APIs"),
        (name = "Performance", description = "Performance review APIs"),
        (name = "Profile", description = "Self-service profile APIs"),
        (name = "Employee", description = "Employee directory APIs"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme every protected path refers to.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
