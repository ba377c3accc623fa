use crate::api::attendance::{AttendanceListResponse, AttendanceQuery};
use crate::api::payroll::{PaginatedPayrollResponse, PayrollPreviewResponse, PayrollQuery};
use crate::api::profile::{CreateProfile, ProfileListResponse, ProfileQuery, UpdateProfile};
use crate::model::attendance::Attendance;
use crate::model::payroll::{NewPayroll, Payroll};
use crate::model::profile::Profile;
use crate::payroll::service::PayrollRequest;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal API",
        version = "1.0.0",
        description = r#"
## HR Portal Backend

This API powers a small HR portal for employees and HR staff.

### Key Features
- **Salary Profiles**
  - Create, update, list, and view employee salary profiles
- **Attendance**
  - Daily clock-in and clock-out tracking, role-scoped history
- **Payroll**
  - Preview and generate monthly salary slips with attendance-derived
    deductions; regeneration replaces the slip for the period

### Security
Endpoints are protected using **JWT Bearer authentication**.
Generation and profile management are restricted to the **HR** role;
employees see only their own rows.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::profile::create_profile,
        crate::api::profile::get_profile,
        crate::api::profile::list_profiles,
        crate::api::profile::update_profile,
        crate::api::profile::delete_profile,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::list_attendance,

        crate::api::payroll::preview_payroll,
        crate::api::payroll::generate_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::delete_payroll
    ),
    components(
        schemas(
            CreateProfile,
            UpdateProfile,
            Profile,
            ProfileQuery,
            ProfileListResponse,
            Attendance,
            AttendanceQuery,
            AttendanceListResponse,
            PayrollRequest,
            PayrollPreviewResponse,
            Payroll,
            NewPayroll,
            PayrollQuery,
            PaginatedPayrollResponse
        )
    ),
    tags(
        (name = "Profile", description = "Salary profile management APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Payroll", description = "Payroll generation APIs"),
    )
)]
pub struct ApiDoc;
