use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One attendance row per employee per calendar day. `date` and the
/// clock timestamps are stored as local wall-clock values; month
/// membership for payroll is judged on `date` alone, so a record can
/// never drift across a month boundary at read time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2024-06-03", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2024-06-03T08:55:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_in: Option<NaiveDateTime>,

    #[schema(example = "2024-06-03T17:05:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<NaiveDateTime>,
}
