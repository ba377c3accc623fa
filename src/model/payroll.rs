use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted salary slip. The row is keyed by
/// (employee_id, month, year); regenerating the same period replaces
/// the previous slip rather than adding a second one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 6)]
    pub month: u8,

    #[schema(example = 2024)]
    pub year: i16,

    #[schema(example = "2200.00", value_type = String)]
    pub base_salary: Decimal,

    #[schema(example = "100.00", value_type = String)]
    pub bonuses: Decimal,

    #[schema(example = "50.00", value_type = String)]
    pub manual_deductions: Decimal,

    #[schema(example = 22)]
    pub working_days: u32,

    #[schema(example = 20)]
    pub present_days: u32,

    #[schema(example = 2)]
    pub late_days: u32,

    #[schema(example = 2)]
    pub absent_days: u32,

    #[schema(example = "100.0000", value_type = String)]
    pub per_diem_rate: Decimal,

    #[schema(example = "200.00", value_type = String)]
    pub absence_deduction: Decimal,

    #[schema(example = "250.00", value_type = String)]
    pub total_deductions: Decimal,

    #[schema(example = "2050.00", value_type = String)]
    pub net_pay: Decimal,

    #[schema(example = 7)]
    pub generated_by: u64,

    #[schema(example = "2024-07-01T09:30:00Z", value_type = String, format = "date-time")]
    pub generated_at: DateTime<Utc>,
}

/// A slip about to be written. Identical to [`Payroll`] minus the row
/// id, which the upsert assigns (or keeps, when the period already has
/// a slip and gets replaced).
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct NewPayroll {
    pub employee_id: u64,
    pub month: u8,
    pub year: i16,

    #[schema(value_type = String)]
    pub base_salary: Decimal,
    #[schema(value_type = String)]
    pub bonuses: Decimal,
    #[schema(value_type = String)]
    pub manual_deductions: Decimal,

    pub working_days: u32,
    pub present_days: u32,
    pub late_days: u32,
    pub absent_days: u32,

    #[schema(value_type = String)]
    pub per_diem_rate: Decimal,
    #[schema(value_type = String)]
    pub absence_deduction: Decimal,
    #[schema(value_type = String)]
    pub total_deductions: Decimal,
    #[schema(value_type = String)]
    pub net_pay: Decimal,

    pub generated_by: u64,

    #[schema(value_type = String, format = "date-time")]
    pub generated_at: DateTime<Utc>,
}
