use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::error;

use crate::model::attendance::Attendance;
use crate::model::payroll::NewPayroll;
use crate::model::profile::Profile;
use crate::payroll::PayrollError;
use crate::store::{AttendanceStore, NotificationSink, PayrollStore, ProfileStore};

/// MySQL-backed implementation of all four payroll collaborators.
#[derive(Clone)]
pub struct MySqlStores {
    pool: MySqlPool,
}

impl MySqlStores {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Half-open [first day of month, first day of next month).
fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), PayrollError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PayrollError::Validation(format!("invalid period {month}/{year}")))?;

    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| PayrollError::Validation(format!("invalid period {month}/{year}")))?;

    Ok((start, end))
}

#[async_trait]
impl AttendanceStore for MySqlStores {
    async fn month_for_employee(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<Attendance>, PayrollError> {
        let (start, end) = month_bounds(month, year)?;

        let records = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, employee_id, date, clock_in, clock_out
            FROM attendance
            WHERE employee_id = ? AND date >= ? AND date < ?
            ORDER BY date
            "#,
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, month, year, "Failed to fetch attendance");
            PayrollError::Store(e)
        })?;

        Ok(records)
    }
}

#[async_trait]
impl ProfileStore for MySqlStores {
    async fn find(&self, employee_id: u64) -> Result<Option<Profile>, PayrollError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, full_name, email, base_salary, status
            FROM profiles
            WHERE id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch profile");
            PayrollError::Store(e)
        })?;

        Ok(profile)
    }
}

#[async_trait]
impl PayrollStore for MySqlStores {
    async fn upsert(&self, record: &NewPayroll) -> Result<(), PayrollError> {
        // Single-statement conditional replace on uq_payroll_period.
        // Two operators regenerating the same month race down to
        // last-write-wins inside MySQL, never to a lost update.
        sqlx::query(
            r#"
            INSERT INTO payroll
            (employee_id, month, year,
             base_salary, bonuses, manual_deductions,
             working_days, present_days, late_days, absent_days,
             per_diem_rate, absence_deduction, total_deductions, net_pay,
             generated_by, generated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
             base_salary = VALUES(base_salary),
             bonuses = VALUES(bonuses),
             manual_deductions = VALUES(manual_deductions),
             working_days = VALUES(working_days),
             present_days = VALUES(present_days),
             late_days = VALUES(late_days),
             absent_days = VALUES(absent_days),
             per_diem_rate = VALUES(per_diem_rate),
             absence_deduction = VALUES(absence_deduction),
             total_deductions = VALUES(total_deductions),
             net_pay = VALUES(net_pay),
             generated_by = VALUES(generated_by),
             generated_at = VALUES(generated_at)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.month)
        .bind(record.year)
        .bind(record.base_salary)
        .bind(record.bonuses)
        .bind(record.manual_deductions)
        .bind(record.working_days)
        .bind(record.present_days)
        .bind(record.late_days)
        .bind(record.absent_days)
        .bind(record.per_diem_rate)
        .bind(record.absence_deduction)
        .bind(record.total_deductions)
        .bind(record.net_pay)
        .bind(record.generated_by)
        .bind(record.generated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                employee_id = record.employee_id,
                month = record.month,
                year = record.year,
                "Failed to upsert payroll record"
            );
            PayrollError::Store(e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl NotificationSink for MySqlStores {
    async fn send(
        &self,
        recipient_id: u64,
        title: &str,
        message: &str,
        kind: &str,
    ) -> Result<(), PayrollError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (recipient_id, title, message, kind)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(recipient_id)
        .bind(title)
        .bind(message)
        .bind(kind)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
