//! Persistence seams for payroll generation.
//!
//! The calculator never talks to MySQL directly; it goes through these
//! traits so the generation flow can be exercised against in-memory
//! fakes, and so the upsert contract (atomic conditional replace on
//! the period key, never read-then-write) lives in one place.

pub mod mysql;

use async_trait::async_trait;

use crate::model::attendance::Attendance;
use crate::model::payroll::NewPayroll;
use crate::model::profile::Profile;
use crate::payroll::PayrollError;

pub use mysql::MySqlStores;

#[async_trait]
pub trait AttendanceStore {
    /// All attendance rows for one employee in one calendar month.
    async fn month_for_employee(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<Attendance>, PayrollError>;
}

#[async_trait]
pub trait ProfileStore {
    async fn find(&self, employee_id: u64) -> Result<Option<Profile>, PayrollError>;
}

#[async_trait]
pub trait PayrollStore {
    /// Atomic upsert keyed by (employee_id, month, year): replaces an
    /// existing slip for the period or inserts a new one, in a single
    /// store operation.
    async fn upsert(&self, record: &NewPayroll) -> Result<(), PayrollError>;
}

#[async_trait]
pub trait NotificationSink {
    async fn send(
        &self,
        recipient_id: u64,
        title: &str,
        message: &str,
        kind: &str,
    ) -> Result<(), PayrollError>;
}
