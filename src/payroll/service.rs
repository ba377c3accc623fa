//! Payroll generation flow: validate the period, resolve the salary
//! profile, tally attendance, compute the breakdown, then atomically
//! upsert the slip and notify the employee best-effort.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::model::payroll::NewPayroll;
use crate::payroll::calculator::{self, PayrollBreakdown, PayrollInput};
use crate::payroll::{PayrollError, STANDARD_WORKING_DAYS};
use crate::store::{AttendanceStore, NotificationSink, PayrollStore, ProfileStore};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayrollRequest {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 6)]
    pub month: u32,

    #[schema(example = 2024)]
    pub year: i32,

    #[schema(example = "100.00", value_type = String)]
    #[serde(default)]
    pub bonuses: Decimal,

    #[schema(example = "50.00", value_type = String)]
    #[serde(default)]
    pub manual_deductions: Decimal,
}

/// A computed slip that has not been persisted.
#[derive(Debug)]
pub struct PayrollQuote {
    pub base_salary: Decimal,
    pub working_days: u32,
    pub breakdown: PayrollBreakdown,
}

fn validate(req: &PayrollRequest) -> Result<(), PayrollError> {
    if !(1..=12).contains(&req.month) {
        return Err(PayrollError::Validation(format!(
            "month must be 1-12, got {}",
            req.month
        )));
    }
    if req.year <= 0 {
        return Err(PayrollError::Validation(format!(
            "year must be positive, got {}",
            req.year
        )));
    }
    if req.bonuses < Decimal::ZERO {
        return Err(PayrollError::Validation(
            "bonuses must not be negative".into(),
        ));
    }
    if req.manual_deductions < Decimal::ZERO {
        return Err(PayrollError::Validation(
            "manual deductions must not be negative".into(),
        ));
    }
    Ok(())
}

/// Compute a slip without persisting anything. The HR form calls this
/// on every input change to show the live figures before generation.
pub async fn preview<S>(stores: &S, req: &PayrollRequest) -> Result<PayrollQuote, PayrollError>
where
    S: ProfileStore + AttendanceStore,
{
    validate(req)?;

    let profile = stores
        .find(req.employee_id)
        .await?
        .ok_or(PayrollError::NotFound)?;

    let records = stores
        .month_for_employee(req.employee_id, req.month, req.year)
        .await?;
    let stats = calculator::attendance_stats(&records, req.employee_id, req.month, req.year);

    let input = PayrollInput {
        base_salary: profile.base_salary,
        bonuses: req.bonuses,
        manual_deductions: req.manual_deductions,
        working_days: STANDARD_WORKING_DAYS,
    };
    let breakdown = calculator::compute(&input, &stats)?;

    Ok(PayrollQuote {
        base_salary: profile.base_salary,
        working_days: STANDARD_WORKING_DAYS,
        breakdown,
    })
}

/// Generate and persist a slip for the requested period.
///
/// The write is an atomic upsert on (employee_id, month, year), so
/// regenerating a month replaces the previous slip. The notification
/// afterwards is best-effort: a failure is logged and swallowed, never
/// rolled back into the already-committed payroll write.
pub async fn generate<S>(
    stores: &S,
    generated_by: u64,
    req: &PayrollRequest,
) -> Result<NewPayroll, PayrollError>
where
    S: ProfileStore + AttendanceStore + PayrollStore + NotificationSink,
{
    let quote = preview(stores, req).await?;
    let b = quote.breakdown;

    let record = NewPayroll {
        employee_id: req.employee_id,
        month: req.month as u8,
        year: req.year as i16,
        base_salary: quote.base_salary,
        bonuses: req.bonuses,
        manual_deductions: req.manual_deductions,
        working_days: quote.working_days,
        present_days: b.present_days,
        late_days: b.late_days,
        absent_days: b.absent_days,
        per_diem_rate: b.per_diem_rate,
        absence_deduction: b.absence_deduction,
        total_deductions: b.total_deductions,
        net_pay: b.net_pay,
        generated_by,
        generated_at: Utc::now(),
    };

    stores.upsert(&record).await?;

    let message = format!(
        "Your salary slip for {}/{} has been generated.",
        req.month, req.year
    );
    if let Err(e) = stores
        .send(req.employee_id, "Payroll Generated", &message, "payroll")
        .await
    {
        warn!(
            error = %e,
            employee_id = req.employee_id,
            "Payroll notification failed"
        );
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::Attendance;
    use crate::model::profile::Profile;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStores {
        profiles: HashMap<u64, Profile>,
        attendance: Vec<Attendance>,
        saved: Mutex<HashMap<(u64, u8, i16), NewPayroll>>,
        notified: Mutex<Vec<(u64, String)>>,
        fail_notify: bool,
    }

    impl FakeStores {
        fn with_profile(employee_id: u64, base_salary: Decimal) -> Self {
            let mut stores = Self::default();
            stores.profiles.insert(
                employee_id,
                Profile {
                    id: employee_id,
                    full_name: "Jane Doe".into(),
                    email: "jane@company.com".into(),
                    base_salary,
                    status: "active".into(),
                },
            );
            stores
        }

        fn add_day(&mut self, employee_id: u64, date: &str, clock_in: &str) {
            let date = date.parse::<NaiveDate>().unwrap();
            self.attendance.push(Attendance {
                id: self.attendance.len() as u64 + 1,
                employee_id,
                date,
                clock_in: Some(
                    format!("{date}T{clock_in}")
                        .parse::<NaiveDateTime>()
                        .unwrap(),
                ),
                clock_out: None,
            });
        }
    }

    #[async_trait]
    impl ProfileStore for FakeStores {
        async fn find(&self, employee_id: u64) -> Result<Option<Profile>, PayrollError> {
            Ok(self.profiles.get(&employee_id).cloned())
        }
    }

    #[async_trait]
    impl AttendanceStore for FakeStores {
        async fn month_for_employee(
            &self,
            employee_id: u64,
            _month: u32,
            _year: i32,
        ) -> Result<Vec<Attendance>, PayrollError> {
            // Deliberately loose, like a real store queried by a wider
            // range: the calculator re-filters by period itself.
            Ok(self
                .attendance
                .iter()
                .filter(|a| a.employee_id == employee_id)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl PayrollStore for FakeStores {
        async fn upsert(&self, record: &NewPayroll) -> Result<(), PayrollError> {
            let key = (record.employee_id, record.month, record.year);
            self.saved.lock().unwrap().insert(key, record.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl NotificationSink for FakeStores {
        async fn send(
            &self,
            recipient_id: u64,
            _title: &str,
            message: &str,
            _kind: &str,
        ) -> Result<(), PayrollError> {
            if self.fail_notify {
                return Err(PayrollError::Store(sqlx::Error::PoolClosed));
            }
            self.notified
                .lock()
                .unwrap()
                .push((recipient_id, message.to_string()));
            Ok(())
        }
    }

    fn request(employee_id: u64, month: u32, year: i32) -> PayrollRequest {
        PayrollRequest {
            employee_id,
            month,
            year,
            bonuses: Decimal::ZERO,
            manual_deductions: Decimal::ZERO,
        }
    }

    #[actix_web::test]
    async fn generate_builds_the_slip_from_profile_and_attendance() {
        let mut stores = FakeStores::with_profile(1, dec!(2200));
        for day in 1..=20 {
            stores.add_day(1, &format!("2024-06-{day:02}"), "08:30:00");
        }
        stores.add_day(1, "2024-06-21", "10:30:00");

        let mut req = request(1, 6, 2024);
        req.bonuses = dec!(100);
        req.manual_deductions = dec!(50);

        let record = generate(&stores, 7, &req).await.unwrap();

        assert_eq!(record.present_days, 21);
        assert_eq!(record.late_days, 1);
        assert_eq!(record.absent_days, 1);
        assert_eq!(record.absence_deduction, dec!(100.00));
        assert_eq!(record.net_pay, dec!(2150.00));
        assert_eq!(record.generated_by, 7);
    }

    #[actix_web::test]
    async fn regenerating_a_period_replaces_the_slip() {
        let stores = FakeStores::with_profile(1, dec!(2200));

        let first = request(1, 6, 2024);
        generate(&stores, 7, &first).await.unwrap();

        let mut second = request(1, 6, 2024);
        second.bonuses = dec!(500);
        generate(&stores, 7, &second).await.unwrap();

        let saved = stores.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[&(1, 6, 2024)].bonuses, dec!(500));
    }

    #[actix_web::test]
    async fn unknown_employee_writes_nothing() {
        let stores = FakeStores::default();

        let err = generate(&stores, 7, &request(42, 6, 2024)).await.unwrap_err();

        assert!(matches!(err, PayrollError::NotFound));
        assert!(stores.saved.lock().unwrap().is_empty());
        assert!(stores.notified.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn bad_periods_are_rejected_before_any_lookup() {
        let stores = FakeStores::with_profile(1, dec!(2200));

        for (month, year) in [(0, 2024), (13, 2024), (6, 0), (6, -1)] {
            let err = generate(&stores, 7, &request(1, month, year))
                .await
                .unwrap_err();
            assert!(matches!(err, PayrollError::Validation(_)));
        }

        assert!(stores.saved.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn negative_amounts_are_rejected() {
        let stores = FakeStores::with_profile(1, dec!(2200));

        let mut req = request(1, 6, 2024);
        req.bonuses = dec!(-1);
        assert!(matches!(
            generate(&stores, 7, &req).await.unwrap_err(),
            PayrollError::Validation(_)
        ));

        let mut req = request(1, 6, 2024);
        req.manual_deductions = dec!(-0.01);
        assert!(matches!(
            generate(&stores, 7, &req).await.unwrap_err(),
            PayrollError::Validation(_)
        ));
    }

    #[actix_web::test]
    async fn notification_failure_does_not_fail_generation() {
        let mut stores = FakeStores::with_profile(1, dec!(2200));
        stores.fail_notify = true;

        let record = generate(&stores, 7, &request(1, 6, 2024)).await.unwrap();

        assert_eq!(record.employee_id, 1);
        assert_eq!(stores.saved.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn successful_generation_notifies_the_employee() {
        let stores = FakeStores::with_profile(1, dec!(2200));

        generate(&stores, 7, &request(1, 6, 2024)).await.unwrap();

        let notified = stores.notified.lock().unwrap();
        assert_eq!(notified.len(), 1);
        assert_eq!(notified[0].0, 1);
        assert!(notified[0].1.contains("6/2024"));
    }

    #[actix_web::test]
    async fn preview_persists_nothing() {
        let stores = FakeStores::with_profile(1, dec!(2200));

        let quote = preview(&stores, &request(1, 6, 2024)).await.unwrap();

        assert_eq!(quote.breakdown.absent_days, 22);
        assert!(stores.saved.lock().unwrap().is_empty());
        assert!(stores.notified.lock().unwrap().is_empty());
    }
}
