//! Pure payroll arithmetic. No I/O: callers fetch attendance and the
//! salary profile, this module turns them into a salary breakdown.
//!
//! All money is `rust_decimal::Decimal`; binary floats drift at the
//! cent level over repeated additions.

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;

use crate::model::attendance::Attendance;
use crate::payroll::{LATE_AFTER_HOUR, PayrollError};

/// Attendance tallies for one employee over one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceStats {
    pub present_days: u32,
    pub late_days: u32,
}

/// Salary inputs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollInput {
    pub base_salary: Decimal,
    pub bonuses: Decimal,
    pub manual_deductions: Decimal,
    pub working_days: u32,
}

/// The computed side of a salary slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollBreakdown {
    pub present_days: u32,
    pub late_days: u32,
    pub absent_days: u32,
    pub per_diem_rate: Decimal,
    pub absence_deduction: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

/// Tally present and late days for `employee_id` in `(month, year)`.
///
/// Takes the unfiltered history and filters here: a record belongs to
/// the period when its stored calendar date matches, nothing else.
/// A day counts as present whether or not it has a `clock_out`; an
/// open (still clocked-in) day pays the same as a completed one. A
/// record with no `clock_in` can never count as late.
pub fn attendance_stats(
    records: &[Attendance],
    employee_id: u64,
    month: u32,
    year: i32,
) -> AttendanceStats {
    let mut present_days = 0;
    let mut late_days = 0;

    for record in records {
        if record.employee_id != employee_id
            || record.date.month() != month
            || record.date.year() != year
        {
            continue;
        }

        present_days += 1;

        if let Some(clock_in) = record.clock_in {
            if clock_in.hour() > LATE_AFTER_HOUR {
                late_days += 1;
            }
        }
    }

    AttendanceStats {
        present_days,
        late_days,
    }
}

/// Compute the salary breakdown for one month.
///
/// `absent_days` clamps at zero when the employee logged more days
/// than the working-day policy; extra days earn no credit. `net_pay`
/// is deliberately not clamped: a negative figure means near-zero
/// attendance or a data-entry mistake, and HR needs to see it rather
/// than a silent zero.
pub fn compute(
    input: &PayrollInput,
    stats: &AttendanceStats,
) -> Result<PayrollBreakdown, PayrollError> {
    if input.working_days == 0 {
        return Err(PayrollError::InvalidPeriod);
    }

    let absent_days = input.working_days.saturating_sub(stats.present_days);

    let per_diem_rate = input.base_salary / Decimal::from(input.working_days);
    let absence_deduction = (Decimal::from(absent_days) * per_diem_rate).round_dp(2);

    // Totals are built from the already-rounded deduction so that
    // net_pay == base + bonuses - manual - absence holds exactly.
    let total_deductions = input.manual_deductions + absence_deduction;
    let net_pay = input.base_salary + input.bonuses - total_deductions;

    Ok(PayrollBreakdown {
        present_days: stats.present_days,
        late_days: stats.late_days,
        absent_days,
        per_diem_rate: per_diem_rate.round_dp(4),
        absence_deduction,
        total_deductions,
        net_pay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn record(employee_id: u64, date: &str, clock_in: Option<&str>) -> Attendance {
        let date = date.parse::<NaiveDate>().unwrap();
        Attendance {
            id: 0,
            employee_id,
            date,
            clock_in: clock_in.map(|t| {
                format!("{date}T{t}")
                    .parse::<NaiveDateTime>()
                    .unwrap()
            }),
            clock_out: None,
        }
    }

    fn input(base: Decimal, bonuses: Decimal, manual: Decimal, working_days: u32) -> PayrollInput {
        PayrollInput {
            base_salary: base,
            bonuses,
            manual_deductions: manual,
            working_days,
        }
    }

    #[test]
    fn full_attendance_pays_base_salary() {
        // Scenario: 22 of 22 days present, no bonuses, no deductions.
        let stats = AttendanceStats {
            present_days: 22,
            late_days: 0,
        };
        let out = compute(&input(dec!(2200), dec!(0), dec!(0), 22), &stats).unwrap();

        assert_eq!(out.absent_days, 0);
        assert_eq!(out.absence_deduction, dec!(0.00));
        assert_eq!(out.net_pay, dec!(2200.00));
    }

    #[test]
    fn absences_deduct_at_the_per_diem_rate() {
        // Scenario: 20/22 present, 100 bonus, 50 manual deduction.
        let stats = AttendanceStats {
            present_days: 20,
            late_days: 3,
        };
        let out = compute(&input(dec!(2200), dec!(100), dec!(50), 22), &stats).unwrap();

        assert_eq!(out.per_diem_rate, dec!(100.0000));
        assert_eq!(out.absent_days, 2);
        assert_eq!(out.absence_deduction, dec!(200.00));
        assert_eq!(out.total_deductions, dec!(250.00));
        assert_eq!(out.net_pay, dec!(2050.00));
    }

    #[test]
    fn extra_attendance_earns_no_credit() {
        // 25 logged days against a 22-day policy: absences clamp to
        // zero and nothing is added for the three extra days.
        let stats = AttendanceStats {
            present_days: 25,
            late_days: 0,
        };
        let out = compute(&input(dec!(2200), dec!(100), dec!(50), 22), &stats).unwrap();

        assert_eq!(out.absent_days, 0);
        assert_eq!(out.absence_deduction, dec!(0.00));
        assert_eq!(out.net_pay, dec!(2250.00));
    }

    #[test]
    fn net_pay_may_go_negative() {
        let stats = AttendanceStats {
            present_days: 1,
            late_days: 0,
        };
        let out = compute(&input(dec!(2200), dec!(0), dec!(300), 22), &stats).unwrap();

        assert_eq!(out.absent_days, 21);
        assert_eq!(out.absence_deduction, dec!(2100.00));
        assert_eq!(out.net_pay, dec!(-200.00));
    }

    #[test]
    fn zero_working_days_is_rejected() {
        let stats = AttendanceStats {
            present_days: 0,
            late_days: 0,
        };
        let err = compute(&input(dec!(2200), dec!(0), dec!(0), 0), &stats).unwrap_err();
        assert!(matches!(err, PayrollError::InvalidPeriod));
    }

    #[test]
    fn absent_days_never_go_negative() {
        for present_days in 0..60 {
            let stats = AttendanceStats {
                present_days,
                late_days: 0,
            };
            let out = compute(&input(dec!(1234.56), dec!(0), dec!(0), 22), &stats).unwrap();
            assert_eq!(out.absent_days, 22u32.saturating_sub(present_days));
        }
    }

    #[test]
    fn absence_deduction_is_monotone_in_attendance() {
        // More attendance can only lower (or hold) the deduction.
        let mut previous = None;
        for present_days in 0..30 {
            let stats = AttendanceStats {
                present_days,
                late_days: 0,
            };
            let out = compute(&input(dec!(3333.33), dec!(0), dec!(0), 22), &stats).unwrap();
            if let Some(prev) = previous {
                assert!(out.absence_deduction <= prev);
            }
            previous = Some(out.absence_deduction);
        }
    }

    #[test]
    fn net_pay_identity_holds_exactly() {
        // The per-diem rate of 1000/22 is non-terminating, which is
        // exactly where float arithmetic would drift.
        let cases = [
            (dec!(1000), dec!(0), dec!(0), 22, 17),
            (dec!(2200), dec!(100), dec!(50), 22, 20),
            (dec!(987.65), dec!(43.21), dec!(10.10), 22, 3),
            (dec!(5000), dec!(250), dec!(0), 21, 25),
        ];

        for (base, bonuses, manual, working_days, present_days) in cases {
            let stats = AttendanceStats {
                present_days,
                late_days: 0,
            };
            let out = compute(&input(base, bonuses, manual, working_days), &stats).unwrap();
            assert_eq!(out.net_pay, base + bonuses - manual - out.absence_deduction);
            assert_eq!(out.total_deductions, manual + out.absence_deduction);
        }
    }

    #[test]
    fn compute_is_deterministic() {
        let stats = AttendanceStats {
            present_days: 13,
            late_days: 4,
        };
        let payroll_input = input(dec!(3141.59), dec!(26.53), dec!(5.89), 22);

        let first = compute(&payroll_input, &stats).unwrap();
        let second = compute(&payroll_input, &stats).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn stats_filter_by_employee_and_period() {
        let records = vec![
            record(1, "2024-06-03", Some("08:55:00")),
            record(1, "2024-06-04", Some("10:15:00")),
            // wrong employee
            record(2, "2024-06-05", Some("11:00:00")),
            // wrong month
            record(1, "2024-05-31", Some("11:00:00")),
            // wrong year
            record(1, "2023-06-04", Some("11:00:00")),
        ];

        let stats = attendance_stats(&records, 1, 6, 2024);
        assert_eq!(stats.present_days, 2);
        assert_eq!(stats.late_days, 1);
    }

    #[test]
    fn late_threshold_is_hour_granular() {
        // The whole nine-o'clock hour is on time under the hour-only
        // comparison; 10:00 is the first late clock-in.
        let records = vec![
            record(1, "2024-06-03", Some("08:59:00")),
            record(1, "2024-06-04", Some("09:01:00")),
            record(1, "2024-06-05", Some("09:59:59")),
            record(1, "2024-06-06", Some("10:00:00")),
        ];

        let stats = attendance_stats(&records, 1, 6, 2024);
        assert_eq!(stats.present_days, 4);
        assert_eq!(stats.late_days, 1);
    }

    #[test]
    fn missing_clock_in_counts_present_but_never_late() {
        let records = vec![
            record(1, "2024-06-03", None),
            record(1, "2024-06-04", Some("12:00:00")),
        ];

        let stats = attendance_stats(&records, 1, 6, 2024);
        assert_eq!(stats.present_days, 2);
        assert_eq!(stats.late_days, 1);
    }

    #[test]
    fn open_day_counts_the_same_as_a_completed_one() {
        let mut completed = record(1, "2024-06-03", Some("08:30:00"));
        completed.clock_out = Some("2024-06-03T17:00:00".parse().unwrap());
        let open = record(1, "2024-06-04", Some("08:30:00"));

        let stats = attendance_stats(&[completed, open], 1, 6, 2024);
        assert_eq!(stats.present_days, 2);
    }

    #[test]
    fn empty_history_yields_zero_stats() {
        let stats = attendance_stats(&[], 1, 6, 2024);
        assert_eq!(
            stats,
            AttendanceStats {
                present_days: 0,
                late_days: 0
            }
        );
    }
}
