pub mod calculator;
pub mod error;
pub mod service;

pub use error::PayrollError;

/// Fixed company policy: paid working days per month.
pub const STANDARD_WORKING_DAYS: u32 = 22;

/// A clock-in counts as late only when its hour-of-day is strictly
/// greater than this. The comparison is hour-granular on purpose:
/// 09:59 is on time and 10:00 is the first late minute. That is the
/// established payroll policy, counter-intuitive as it reads, so it is
/// documented here rather than tightened to minute granularity.
pub const LATE_AFTER_HOUR: u32 = 9;
