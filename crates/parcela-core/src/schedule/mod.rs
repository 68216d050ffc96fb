//! Price-system installment schedule.
//!
//! The pipeline runs in a fixed order, each stage feeding the next:
//! due dates, day counts, discount factors and coefficient, financed
//! principal, per-installment rates, amortization, IOF, final payment.
//! [`calculator::compute_schedule`] wires the stages together.

pub mod amortizer;
pub mod calculator;
pub mod coefficient;
pub mod day_count;
pub mod due_dates;
pub mod iof;
pub mod principal;
pub mod rates;

pub use calculator::{compute_schedule, final_payment, ScheduleInput, ScheduleOutput};
