use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values, in BRL. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.02 = 2%) unless the field name says `percent`.
pub type Rate = Decimal;

/// Whole calendar days between two dates.
pub type Days = i64;

/// The product being contracted. Closed set: every branch on it is an
/// exhaustive match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Payroll-deductible loan, 1 to 60 monthly installments.
    #[default]
    Loan,
    /// Salary advance, always settled in a single installment.
    SalaryAdvance,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationType::Loan => write!(f, "loan"),
            OperationType::SalaryAdvance => write!(f, "salary_advance"),
        }
    }
}

/// Fixed fees and tax parameters applied to every calculation.
///
/// `FeeSchedule::default()` carries the values in force for the product; a
/// caller may pass its own to price a different fee table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Loan origination fee (TC).
    pub loan_origination_fee: Money,
    /// Loan credit insurance.
    pub loan_insurance: Money,
    /// Salary-advance origination fee.
    pub salary_advance_fee: Money,
    /// IOF charged per day on each amortized slice of principal.
    pub iof_daily_rate: Rate,
    /// IOF charged on slices amortized after `iof_long_term_threshold_days`.
    pub iof_long_term_rate: Rate,
    pub iof_long_term_threshold_days: Days,
    /// Flat IOF on the financed principal.
    pub iof_additional_rate: Rate,
    /// Month length used to turn elapsed days into rate periods.
    pub accrual_month_days: Days,
    /// Day of month every installment falls due.
    pub due_day: u32,
    pub loan_max_installments: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            loan_origination_fee: dec!(150.29),
            loan_insurance: dec!(77.70),
            salary_advance_fee: dec!(50.00),
            iof_daily_rate: dec!(0.000082),
            iof_long_term_rate: dec!(0.03),
            iof_long_term_threshold_days: 365,
            iof_additional_rate: dec!(0.0038),
            accrual_month_days: 30,
            due_day: 10,
            loan_max_installments: 60,
        }
    }
}

/// A single installment as shown to the borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub payment: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
