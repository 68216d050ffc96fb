//! IOF (Imposto sobre Operações Financeiras) on credit operations.
//!
//! Two parts: a daily rate charged on each slice of principal for the days it
//! stays outstanding (capped at a flat rate past one year), and a flat
//! additional rate on the whole financed principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortizer::AmortizationRow;
use crate::types::{Days, FeeSchedule, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IofAssessment {
    /// Flat IOF on the financed principal.
    pub additional: Money,
    /// Sum of the daily IOF of every installment.
    pub daily_total: Money,
    pub total: Money,
    /// Financed principal with all IOF added.
    pub taxed_principal: Money,
}

/// Daily IOF on one amortized slice of principal.
pub fn daily_iof(amortized: Money, cumulative_days: Days, fees: &FeeSchedule) -> Money {
    if cumulative_days > fees.iof_long_term_threshold_days {
        amortized * fees.iof_long_term_rate
    } else {
        amortized * Decimal::from(cumulative_days) * fees.iof_daily_rate
    }
}

pub fn additional_iof(financed_principal: Money, fees: &FeeSchedule) -> Money {
    financed_principal * fees.iof_additional_rate
}

/// Total the IOF of a schedule and overlay it on the financed principal.
pub fn assess_iof(
    financed_principal: Money,
    rows: &[AmortizationRow],
    fees: &FeeSchedule,
) -> IofAssessment {
    let additional = additional_iof(financed_principal, fees);
    let daily_total: Money = rows.iter().map(|r| r.daily_tax).sum();
    let total = additional + daily_total;

    log::debug!("iof: additional={additional} daily={daily_total} total={total}");

    IofAssessment {
        additional,
        daily_total,
        total,
        taxed_principal: financed_principal + total,
    }
}
