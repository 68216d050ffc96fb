use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::iof::daily_iof;
use crate::error::ParcelaError;
use crate::types::{Days, FeeSchedule, Money, Rate};
use crate::ParcelaResult;

/// One installment of the pre-tax interest/amortization decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub number: u32,
    pub opening_balance: Money,
    pub installment_rate_percent: Rate,
    pub interest_accrued: Money,
    pub amortized_principal: Money,
    pub ending_balance: Money,
    pub cumulative_days: Days,
    /// Daily IOF on `amortized_principal`.
    pub daily_tax: Money,
}

/// Walk the schedule applying interest and a constant pre-tax payment to the
/// running balance.
///
/// The payment is `financed_principal * coefficient` on every row. Each row
/// depends on the previous row's ending balance.
pub fn amortize(
    financed_principal: Money,
    coefficient: Decimal,
    rates_percent: &[Rate],
    cumulative_days: &[Days],
    fees: &FeeSchedule,
) -> ParcelaResult<Vec<AmortizationRow>> {
    if rates_percent.len() != cumulative_days.len() {
        return Err(ParcelaError::InvalidInput {
            field: "rates_percent".into(),
            reason: format!(
                "{} rates given for {} installments",
                rates_percent.len(),
                cumulative_days.len()
            ),
        });
    }

    let flat_payment = financed_principal * coefficient;
    let mut balance = financed_principal;
    let mut rows = Vec::with_capacity(rates_percent.len());

    for (i, (&rate, &days)) in rates_percent.iter().zip(cumulative_days).enumerate() {
        let opening_balance = balance;
        let interest = balance * (rate / dec!(100));
        balance += interest;

        let amortized = flat_payment - interest;
        let ending_balance = balance - flat_payment;

        rows.push(AmortizationRow {
            number: i as u32 + 1,
            opening_balance,
            installment_rate_percent: rate,
            interest_accrued: interest,
            amortized_principal: amortized,
            ending_balance,
            cumulative_days: days,
            daily_tax: daily_iof(amortized, days, fees),
        });

        balance = ending_balance;
    }

    Ok(rows)
}
