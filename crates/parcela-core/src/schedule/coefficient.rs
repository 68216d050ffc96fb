use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::ParcelaError;
use crate::types::{Days, Rate};
use crate::ParcelaResult;

/// Growth of one unit at `monthly_rate` over `days`, compounding on a
/// `month_days`-day month: `(1 + r)^(days / month_days)`.
pub fn compound_factor(monthly_rate: Rate, days: Days, month_days: Days) -> ParcelaResult<Decimal> {
    if month_days <= 0 {
        return Err(ParcelaError::DivisionByZero {
            context: "accrual month length".into(),
        });
    }
    if monthly_rate <= Decimal::NEGATIVE_ONE {
        return Err(ParcelaError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }
    let periods = Decimal::from(days) / Decimal::from(month_days);
    (Decimal::ONE + monthly_rate)
        .checked_powd(periods)
        .ok_or_else(|| ParcelaError::InvalidInput {
            field: "monthly_rate".into(),
            reason: format!("Rate compounded over {days} days overflows"),
        })
}

/// Present-value factor of each installment, discounted over the days
/// accumulated since the request date.
pub fn discount_factors(
    monthly_rate: Rate,
    cumulative_days: &[Days],
    month_days: Days,
) -> ParcelaResult<Vec<Decimal>> {
    cumulative_days
        .iter()
        .map(|&days| {
            let growth = compound_factor(monthly_rate, days, month_days)?;
            if growth.is_zero() {
                return Err(ParcelaError::DivisionByZero {
                    context: format!("discount factor at {days} days"),
                });
            }
            Ok(Decimal::ONE / growth)
        })
        .collect()
}

/// Price-table coefficient: the payment per unit of principal that makes
/// equal installments amortize it exactly.
pub fn price_coefficient(factors: &[Decimal]) -> ParcelaResult<Decimal> {
    let sum: Decimal = factors.iter().sum();
    if sum.is_zero() {
        return Err(ParcelaError::DivisionByZero {
            context: "price coefficient (sum of discount factors)".into(),
        });
    }
    Ok(Decimal::ONE / sum)
}
