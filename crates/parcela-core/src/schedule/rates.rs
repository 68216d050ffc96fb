use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::coefficient::compound_factor;
use crate::types::{Days, Rate};
use crate::ParcelaResult;

/// Effective rate, in percent, for each installment's own day gap.
///
/// This is the exact compounding of the monthly rate over the days the
/// installment actually runs, not over the cumulative span.
pub fn installment_rates(
    monthly_rate: Rate,
    day_gaps: &[Days],
    month_days: Days,
) -> ParcelaResult<Vec<Rate>> {
    day_gaps
        .iter()
        .map(|&days| {
            let growth = compound_factor(monthly_rate, days, month_days)?;
            Ok((growth - Decimal::ONE) * dec!(100))
        })
        .collect()
}
