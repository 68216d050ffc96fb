use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortizer::{amortize, AmortizationRow};
use super::coefficient::{discount_factors, price_coefficient};
use super::day_count::{accrue_days, DayCounts};
use super::due_dates::generate_due_dates;
use super::iof::{assess_iof, IofAssessment};
use super::principal::{financed_principal, installment_count};
use super::rates::installment_rates;
use crate::clock;
use crate::error::ParcelaError;
use crate::types::{
    with_metadata, ComputationOutput, FeeSchedule, Installment, Money, OperationType, Rate,
};
use crate::ParcelaResult;

/// Ending balance tolerated on the last decomposition row before a warning.
const RESIDUE_TOLERANCE: Decimal = dec!(0.01);
/// Largest requested amount. Leaves headroom for fees, IOF and coefficient
/// growth inside 128-bit decimal arithmetic.
const MAX_AMOUNT: Money = dec!(1_000_000_000_000);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Amount requested by the borrower, before fees.
    pub amount: Money,
    /// Monthly interest rate in percent (2 = 2% a month).
    pub monthly_rate_percent: Rate,
    pub installments: u32,
    pub operation_type: OperationType,
    /// Defaults to today in São Paulo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_date: Option<NaiveDate>,
    /// Defaults to [`FeeSchedule::default`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub operation_type: OperationType,
    pub request_date: NaiveDate,
    pub financed_principal: Money,
    pub coefficient: Decimal,
    /// Pre-tax constant payment the decomposition is built on.
    pub flat_payment: Money,
    pub iof: IofAssessment,
    /// IOF-inclusive payment shown on every installment.
    pub final_payment: Money,
    pub total_payable: Money,
    pub installments: Vec<Installment>,
    pub day_counts: DayCounts,
    pub decomposition: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// IOF-inclusive installment value.
pub fn final_payment(taxed_principal: Money, coefficient: Decimal) -> Money {
    taxed_principal * coefficient
}

/// Compute the full installment schedule of a loan or salary advance.
///
/// Displayed installments all carry the same IOF-inclusive payment. The
/// per-row decomposition is kept alongside; it is priced on the pre-tax
/// payment, so its rows do not add up to the displayed values.
pub fn compute_schedule(input: &ScheduleInput) -> ParcelaResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let fees = input.fees.clone().unwrap_or_default();
    let request_date = input.request_date.unwrap_or_else(clock::today_in_sao_paulo);
    let monthly_rate = input.monthly_rate_percent / dec!(100);
    let n = installment_count(input.operation_type, input.installments, &fees, &mut warnings)?;

    // -- Due dates and day counts ---------------------------------------------
    let due_dates = generate_due_dates(request_date, n, fees.due_day)?;
    let day_counts = accrue_days(request_date, &due_dates)?;
    log::debug!(
        "request {request_date}: {n} installments, first due {}, cumulative days {:?}",
        due_dates[0],
        day_counts.cumulative
    );

    // -- Coefficient ----------------------------------------------------------
    let factors = discount_factors(monthly_rate, &day_counts.cumulative, fees.accrual_month_days)?;
    let coefficient = price_coefficient(&factors)?;

    // -- Principal and decomposition ------------------------------------------
    let financed = financed_principal(input.amount, input.operation_type, &fees)?;
    let rates = installment_rates(
        monthly_rate,
        &day_counts.per_installment,
        fees.accrual_month_days,
    )?;
    let decomposition = amortize(financed, coefficient, &rates, &day_counts.cumulative, &fees)?;
    log::debug!("financed principal {financed}, coefficient {coefficient}");

    if let Some(last) = decomposition.last() {
        if last.ending_balance.abs() > RESIDUE_TOLERANCE {
            let msg = format!(
                "Decomposition leaves a residual balance of {} on the last installment",
                last.ending_balance.round_dp(2)
            );
            log::warn!("{msg}");
            warnings.push(msg);
        }
    }

    // -- IOF and final payment ------------------------------------------------
    let iof = assess_iof(financed, &decomposition, &fees);
    let payment = final_payment(iof.taxed_principal, coefficient);

    let installments: Vec<Installment> = due_dates
        .iter()
        .enumerate()
        .map(|(i, date)| Installment {
            number: i as u32 + 1,
            due_date: *date,
            payment,
        })
        .collect();

    let output = ScheduleOutput {
        operation_type: input.operation_type,
        request_date,
        financed_principal: financed,
        coefficient,
        flat_payment: financed * coefficient,
        total_payable: payment * Decimal::from(n),
        final_payment: payment,
        iof,
        installments,
        day_counts,
        decomposition,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Price-system schedule with daily-compounded 30-day month and IOF",
        &serde_json::json!({
            "monthly_rate_percent": input.monthly_rate_percent.to_string(),
            "installments": n,
            "operation_type": input.operation_type,
            "fees": fees,
            "displayed_payment": "taxed principal x coefficient on every installment",
            "decomposition": "pre-tax payment; not the displayed value",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ScheduleInput) -> ParcelaResult<()> {
    if input.amount < Decimal::ZERO {
        return Err(ParcelaError::InvalidInput {
            field: "amount".into(),
            reason: "Amount cannot be negative".into(),
        });
    }
    if input.amount > MAX_AMOUNT {
        return Err(ParcelaError::InvalidInput {
            field: "amount".into(),
            reason: format!("Amount cannot exceed {MAX_AMOUNT}"),
        });
    }
    if input.monthly_rate_percent < Decimal::ZERO {
        return Err(ParcelaError::InvalidInput {
            field: "monthly_rate_percent".into(),
            reason: "Monthly rate cannot be negative".into(),
        });
    }
    if let Some(ref fees) = input.fees {
        validate_fees(fees)?;
    }
    Ok(())
}

fn validate_fees(fees: &FeeSchedule) -> ParcelaResult<()> {
    let amounts = [
        ("loan_origination_fee", fees.loan_origination_fee),
        ("loan_insurance", fees.loan_insurance),
        ("salary_advance_fee", fees.salary_advance_fee),
    ];
    for (field, value) in amounts {
        if value < Decimal::ZERO || value > MAX_AMOUNT {
            return Err(ParcelaError::InvalidInput {
                field: format!("fees.{field}"),
                reason: format!("Fee must be between 0 and {MAX_AMOUNT}"),
            });
        }
    }
    let rates = [
        ("iof_daily_rate", fees.iof_daily_rate),
        ("iof_long_term_rate", fees.iof_long_term_rate),
        ("iof_additional_rate", fees.iof_additional_rate),
    ];
    for (field, value) in rates {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(ParcelaError::InvalidInput {
                field: format!("fees.{field}"),
                reason: "Tax rate must be between 0 and 1".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: Decimal, rate: Decimal, installments: u32, date: NaiveDate) -> ScheduleInput {
        ScheduleInput {
            amount,
            monthly_rate_percent: rate,
            installments,
            operation_type: OperationType::Loan,
            request_date: Some(date),
            fees: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_installment_loan() {
        let out = compute_schedule(&loan(dec!(1000), dec!(2), 1, ymd(2024, 3, 5))).unwrap();
        let s = &out.result;

        assert_eq!(s.installments.len(), 1);
        assert_eq!(s.installments[0].due_date, ymd(2024, 4, 10));
        assert_eq!(s.day_counts.cumulative, vec![36]);
        assert_eq!(s.financed_principal, dec!(1227.99));
        assert!((s.coefficient - dec!(1.0240477)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_assumptions_state_displayed_vs_decomposed_payment() {
        let out = compute_schedule(&loan(dec!(1000), dec!(2), 3, ymd(2024, 3, 5))).unwrap();
        assert!(out.assumptions["displayed_payment"].is_string());
        assert!(out.assumptions["decomposition"].is_string());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_final_payment_includes_iof() {
        let out = compute_schedule(&loan(dec!(1000), dec!(2), 1, ymd(2024, 3, 5))).unwrap();
        let s = &out.result;

        // amortized = 1227.99, days = 36: daily = 1227.99 * 36 * 0.000082
        let daily = dec!(1227.99) * dec!(36) * dec!(0.000082);
        let additional = dec!(1227.99) * dec!(0.0038);
        assert!((s.iof.daily_total - daily).abs() < dec!(0.000001));
        assert_eq!(s.iof.additional, additional);

        let expected = (dec!(1227.99) + daily + additional) * s.coefficient;
        assert!((s.final_payment - expected).abs() < dec!(0.000001));
        assert!(s.final_payment > s.flat_payment);
    }

    #[test]
    fn test_every_installment_shows_the_same_payment() {
        let out = compute_schedule(&loan(dec!(5000), dec!(1.8), 24, ymd(2024, 6, 20))).unwrap();
        let s = &out.result;
        assert_eq!(s.installments.len(), 24);
        assert!(s.installments.iter().all(|i| i.payment == s.final_payment));
        assert_eq!(s.total_payable, s.final_payment * dec!(24));
    }

    #[test]
    fn test_salary_advance_coerced_to_one_installment() {
        let input = ScheduleInput {
            amount: dec!(1000),
            monthly_rate_percent: dec!(3),
            installments: 6,
            operation_type: OperationType::SalaryAdvance,
            request_date: Some(ymd(2024, 3, 5)),
            fees: None,
        };
        let out = compute_schedule(&input).unwrap();
        assert_eq!(out.result.installments.len(), 1);
        assert_eq!(out.result.financed_principal, dec!(1050.00));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_custom_fee_schedule() {
        let mut fees = FeeSchedule::default();
        fees.loan_origination_fee = dec!(0);
        fees.loan_insurance = dec!(0);
        let mut input = loan(dec!(1000), dec!(2), 3, ymd(2024, 3, 5));
        input.fees = Some(fees);

        let out = compute_schedule(&input).unwrap();
        assert_eq!(out.result.financed_principal, dec!(1000));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = compute_schedule(&loan(dec!(-1), dec!(2), 1, ymd(2024, 3, 5))).unwrap_err();
        assert!(matches!(err, ParcelaError::InvalidInput { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_amount_at_decimal_max_rejected() {
        let err = compute_schedule(&loan(Decimal::MAX, dec!(2), 1, ymd(2024, 3, 5))).unwrap_err();
        assert!(matches!(err, ParcelaError::InvalidInput { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_amount_at_ceiling_computes() {
        let out = compute_schedule(&loan(MAX_AMOUNT, dec!(9.99), 60, ymd(2024, 3, 5))).unwrap();
        assert_eq!(out.result.installments.len(), 60);
    }

    #[test]
    fn test_oversized_fee_rejected() {
        let mut fees = FeeSchedule::default();
        fees.loan_origination_fee = Decimal::MAX;
        let mut input = loan(dec!(1000), dec!(2), 1, ymd(2024, 3, 5));
        input.fees = Some(fees);
        assert!(compute_schedule(&input).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(compute_schedule(&loan(dec!(1000), dec!(-0.5), 1, ymd(2024, 3, 5))).is_err());
    }

    #[test]
    fn test_too_many_loan_installments_rejected() {
        assert!(compute_schedule(&loan(dec!(1000), dec!(2), 61, ymd(2024, 3, 5))).is_err());
    }

    #[test]
    fn test_missing_request_date_uses_today() {
        let mut input = loan(dec!(1000), dec!(2), 2, ymd(2024, 3, 5));
        input.request_date = None;
        let out = compute_schedule(&input).unwrap();
        let today = clock::today_in_sao_paulo();
        assert!((out.result.request_date - today).num_days().abs() <= 1);
    }
}
