use crate::error::ParcelaError;
use crate::types::{FeeSchedule, Money, OperationType};
use crate::ParcelaResult;

/// Requested amount plus the fixed fees of the operation, before tax.
pub fn financed_principal(
    amount: Money,
    operation: OperationType,
    fees: &FeeSchedule,
) -> ParcelaResult<Money> {
    let financed = match operation {
        OperationType::Loan => amount
            .checked_add(fees.loan_origination_fee)
            .and_then(|v| v.checked_add(fees.loan_insurance)),
        OperationType::SalaryAdvance => amount.checked_add(fees.salary_advance_fee),
    };
    financed.ok_or_else(|| ParcelaError::InvalidInput {
        field: "amount".into(),
        reason: "Amount plus fees overflows".into(),
    })
}

/// Resolve how many installments the operation is actually contracted in.
///
/// Loans accept 1 up to `fees.loan_max_installments`. A salary advance is
/// always a single installment; any other request is coerced and a warning is
/// pushed.
pub fn installment_count(
    operation: OperationType,
    requested: u32,
    fees: &FeeSchedule,
    warnings: &mut Vec<String>,
) -> ParcelaResult<u32> {
    match operation {
        OperationType::Loan => {
            if requested == 0 || requested > fees.loan_max_installments {
                return Err(ParcelaError::InvalidInput {
                    field: "installments".into(),
                    reason: format!(
                        "Loans are paid in 1 to {} installments",
                        fees.loan_max_installments
                    ),
                });
            }
            Ok(requested)
        }
        OperationType::SalaryAdvance => {
            if requested != 1 {
                let msg = format!(
                    "Salary advances are settled in a single installment; \
                     {requested} requested, using 1"
                );
                log::warn!("{msg}");
                warnings.push(msg);
            }
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_adds_fee_and_insurance() {
        let fp = financed_principal(dec!(1000), OperationType::Loan, &FeeSchedule::default());
        assert_eq!(fp.unwrap(), dec!(1227.99));
    }

    #[test]
    fn test_salary_advance_adds_fee() {
        let fees = FeeSchedule::default();
        let fp = financed_principal(dec!(1000), OperationType::SalaryAdvance, &fees);
        assert_eq!(fp.unwrap(), dec!(1050.00));
    }

    #[test]
    fn test_zero_amount_still_carries_fees() {
        let fp = financed_principal(dec!(0), OperationType::Loan, &FeeSchedule::default());
        assert_eq!(fp.unwrap(), dec!(227.99));
    }

    #[test]
    fn test_fee_sum_overflow_is_an_error() {
        let fees = FeeSchedule::default();
        let err = financed_principal(Decimal::MAX, OperationType::Loan, &fees).unwrap_err();
        assert!(matches!(err, ParcelaError::InvalidInput { ref field, .. } if field == "amount"));
        assert!(financed_principal(Decimal::MAX, OperationType::SalaryAdvance, &fees).is_err());
    }

    #[test]
    fn test_loan_installment_bounds() {
        let fees = FeeSchedule::default();
        let mut warnings = Vec::new();
        assert_eq!(installment_count(OperationType::Loan, 60, &fees, &mut warnings).unwrap(), 60);
        assert!(installment_count(OperationType::Loan, 61, &fees, &mut warnings).is_err());
        assert!(installment_count(OperationType::Loan, 0, &fees, &mut warnings).is_err());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_salary_advance_forced_to_single_installment() {
        let fees = FeeSchedule::default();
        let mut warnings = Vec::new();
        let n = installment_count(OperationType::SalaryAdvance, 12, &fees, &mut warnings).unwrap();
        assert_eq!(n, 1);
        assert_eq!(warnings.len(), 1);
    }
}
