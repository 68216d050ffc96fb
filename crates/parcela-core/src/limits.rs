use crate::error::ParcelaError;
use crate::types::Money;
use crate::ParcelaResult;

/// Reject a request above the borrower's pre-approved limit.
pub fn check_amount_limit(amount: Money, limit: Money) -> ParcelaResult<()> {
    if amount > limit {
        return Err(ParcelaError::LimitExceeded {
            limit,
            requested: amount,
            hint: "Request an amount within the pre-approved limit.".into(),
        });
    }
    Ok(())
}

/// Reject an installment above the borrower's maximum installment value.
pub fn check_installment_cap(payment: Money, cap: Money) -> ParcelaResult<()> {
    if payment > cap {
        return Err(ParcelaError::LimitExceeded {
            limit: cap,
            requested: payment.round_dp(2),
            hint: "Increase the number of installments.".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_at_limit_accepted() {
        assert!(check_amount_limit(dec!(5000), dec!(5000)).is_ok());
    }

    #[test]
    fn test_amount_over_limit_rejected() {
        let err = check_amount_limit(dec!(5000.01), dec!(5000)).unwrap_err();
        assert!(matches!(err, ParcelaError::LimitExceeded { .. }));
    }

    #[test]
    fn test_installment_over_cap_asks_for_more_installments() {
        let err = check_installment_cap(dec!(612.3456), dec!(500)).unwrap_err();
        match err {
            ParcelaError::LimitExceeded { limit, requested, hint } => {
                assert_eq!(limit, dec!(500));
                assert_eq!(requested, dec!(612.35));
                assert!(hint.contains("installments"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
