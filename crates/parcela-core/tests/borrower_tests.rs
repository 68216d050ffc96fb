use chrono::NaiveDate;
use parcela_core::borrower::{compute_for_borrower, BorrowerRecord, Cpf, InMemoryDirectory};
use parcela_core::schedule::ScheduleInput;
use parcela_core::{OperationType, ParcelaError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn directory() -> InMemoryDirectory {
    vec![
        BorrowerRecord {
            cpf: Cpf::parse("529.982.247-25").unwrap(),
            name: "Ana Lima".into(),
            employer: "Hospital Municipal".into(),
            pre_approved_limit: dec!(6000),
            max_installment: dec!(600),
        },
        BorrowerRecord {
            cpf: Cpf::parse("111.444.777-35").unwrap(),
            name: "Carlos Dias".into(),
            employer: "Secretaria de Educação".into(),
            pre_approved_limit: dec!(1500),
            max_installment: dec!(2000),
        },
    ]
    .into_iter()
    .collect()
}

fn request(amount: Decimal, installments: u32) -> ScheduleInput {
    ScheduleInput {
        amount,
        monthly_rate_percent: dec!(2),
        installments,
        operation_type: OperationType::Loan,
        request_date: Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
        fees: None,
    }
}

#[test]
fn test_within_limits_returns_record_and_schedule() {
    let cpf = Cpf::parse("52998224725").unwrap();
    let (record, out) = compute_for_borrower(&directory(), &cpf, &request(dec!(5000), 12)).unwrap();

    assert_eq!(record.name, "Ana Lima");
    assert_eq!(out.result.installments.len(), 12);
    assert!(out.result.final_payment <= record.max_installment);
}

#[test]
fn test_amount_above_pre_approved_limit() {
    let cpf = Cpf::parse("52998224725").unwrap();
    let err = compute_for_borrower(&directory(), &cpf, &request(dec!(6000.01), 24)).unwrap_err();
    match err {
        ParcelaError::LimitExceeded { limit, .. } => assert_eq!(limit, dec!(6000)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_installment_above_cap_asks_for_more_installments() {
    let cpf = Cpf::parse("52998224725").unwrap();
    let err = compute_for_borrower(&directory(), &cpf, &request(dec!(5000), 6)).unwrap_err();
    match err {
        ParcelaError::LimitExceeded { limit, hint, .. } => {
            assert_eq!(limit, dec!(600));
            assert!(hint.contains("installments"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_borrower() {
    let cpf = Cpf::parse("00000000191").unwrap();
    let err = compute_for_borrower(&directory(), &cpf, &request(dec!(100), 1)).unwrap_err();
    assert!(matches!(err, ParcelaError::BorrowerNotFound(_)));
}

#[test]
fn test_record_deserialises_masked_cpf() {
    let record: BorrowerRecord = serde_json::from_str(
        r#"{"cpf": "111.444.777-35", "name": "Carlos Dias", "employer": "SEDUC",
            "pre_approved_limit": "1500", "max_installment": "2000"}"#,
    )
    .unwrap();
    assert_eq!(record.cpf.as_str(), "11144477735");

    let bad: Result<BorrowerRecord, _> = serde_json::from_str(
        r#"{"cpf": "123", "name": "x", "employer": "y",
            "pre_approved_limit": "1", "max_installment": "1"}"#,
    );
    assert!(bad.is_err());
}
