use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use parcela_core::borrower::{self, BorrowerRecord, Cpf, InMemoryDirectory};
use parcela_core::schedule::{self, ScheduleInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::compute_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn today_in_sao_paulo() -> String {
    parcela_core::clock::today_in_sao_paulo().to_string()
}

// ---------------------------------------------------------------------------
// Borrower
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct QuoteRequest {
    borrowers: Vec<BorrowerRecord>,
    cpf: String,
    schedule: ScheduleInput,
}

/// Compute a schedule for one of the given borrowers, enforcing their
/// pre-approved limit and maximum installment.
#[napi]
pub fn quote_for_borrower(request_json: String) -> NapiResult<String> {
    let request: QuoteRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let directory: InMemoryDirectory = request.borrowers.into_iter().collect();
    let cpf = Cpf::parse(&request.cpf).map_err(to_napi_error)?;
    let (record, output) =
        borrower::compute_for_borrower(&directory, &cpf, &request.schedule).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "borrower": record, "quote": output }))
        .map_err(to_napi_error)
}

#[napi]
pub fn check_installment_cap(payment: String, cap: String) -> NapiResult<()> {
    let payment: Decimal = payment.parse().map_err(to_napi_error)?;
    let cap: Decimal = cap.parse().map_err(to_napi_error)?;
    parcela_core::limits::check_installment_cap(payment, cap).map_err(to_napi_error)
}
