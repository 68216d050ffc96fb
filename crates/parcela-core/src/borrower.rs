//! Borrower lookup by CPF.
//!
//! The schedule never depends on where borrower records live: callers supply
//! any [`BorrowerDirectory`]. [`InMemoryDirectory`] is enough for files
//! loaded up front and for tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ParcelaError;
use crate::limits::{check_amount_limit, check_installment_cap};
use crate::schedule::{compute_schedule, ScheduleInput, ScheduleOutput};
use crate::types::{ComputationOutput, Money};
use crate::ParcelaResult;

const CPF_DIGITS: usize = 11;

/// Brazilian individual taxpayer number, normalised to its 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Accepts bare digits or the `000.000.000-00` mask.
    pub fn parse(raw: &str) -> ParcelaResult<Self> {
        let digits: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | ' '))
            .collect();
        if digits.len() != CPF_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParcelaError::InvalidInput {
                field: "cpf".into(),
                reason: format!("CPF must have {CPF_DIGITS} digits, got '{raw}'"),
            });
        }
        Ok(Cpf(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = &self.0;
        write!(f, "{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

impl TryFrom<String> for Cpf {
    type Error = ParcelaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cpf::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRecord {
    pub cpf: Cpf,
    pub name: String,
    pub employer: String,
    /// Largest amount the borrower may request.
    pub pre_approved_limit: Money,
    /// Largest installment value the borrower may take on.
    pub max_installment: Money,
}

/// Keyed lookup of borrower records.
pub trait BorrowerDirectory {
    fn fetch(&self, cpf: &Cpf) -> ParcelaResult<Option<BorrowerRecord>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    records: HashMap<Cpf, BorrowerRecord>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any previous one for the same CPF.
    pub fn insert(&mut self, record: BorrowerRecord) -> Option<BorrowerRecord> {
        self.records.insert(record.cpf.clone(), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<BorrowerRecord> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = BorrowerRecord>>(iter: I) -> Self {
        let mut dir = InMemoryDirectory::new();
        for record in iter {
            dir.insert(record);
        }
        dir
    }
}

impl BorrowerDirectory for InMemoryDirectory {
    fn fetch(&self, cpf: &Cpf) -> ParcelaResult<Option<BorrowerRecord>> {
        Ok(self.records.get(cpf).cloned())
    }
}

/// Fetch a record, treating absence as an error.
pub fn lookup(directory: &impl BorrowerDirectory, cpf: &Cpf) -> ParcelaResult<BorrowerRecord> {
    directory
        .fetch(cpf)?
        .ok_or_else(|| ParcelaError::BorrowerNotFound(cpf.to_string()))
}

/// Compute a schedule for a known borrower and hold it to their limits.
///
/// The amount is checked against the pre-approved limit up front. The
/// schedule is then computed in full and its installment value checked
/// against the borrower's maximum installment.
pub fn compute_for_borrower(
    directory: &impl BorrowerDirectory,
    cpf: &Cpf,
    input: &ScheduleInput,
) -> ParcelaResult<(BorrowerRecord, ComputationOutput<ScheduleOutput>)> {
    let record = lookup(directory, cpf)?;
    check_amount_limit(input.amount, record.pre_approved_limit)?;

    let output = compute_schedule(input)?;
    log::info!(
        "borrower {}: payment {} against cap {}",
        record.cpf,
        output.result.final_payment.round_dp(2),
        record.max_installment
    );
    check_installment_cap(output.result.final_payment, record.max_installment)?;

    Ok((record, output))
}
