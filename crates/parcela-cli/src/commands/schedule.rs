use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use parcela_core::borrower::{self, Cpf};
use parcela_core::clock;
use parcela_core::schedule::{self, ScheduleInput, ScheduleOutput};
use parcela_core::{ComputationOutput, Installment, Money, OperationType};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OperationArg {
    Loan,
    SalaryAdvance,
}

impl From<OperationArg> for OperationType {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Loan => OperationType::Loan,
            OperationArg::SalaryAdvance => OperationType::SalaryAdvance,
        }
    }
}

/// Arguments for an installment schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Requested amount, before fees
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Monthly interest rate in percent (2 = 2% a month)
    #[arg(long, alias = "rate")]
    pub monthly_rate: Option<Decimal>,

    /// Number of installments
    #[arg(long, default_value_t = 1)]
    pub installments: u32,

    /// Operation type
    #[arg(long, value_enum, default_value = "loan")]
    pub operation: OperationArg,

    /// Request date, dd/mm/yyyy or yyyy-mm-dd (defaults to today in São Paulo)
    #[arg(long)]
    pub request_date: Option<String>,

    /// Emit the full unrounded output, including the per-installment decomposition
    #[arg(long)]
    pub full: bool,
}

/// Arguments for a borrower quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Borrower CSV: cpf,name,employer,pre_approved_limit,max_installment
    #[arg(long)]
    pub borrowers: String,

    /// Borrower CPF, with or without punctuation
    #[arg(long)]
    pub cpf: String,

    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

/// What is shown to the borrower: one payment per due date, in cents.
#[derive(Debug, Serialize)]
struct ScheduleSummary {
    operation_type: OperationType,
    request_date: NaiveDate,
    financed_principal: Money,
    iof_total: Money,
    taxed_principal: Money,
    final_payment: Money,
    total_payable: Money,
    installments: Vec<Installment>,
}

#[derive(Debug, Serialize)]
struct QuoteResult<T: Serialize> {
    cpf: String,
    name: String,
    employer: String,
    pre_approved_limit: Money,
    max_installment: Money,
    #[serde(flatten)]
    schedule: T,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sched_input = build_input(&args)?;
    let result = schedule::compute_schedule(&sched_input)?;
    present(result, args.full)
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let directory = input::file::read_borrowers(&args.borrowers)?;
    let cpf = Cpf::parse(&args.cpf)?;
    let sched_input = build_input(&args.schedule)?;

    let (record, result) = borrower::compute_for_borrower(&directory, &cpf, &sched_input)?;
    let full = args.schedule.full;
    let ComputationOutput {
        result,
        methodology,
        assumptions,
        warnings,
        metadata,
    } = result;

    let quoted = if full {
        serde_json::to_value(quote(&record, result))?
    } else {
        serde_json::to_value(quote(&record, summarise(result)))?
    };
    Ok(serde_json::to_value(ComputationOutput {
        result: quoted,
        methodology,
        assumptions,
        warnings,
        metadata,
    })?)
}

fn build_input(args: &ScheduleArgs) -> Result<ScheduleInput, Box<dyn std::error::Error>> {
    build_input_with(args, input::stdin::read_stdin)
}

/// Precedence: `--input` file, then explicit `--amount` flags, then piped
/// stdin. Stdin is only read when no amount was given on the command line.
fn build_input_with<F>(
    args: &ScheduleArgs,
    read_stdin: F,
) -> Result<ScheduleInput, Box<dyn std::error::Error>>
where
    F: FnOnce() -> Result<Option<Value>, Box<dyn std::error::Error>>,
{
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if args.amount.is_none() {
        if let Some(data) = read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
    }

    let request_date = match args.request_date {
        Some(ref raw) => Some(clock::parse_request_date(raw)?),
        None => None,
    };
    Ok(ScheduleInput {
        amount: args.amount.ok_or("--amount is required (or provide --input)")?,
        monthly_rate_percent: args
            .monthly_rate
            .ok_or("--monthly-rate is required (or provide --input)")?,
        installments: args.installments,
        operation_type: args.operation.into(),
        request_date,
        fees: None,
    })
}

fn present(
    output: ComputationOutput<ScheduleOutput>,
    full: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    if full {
        return Ok(serde_json::to_value(output)?);
    }
    let ComputationOutput {
        result,
        methodology,
        assumptions,
        warnings,
        metadata,
    } = output;
    Ok(serde_json::to_value(ComputationOutput {
        result: summarise(result),
        methodology,
        assumptions,
        warnings,
        metadata,
    })?)
}

fn summarise(s: ScheduleOutput) -> ScheduleSummary {
    let cents = |m: Money| m.round_dp(2);
    ScheduleSummary {
        operation_type: s.operation_type,
        request_date: s.request_date,
        financed_principal: cents(s.financed_principal),
        iof_total: cents(s.iof.total),
        taxed_principal: cents(s.iof.taxed_principal),
        final_payment: cents(s.final_payment),
        total_payable: cents(s.total_payable),
        installments: s
            .installments
            .into_iter()
            .map(|i| Installment {
                payment: cents(i.payment),
                ..i
            })
            .collect(),
    }
}

fn quote<T: Serialize>(record: &borrower::BorrowerRecord, schedule: T) -> QuoteResult<T> {
    QuoteResult {
        cpf: record.cpf.to_string(),
        name: record.name.clone(),
        employer: record.employer.clone(),
        pre_approved_limit: record.pre_approved_limit,
        max_installment: record.max_installment,
        schedule,
    }
}
