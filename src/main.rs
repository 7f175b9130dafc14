//! `payment-schedule` prints the installment schedule of a property sale plan.
//!
//! ```bash
//! # Inline plan
//! payment-schedule --price 100000 --down-payment 20000 --installments 12 --rate 12
//!
//! # Plan stored as JSON, quotation preview only
//! payment-schedule --request plan.json --preview --format json
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use payment_schedule::{
    Installment, PlanRequest, QuotationPreview, ScheduleSummary, generate, preview, summarize,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
}

/// Installment schedule calculator for property sales
#[derive(Parser, Debug)]
#[command(name = "payment-schedule", version, about)]
struct Cli {
    /// JSON file holding the plan (label, principal, down_payment, installment_count, annual_interest_rate)
    #[arg(long, conflicts_with_all = ["price", "down_payment", "installments", "rate", "label"])]
    request: Option<PathBuf>,

    /// Property price
    #[arg(long)]
    price: Option<Decimal>,

    /// Amount paid upfront
    #[arg(long, default_value = "0")]
    down_payment: Decimal,

    /// Number of installments after the down payment
    #[arg(long, default_value_t = 1)]
    installments: u32,

    /// Nominal annual interest rate, in percent
    #[arg(long, default_value = "0")]
    rate: Decimal,

    /// Plan label, e.g. "Contado" for a cash plan
    #[arg(long, default_value = "")]
    label: String,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Only print the quotation preview
    #[arg(long)]
    preview: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", env = "PAYMENT_SCHEDULE_FORMAT")]
    format: OutputFormat,
}

impl Cli {
    fn plan_request(&self) -> Result<PlanRequest> {
        if let Some(path) = &self.request {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading plan request {}", path.display()))?;
            return serde_json::from_str(&raw)
                .with_context(|| format!("parsing plan request {}", path.display()));
        }

        let Some(principal) = self.price else {
            bail!("either --request or --price is required");
        };
        Ok(PlanRequest {
            label: self.label.clone(),
            principal,
            down_payment: self.down_payment,
            installment_count: self.installments,
            annual_interest_rate: self.rate,
        })
    }
}

#[derive(Serialize)]
struct ScheduleReport {
    installments: Vec<Installment>,
    summary: ScheduleSummary,
}

fn print_preview(preview: &QuotationPreview) {
    println!("Principal:          {:>14}", preview.principal);
    println!("Down payment:       {:>14}", preview.down_payment);
    println!("Financed:           {:>14}", preview.financed_principal);
    if let Some(payment) = preview.periodic_payment {
        println!(
            "Installments:       {:>14}",
            format!("{} x {}", preview.periodic_installments, payment)
        );
    }
    println!("Total interest:     {:>14}", preview.total_interest);
    println!("Projected payable:  {:>14}", preview.projected_payable);
}

fn print_schedule(report: &ScheduleReport) {
    println!(
        "{:>3}  {:<10}  {:>4}  {:>14}  {:>14}  {:>14}  {:>14}",
        "#", "Due", "Days", "Opening", "Principal", "Interest", "Total"
    );
    for installment in &report.installments {
        println!(
            "{:>3}  {:<10}  {:>4}  {:>14}  {:>14}  {:>14}  {:>14}",
            installment.number,
            installment.due_date,
            installment.period_days,
            installment.opening_balance,
            installment.principal_portion,
            installment.interest_portion,
            installment.total_amount,
        );
    }
    println!();
    println!("Total principal: {}", report.summary.total_principal);
    println!("Total interest:  {}", report.summary.total_interest);
    println!("Total payable:   {}", report.summary.total_payable);
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payment_schedule=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let input = cli.plan_request()?.into_input()?;
    info!(kind = ?input.plan_kind, principal = %input.principal, "plan classified");

    if cli.preview {
        let preview = preview(&input)?.rounded();
        match cli.format {
            OutputFormat::Table => print_preview(&preview),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&preview)?),
        }
        return Ok(());
    }

    let reference_date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let schedule = generate(&input, reference_date)?;
    let report = ScheduleReport {
        summary: summarize(&schedule).rounded(),
        installments: schedule.iter().map(Installment::rounded).collect(),
    };
    info!(
        installments = report.installments.len(),
        total = %report.summary.total_payable,
        "schedule generated"
    );

    match cli.format {
        OutputFormat::Table => print_schedule(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
