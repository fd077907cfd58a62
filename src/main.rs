use clap::Parser;
use miette::{IntoDiagnostic, Result};
use numera::application::CheckoutSession;
use numera::application::orchestrator::{CheckoutOrchestrator, CheckoutOutcome};
use numera::config::Config;
use numera::domain::checkout::Pricing;
use numera::domain::coupon::{CouponGate, CouponState};
use numera::domain::numerology::NumerologyProfile;
use numera::domain::ports::{AnalyticsSinkBox, PaymentGatewayBox, ReportServiceBox};
use numera::domain::validation;
use numera::infrastructure::in_memory::{
    GatewayScript, InMemoryPaymentGateway, InMemoryReportService, RecordingAnalytics,
};
use numera::interfaces::csv::profile_writer::{ProfileRow, ProfileWriter};
use numera::interfaces::csv::submission_reader::SubmissionReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Batch-validates a submissions CSV and writes the computed numerology
/// profiles to stdout. With a coupon, each valid submission is additionally
/// driven through the checkout flow against in-memory collaborators and the
/// minted report locator is appended.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input submissions CSV file
    input: PathBuf,

    /// Coupon code; runs the coupon checkout path for every valid row
    #[arg(long)]
    coupon: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    if let Some(dsn) = &config.monitoring_dsn {
        tracing::debug!(%dsn, "monitoring DSN configured");
    }

    let mut coupon_state = CouponState::new();
    if let Some(code) = &cli.coupon {
        let gate = CouponGate::new(config.coupon_code.clone());
        coupon_state.set_code(code);
        coupon_state.apply(&gate);
        if !coupon_state.applied() {
            return Err(miette::miette!("invalid coupon code: {code}"));
        }
    }

    let orchestrator = cli.coupon.as_ref().map(|_| {
        let gateway: PaymentGatewayBox =
            Box::new(InMemoryPaymentGateway::new(GatewayScript::Complete));
        let reports: ReportServiceBox = Box::new(InMemoryReportService::new(
            config.base_url.clone(),
            config.coupon_code.clone(),
        ));
        let analytics: AnalyticsSinkBox = Box::new(RecordingAnalytics::new());
        CheckoutOrchestrator::new(gateway, reports, analytics, Pricing::from_config(&config))
    });

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = SubmissionReader::new(file);

    let stdout = io::stdout();
    let mut writer = ProfileWriter::new(stdout.lock());

    for record in reader.submissions() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Error reading submission: {e}");
                continue;
            }
        };
        let form = record.into_form();

        let errors = validation::validate_form(&form);
        if !errors.is_empty() {
            for error in errors {
                eprintln!("Invalid submission for '{}': {error}", form.name);
            }
            continue;
        }

        let Some((day, month, year)) = validation::parse_dob(&form.dob) else {
            eprintln!("Invalid submission for '{}': unparseable dob", form.name);
            continue;
        };
        let profile = NumerologyProfile::compute(&form.name, day, month, year);
        let mut row = ProfileRow::new(&form, profile);

        if let Some(orchestrator) = &orchestrator {
            let mut session = CheckoutSession::new();
            match orchestrator.run(&mut session, &form, &coupon_state).await {
                Ok(CheckoutOutcome::Delivered(tx)) => {
                    if let Some(locator) = tx.report() {
                        row = row.with_report(locator.secure());
                    }
                }
                Ok(CheckoutOutcome::Cancelled) => {
                    eprintln!("Checkout cancelled for '{}'", form.name);
                }
                Err(e) => {
                    eprintln!("Checkout failed for '{}': {e}", form.name);
                }
            }
        }

        writer.write_row(&row).into_diagnostic()?;
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
