use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payagent::application::controller::{FlowSnapshot, PaymentFlowController};
use payagent::config::{FlowConfig, MockTimings, PaymentConfig};
use payagent::domain::flow::FlowState;
use payagent::domain::quote::{Currency, Price};
use payagent::interfaces::cli::view::FlowView;
use rust_decimal::Decimal;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// What the job should do
    request: String,

    /// Pay the quote and run the job
    #[arg(long)]
    pay: bool,

    /// Print snapshots as JSON lines
    #[arg(long)]
    json: bool,

    /// Skip the simulated collaborator latency
    #[arg(long)]
    instant: bool,

    /// Price every quote at this amount
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    price: Decimal,

    /// Currency of the quote
    #[arg(long, default_value = "ICP")]
    currency: Currency,

    /// Wallet publishable key. Together with a principal, enables wallet payment.
    #[arg(long, env = "PAYAGENT_PUBLISHABLE_KEY")]
    publishable_key: Option<String>,

    /// Principal of the connected wallet
    #[arg(long, env = "PAYAGENT_WALLET_PRINCIPAL")]
    wallet_principal: Option<String>,
}

impl Cli {
    fn flow_config(&self) -> Result<FlowConfig> {
        Ok(FlowConfig {
            payment: PaymentConfig {
                publishable_key: self.publishable_key.clone(),
                wallet_principal: self.wallet_principal.clone(),
            },
            timings: if self.instant {
                MockTimings::instant()
            } else {
                MockTimings::default()
            },
            quote_price: Price::new(self.price).into_diagnostic()?,
            quote_currency: self.currency.clone(),
        })
    }
}

fn render(json: bool, snapshot: &FlowSnapshot) -> Result<()> {
    let stdout = io::stdout();
    let mut view = FlowView::new(stdout.lock());
    if json {
        view.write_json(snapshot).into_diagnostic()
    } else {
        view.write_text(snapshot).into_diagnostic()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let controller = PaymentFlowController::from_config(&cli.flow_config()?);

    controller.request_quote(&cli.request).await.into_diagnostic()?;
    let mut snapshot = controller.snapshot().await;
    render(cli.json, &snapshot)?;

    if cli.pay && snapshot.state == FlowState::Quoted {
        controller.pay_now().await.into_diagnostic()?;
        snapshot = controller.snapshot().await;
        render(cli.json, &snapshot)?;
    }

    if snapshot.error.is_some() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
