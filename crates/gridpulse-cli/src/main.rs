use anyhow::Context;
use clap::Parser;
use gridpulse_cli::{run_menu, Cli, Presenter};
use gridpulse_core::AnalysisSession;
use gridpulse_io::load_raw_rows;
use std::io::{self, Write};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let calendar = cli.calendar()?;
    let mapping = cli.column_mapping()?;

    info!("Loading readings from {}", cli.input.display());
    let rows = load_raw_rows(&cli.input, &mapping)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let (mut session, wastage) = AnalysisSession::start(&rows, calendar)
        .with_context(|| format!("preprocessing {}", cli.input.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut out = Presenter::new(&mut handle, cli.format, cli.trend_tail);
    out.wastage(&wastage)?;
    run_menu(&mut session, io::stdin().lock(), &mut out)?;
    handle.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run(&cli) {
        error!("gridpulse failed: {:?}", e);
        std::process::exit(1);
    }
}
