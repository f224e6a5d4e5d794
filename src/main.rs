use anyhow::{bail, Context};
use ratemarkup::{BatchProcessor, Config, CsvRateSource, QuoteRequest, QuoteSession, SeededRng};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;

    let mut args = std::env::args().skip(1);
    let (rates_path, request_path) = match (args.next(), args.next()) {
        (Some(rates), Some(request)) => (rates, request),
        _ => bail!("usage: ratemarkup <rates.csv> <request.json>"),
    };

    let raw_request = tokio::fs::read_to_string(&request_path)
        .await
        .with_context(|| format!("Failed to read {}", request_path))?;
    let request: QuoteRequest = serde_json::from_str(&raw_request)
        .with_context(|| format!("Invalid quote request in {}", request_path))?;

    let source = CsvRateSource::new(&rates_path);
    let processor = BatchProcessor::from_config(&config);
    let mut session = QuoteSession::load(&source, processor)
        .await
        .with_context(|| format!("Failed to load rate lines from {}", rates_path))?;

    // Ctrl-C stops an AI batch between lines
    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut rng = SeededRng::from_optional_seed(config.rng_seed);
    let text = session.execute(&request, &mut rng).await?;

    println!("{}", text);
    println!("{}", serde_json::to_string_pretty(session.lines())?);
    Ok(())
}
