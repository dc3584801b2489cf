use potsettle::session::load_session_file;
use potsettle::{ApprovalMonitor, Config, LoggingApprover};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Settlement failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    use anyhow::Context;

    let file = load_session_file(&config.session_file).await?;
    let (mut session, persisted_paid) = file.into_session(config.engine.clone());

    let report = session
        .recompute(chrono::Utc::now())
        .with_context(|| format!("recomputing session {}", session.id()))?;
    if !report.is_balanced() {
        tracing::warn!(
            "Session {} does not balance (off by {}); ledger is incomplete",
            session.id(),
            report.imbalance
        );
    }

    let status = session.restore_paid(&persisted_paid)?;
    tracing::info!("Session {} status: {}", session.id(), status);

    let monitor = ApprovalMonitor::new(session.id(), Arc::new(LoggingApprover));
    let outcome = monitor.observe_state(session.state()).await?;

    let output = json!({
        "sessionId": session.id(),
        "status": outcome.status,
        "stale": session.is_stale(),
        "ledger": session.ledger()?,
        "paid": session.paid_map()?,
        "unsettled": report.unsettled,
        "skippedPins": report.skipped_pins.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
