//! ocppj-dispatch replay tool.
//!
//! Reads newline-delimited OCPP-J frames from stdin, runs each through the
//! dispatcher and prints one report line per frame:
//! - validated CALL: summary object
//! - CALLRESULT / CALLERROR: passthrough summary
//! - rejected CALL: the CALLERROR frame a central system would send back
//!
//! Usage: `ocppj-dispatch [CONFIG.yaml] < frames.jsonl`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use ocppj_dispatch::{config, replay, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path),
        None => Ok(config::DispatchConfig::default()),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let app = match AppState::new(cfg) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };
    let metrics = app.metrics();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    match replay::run(app, stdin, stdout).await {
        Ok(stats) => {
            if let Some(m) = metrics {
                eprint!("{}", m.render());
            }
            if stats.rejected > 0 {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}
