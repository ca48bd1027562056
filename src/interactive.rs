//! Line-oriented front end: one hash per line, plus `reset` and `quit`.
//!
//! Fetches run as spawned tasks and report back over a channel tagged with their epoch.
//! When input ends, the loop keeps waiting for an analysis that is still in flight.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::analyzer::Analyzer;
use crate::cli::OutputFormat;
use crate::error::AnalysisError;
use crate::ethereum::ChainSource;
use crate::models::Analysis;
use crate::render;
use crate::session::{Session, SessionState};

type Completion = (u64, Result<Analysis, AnalysisError>);

pub async fn run<S, R, W>(
    analyzer: Arc<Analyzer<S>>,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    S: ChainSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new();
    let (tx, mut rx) = mpsc::channel::<Completion>(16);
    let mut lines = input.lines();
    let mut input_open = true;

    writeln!(out, "Enter a transaction hash, `reset` or `quit`.")?;

    loop {
        if !input_open && !session.is_fetching() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                let line = line.trim();

                match line {
                    "" => continue,
                    "quit" | "exit" => break,
                    "reset" => {
                        session.reset();
                        writeln!(out, "Session cleared.")?;
                        continue;
                    }
                    _ => {}
                }

                session.set_input(line);
                if !session.can_analyze() {
                    if let SessionState::Fetching { epoch } = session.state() {
                        writeln!(
                            out,
                            "Analysis {} is still running; wait for it or `reset`.",
                            epoch
                        )?;
                    }
                    continue;
                }

                match session.submit() {
                    Ok(ticket) => {
                        info!("Analyzing {} (epoch {})", session.input(), session.epoch());
                        let analyzer = analyzer.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = analyzer.analyze(ticket.hash).await;
                            if let Err(e) = tx.send((ticket.epoch, result)).await {
                                warn!("Dropping result for epoch {}: {}", ticket.epoch, e);
                            }
                        });
                    }
                    Err(e) => writeln!(out, "{}", render::render_error(&e, format))?,
                }
            }
            Some((epoch, result)) = rx.recv() => {
                if !session.complete(epoch, result) {
                    continue;
                }
                if let Some(analysis) = session.analysis() {
                    writeln!(out, "{}", render::render_analysis(analysis, format)?)?;
                } else if let Some(e) = session.error() {
                    error!("Analysis failed: {}", e);
                    writeln!(out, "{}", render::render_error(e, format))?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::{sample_receipt, sample_tx, stub, Reply, StubSource};
    use crate::graph::EdgeLabelMode;

    const HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

    async fn session_output(source: Option<StubSource>, input: &str) -> String {
        let analyzer = Arc::new(Analyzer::new(source, EdgeLabelMode::None));
        let mut out = Vec::new();
        run(analyzer, input.as_bytes(), &mut out, OutputFormat::Text)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn found() -> Option<StubSource> {
        Some(stub(Reply::Found(sample_tx()), Reply::Found(sample_receipt())))
    }

    #[tokio::test]
    async fn result_is_printed_after_input_ends() {
        let out = session_output(found(), &format!("{}\n", HASH)).await;
        assert!(out.contains("Value:        1.5 ETH"), "{out}");
    }

    #[tokio::test]
    async fn second_hash_waits_for_running_analysis() {
        let out = session_output(found(), &format!("{}\n{}\n", HASH, HASH)).await;
        assert!(out.contains("Analysis 1 is still running"), "{out}");
        assert_eq!(out.matches("Value:").count(), 1, "{out}");
    }

    #[tokio::test]
    async fn invalid_hash_reports_validation_error() {
        let out = session_output(found(), "0x1234\n").await;
        assert!(out.contains("Error: Invalid transaction hash"), "{out}");
        assert!(!out.contains("Value:"));
    }

    #[tokio::test]
    async fn not_found_is_reported_without_graph() {
        let source = Some(stub(Reply::Missing, Reply::Found(sample_receipt())));
        let out = session_output(source, &format!("{}\n", HASH)).await;
        assert!(out.contains("not found"), "{out}");
        assert!(!out.contains("Nodes:"));
    }

    #[tokio::test]
    async fn reset_discards_in_flight_result() {
        let out = session_output(found(), &format!("{}\nreset\n", HASH)).await;
        assert!(out.contains("Session cleared."));
        assert!(!out.contains("Value:"), "{out}");
    }

    #[tokio::test]
    async fn unconfigured_endpoint_fails_each_submission() {
        let out = session_output(None, &format!("{}\n", HASH)).await;
        assert!(out.contains("ETHEREUM_RPC_URL is not configured"), "{out}");
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let out = session_output(found(), "quit\n0x1234\n").await;
        assert!(!out.contains("Invalid transaction hash"));
    }
}
