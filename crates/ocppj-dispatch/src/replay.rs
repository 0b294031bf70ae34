//! Frame replay: newline-delimited frames in, one JSON report line out.
//!
//! Frames are dispatched on blocking tasks with bounded concurrency. Reports
//! are written in input order, so a rejected CALL's CALLERROR line sits at
//! the same position as the frame that caused it.

use std::collections::VecDeque;

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use ocppj_core::error::{OcppError, Result};
use ocppj_core::protocol::Envelope;

use crate::app_state::AppState;
use crate::dispatch::{Dispatched, Rejection};

/// Totals for one replay run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Report for one frame plus whether it was accepted.
struct FrameReport {
    line: String,
    accepted: bool,
}

/// Dispatch one frame and render its report line.
pub fn report_frame(app: &AppState, frame: &[u8]) -> Result<String> {
    handle_frame(app, frame).map(|r| r.line)
}

fn handle_frame(app: &AppState, frame: &[u8]) -> Result<FrameReport> {
    let res = app.dispatcher().dispatch(frame);
    let metrics = app.metrics();

    match res {
        Ok(d) => {
            if let Some(m) = &metrics {
                m.frames.inc(&[("kind", kind_label(&d))]);
            }
            let line = match &d {
                Dispatched::Call {
                    id,
                    action,
                    payload,
                } => json!({
                    "id": id,
                    "kind": "CALL",
                    "action": action,
                    "outcome": "validated",
                    "decoded": payload.type_name(),
                }),
                Dispatched::CallResult(r) => json!({ "id": r.id, "kind": "CALLRESULT" }),
                Dispatched::CallError(e) => json!({
                    "id": e.id,
                    "kind": "CALLERROR",
                    "error_code": e.error_code,
                }),
            }
            .to_string();
            Ok(FrameReport {
                line,
                accepted: true,
            })
        }
        Err(rej) => {
            if let Some(m) = &metrics {
                let kind = if rej.id.is_some() { "CALL" } else { "INVALID" };
                m.frames.inc(&[("kind", kind)]);
                m.rejections
                    .inc(&[("code", rej.error.error_code().as_str())]);
            }
            Ok(FrameReport {
                line: rejection_line(&rej)?,
                accepted: false,
            })
        }
    }
}

fn kind_label(d: &Dispatched) -> &'static str {
    match d {
        Dispatched::Call { .. } => "CALL",
        Dispatched::CallResult(_) => "CALLRESULT",
        Dispatched::CallError(_) => "CALLERROR",
    }
}

/// Addressable rejections become the CALLERROR wire frame; anything else is
/// described as a plain JSON object.
fn rejection_line(rej: &Rejection) -> Result<String> {
    if let Some(reply) = rej.call_error()? {
        let bytes = Envelope::CallError(reply).to_vec()?;
        return String::from_utf8(bytes)
            .map_err(|e| OcppError::Internal(format!("reply not utf-8: {e}")));
    }
    Ok(json!({
        "error": rej.error.to_string(),
        "code": rej.error.error_code().as_str(),
        "category": rej.error.category().as_str(),
    })
    .to_string())
}

/// Replay every line of `input`, writing one report line per frame to
/// `output`. Only I/O failures end the run early.
pub async fn run<R, W>(app: AppState, mut input: R, mut output: W) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let concurrency = app.cfg().replay.concurrency;
    let mut inflight: VecDeque<JoinHandle<Result<FrameReport>>> = VecDeque::new();
    let mut stats = ReplayStats::default();

    loop {
        // A line that is not UTF-8 is rejected by the parser like any bad frame.
        let mut frame = Vec::new();
        let n = input
            .read_until(b'\n', &mut frame)
            .await
            .map_err(|e| OcppError::Internal(format!("read input failed: {e}")))?;
        if n == 0 {
            break;
        }
        trim_line_end(&mut frame);
        if frame.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        if inflight.len() >= concurrency {
            if let Some(h) = inflight.pop_front() {
                emit(h, &mut output, &mut stats).await?;
            }
        }

        let app = app.clone();
        inflight.push_back(tokio::task::spawn_blocking(move || {
            handle_frame(&app, &frame)
        }));
    }

    while let Some(h) = inflight.pop_front() {
        emit(h, &mut output, &mut stats).await?;
    }
    output
        .flush()
        .await
        .map_err(|e| OcppError::Internal(format!("flush output failed: {e}")))?;

    tracing::info!(
        frames = stats.frames,
        accepted = stats.accepted,
        rejected = stats.rejected,
        "replay finished"
    );
    Ok(stats)
}

fn trim_line_end(frame: &mut Vec<u8>) {
    if frame.last() == Some(&b'\n') {
        frame.pop();
    }
    if frame.last() == Some(&b'\r') {
        frame.pop();
    }
}

async fn emit<W>(
    h: JoinHandle<Result<FrameReport>>,
    output: &mut W,
    stats: &mut ReplayStats,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let report = h
        .await
        .map_err(|e| OcppError::Internal(format!("dispatch task failed: {e}")))??;

    stats.frames += 1;
    if report.accepted {
        stats.accepted += 1;
    } else {
        stats.rejected += 1;
    }

    let mut buf = report.line.into_bytes();
    buf.push(b'\n');
    output
        .write_all(&buf)
        .await
        .map_err(|e| OcppError::Internal(format!("write output failed: {e}")))
}
