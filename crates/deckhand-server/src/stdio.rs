//! Newline-delimited JSON-RPC over a byte stream (stdin/stdout in practice).
//!
//! Each line is handled on its own task so a slow render does not hold up
//! other requests. Responses go through a channel to a single writer, which
//! keeps lines from interleaving. Responses may therefore arrive out of
//! request order; callers match them by id.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::dispatch::Dispatcher;
use crate::error::ServerResult;

/// Serve requests read from `reader`, writing responses to `writer`, until
/// the reader is exhausted and every in-flight request has answered.
pub async fn serve_io<R, W>(dispatcher: Arc<Dispatcher>, reader: R, mut writer: W) -> ServerResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut tx = Some(tx);
    let mut lines = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            line = lines.next_line(), if tx.is_some() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed, draining in-flight requests");
                    // Dropping our sender lets the channel close once the
                    // spawned handlers finish.
                    tx = None;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(sender) = tx.clone() else { continue };
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    let Some(response) = dispatcher.handle_message(&line).await else {
                        return;
                    };
                    match serde_json::to_string(&response) {
                        Ok(json) => {
                            let _ = sender.send(json);
                        }
                        Err(e) => tracing::error!("Failed to serialize response: {}", e),
                    }
                });
            }
            Some(json) = rx.recv() => {
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            else => break,
        }
    }

    Ok(())
}

/// Serve over the process's stdin and stdout.
pub async fn serve_stdio(dispatcher: Arc<Dispatcher>) -> ServerResult<()> {
    tracing::info!("Serving JSON-RPC on stdio");
    serve_io(dispatcher, tokio::io::stdin(), tokio::io::stdout()).await
}
