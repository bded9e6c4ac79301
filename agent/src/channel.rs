//! The control-channel transport: a WebSocket client standing in for the
//! real orchestrator link. Kept thin (connect, read loop, dispatch, write
//! loop) — all measurement logic lives in `core`.

use anyhow::{Context, Result};
use common::{ControlEnvelope, ResultEnvelope};
use probe_core::{Dispatcher, HandlerContext, ProgressEvent};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

pub async fn run(url: &str, reconnect_delay: Duration, tool_timeout: Duration) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::new());

    loop {
        match connect_and_serve(url, tool_timeout, dispatcher.clone()).await {
            Ok(()) => tracing::info!("control channel closed cleanly"),
            Err(e) => tracing::warn!(error = %e, "control channel disconnected"),
        }
        tracing::info!(delay_secs = reconnect_delay.as_secs(), "reconnecting");
        tokio::time::sleep(reconnect_delay).await;
    }
}

async fn connect_and_serve(
    url: &str,
    tool_timeout: Duration,
    dispatcher: Arc<Dispatcher>,
) -> Result<()> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(url)
        .await
        .context("failed to connect to orchestrator")?;
    let (mut sender, mut receiver) = ws_stream.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ControlEnvelope>();
    out_tx.send(ControlEnvelope::StatusReady).ok();

    let send_task = tokio::spawn(async move {
        while let Some(envelope) = out_rx.recv().await {
            let Ok(json) = serde_json::to_string(&envelope) else {
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let Message::Text(text) = msg else {
                if matches!(msg, Message::Close(_)) {
                    break;
                }
                continue;
            };
            let Ok(ControlEnvelope::MeasurementRequest(req)) =
                serde_json::from_str::<ControlEnvelope>(&text)
            else {
                tracing::warn!("ignoring unrecognized control-channel message");
                continue;
            };

            let dispatcher = dispatcher.clone();
            let out_tx = out_tx.clone();
            tokio::spawn(async move {
                let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ProgressEvent>();
                let ctx = HandlerContext::new(progress_tx, tool_timeout);

                let measurement_id = req.measurement_id.clone();
                let test_id = req.test_id.clone();

                let forward_id = measurement_id.clone();
                let forward_test_id = test_id.clone();
                let forward_tx = out_tx.clone();
                let forward_task = tokio::spawn(async move {
                    while let Some(event) = progress_rx.recv().await {
                        let _ = forward_tx.send(ControlEnvelope::MeasurementProgress {
                            measurement_id: forward_id.clone(),
                            test_id: forward_test_id.clone(),
                            overwrite: event.overwrite,
                            result: event.result,
                        });
                    }
                });

                let result: ResultEnvelope = dispatcher.dispatch(&ctx, &req.measurement).await;
                drop(ctx);
                let _ = forward_task.await;

                let _ = out_tx.send(ControlEnvelope::MeasurementResult {
                    measurement_id,
                    test_id,
                    result,
                });
            });
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    Ok(())
}
