//! Event stream handler
//!
//! Each `/events` request gets its own emitter task. The task writes one
//! event block per body frame into a bounded channel whose receiving end is
//! the response body, pausing between steps. A dropped receiver means the
//! client went away; the emitter then stops quietly.

use crate::config::AppState;
use crate::error::StreamError;
use crate::http::{self, ResponseBody};
use crate::logger;
use crate::sse::{demo_script, DemoStep};
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

/// How an emitter run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Every step was written
    Completed,
    /// The client closed the connection first
    ClientDisconnected,
}

/// Start streaming the demo sequence and return the response carrying it
pub fn serve_event_stream(state: &Arc<AppState>) -> Response<ResponseBody> {
    let capacity = state.config.stream.channel_capacity.max(1);
    let (tx, rx) = mpsc::channel::<Bytes>(capacity);

    let body = StreamBody::new(
        ReceiverStream::new(rx).map(|chunk| Ok::<_, Infallible>(Frame::data(chunk))),
    );

    let active = state.stream_opened();
    logger::log_stream(&format!("SSE client connected ({active} active)"));

    let response = http::build_event_stream_response(
        &state.config.http.server_name,
        body.boxed_unsync(),
        state.config.performance.keep_alive,
    );

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let steps = demo_script();
        if let Err(e) = emit_events(&tx, &steps, state.config.stream.interval()).await {
            logger::log_error(&format!("Event stream aborted: {e}"));
        }
        state.stream_closed();
        // Dropping the sender ends the response body
        drop(tx);
    });

    response
}

/// Write `steps` to `tx`, one encoded event per frame, sleeping `interval` after each
pub async fn emit_events(
    tx: &mpsc::Sender<Bytes>,
    steps: &[DemoStep],
    interval: Duration,
) -> Result<StreamOutcome, StreamError> {
    for step in steps {
        let event = step.render(chrono::Local::now().naive_local())?;
        if tx.send(Bytes::from(event.encode())).await.is_err() {
            logger::log_stream("Client disconnected");
            return Ok(StreamOutcome::ClientDisconnected);
        }
        logger::log_stream(&step.log_line());

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = tx.closed() => {
                logger::log_stream("Client disconnected");
                return Ok(StreamOutcome::ClientDisconnected);
            }
        }
    }

    logger::log_stream("SSE stream ended");
    Ok(StreamOutcome::Completed)
}
