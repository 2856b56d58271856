//! HTTP trigger endpoints (`/start`, `/stop`)

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::get, Router};
use pushbutton_shared::ButtonEvent;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

type EventSender = mpsc::Sender<ButtonEvent>;

/// Routes feeding the dispatcher intake; GET and POST are both accepted
pub fn router(events: EventSender) -> Router {
    Router::new()
        .route("/start", get(start).post(start))
        .route("/stop", get(stop).post(stop))
        .with_state(events)
}

async fn start(State(events): State<EventSender>) -> StatusCode {
    inject(&events, ButtonEvent::Start).await
}

async fn stop(State(events): State<EventSender>) -> StatusCode {
    inject(&events, ButtonEvent::Stop).await
}

async fn inject(events: &EventSender, event: ButtonEvent) -> StatusCode {
    match events.send(event).await {
        Ok(()) => {
            info!("[HTTP] {} requested", event);
            StatusCode::ACCEPTED
        }
        Err(_) => {
            warn!("[HTTP] {} dropped, dispatcher stopped", event);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Bind `addr` and serve the trigger routes until the listener fails
pub async fn serve(addr: &str, events: EventSender) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP control on {}", addr))?;
    info!("[HTTP] listening on {}", listener.local_addr()?);

    axum::serve(listener, router(events))
        .await
        .context("HTTP control server failed")
}
