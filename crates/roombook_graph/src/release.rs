// --- File: crates/roombook_graph/src/release.rs ---
//! Background release of meetings nobody checked into.

use chrono::{DateTime, Duration, Utc};
use roombook_config::AutoReleaseConfig;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::client::GraphClient;
use crate::error::GraphError;

const RELEASE_SELECT: &str = "id,subject,categories";

fn has_category(event: &Value, category: &str) -> bool {
    event
        .get("categories")
        .and_then(Value::as_array)
        .is_some_and(|categories| categories.iter().any(|c| c.as_str() == Some(category)))
}

/// One sweep over all rooms. Returns the number of deleted meetings.
///
/// A room that fails is logged and skipped; only a failed room listing
/// fails the sweep.
pub async fn release_unchecked_meetings(
    client: &GraphClient,
    settings: &AutoReleaseConfig,
    now: DateTime<Utc>,
) -> Result<usize, GraphError> {
    let rooms = client.list_rooms().await?;
    let window_start = now - Duration::minutes(settings.lookback_minutes);
    let window_end = now - Duration::minutes(settings.grace_minutes);

    let mut released = 0;
    for room in &rooms {
        let Some(room_email) = room.get("emailAddress").and_then(Value::as_str) else {
            continue;
        };
        match release_room(client, room_email, window_start, window_end).await {
            Ok(count) => released += count,
            Err(e) => warn!("Skipping auto-release for {}: {}", room_email, e),
        }
    }
    Ok(released)
}

async fn release_room(
    client: &GraphClient,
    room_email: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<usize, GraphError> {
    let events = client
        .calendar_view(room_email, window_start, window_end, RELEASE_SELECT, None)
        .await?;

    let mut released = 0;
    for event in events {
        if has_category(&event, client.check_in_category()) {
            continue;
        }
        let Some(event_id) = event.get("id").and_then(Value::as_str) else {
            continue;
        };
        let subject = event.get("subject").and_then(Value::as_str).unwrap_or("");
        info!("Releasing unchecked meeting '{}' in {}", subject, room_email);
        client.delete_event(room_email, event_id).await?;
        released += 1;
    }
    Ok(released)
}

/// Runs sweeps every `interval_secs` until `shutdown` changes.
pub async fn run_release_loop(
    client: Arc<GraphClient>,
    settings: AutoReleaseConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let period = std::time::Duration::from_secs(settings.interval_secs.max(1));
    let mut ticker = tokio::time::interval(period);
    info!(
        "Auto-release started: every {:?}, grace {} min",
        period, settings.grace_minutes
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match release_unchecked_meetings(&client, &settings, Utc::now()).await {
                    Ok(0) => debug!("Auto-release sweep found nothing to release"),
                    Ok(count) => info!("Auto-release sweep released {} meetings", count),
                    Err(e) => error!("Auto-release sweep failed: {}", e),
                }
            }
            _ = shutdown.changed() => {
                info!("Auto-release stopped");
                break;
            }
        }
    }
}
