// File: crates/roombook_graph/src/handlers.rs
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use roombook_common::log_error;
use roombook_config::AppConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::client::GraphClient;
use crate::error::GraphError;
use crate::models::{
    ActiveMeetingQuery, AvailabilityRequest, BookRoomRequest, CheckInRequest, CheckInResponse,
};

// Shared state needed by the Graph handlers
#[derive(Clone)]
pub struct GraphState {
    pub client: Arc<GraphClient>,
}

impl GraphState {
    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        let client = GraphClient::from_config(config)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

fn logged<T>(result: Result<T, GraphError>, context: &str) -> Result<T, GraphError> {
    result.inspect_err(|e| log_error(e, context))
}

/// Handler to list all bookable rooms.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/rooms",
    responses(
        (status = 200, description = "Rooms from the places directory, unchanged", body = Vec<serde_json::Value>),
        (status = 502, description = "Token acquisition or Graph transport failed"),
    ),
    tag = "Rooms"
))]
pub async fn list_rooms_handler(
    State(state): State<Arc<GraphState>>,
) -> Result<Json<Vec<Value>>, GraphError> {
    info!("Listing rooms");
    let rooms = logged(state.client.list_rooms().await, "Failed to list rooms")?;
    Ok(Json(rooms))
}

/// Handler to book a room. The created event is returned verbatim.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = BookRoomRequest,
    responses(
        (status = 200, description = "Event created by Graph, unchanged", body = serde_json::Value),
        (status = 502, description = "Token acquisition or Graph transport failed"),
    ),
    tag = "Rooms"
))]
pub async fn book_room_handler(
    State(state): State<Arc<GraphState>>,
    Json(payload): Json<BookRoomRequest>,
) -> Result<Json<Value>, GraphError> {
    info!(
        "Booking request: {} in {} from {} to {}",
        payload.user_email, payload.room_email, payload.start, payload.end
    );
    let created = logged(state.client.book_room(&payload).await, "Failed to book room")?;
    Ok(Json(created))
}

/// Handler for the free/busy schedule of a room.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "getSchedule response, unchanged", body = serde_json::Value),
        (status = 502, description = "Token acquisition or Graph transport failed"),
    ),
    tag = "Rooms"
))]
pub async fn availability_handler(
    State(state): State<Arc<GraphState>>,
    Json(payload): Json<AvailabilityRequest>,
) -> Result<Json<Value>, GraphError> {
    let schedule = logged(
        state.client.get_availability(&payload).await,
        "Failed to read room availability",
    )?;
    Ok(Json(schedule))
}

/// Handler for the meeting currently running in a room.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/active-meeting",
    params(ActiveMeetingQuery),
    responses(
        (status = 200, description = "Current event or null", body = serde_json::Value),
        (status = 502, description = "Token acquisition or Graph transport failed"),
    ),
    tag = "Rooms"
))]
pub async fn active_meeting_handler(
    State(state): State<Arc<GraphState>>,
    Query(query): Query<ActiveMeetingQuery>,
) -> Result<Json<Value>, GraphError> {
    let meeting = logged(
        state.client.active_meeting(&query.room_email, Utc::now()).await,
        "Failed to read active meeting",
    )?;
    Ok(Json(meeting))
}

/// Handler to check in to a meeting.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/checkin",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Meeting checked in", body = CheckInResponse),
        (status = 502, description = "Token acquisition or Graph transport failed"),
    ),
    tag = "Rooms"
))]
pub async fn check_in_handler(
    State(state): State<Arc<GraphState>>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, GraphError> {
    let response = logged(
        state
            .client
            .check_in(&payload.room_email, &payload.event_id)
            .await,
        "Failed to check in",
    )?;
    Ok(Json(response))
}
