// --- File: crates/roombook_graph/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    active_meeting_handler, availability_handler, book_room_handler, check_in_handler,
    list_rooms_handler, GraphState,
};

/// Creates a router containing all room routes.
pub fn routes(state: Arc<GraphState>) -> Router {
    Router::new()
        .route("/rooms", get(list_rooms_handler))
        .route("/book", post(book_room_handler))
        .route("/availability", post(availability_handler))
        .route("/active-meeting", get(active_meeting_handler))
        .route("/checkin", post(check_in_handler))
        .with_state(state)
}
