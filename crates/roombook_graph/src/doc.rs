// File: crates/roombook_graph/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::models::{AvailabilityRequest, BookRoomRequest, CheckInRequest, CheckInResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_rooms_handler,
        crate::handlers::book_room_handler,
        crate::handlers::availability_handler,
        crate::handlers::active_meeting_handler,
        crate::handlers::check_in_handler
    ),
    components(
        schemas(
            BookRoomRequest,
            AvailabilityRequest,
            CheckInRequest,
            CheckInResponse
        )
    ),
    tags(
        (name = "Rooms", description = "Room directory and booking through Microsoft Graph")
    )
)]
pub struct GraphApiDoc;
