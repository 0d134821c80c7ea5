// --- File: crates/roombook_graph/src/models.rs ---
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Timezone attached to booking start/end values.
pub const BOOKING_TIME_ZONE: &str = "UTC";

/// Body of `POST /book`. Fields are passed through without validation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookRoomRequest {
    /// Organizer whose calendar receives the event.
    #[serde(alias = "user_email", alias = "organizer_email")]
    pub user_email: String,
    #[serde(alias = "room_email")]
    pub room_email: String,
    /// ISO-8601 timestamp such as `2024-01-01T10:00:00Z`, sent as-is with a UTC zone.
    #[serde(alias = "start_time")]
    pub start: String,
    #[serde(alias = "end_time")]
    pub end: String,
    #[serde(default)]
    pub subject: Option<String>,
    /// HTML body of the invitation.
    #[serde(default)]
    pub description: Option<String>,
    /// Additional required attendees.
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl BookRoomRequest {
    pub fn new(
        user_email: impl Into<String>,
        room_email: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            room_email: room_email.into(),
            start: start.into(),
            end: end.into(),
            subject: None,
            description: None,
            attendees: Vec::new(),
        }
    }
}

/// Body of `POST /availability`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    #[serde(alias = "room_email")]
    pub room_email: String,
    #[serde(alias = "start_time")]
    pub start: String,
    #[serde(alias = "end_time")]
    pub end: String,
    #[serde(default = "default_time_zone", alias = "time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    BOOKING_TIME_ZONE.to_string()
}

/// Query of `GET /active-meeting`.
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize, Clone)]
pub struct ActiveMeetingQuery {
    #[serde(alias = "roomEmail")]
    pub room_email: String,
}

/// Body of `POST /checkin`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(alias = "room_email")]
    pub room_email: String,
    #[serde(alias = "event_id")]
    pub event_id: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CheckInResponse {
    pub status: String,
}

impl CheckInResponse {
    pub fn checked_in() -> Self {
        Self {
            status: "checked-in".to_string(),
        }
    }
}

/// Event as sent to `POST /users/{organizer}/events`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent<'a> {
    pub subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody<'a>>,
    pub start: DateTimeTimeZone<'a>,
    pub end: DateTimeTimeZone<'a>,
    pub attendees: Vec<Attendee<'a>>,
    pub is_online_meeting: bool,
    pub online_meeting_provider: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody<'a> {
    pub content_type: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone<'a> {
    pub date_time: &'a str,
    pub time_zone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee<'a> {
    pub email_address: EmailAddress<'a>,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmailAddress<'a> {
    pub address: &'a str,
}

impl<'a> NewEvent<'a> {
    /// Builds the event for a booking. The room is always the first attendee,
    /// as a resource.
    pub fn for_booking(
        request: &'a BookRoomRequest,
        default_subject: &'a str,
        online_meeting_provider: &'a str,
    ) -> Self {
        let mut attendees = vec![Attendee {
            email_address: EmailAddress {
                address: &request.room_email,
            },
            kind: "resource",
        }];
        attendees.extend(
            request
                .attendees
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(|address| Attendee {
                    email_address: EmailAddress { address },
                    kind: "required",
                }),
        );

        Self {
            subject: request.subject.as_deref().unwrap_or(default_subject),
            body: request.description.as_deref().map(|content| ItemBody {
                content_type: "HTML",
                content,
            }),
            start: DateTimeTimeZone {
                date_time: &request.start,
                time_zone: BOOKING_TIME_ZONE,
            },
            end: DateTimeTimeZone {
                date_time: &request.end,
                time_zone: BOOKING_TIME_ZONE,
            },
            attendees,
            is_online_meeting: true,
            online_meeting_provider,
        }
    }
}

/// `getSchedule` request body for a single room.
pub fn schedule_request(request: &AvailabilityRequest, interval_minutes: u32) -> Value {
    json!({
        "schedules": [request.room_email],
        "startTime": { "dateTime": request.start, "timeZone": request.time_zone },
        "endTime": { "dateTime": request.end, "timeZone": request.time_zone },
        "availabilityViewInterval": interval_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_event_shape() {
        let request = BookRoomRequest::new(
            "alice@x.com",
            "room1@x.com",
            "2024-01-01T10:00:00Z",
            "2024-01-01T11:00:00Z",
        );
        let event = serde_json::to_value(NewEvent::for_booking(
            &request,
            "Room reservation",
            "teamsForBusiness",
        ))
        .unwrap();

        assert_eq!(
            event,
            json!({
                "subject": "Room reservation",
                "start": { "dateTime": "2024-01-01T10:00:00Z", "timeZone": "UTC" },
                "end": { "dateTime": "2024-01-01T11:00:00Z", "timeZone": "UTC" },
                "attendees": [
                    { "emailAddress": { "address": "room1@x.com" }, "type": "resource" }
                ],
                "isOnlineMeeting": true,
                "onlineMeetingProvider": "teamsForBusiness"
            })
        );
    }

    #[test]
    fn test_booking_optional_fields() {
        let mut request = BookRoomRequest::new("a@x.com", "r@x.com", "s", "e");
        request.subject = Some("Planning".to_string());
        request.description = Some("<p>Agenda</p>".to_string());
        request.attendees = vec!["bob@x.com".to_string(), "  ".to_string()];

        let event =
            serde_json::to_value(NewEvent::for_booking(&request, "unused", "teamsForBusiness"))
                .unwrap();

        assert_eq!(event["subject"], "Planning");
        assert_eq!(event["body"]["content"], "<p>Agenda</p>");
        assert_eq!(event["attendees"].as_array().unwrap().len(), 2);
        assert_eq!(event["attendees"][1]["type"], "required");
        assert_eq!(event["attendees"][1]["emailAddress"]["address"], "bob@x.com");
    }

    #[test]
    fn test_requests_accept_snake_case_aliases() {
        let availability: AvailabilityRequest = serde_json::from_value(json!({
            "room_email": "r@x.com",
            "start_time": "2024-01-01T08:00:00",
            "end_time": "2024-01-01T18:00:00"
        }))
        .unwrap();
        assert_eq!(availability.time_zone, "UTC");

        let booking: BookRoomRequest = serde_json::from_value(json!({
            "organizer_email": "alice@x.com",
            "room_email": "room1@x.com",
            "start_time": "2024-01-01T10:00:00Z",
            "end_time": "2024-01-01T11:00:00Z"
        }))
        .unwrap();
        assert_eq!(booking.user_email, "alice@x.com");
        assert_eq!(booking.room_email, "room1@x.com");
        assert_eq!(booking.start, "2024-01-01T10:00:00Z");
        assert_eq!(booking.end, "2024-01-01T11:00:00Z");

        let check_in: CheckInRequest =
            serde_json::from_value(json!({ "roomEmail": "r@x.com", "eventId": "AAMk" })).unwrap();
        assert_eq!(check_in.event_id, "AAMk");
    }
}
