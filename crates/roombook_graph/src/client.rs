// --- File: crates/roombook_graph/src/client.rs ---
use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, Method, RequestBuilder, Response, Url};
use roombook_config::{AppConfig, AutoReleaseConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::{CachingTokenProvider, ClientCredentialsProvider, TokenProvider};
use crate::error::GraphError;
use crate::models::{
    schedule_request, AvailabilityRequest, BookRoomRequest, CheckInResponse, NewEvent,
};

/// Granularity of the availability view returned by `getSchedule`.
pub const AVAILABILITY_INTERVAL_MINUTES: u32 = 15;
/// Half-width of the window searched for a room's current meeting.
pub const ACTIVE_WINDOW_MINUTES: i64 = 15;

const ACTIVE_MEETING_SELECT: &str = "id,subject,categories,start,end,organizer,bodyPreview";

/// Formats a timestamp the way calendarView expects it.
pub fn graph_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Relays room directory and calendar operations to Microsoft Graph.
///
/// Every operation acquires a credential from the token provider first; a
/// failed acquisition fails the operation before Graph is contacted.
pub struct GraphClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
    default_subject: String,
    online_meeting_provider: String,
    check_in_category: String,
}

impl GraphClient {
    pub fn new(
        config: &AppConfig,
        tokens: Arc<dyn TokenProvider>,
        http: Client,
    ) -> Result<Self, GraphError> {
        let base_url = Url::parse(&config.graph.base_url)
            .map_err(|e| GraphError::Config(format!("invalid graph.base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GraphError::Config(format!(
                "graph.base_url cannot carry a path: {}",
                config.graph.base_url
            )));
        }

        let check_in_category = config
            .auto_release
            .as_ref()
            .map(|release| release.check_in_category.clone())
            .unwrap_or_else(|| AutoReleaseConfig::default().check_in_category);

        Ok(Self {
            http,
            base_url,
            tokens,
            default_subject: config.graph.default_subject.clone(),
            online_meeting_provider: config.graph.online_meeting_provider.clone(),
            check_in_category,
        })
    }

    /// Builds the client and its token provider from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        let http = roombook_common::create_client(config.graph.request_timeout_secs, true)?;
        let provider = ClientCredentialsProvider::new(&config.graph, http.clone());
        let tokens: Arc<dyn TokenProvider> = if config.graph.cache_tokens {
            info!("Graph token caching enabled");
            Arc::new(CachingTokenProvider::new(provider))
        } else {
            Arc::new(provider)
        };
        Self::new(config, tokens, http)
    }

    pub fn check_in_category(&self) -> &str {
        &self.check_in_category
    }

    /// Lists every room in the tenant's places directory.
    pub async fn list_rooms(&self) -> Result<Vec<Value>, GraphError> {
        let url = self.endpoint(&["places", "microsoft.graph.room"])?;
        let request = self.authorized(Method::GET, url).await?;
        let body = read_json(self.execute(request).await?).await?;

        match body {
            Value::Object(mut map) => match map.remove("value") {
                Some(Value::Array(rooms)) => {
                    debug!("Graph returned {} rooms", rooms.len());
                    Ok(rooms)
                }
                _ => Err(GraphError::UnexpectedResponse(
                    "room listing has no value array".to_string(),
                )),
            },
            Value::Array(rooms) => Ok(rooms),
            other => Err(GraphError::UnexpectedResponse(format!(
                "room listing is not a collection: {other}"
            ))),
        }
    }

    /// Creates a meeting in the organizer's calendar with the room as a
    /// resource attendee. Identical requests create distinct events.
    pub async fn book_room(&self, booking: &BookRoomRequest) -> Result<Value, GraphError> {
        let url = self.endpoint(&["users", booking.user_email.as_str(), "events"])?;
        let event = NewEvent::for_booking(
            booking,
            &self.default_subject,
            &self.online_meeting_provider,
        );
        let request = self.authorized(Method::POST, url).await?.json(&event);
        let created = read_json(self.execute(request).await?).await?;

        info!(
            "Booked {} for {} from {} to {}",
            booking.room_email, booking.user_email, booking.start, booking.end
        );
        Ok(created)
    }

    /// Free/busy schedule of a room, in the requested timezone.
    pub async fn get_availability(
        &self,
        availability: &AvailabilityRequest,
    ) -> Result<Value, GraphError> {
        let url = self.endpoint(&[
            "users",
            availability.room_email.as_str(),
            "calendar",
            "getSchedule",
        ])?;
        let body = schedule_request(availability, AVAILABILITY_INTERVAL_MINUTES);
        let request = self
            .authorized(Method::POST, url)
            .await?
            .header("Prefer", format!("outlook.timezone=\"{}\"", availability.time_zone))
            .json(&body);
        read_json(self.execute(request).await?).await
    }

    /// Events of a room calendar overlapping `[start, end]`.
    pub async fn calendar_view(
        &self,
        room_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        select: &str,
        top: Option<u32>,
    ) -> Result<Vec<Value>, GraphError> {
        let url = self.endpoint(&["users", room_email, "calendarView"])?;
        let mut query = vec![
            ("startDateTime", graph_time(start)),
            ("endDateTime", graph_time(end)),
            ("$select", select.to_string()),
        ];
        if let Some(top) = top {
            query.push(("$top", top.to_string()));
        }
        let request = self.authorized(Method::GET, url).await?.query(&query);
        let body = read_json(self.execute(request).await?).await?;

        match body {
            Value::Object(mut map) => match map.remove("value") {
                Some(Value::Array(events)) => Ok(events),
                _ => Ok(Vec::new()),
            },
            _ => Err(GraphError::UnexpectedResponse(
                "calendar view is not a collection".to_string(),
            )),
        }
    }

    /// The meeting running in a room around `now`, or JSON `null`.
    pub async fn active_meeting(
        &self,
        room_email: &str,
        now: DateTime<Utc>,
    ) -> Result<Value, GraphError> {
        let window = Duration::minutes(ACTIVE_WINDOW_MINUTES);
        let events = self
            .calendar_view(
                room_email,
                now - window,
                now + window,
                ACTIVE_MEETING_SELECT,
                Some(1),
            )
            .await?;
        Ok(events.into_iter().next().unwrap_or(Value::Null))
    }

    /// Marks an event in the room calendar as checked in.
    pub async fn check_in(
        &self,
        room_email: &str,
        event_id: &str,
    ) -> Result<CheckInResponse, GraphError> {
        let url = self.endpoint(&["users", room_email, "events", event_id])?;
        let body = json!({ "categories": [self.check_in_category] });
        let request = self.authorized(Method::PATCH, url).await?.json(&body);
        self.execute(request).await?;

        info!("Checked in event {} in {}", event_id, room_email);
        Ok(CheckInResponse::checked_in())
    }

    pub async fn delete_event(&self, room_email: &str, event_id: &str) -> Result<(), GraphError> {
        let url = self.endpoint(&["users", room_email, "events", event_id])?;
        let request = self.authorized(Method::DELETE, url).await?;
        self.execute(request).await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GraphError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GraphError::Config(format!("invalid graph.base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, GraphError> {
        let credential = self.tokens.acquire().await?;
        Ok(self
            .http
            .request(method, url)
            .header(header::AUTHORIZATION, credential.bearer()))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, GraphError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();
        warn!("Graph responded with {}: {}", status, body);
        Err(GraphError::Upstream {
            status: status.as_u16(),
            body,
            content_type,
        })
    }
}

/// Parses a success body; an empty body reads as `null`.
async fn read_json(response: Response) -> Result<Value, GraphError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| GraphError::UnexpectedResponse(e.to_string()))
}
