// File: services/roombook_backend/src/app.rs
use axum::{routing::get, Router};
use http::HeaderValue;
use roombook_config::{AppConfig, CorsConfig};
use roombook_graph::{routes as graph_routes, GraphState};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const WELCOME: &str = "Welcome to the Room Booking API!";

/// Builds the CORS layer. A "*" entry allows every origin.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Assembles the full application router.
pub fn build_app(config: &AppConfig, graph_state: Arc<GraphState>) -> Router {
    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .route("/", get(|| async { WELCOME }))
        .merge(graph_routes(graph_state));

    #[cfg(feature = "openapi")]
    {
        use roombook_graph::doc::GraphApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Room Booking API",
                version = "0.1.0",
                description = "Room directory and reservations backed by Microsoft Graph",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags( (name = "Rooms", description = "Room directory and booking")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(GraphApiDoc::openapi());
        info!("Adding Swagger UI at /docs");

        let swagger_ui = SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    if config.cors.allows_any_origin() {
        info!("CORS allows any origin");
    }

    app.layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}
