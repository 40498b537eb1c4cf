use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        events::{create_event, delete_event, get_event, list_events, update_event},
        health::livez,
        requests::{accept_request, list_requests, reject_request},
        schedules::{
            check_availability, create_schedule, delete_schedule, get_schedule,
            list_schedule_events, update_schedule,
        },
        users::{create_user, get_user, list_user_events, list_user_schedules},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // User routes
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/events", get(list_user_events))
        .route("/users/{id}/schedules", get(list_user_schedules))
        // Schedule routes
        .route("/schedules", post(create_schedule))
        .route(
            "/schedules/{id}",
            get(get_schedule)
                .put(update_schedule)
                .delete(delete_schedule),
        )
        .route("/schedules/{id}/events", get(list_schedule_events))
        .route("/schedules/{id}/availability", get(check_availability))
        // Event routes
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        // Sharing request routes
        .route("/requests", get(list_requests))
        .route("/requests/accept", post(accept_request))
        .route("/requests/reject", post(reject_request))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
