use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::{delete_enrollment, list_enrollments, list_students},
        auth::{login, profile},
        courses::{
            course_students, create_course, delete_course, get_course, list_courses,
            remove_student, update_course,
        },
        enrollments::{enroll_student, student_enrollments, unenroll_student},
        health::{cache_stats, health, livez},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        // Auth routes
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        // Course routes
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{id}/students", get(course_students))
        .route("/courses/{id}/students/{email}", delete(remove_student))
        // Enrollment routes
        .route("/enrollments", post(enroll_student))
        .route("/students/{email}/enrollments", get(student_enrollments))
        .route(
            "/students/{email}/enrollments/{course_id}",
            delete(unenroll_student),
        )
        // Admin routes
        .route("/admin/students", get(list_students))
        .route("/admin/enrollments", get(list_enrollments))
        .route("/admin/enrollments/{id}", delete(delete_enrollment))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/health", get(health))
        .route("/cache/stats", get(cache_stats))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
