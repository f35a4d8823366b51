use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use services::course_service::{CourseQuery, CourseService};
use util::state::AppState;

use crate::routes::common::{error_response, respond};

/// GET /courses
///
/// ### Query Parameters
/// - `search` (optional): matches code or name
/// - `page`, `per_page` (optional)
pub async fn list_courses(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> Response {
    match CourseService::list(state.db(), &query).await {
        Ok(page) => respond(StatusCode::OK, page, "Courses retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve courses"),
    }
}

/// GET /courses/{course_id}
pub async fn get_course(State(state): State<AppState>, Path(course_id): Path<i64>) -> Response {
    match CourseService::get(state.db(), course_id).await {
        Ok(course) => respond(StatusCode::OK, course, "Course retrieved successfully"),
        Err(e) => error_response(e, "Failed to retrieve course"),
    }
}
