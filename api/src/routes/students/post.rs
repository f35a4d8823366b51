use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;
use services::student_service::{CreateStudent, StudentService};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::routes::common::{bad_request, error_response, respond, service_context};

/// POST /students
///
/// ### Request Body
/// ```json
/// {
///   "student_number": "2024-0001",
///   "first_name": "Ana",
///   "middle_name": null,
///   "last_name": "Reyes",
///   "email": "ana.reyes@school.edu",
///   "birth_date": "2005-03-14",
///   "course_id": 1
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the student and their course
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` when the course does not exist
/// - `409 Conflict` when the student number or email is taken
pub async fn create_student(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateStudent>,
) -> Response {
    let ctx = service_context(&state, &claims);
    match StudentService::create(state.db(), &ctx, req).await {
        Ok(student) => respond(StatusCode::CREATED, student, "Student created successfully"),
        Err(e) => error_response(e, "Failed to create student"),
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateStudentsRequest {
    pub students: Vec<CreateStudent>,
}

/// POST /students/bulk
///
/// Creates each row independently. Rows that fail are reported by index and do
/// not stop the others.
///
/// ### Response
/// - `200 OK` with `{ created: [...], failures: [{ index, student_number, message }] }`
/// - `400 Bad Request` when `students` is empty
pub async fn bulk_create_students(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkCreateStudentsRequest>,
) -> Response {
    if req.students.is_empty() {
        return bad_request("Request must include at least one student");
    }

    let ctx = service_context(&state, &claims);
    match StudentService::bulk_create(state.db(), &ctx, req.students).await {
        Ok(result) => {
            let message = format!(
                "Created {} student(s), {} failed",
                result.created.len(),
                result.failures.len()
            );
            respond(StatusCode::OK, result, &message)
        }
        Err(e) => error_response(e, "Failed to create students"),
    }
}
