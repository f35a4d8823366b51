mod audit_logs_test;
mod auth_test;
mod courses_test;
mod grades_test;
mod health_test;
mod reservations_test;
mod students_test;
mod subjects_test;
mod users_test;
