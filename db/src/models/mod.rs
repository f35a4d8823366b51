pub mod audit_log;
pub mod course;
pub mod grade;
pub mod student;
pub mod subject;
pub mod subject_reservation;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use course::Entity as Course;
pub use grade::Entity as Grade;
pub use student::Entity as Student;
pub use subject::Entity as Subject;
pub use subject_reservation::Entity as SubjectReservation;
pub use user::Entity as User;
