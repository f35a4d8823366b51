pub mod m202601100001_create_users;
pub mod m202601100002_create_courses;
pub mod m202601100003_create_subjects;
pub mod m202601100004_create_students;
pub mod m202601100005_create_subject_reservations;
pub mod m202601100006_create_grades;
pub mod m202601100007_create_audit_logs;
