pub mod attendance;
pub mod auth;
pub mod batches;
pub mod classes;
pub mod classrooms;
pub mod curricula;
pub mod notifications;
pub mod parents;
pub mod rfid;
pub mod schedules;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use batches::configure_batches_routes;
pub use classes::configure_classes_routes;
pub use classrooms::configure_classrooms_routes;
pub use curricula::configure_curricula_routes;
pub use notifications::configure_notifications_routes;
pub use parents::configure_parents_routes;
pub use rfid::configure_rfid_routes;
pub use schedules::configure_schedules_routes;
pub use semesters::configure_semesters_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teachers_routes;
pub use users::configure_user_routes;
