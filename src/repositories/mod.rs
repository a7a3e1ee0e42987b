pub(crate) mod auth_sessions;
pub(crate) mod health;
pub(crate) mod live_classes;
pub(crate) mod materials;
pub(crate) mod student_profiles;
pub(crate) mod teacher_profiles;
pub(crate) mod users;
pub(crate) mod videos;
