pub(crate) mod catalog;
pub(crate) mod share_links;
pub(crate) mod student_directory;
pub(crate) mod uploads;
pub(crate) mod visibility;
