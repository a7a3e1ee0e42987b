pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod content;
pub(crate) mod dashboards;
pub(crate) mod errors;
pub(crate) mod flash;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod items;
pub(crate) mod profiles;
pub(crate) mod router;
