pub mod auth;
pub mod import;
pub mod problems;
pub mod reviews;
pub mod users;
