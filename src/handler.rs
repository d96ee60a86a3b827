pub mod admin;
pub mod auth;
pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod reply;
pub mod report;
pub mod saved;
pub mod users;
