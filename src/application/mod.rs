//! Application services layer.

pub mod admin;
pub mod auth;
pub mod blog;
pub mod error;
pub mod repos;
pub mod search;
pub mod uploads;
