pub mod auth;
pub mod db;
pub mod error;
pub mod http;
pub mod media;
pub mod telemetry;
