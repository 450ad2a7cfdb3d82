pub mod categories;
pub mod dashboard;
pub mod posts;
pub mod tags;
