mod read;
mod types;
mod write;

use super::PostgresRepositories;
