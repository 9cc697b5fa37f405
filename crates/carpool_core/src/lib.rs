pub mod assignment;
pub mod config;
pub mod context;
pub mod engine;
pub mod geo;
pub mod matching;
pub mod people;
pub mod providers;
pub mod result;
pub mod route;
pub mod schedule;
pub mod test_helpers;
