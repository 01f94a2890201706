pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;
pub mod views;

#[cfg(test)]
mod testing;

pub use db::Database;
