//! Job board backend: credential login with role checks, keyword-ranked
//! job search and recommendations over a SQLite store, served by Rocket.

pub mod account_cli;
pub mod auth;
pub mod config;
pub mod database;
pub mod search;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use web::{build_rocket, start_web_server};
