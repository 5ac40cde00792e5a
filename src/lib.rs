//! Sheet store server library.
//!
//! Accepts Excel uploads, stores each original file next to its parsed rows
//! in PostgreSQL, and serves both back by id or by uploader.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
