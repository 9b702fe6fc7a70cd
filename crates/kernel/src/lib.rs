//! Vitrine catalog kernel.
//!
//! Multilingual catalog of pages, products, categories, tags, images, menus
//! and home pages, served as a read-only JSON API with a JSON admin surface.
//! The `vitrine` binary is the entry point for running the server.

pub mod admin;
pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod menu;
pub mod middleware;
pub mod models;
pub mod representation;
pub mod routes;
pub mod state;
