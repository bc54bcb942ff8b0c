pub mod api;
pub mod common;
pub mod config;
pub mod data;
pub mod model;
pub mod server;
pub mod web;
