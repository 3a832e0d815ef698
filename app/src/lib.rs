//! Todo service: Todos with nested Items over a JSON HTTP API

pub mod controllers;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod requests;
pub mod routes;
pub mod services;
pub mod state;
