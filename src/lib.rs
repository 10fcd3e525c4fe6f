// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Updately: activity statistics backend for projects, snippets and posts
//!
//! This crate provides the API that turns timestamped posts and snippets into
//! calendar heatmaps, trailing graphs and weekly rollups, and guards writes
//! to project content behind owner/collaborator permission checks.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
