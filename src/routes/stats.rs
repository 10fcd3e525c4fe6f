// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity statistics for profile and project dashboards.

use crate::config::MAX_GRAPH_DAYS;
use crate::db::firestore::MAX_CONCURRENT_DB_OPS;
use crate::error::{AppError, Result};
use crate::models::{DateFrequencyMap, Project, WeeklyBucket};
use crate::services::activity::{bucket_by_day, local_today, window_ending, window_labels};
use crate::services::rollup::{ParentRef, RelatedCollection};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stats routes (public, like the profile pages they feed).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats/projects/{project_id}", get(get_project_stats))
        .route("/api/stats/users/{username}", get(get_user_stats))
}

/// Weekly counts over the trailing five weeks.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyActivity {
    pub posts: Vec<WeeklyBucket>,
    pub snippets: Vec<WeeklyBucket>,
}

// ─── Project Stats ───────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectStatsResponse {
    pub project_id: String,
    pub posts: usize,
    pub snippets: usize,
    /// Snippets linked into at least one post
    pub linked_snippets: usize,
    pub weekly: WeeklyActivity,
    /// Week numbering convention of `weekly` ("sunday" or "iso")
    pub week_numbering: String,
}

async fn weekly_activity(
    state: &AppState,
    parent: &ParentRef,
    now: DateTime<Utc>,
) -> Result<WeeklyActivity> {
    let numbering = state.config.week_numbering;
    let (posts, snippets) = tokio::try_join!(
        state
            .db
            .weekly_rollup(parent, RelatedCollection::Posts, now, numbering),
        state
            .db
            .weekly_rollup(parent, RelatedCollection::Snippets, now, numbering),
    )?;
    Ok(WeeklyActivity { posts, snippets })
}

/// Counts and weekly rollups for one project.
async fn get_project_stats(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectStatsResponse>> {
    let project = state
        .db
        .get_project(&project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;

    let parent = ParentRef::Project(project.id.clone());
    let now = Utc::now();

    tracing::debug!(project_id = %project.id, "Fetching project stats");

    let (posts, snippets, linked_snippets, weekly) = tokio::try_join!(
        state
            .db
            .get_activity_records(&parent, RelatedCollection::Posts, None),
        state
            .db
            .get_activity_records(&parent, RelatedCollection::Snippets, None),
        state.db.count_linked_snippets(&parent),
        weekly_activity(&state, &parent, now),
    )?;

    Ok(Json(ProjectStatsResponse {
        project_id: project.id,
        posts: posts.len(),
        snippets: snippets.len(),
        linked_snippets,
        weekly,
        week_numbering: state.config.week_numbering.to_string(),
    }))
}

// ─── User Stats ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserStatsQuery {
    /// Length of the daily graph; defaults to the configured value
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityCounts {
    pub posts: usize,
    pub snippets: usize,
    pub linked_snippets: usize,
    /// Share of snippets linked into posts, rounded to a whole percent
    pub percent_linked: u32,
}

/// Per-day counts for the calendar heatmap.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyActivity {
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub posts: DateFrequencyMap,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub snippets: DateFrequencyMap,
}

/// Trailing daily series for the trend-line chart.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityGraph {
    /// `M/d` label per entry
    pub labels: Vec<String>,
    pub posts: Vec<u32>,
    pub snippets: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectActivity {
    pub project_id: String,
    pub name: String,
    pub url_name: String,
    pub weekly: WeeklyActivity,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatsResponse {
    pub user_id: String,
    pub username: String,
    pub counts: ActivityCounts,
    pub daily: DailyActivity,
    pub graph: ActivityGraph,
    pub projects: Vec<ProjectActivity>,
    pub week_numbering: String,
}

fn percent_linked(linked: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((linked as f64 / total as f64) * 100.0).round() as u32
}

/// Run `f` over `items` with at most `limit` in flight, keeping input order.
async fn bounded_in_order<I, T, F, Fut>(items: I, limit: usize, f: F) -> Result<Vec<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .collect::<Vec<Result<T>>>()
        .await
        .into_iter()
        .collect()
}

async fn project_activity(
    state: &AppState,
    project: Project,
    now: DateTime<Utc>,
) -> Result<ProjectActivity> {
    let parent = ParentRef::Project(project.id.clone());
    let weekly = weekly_activity(state, &parent, now).await?;
    Ok(ProjectActivity {
        project_id: project.id,
        name: project.name,
        url_name: project.url_name,
        weekly,
    })
}

/// Profile statistics: counts, daily heatmap, trailing graph and per-project rollups.
async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(params): Query<UserStatsQuery>,
) -> Result<Json<UserStatsResponse>> {
    let days = params.days.unwrap_or(state.config.graph_days);
    if days > MAX_GRAPH_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be at most {}",
            MAX_GRAPH_DAYS
        )));
    }

    let user = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;

    tracing::debug!(user_id = %user.id, days, "Fetching user stats");

    let parent = ParentRef::User(user.id.clone());
    let (post_records, snippet_records, linked_snippets, projects) = tokio::try_join!(
        state
            .db
            .get_activity_records(&parent, RelatedCollection::Posts, None),
        state
            .db
            .get_activity_records(&parent, RelatedCollection::Snippets, None),
        state.db.count_linked_snippets(&parent),
        state.db.get_projects_for_user(&user.id),
    )?;

    // One snapshot of "now" so every series shares the same window.
    let now = Utc::now();
    let today = local_today();

    let daily = DailyActivity {
        posts: bucket_by_day(&post_records, &chrono::Local),
        snippets: bucket_by_day(&snippet_records, &chrono::Local),
    };
    let graph = ActivityGraph {
        labels: window_labels(days, today),
        posts: window_ending(&daily.posts, days, today),
        snippets: window_ending(&daily.snippets, days, today),
    };

    // Each project runs two rollup queries.
    let projects = bounded_in_order(projects, MAX_CONCURRENT_DB_OPS / 2, |project| {
        project_activity(&state, project, now)
    })
    .await?;

    Ok(Json(UserStatsResponse {
        user_id: user.id,
        username: user.username,
        counts: ActivityCounts {
            posts: post_records.len(),
            snippets: snippet_records.len(),
            linked_snippets,
            percent_linked: percent_linked(linked_snippets, snippet_records.len()),
        },
        daily,
        graph,
        projects,
        week_numbering: state.config.week_numbering.to_string(),
    }))
}
