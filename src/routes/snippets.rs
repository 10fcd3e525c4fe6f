// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snippet routes: listing (public), save and delete (authenticated).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Post, Snippet, SnippetKind, User};
use crate::routes::MessageResponse;
use crate::services::attachments::{orphaned_in_markdown, AttachmentScope};
use crate::services::permission::require_project_permission;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Snippets per page when `page` is given.
pub const SNIPPETS_PER_PAGE: usize = 10;

/// Public snippet routes.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/snippets", get(list_snippets))
}

/// Snippet routes that require a session.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/snippets",
        axum::routing::post(save_snippet).delete(delete_snippet),
    )
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SnippetsQuery {
    pub project_id: Option<String>,
    /// Case-insensitive text to look for in body or URL
    pub search: Option<String>,
    /// Comma-separated tags; a snippet matches if it has any of them
    pub tags: Option<String>,
    /// Comma-separated author IDs
    pub user_ids: Option<String>,
    /// Comma-separated snippet IDs; replaces all other filters
    pub ids: Option<String>,
    /// 1 = oldest first, -1 = newest first (default)
    pub sort: Option<i32>,
    /// 1-based page of `SNIPPETS_PER_PAGE`; all results if absent
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct SnippetsResponse {
    pub snippets: Vec<Snippet>,
    pub authors: Vec<User>,
    pub posts: Vec<Post>,
    /// Number of snippets matching the filters across all pages
    pub count: usize,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Apply search/tag/author filters and sort by creation time.
fn filter_and_sort(mut snippets: Vec<Snippet>, params: &SnippetsQuery) -> Vec<Snippet> {
    let tags = split_list(params.tags.as_deref());
    let user_ids = split_list(params.user_ids.as_deref());
    let search = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    snippets.retain(|snippet| {
        search.map_or(true, |needle| snippet.matches_search(needle))
            && (tags.is_empty() || snippet.tags.iter().any(|t| tags.contains(t)))
            && (user_ids.is_empty() || user_ids.contains(&snippet.user_id))
    });

    // RFC3339 UTC strings sort chronologically.
    if params.sort == Some(1) {
        snippets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    } else {
        snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    snippets
}

/// Slice out one 1-based page.
fn paginate<T: Clone>(items: &[T], page: u32, per_page: usize) -> Result<Vec<T>> {
    let start = (page as usize)
        .checked_sub(1)
        .and_then(|p| p.checked_mul(per_page))
        .ok_or_else(|| AppError::BadRequest("Page number out of range".to_string()))?;

    if start >= items.len() {
        return Ok(vec![]);
    }
    let end = start.saturating_add(per_page).min(items.len());
    Ok(items[start..end].to_vec())
}

fn unique<'a, I: IntoIterator<Item = &'a String>>(ids: I) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// List snippets of a project, or specific snippets by ID.
async fn list_snippets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SnippetsQuery>,
) -> Result<Json<SnippetsResponse>> {
    let ids = split_list(params.ids.as_deref());
    let project_id = params.project_id.as_deref().filter(|p| !p.is_empty());

    if project_id.is_none() && ids.is_empty() {
        return Err(AppError::NotAcceptable(
            "No project ID or snippet IDs found in request".to_string(),
        ));
    }
    if params.page == Some(0) {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }
    if params.sort.is_some_and(|s| s != 1 && s != -1) {
        return Err(AppError::BadRequest("Sort must be 1 or -1".to_string()));
    }

    tracing::debug!(
        project_id = ?project_id,
        ids = ids.len(),
        page = ?params.page,
        "Listing snippets"
    );

    let matching = if !ids.is_empty() {
        let snippets = state.db.get_snippets_by_ids(&ids).await?;
        let by_ids_only = SnippetsQuery {
            sort: params.sort,
            ..SnippetsQuery::default()
        };
        filter_and_sort(snippets, &by_ids_only)
    } else {
        let project_id = project_id.unwrap_or_default();
        let snippets = state.db.get_snippets_for_project(project_id).await?;
        filter_and_sort(snippets, &params)
    };

    let count = matching.len();
    let snippets = match params.page {
        Some(page) => paginate(&matching, page, SNIPPETS_PER_PAGE)?,
        None => matching,
    };

    let author_ids = unique(snippets.iter().map(|s| &s.user_id));
    let post_ids = unique(snippets.iter().flat_map(|s| s.linked_posts.iter()));

    let (authors, posts) = tokio::try_join!(
        state.db.get_users(&author_ids),
        state.db.get_posts_by_ids(&post_ids),
    )?;

    Ok(Json(SnippetsResponse {
        snippets,
        authors,
        posts,
        count,
    }))
}

// ─── Save ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct SaveSnippetRequest {
    /// Existing snippet to update
    pub id: Option<String>,
    /// Project to create the snippet in
    pub project_id: Option<String>,
    #[validate(length(max = 200))]
    pub url_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: SnippetKind,
    #[validate(length(max = 100000))]
    pub body: Option<String>,
    #[validate(length(max = 2048))]
    pub url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub tags: Vec<String>,
}

impl SaveSnippetRequest {
    /// Check required fields for the snippet kind.
    fn check_required(&self) -> Result<()> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());

        if !present(&self.id) && !present(&self.project_id) {
            return Err(AppError::NotAcceptable(
                "No project or snippet ID found in request".to_string(),
            ));
        }
        if !present(&self.url_name) {
            return Err(AppError::NotAcceptable(
                "No snippet urlName found in request".to_string(),
            ));
        }
        match self.kind {
            SnippetKind::Snippet if !present(&self.body) => Err(AppError::NotAcceptable(
                "No snippet body found in request".to_string(),
            )),
            SnippetKind::Resource if !present(&self.url) => Err(AppError::NotAcceptable(
                "No resource URL found in request".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveSnippetResponse {
    pub message: String,
    pub id: String,
    /// Tags that were added to the project's available tags
    pub new_tags: Vec<String>,
}

/// Create or update a snippet.
async fn save_snippet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SaveSnippetRequest>,
) -> Result<Json<SaveSnippetResponse>> {
    req.validate()?;
    req.check_required()?;

    // Update when we have a snippet id, otherwise create in the given project.
    let existing = match req.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => Some(state.db.get_snippet(id).await?.ok_or_else(|| {
            AppError::NotAcceptable("No snippet found with given ID".to_string())
        })?),
        None => None,
    };

    let project_id = existing
        .as_ref()
        .map(|s| s.project_id.clone())
        .or_else(|| req.project_id.clone())
        .unwrap_or_default();

    let mut project = state
        .db
        .get_project(&project_id)
        .await?
        .ok_or_else(|| AppError::NotAcceptable("No project found with given ID".to_string()))?;

    require_project_permission(&project, &user.user_id)?;

    let url_name = req.url_name.clone().unwrap_or_default();
    let body = req.body.clone().unwrap_or_default();
    let url = req.url.clone().unwrap_or_default();

    // Drop images that are no longer referenced by the body.
    let scope = AttachmentScope::for_save(
        existing
            .as_ref()
            .map(|s| (s.user_id.as_str(), s.url_name.as_str())),
        &user.user_id,
        &url_name,
    );
    let attached = state.db.get_attached_images(&scope).await?;
    let orphans = orphaned_in_markdown(attached, &body);
    state.db.delete_images(&orphans).await?;

    let now = format_utc_rfc3339(chrono::Utc::now());

    let new_tags = project.merge_tags(&req.tags);
    if !new_tags.is_empty() {
        project.updated_at = now.clone();
        state.db.upsert_project(&project).await?;
    }

    let snippet = match existing {
        Some(mut snippet) => {
            snippet.body = body;
            snippet.url = url;
            snippet.tags = req.tags;
            snippet
        }
        None => Snippet {
            id: uuid::Uuid::new_v4().to_string(),
            url_name,
            project_id: project.id.clone(),
            user_id: user.user_id.clone(),
            kind: req.kind,
            body,
            url,
            tags: req.tags,
            likes: vec![],
            linked_posts: vec![],
            created_at: now,
        },
    };

    state.db.upsert_snippet(&snippet).await?;

    tracing::info!(
        snippet_id = %snippet.id,
        project_id = %project.id,
        user_id = %user.user_id,
        orphaned_images = orphans.len(),
        new_tags = new_tags.len(),
        "Snippet saved"
    );

    Ok(Json(SaveSnippetResponse {
        message: "Snippet successfully saved.".to_string(),
        id: snippet.id,
        new_tags,
    }))
}

// ─── Delete ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteSnippetRequest {
    #[serde(default)]
    pub id: String,
}

/// Delete a snippet and its attached images.
async fn delete_snippet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<DeleteSnippetRequest>,
) -> Result<Json<MessageResponse>> {
    if req.id.is_empty() {
        return Err(AppError::NotAcceptable(
            "No snippet ID found in request".to_string(),
        ));
    }

    let snippet = state
        .db
        .get_snippet(&req.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No snippet found at given ID".to_string()))?;

    let project = state
        .db
        .get_project(&snippet.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet's project no longer exists".to_string()))?;

    require_project_permission(&project, &user.user_id)?;

    let scope = AttachmentScope::stored(&snippet.user_id, &snippet.url_name);
    let attached = state.db.get_attached_images(&scope).await?;
    state.db.delete_images(&attached).await?;
    state.db.delete_snippet(&snippet.id).await?;

    tracing::info!(
        snippet_id = %snippet.id,
        project_id = %project.id,
        user_id = %user.user_id,
        "Snippet deleted"
    );

    Ok(Json(MessageResponse {
        message: "Snippet successfully deleted.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: &str, user: &str, created_at: &str, tags: &[&str], body: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            url_name: format!("{id}-slug"),
            project_id: "p1".to_string(),
            user_id: user.to_string(),
            kind: SnippetKind::Snippet,
            body: body.to_string(),
            url: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            likes: vec![],
            linked_posts: vec![],
            created_at: created_at.to_string(),
        }
    }

    fn ids(snippets: &[Snippet]) -> Vec<&str> {
        snippets.iter().map(|s| s.id.as_str()).collect()
    }

    fn sample() -> Vec<Snippet> {
        vec![
            snippet("a", "u1", "2024-01-01T00:00:00Z", &["rust"], "Ownership notes"),
            snippet("b", "u2", "2024-01-03T00:00:00Z", &["web"], "Axum routing"),
            snippet("c", "u1", "2024-01-02T00:00:00Z", &["rust", "web"], "tower layers"),
        ]
    }

    #[test]
    fn test_default_sort_newest_first() {
        let out = filter_and_sort(sample(), &SnippetsQuery::default());
        assert_eq!(ids(&out), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ascending_sort() {
        let params = SnippetsQuery {
            sort: Some(1),
            ..SnippetsQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(sample(), &params)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_filters_combine() {
        let params = SnippetsQuery {
            tags: Some("rust".to_string()),
            user_ids: Some("u1".to_string()),
            search: Some("TOWER".to_string()),
            ..SnippetsQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(sample(), &params)), vec!["c"]);
    }

    #[test]
    fn test_tags_match_any() {
        let params = SnippetsQuery {
            tags: Some("web, rust".to_string()),
            ..SnippetsQuery::default()
        };
        assert_eq!(filter_and_sort(sample(), &params).len(), 3);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(paginate(&items, 1, 10).unwrap(), (0..10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3, 10).unwrap(), (20..25).collect::<Vec<_>>());
        assert!(paginate(&items, 4, 10).unwrap().is_empty());
        assert!(paginate(&items, 0, 10).is_err());
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let values = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(unique(&values), vec!["b", "a"]);
    }

    #[test]
    fn test_required_fields() {
        let req = |json: &str| serde_json::from_str::<SaveSnippetRequest>(json).unwrap();

        assert!(matches!(
            req(r#"{"url_name": "x", "body": "b"}"#).check_required(),
            Err(AppError::NotAcceptable(_))
        ));
        assert!(matches!(
            req(r#"{"project_id": "p1", "body": "b"}"#).check_required(),
            Err(AppError::NotAcceptable(_))
        ));
        assert!(matches!(
            req(r#"{"project_id": "p1", "url_name": "x"}"#).check_required(),
            Err(AppError::NotAcceptable(_))
        ));
        assert!(matches!(
            req(r#"{"project_id": "p1", "url_name": "x", "type": "resource", "body": "b"}"#)
                .check_required(),
            Err(AppError::NotAcceptable(_))
        ));
        assert!(req(r#"{"project_id": "p1", "url_name": "x", "type": "resource", "url": "https://a"}"#)
            .check_required()
            .is_ok());
        assert!(req(r#"{"id": "s1", "url_name": "x", "body": "b", "tags": ["t"]}"#)
            .check_required()
            .is_ok());
    }
}
