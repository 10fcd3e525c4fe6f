// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and projects (profiles, ownership, collaborators)
//! - Snippets and posts (content documents)
//! - Images (attachment metadata)
//! - Activity queries feeding the statistics endpoints

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ActivityRecord, Image, Post, Project, Snippet, User, WeeklyBucket};
use crate::services::attachments::AttachmentScope;
use crate::services::rollup::{self, ParentRef, RelatedCollection, WeekNumbering};
use crate::time_utils::query_lower_bound;
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};

pub const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by their unique username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("username").eq(username.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Get several users by ID. Missing users are left out.
    pub async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        let users = stream::iter(user_ids.iter().map(|id| self.get_user(id)).collect::<Vec<_>>())
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<User>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<User>>, AppError>>()?;

        Ok(users.into_iter().flatten().collect())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Project Operations ──────────────────────────────────────

    /// Get a project by ID.
    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROJECTS)
            .obj()
            .one(project_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all projects owned by a user.
    pub async fn get_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PROJECTS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([("updated_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a project.
    pub async fn upsert_project(&self, project: &Project) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROJECTS)
            .document_id(&project.id)
            .object(project)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a project together with all of its snippets.
    ///
    /// Returns the number of snippets deleted.
    pub async fn delete_project(&self, project_id: &str) -> Result<usize, AppError> {
        let snippets = self.get_snippets_for_project(project_id).await?;
        let count = snippets.len();

        self.batch_delete(&snippets, collections::SNIPPETS, |snippet: &Snippet| {
            snippet.id.clone()
        })
        .await?;
        tracing::debug!(project_id, count, "Deleted project snippets");

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PROJECTS)
            .document_id(project_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(project_id, snippets = count, "Project deleted");
        Ok(count)
    }

    // ─── Snippet Operations ──────────────────────────────────────

    /// Get a snippet by ID.
    pub async fn get_snippet(&self, snippet_id: &str) -> Result<Option<Snippet>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SNIPPETS)
            .obj()
            .one(snippet_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get several snippets by ID. Missing snippets are left out.
    pub async fn get_snippets_by_ids(&self, ids: &[String]) -> Result<Vec<Snippet>, AppError> {
        let snippets = stream::iter(ids.iter().map(|id| self.get_snippet(id)).collect::<Vec<_>>())
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<Snippet>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<Snippet>>, AppError>>()?;

        Ok(snippets.into_iter().flatten().collect())
    }

    /// Get all snippets in a project.
    pub async fn get_snippets_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<Snippet>, AppError> {
        let project_id = project_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SNIPPETS)
            .filter(move |q| q.field("project_id").eq(project_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a snippet.
    pub async fn upsert_snippet(&self, snippet: &Snippet) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SNIPPETS)
            .document_id(&snippet.id)
            .object(snippet)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a snippet.
    pub async fn delete_snippet(&self, snippet_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SNIPPETS)
            .document_id(snippet_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Post Operations ─────────────────────────────────────────

    /// Get a post by ID.
    pub async fn get_post(&self, post_id: &str) -> Result<Option<Post>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::POSTS)
            .obj()
            .one(post_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get several posts by ID. Missing posts are left out.
    pub async fn get_posts_by_ids(&self, ids: &[String]) -> Result<Vec<Post>, AppError> {
        let posts = stream::iter(ids.iter().map(|id| self.get_post(id)).collect::<Vec<_>>())
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<Post>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<Post>>, AppError>>()?;

        Ok(posts.into_iter().flatten().collect())
    }

    /// Create or update a post.
    pub async fn upsert_post(&self, post: &Post) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::POSTS)
            .document_id(&post.id)
            .object(post)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Image Operations ────────────────────────────────────────

    /// Get the images one user uploaded for a snippet or post slug.
    pub async fn get_attached_images(
        &self,
        scope: &AttachmentScope,
    ) -> Result<Vec<Image>, AppError> {
        let user_id = scope.user_id.clone();
        let url_name = scope.url_name.clone();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::IMAGES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("attached_url_name").eq(url_name.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record an uploaded image.
    pub async fn upsert_image(&self, image: &Image) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::IMAGES)
            .document_id(&image.id)
            .object(image)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete image attachment records.
    ///
    /// The blobs are removed by the storage provider's lifecycle rules;
    /// the keys are logged so they can be traced.
    pub async fn delete_images(&self, images: &[Image]) -> Result<(), AppError> {
        if images.is_empty() {
            return Ok(());
        }

        self.batch_delete(images, collections::IMAGES, |image: &Image| {
            image.id.clone()
        })
        .await?;

        let keys: Vec<&str> = images.iter().map(|i| i.key.as_str()).collect();
        tracing::info!(count = images.len(), keys = ?keys, "Deleted orphaned images");
        Ok(())
    }

    // ─── Activity Queries ────────────────────────────────────────

    /// Get `{id, created_at}` for every post or snippet under `parent`,
    /// optionally only those created at or after `since`.
    ///
    /// The `since` filter is applied to the second; records from earlier in
    /// that second may be returned.
    pub async fn get_activity_records(
        &self,
        parent: &ParentRef,
        collection: RelatedCollection,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let field = parent.field(collection);
        let is_array = parent.field_is_array(collection);
        let parent_id = parent.id().to_string();
        let since = since.map(query_lower_bound);

        self.get_client()?
            .fluent()
            .select()
            .from(collection.collection_name())
            .filter(move |q| {
                let parent_filter = if is_array {
                    q.field(field).array_contains(parent_id.clone())
                } else {
                    q.field(field).eq(parent_id.clone())
                };
                let since_filter = since
                    .as_ref()
                    .and_then(|s| q.field("created_at").greater_than_or_equal(s.clone()));

                q.for_all([parent_filter, since_filter])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Weekly counts of posts or snippets under `parent` for the trailing
    /// five weeks ending at `now`.
    pub async fn weekly_rollup(
        &self,
        parent: &ParentRef,
        collection: RelatedCollection,
        now: DateTime<Utc>,
        numbering: WeekNumbering,
    ) -> Result<Vec<WeeklyBucket>, AppError> {
        let records = self
            .get_activity_records(parent, collection, Some(rollup::window_start(now)))
            .await?;

        tracing::debug!(
            parent = parent.id(),
            collection = collection.collection_name(),
            records = records.len(),
            "Rolling up weekly activity"
        );

        Ok(rollup::rollup_by_week(&records, now, numbering))
    }

    /// Number of snippets under `parent` that are linked into at least one post.
    pub async fn count_linked_snippets(&self, parent: &ParentRef) -> Result<usize, AppError> {
        let field = parent.field(RelatedCollection::Snippets);
        let parent_id = parent.id().to_string();

        let snippets: Vec<Snippet> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::SNIPPETS)
            .filter(move |q| q.field(field).eq(parent_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(snippets.iter().filter(|s| s.is_linked()).count())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_client_reports_database_error() {
        let db = FirestoreDb::new_mock();

        let err = db.get_project("p1").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let parent = ParentRef::Project("p1".to_string());
        let err = db
            .weekly_rollup(
                &parent,
                RelatedCollection::Snippets,
                Utc::now(),
                WeekNumbering::Sunday,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_offline_delete_images_noop_when_empty() {
        let db = FirestoreDb::new_mock();
        assert!(db.delete_images(&[]).await.is_ok());
    }
}
