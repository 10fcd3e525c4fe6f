//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROJECTS: &str = "projects";
    pub const SNIPPETS: &str = "snippets";
    pub const POSTS: &str = "posts";
    /// Uploaded image attachments (metadata only)
    pub const IMAGES: &str = "images";
}
