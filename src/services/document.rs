// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Link and image extraction from rich-text document trees.

use crate::models::document::{IMAGE_NODE, LINK_NODE};
use crate::models::DocumentNode;
use serde::Serialize;

/// Upper bound on nodes visited in one document.
pub const MAX_DOCUMENT_NODES: usize = 100_000;

/// URLs found in a document, in depth-first pre-order.
///
/// Duplicates are kept; callers treat each list as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedUrls {
    pub links: Vec<String>,
    pub images: Vec<String>,
}

/// Errors from document traversal.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document has more than {0} nodes")]
    TooManyNodes(usize),
}

/// Walk the whole forest collecting link and image URLs.
///
/// Nodes without a `type`, `url` or `children` simply contribute nothing.
/// Uses an explicit stack, so nesting depth is bounded only by the node limit.
pub fn extract_urls(nodes: &[DocumentNode]) -> Result<ExtractedUrls, DocumentError> {
    let mut found = ExtractedUrls::default();
    let mut stack: Vec<&DocumentNode> = nodes.iter().rev().collect();
    let mut visited = 0usize;

    while let Some(node) = stack.pop() {
        visited += 1;
        if visited > MAX_DOCUMENT_NODES {
            return Err(DocumentError::TooManyNodes(MAX_DOCUMENT_NODES));
        }

        if let Some(url) = node.url.as_deref() {
            if node.is_type(LINK_NODE) {
                found.links.push(url.to_string());
            } else if node.is_type(IMAGE_NODE) {
                found.images.push(url.to_string());
            }
        }

        if let Some(children) = &node.children {
            stack.extend(children.iter().rev());
        }
    }

    Ok(found)
}

/// Hyperlink URLs in the document.
pub fn find_links(nodes: &[DocumentNode]) -> Result<Vec<String>, DocumentError> {
    Ok(extract_urls(nodes)?.links)
}

/// Image URLs in the document.
pub fn find_images(nodes: &[DocumentNode]) -> Result<Vec<String>, DocumentError> {
    Ok(extract_urls(nodes)?.images)
}
