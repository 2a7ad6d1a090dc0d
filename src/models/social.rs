//! Social feed and cache record models
//!
//! Serde types for the `posts_cache` and `social_cache` keys, plus the typed
//! interaction payloads the overlay store writes into the social namespace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Post ==
/// A single feed item as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Backend identifier for the post
    pub id: String,
    /// Author's user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// Author's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Post body text
    #[serde(default)]
    pub content: String,
    /// Number of likes at fetch time
    #[serde(default)]
    pub like_count: i64,
    /// Number of comments at fetch time
    #[serde(default)]
    pub comment_count: i64,
    /// Whether the current user had liked the post at fetch time
    #[serde(default)]
    pub is_liked: bool,
    /// Creation timestamp (RFC 3339) as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Fields this client version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// == Posts Cache Record ==
/// Single-slot record persisted under the `posts_cache` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsCacheRecord {
    /// Cached page of feed items, in backend order
    pub posts: Vec<Post>,
    /// Write timestamp (Unix milliseconds), compared against the posts TTL
    pub timestamp: u64,
    /// Page number the items belong to
    pub page: u32,
}

// == Social Cache Entry ==
/// One entry inside the `social_cache` namespace mapping.
///
/// The payload stays as raw JSON here; the overlay store is what gives
/// entries their typed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialCacheEntry {
    /// Entry payload
    pub data: Value,
    /// Write timestamp (Unix milliseconds), compared against the social TTL
    pub timestamp: u64,
}

/// The whole `social_cache` namespace as persisted: key to entry.
pub type SocialCacheMap = HashMap<String, SocialCacheEntry>;

// == Post Interaction ==
/// Partial update for a post, stored under `post_<id>` in the social cache.
///
/// Every field is optional so a patch can touch only what changed; unknown
/// backend fields ride along in `extra` and survive merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInteraction {
    /// Whether the current user likes the post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    /// Latest known like count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    /// Latest known comment count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
    /// Timestamp (Unix milliseconds) of the last recorded patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<u64>,
    /// Open mapping for fields added by newer backends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostInteraction {
    /// Applies `patch` over `self`: fields the patch carries win, fields it
    /// omits keep their current value (shallow merge). Stamps `last_updated`
    /// with `now_ms`.
    pub fn apply(&mut self, patch: PostInteraction, now_ms: u64) {
        if patch.is_liked.is_some() {
            self.is_liked = patch.is_liked;
        }
        if patch.like_count.is_some() {
            self.like_count = patch.like_count;
        }
        if patch.comment_count.is_some() {
            self.comment_count = patch.comment_count;
        }
        for (field, value) in patch.extra {
            self.extra.insert(field, value);
        }
        self.last_updated = Some(now_ms);
    }
}

// == Follow Status ==
/// Follow relationship stored under `follow_<user_id>` in the social cache.
///
/// A single boolean with no accumulating sub-fields, so writes replace
/// rather than merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStatus {
    /// Whether the current user follows the target user
    pub is_following: bool,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_deserialize_minimal() {
        let post: Post = serde_json::from_str(r#"{"id":"p1"}"#).unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.like_count, 0);
        assert!(!post.is_liked);
    }

    #[test]
    fn test_post_keeps_unknown_fields() {
        let post: Post =
            serde_json::from_str(r#"{"id":"p1","content":"hi","image_url":"x.png"}"#).unwrap();
        assert_eq!(post.extra["image_url"], "x.png");
    }

    #[test]
    fn test_posts_cache_record_round_trip() {
        let record = PostsCacheRecord {
            posts: vec![serde_json::from_value(json!({"id": "p1"})).unwrap()],
            timestamp: 1_000,
            page: 2,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: PostsCacheRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_interaction_apply_merges_and_stamps() {
        let mut current = PostInteraction {
            like_count: Some(1),
            ..Default::default()
        };
        let patch = PostInteraction {
            is_liked: Some(true),
            ..Default::default()
        };

        current.apply(patch, 42);

        assert_eq!(current.like_count, Some(1));
        assert_eq!(current.is_liked, Some(true));
        assert_eq!(current.last_updated, Some(42));
    }

    #[test]
    fn test_interaction_apply_later_fields_overwrite() {
        let mut current = PostInteraction {
            like_count: Some(1),
            comment_count: Some(3),
            ..Default::default()
        };
        let patch = PostInteraction {
            like_count: Some(2),
            ..Default::default()
        };

        current.apply(patch, 50);

        assert_eq!(current.like_count, Some(2));
        assert_eq!(current.comment_count, Some(3));
    }

    #[test]
    fn test_interaction_apply_merges_extra_fields() {
        let mut current = PostInteraction::default();
        current.extra.insert("share_count".to_string(), json!(1));

        let mut patch = PostInteraction::default();
        patch.extra.insert("share_count".to_string(), json!(2));
        patch.extra.insert("bookmarked".to_string(), json!(true));

        current.apply(patch, 60);

        assert_eq!(current.extra["share_count"], 2);
        assert_eq!(current.extra["bookmarked"], true);
    }

    #[test]
    fn test_follow_status_serialize() {
        let status = FollowStatus { is_following: true };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"is_following":true}"#);
    }
}
