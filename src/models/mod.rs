//! Persisted record models
//!
//! This module defines the serde types written through the key-value port:
//! the user profile record, the posts cache record, and the social cache
//! namespace with its interaction payloads.

pub mod social;
pub mod user;

// Re-export commonly used types
pub use social::{
    FollowStatus, Post, PostInteraction, PostsCacheRecord, SocialCacheEntry, SocialCacheMap,
};
pub use user::{merge_user, UserRecord};
