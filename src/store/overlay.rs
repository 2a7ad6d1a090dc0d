//! Interaction Overlay Store
//!
//! Names per-post and per-follow patches as social-cache entries so partial
//! updates ("like count changed") never force a refetch of the whole post.
//! This layer adds no TTL or storage behavior of its own; everything goes
//! through [`CacheStore`].

use std::sync::Arc;

use crate::error::Result;
use crate::models::{FollowStatus, PostInteraction};
use crate::persist::KeyValueBackend;
use crate::store::{CacheStore, Clock};

/// Social-cache key for a post's interaction patch.
fn post_key(post_id: &str) -> String {
    format!("post_{post_id}")
}

/// Social-cache key for a follow relationship.
fn follow_key(user_id: &str) -> String {
    format!("follow_{user_id}")
}

// == Overlay Store ==
/// Per-entity patch layer over the social cache namespace.
pub struct OverlayStore<B: KeyValueBackend> {
    cache: Arc<CacheStore<B>>,
    clock: Arc<dyn Clock>,
}

impl<B: KeyValueBackend> OverlayStore<B> {
    // == Constructor ==
    pub(crate) fn new(cache: Arc<CacheStore<B>>, clock: Arc<dyn Clock>) -> Self {
        Self { cache, clock }
    }

    // == Post Interactions ==
    /// Merges `patch` over the existing interaction record for `post_id`
    /// and stamps `last_updated`.
    ///
    /// Shallow merge: fields the patch carries win, fields it omits keep
    /// their previous value. The read+merge+write runs as one atomic cache
    /// update, so concurrent patches for the same post cannot lose fields.
    pub async fn record_post_interaction(
        &self,
        post_id: &str,
        patch: PostInteraction,
    ) -> Result<()> {
        let now = self.clock.now_ms();
        self.cache
            .update_social(&post_key(post_id), move |current: Option<PostInteraction>| {
                let mut merged = current.unwrap_or_default();
                merged.apply(patch, now);
                merged
            })
            .await
    }

    /// Returns the interaction patch for `post_id`, if present and fresh.
    pub async fn post_interaction(&self, post_id: &str) -> Option<PostInteraction> {
        self.cache.social(&post_key(post_id)).await
    }

    // == Follow Status ==
    /// Records whether the current user follows `user_id`.
    ///
    /// Full replace, no merge: follow status is a single boolean with no
    /// accumulating sub-fields.
    pub async fn record_follow_status(&self, user_id: &str, is_following: bool) -> Result<()> {
        self.cache
            .save_social(&follow_key(user_id), &FollowStatus { is_following })
            .await
    }

    /// Returns the recorded follow status for `user_id`, if present and fresh.
    pub async fn follow_status(&self, user_id: &str) -> Option<bool> {
        self.cache
            .social::<FollowStatus>(&follow_key(user_id))
            .await
            .map(|status| status.is_following)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::persist::MemoryBackend;
    use crate::store::{LockMap, ManualClock};
    use std::time::Duration;

    fn fixture() -> (OverlayStore<MemoryBackend>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(5_000));
        let cache = Arc::new(CacheStore::new(
            Arc::new(MemoryBackend::new()),
            clock.clone(),
            StoreConfig::default(),
            Arc::new(LockMap::new()),
        ));
        (OverlayStore::new(cache, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_record_and_get_post_interaction() {
        let (overlay, _clock) = fixture();

        overlay
            .record_post_interaction(
                "p1",
                PostInteraction {
                    like_count: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let patch = overlay.post_interaction("p1").await.unwrap();
        assert_eq!(patch.like_count, Some(3));
        assert_eq!(patch.last_updated, Some(5_000));
    }

    #[tokio::test]
    async fn test_post_interaction_patches_merge() {
        let (overlay, clock) = fixture();

        overlay
            .record_post_interaction(
                "p1",
                PostInteraction {
                    like_count: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        clock.advance(Duration::from_secs(5));
        overlay
            .record_post_interaction(
                "p1",
                PostInteraction {
                    is_liked: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let patch = overlay.post_interaction("p1").await.unwrap();
        assert_eq!(patch.like_count, Some(1));
        assert_eq!(patch.is_liked, Some(true));
        assert_eq!(patch.last_updated, Some(10_000));
    }

    #[tokio::test]
    async fn test_interactions_are_per_post() {
        let (overlay, _clock) = fixture();

        overlay
            .record_post_interaction(
                "p1",
                PostInteraction {
                    is_liked: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(overlay.post_interaction("p1").await.is_some());
        assert!(overlay.post_interaction("p2").await.is_none());
    }

    #[tokio::test]
    async fn test_follow_status_replaces_not_merges() {
        let (overlay, _clock) = fixture();

        overlay.record_follow_status("u1", true).await.unwrap();
        overlay.record_follow_status("u1", false).await.unwrap();

        assert_eq!(overlay.follow_status("u1").await, Some(false));
    }

    #[tokio::test]
    async fn test_follow_status_absent_for_unknown_user() {
        let (overlay, _clock) = fixture();
        assert_eq!(overlay.follow_status("nobody").await, None);
    }

    #[tokio::test]
    async fn test_overlay_entries_expire_with_social_ttl() {
        let (overlay, clock) = fixture();

        overlay.record_follow_status("u1", true).await.unwrap();
        clock.advance(Duration::from_secs(601));

        assert_eq!(overlay.follow_status("u1").await, None);
    }

    #[tokio::test]
    async fn test_concurrent_patches_lose_no_fields() {
        let (overlay, _clock) = fixture();
        let overlay = Arc::new(overlay);

        let likes = {
            let overlay = overlay.clone();
            tokio::spawn(async move {
                overlay
                    .record_post_interaction(
                        "p1",
                        PostInteraction {
                            is_liked: Some(true),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
            })
        };
        let comments = {
            let overlay = overlay.clone();
            tokio::spawn(async move {
                overlay
                    .record_post_interaction(
                        "p1",
                        PostInteraction {
                            comment_count: Some(7),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
            })
        };
        likes.await.unwrap();
        comments.await.unwrap();

        let patch = overlay.post_interaction("p1").await.unwrap();
        assert_eq!(patch.is_liked, Some(true));
        assert_eq!(patch.comment_count, Some(7));
    }
}
