//! User record model and merge semantics
//!
//! The stored user profile is never wholesale trusted from a single fetch:
//! admin flags, once granted, must survive partial profile refreshes that
//! omit them. [`merge_user`] is the pure function carrying that invariant.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == User Record ==
/// Profile record persisted under the `user_data` key.
///
/// Most fields are optional because the backend returns different subsets
/// from login, profile, and dashboard responses. Unknown fields are kept in
/// `extra` so a newer backend cannot silently drop data through this client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend identifier for the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Referral code owned by this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    /// Admin flag as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    /// Second confirmation of admin status; both flags must be true for
    /// the client to treat the user as an admin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_confirmed: Option<bool>,
    /// Free-form user preferences sub-mapping
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub preferences: Map<String, Value>,
    /// Fields this client version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// True iff both admin flags are strictly true.
    ///
    /// A record carrying `is_admin` without `admin_confirmed` (or the other
    /// way around) is treated as not-admin.
    pub fn has_confirmed_admin(&self) -> bool {
        self.is_admin == Some(true) && self.admin_confirmed == Some(true)
    }
}

// == Merge ==
/// Merges a profile patch over the previously stored record.
///
/// The patch wins for every field it carries. The admin flags are the
/// exception: when the patch omits them, the stored values are preserved
/// instead of resetting to false, and absent-everywhere resolves to false.
/// The returned record therefore always carries concrete admin flags.
pub fn merge_user(stored: Option<&UserRecord>, patch: UserRecord) -> UserRecord {
    let mut merged = patch;
    merged.is_admin = Some(
        merged
            .is_admin
            .or_else(|| stored.and_then(|s| s.is_admin))
            .unwrap_or(false),
    );
    merged.admin_confirmed = Some(
        merged
            .admin_confirmed
            .or_else(|| stored.and_then(|s| s.admin_confirmed))
            .unwrap_or(false),
    );
    merged
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn admin_record() -> UserRecord {
        UserRecord {
            id: Some("u1".to_string()),
            name: Some("Ada".to_string()),
            is_admin: Some(true),
            admin_confirmed: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_preserves_admin_flags_when_patch_omits_them() {
        let stored = admin_record();
        let patch = UserRecord {
            name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };

        let merged = merge_user(Some(&stored), patch);

        assert_eq!(merged.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(merged.is_admin, Some(true));
        assert_eq!(merged.admin_confirmed, Some(true));
    }

    #[test]
    fn test_merge_patch_can_revoke_admin() {
        let stored = admin_record();
        let patch = UserRecord {
            is_admin: Some(false),
            admin_confirmed: Some(false),
            ..Default::default()
        };

        let merged = merge_user(Some(&stored), patch);
        assert_eq!(merged.is_admin, Some(false));
        assert_eq!(merged.admin_confirmed, Some(false));
    }

    #[test]
    fn test_merge_defaults_flags_to_false_without_stored_record() {
        let merged = merge_user(None, UserRecord::default());
        assert_eq!(merged.is_admin, Some(false));
        assert_eq!(merged.admin_confirmed, Some(false));
    }

    #[test]
    fn test_merge_patch_fields_replace_stored_fields() {
        let stored = UserRecord {
            email: Some("old@example.com".to_string()),
            ..admin_record()
        };
        // Patch omits email entirely, so the merged record drops it: only
        // the admin flags get carry-over treatment.
        let patch = UserRecord {
            id: Some("u1".to_string()),
            ..Default::default()
        };

        let merged = merge_user(Some(&stored), patch);
        assert_eq!(merged.email, None);
        assert_eq!(merged.is_admin, Some(true));
    }

    #[test]
    fn test_has_confirmed_admin_requires_both_flags() {
        let mut record = UserRecord::default();
        assert!(!record.has_confirmed_admin());

        record.is_admin = Some(true);
        assert!(!record.has_confirmed_admin());

        record.admin_confirmed = Some(true);
        assert!(record.has_confirmed_admin());

        record.is_admin = Some(false);
        assert!(!record.has_confirmed_admin());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let json = r#"{"id":"u1","coins":42,"preferences":{"theme":"dark"}}"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_deref(), Some("u1"));
        assert_eq!(record.preferences["theme"], "dark");
        assert_eq!(record.extra["coins"], 42);

        let back = serde_json::to_string(&record).unwrap();
        assert!(back.contains("coins"));
    }
}
