//! Preference gate — decides whether a recipient may be notified.

use savora_common::types::UserProfile;

/// Profiles without an explicit preference are treated as enabled.
/// Fail-open is a deliberate product decision, not an oversight: the
/// preference was added after launch and older profiles never wrote it.
pub const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;

/// A recipient is eligible when notifications are not explicitly disabled
/// and a device token is registered.
pub fn is_eligible(profile: &UserProfile) -> bool {
    profile
        .notifications_enabled
        .unwrap_or(DEFAULT_NOTIFICATIONS_ENABLED)
        && profile.notification_token.is_some()
}
