//! Host classification.
//!
//! The browser only gives us two signals: the user-agent string and whether
//! `DeviceMotionEvent.requestPermission` can be called. Both are read once at
//! startup and folded into a [`Capability`].

use crate::constants::MOBILE_MARKERS;

/// What kind of host the session runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Desktop,
    /// Mobile host where motion sensors sit behind an explicit consent API.
    MobileWithPermissionApi,
    /// Mobile host that streams orientation events without asking.
    MobileWithoutPermissionApi,
}

impl Capability {
    /// Classify a host from its user agent and permission-API probe.
    ///
    /// The probe result is ignored on desktop hosts.
    pub fn detect(user_agent: &str, permission_api_callable: bool) -> Self {
        if !is_mobile_user_agent(user_agent) {
            return Capability::Desktop;
        }
        if permission_api_callable {
            Capability::MobileWithPermissionApi
        } else {
            Capability::MobileWithoutPermissionApi
        }
    }

    #[inline]
    pub fn is_mobile(self) -> bool {
        !matches!(self, Capability::Desktop)
    }
}

/// Case-insensitive substring match against the known mobile platform markers.
#[inline]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|m| ua.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile";
    const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0";

    #[test]
    fn markers_match_case_insensitively() {
        assert!(is_mobile_user_agent("ANDROID"));
        assert!(is_mobile_user_agent("some ipod thing"));
        assert!(is_mobile_user_agent("iPad"));
        assert!(!is_mobile_user_agent(""));
        assert!(!is_mobile_user_agent(DESKTOP_UA));
    }

    #[test]
    fn permission_probe_splits_mobile_hosts() {
        assert_eq!(
            Capability::detect(IPHONE_UA, true),
            Capability::MobileWithPermissionApi
        );
        assert_eq!(
            Capability::detect(ANDROID_UA, false),
            Capability::MobileWithoutPermissionApi
        );
    }

    #[test]
    fn desktop_ignores_permission_probe() {
        assert_eq!(Capability::detect(DESKTOP_UA, true), Capability::Desktop);
        assert_eq!(Capability::detect(DESKTOP_UA, false), Capability::Desktop);
        assert!(!Capability::Desktop.is_mobile());
    }
}
