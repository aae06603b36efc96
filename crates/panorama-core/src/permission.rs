//! Motion-sensor permission negotiation.
//!
//! Hosts with a permission API sometimes already stream orientation data
//! (consent remembered from an earlier visit). The negotiator first listens
//! for a live reading; only if none arrives before the probe timeout does it
//! ask the user through a consent control.

use crate::controls::OrientationSample;
use crate::error::PermissionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionState {
    /// Listening for a live reading; the probe timer is running.
    Probing,
    /// A live reading arrived without asking.
    GrantedImplicit,
    /// The consent control is on screen. Denials leave us here.
    AwaitingManualConsent,
    /// The platform request resolved "granted".
    GrantedManual,
}

/// Outcome of the platform's asynchronous permission request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
}

impl PermissionResponse {
    /// Map the platform's answer string; anything but "granted" is a denial.
    pub fn from_platform(state: &str) -> Self {
        if state == "granted" {
            PermissionResponse::Granted
        } else {
            PermissionResponse::Denied
        }
    }
}

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NegotiationStep {
    /// Start device-orientation mode now.
    ActivateOrientation,
    ShowConsent,
    /// Invoke the platform permission request.
    RequestPermission,
    /// Consent obtained; the session decides whether to reload or activate.
    ConsentGranted,
}

#[derive(Debug)]
pub struct PermissionNegotiator {
    state: PermissionState,
    consent_shown: bool,
}

impl Default for PermissionNegotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionNegotiator {
    /// Enter `Probing`. The caller subscribes to orientation events and arms
    /// the probe timer.
    pub fn new() -> Self {
        Self {
            state: PermissionState::Probing,
            consent_shown: false,
        }
    }

    #[inline]
    pub fn state(&self) -> PermissionState {
        self.state
    }

    #[inline]
    pub fn consent_shown(&self) -> bool {
        self.consent_shown
    }

    /// Whether orientation events should still be routed here.
    #[inline]
    pub fn is_listening(&self) -> bool {
        matches!(
            self.state,
            PermissionState::Probing | PermissionState::AwaitingManualConsent
        )
    }

    /// A reading arrived. Complete readings while probing (or while the
    /// consent control is up) mean the sensor is already live.
    pub fn on_orientation(&mut self, sample: &OrientationSample) -> Option<NegotiationStep> {
        if !self.is_listening() || !sample.is_complete() {
            return None;
        }
        log::info!("[gyro] live orientation data, no prompt needed");
        self.state = PermissionState::GrantedImplicit;
        Some(NegotiationStep::ActivateOrientation)
    }

    /// The probe timer fired.
    pub fn on_probe_timeout(&mut self) -> Option<NegotiationStep> {
        if self.state != PermissionState::Probing {
            return None;
        }
        self.state = PermissionState::AwaitingManualConsent;
        if self.consent_shown {
            return None;
        }
        self.consent_shown = true;
        log::info!("[gyro] no orientation data within probe window, asking for consent");
        Some(NegotiationStep::ShowConsent)
    }

    /// The user pressed the consent control. May be repeated after a denial.
    pub fn on_consent_acknowledged(&mut self) -> Option<NegotiationStep> {
        (self.state == PermissionState::AwaitingManualConsent)
            .then_some(NegotiationStep::RequestPermission)
    }

    /// The platform request settled.
    pub fn on_permission_result(
        &mut self,
        result: Result<PermissionResponse, PermissionError>,
    ) -> Option<NegotiationStep> {
        if self.state != PermissionState::AwaitingManualConsent {
            return None;
        }
        match result {
            Ok(PermissionResponse::Granted) => {
                log::info!("[gyro] permission granted");
                self.state = PermissionState::GrantedManual;
                Some(NegotiationStep::ConsentGranted)
            }
            Ok(PermissionResponse::Denied) => {
                log::warn!("[gyro] permission denied, waiting for another attempt");
                None
            }
            Err(e) => {
                log::error!("[gyro] permission request failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_sample_grants_implicitly_and_suppresses_prompt() {
        let mut n = PermissionNegotiator::new();
        assert_eq!(
            n.on_orientation(&OrientationSample::new(10.0, 45.0, 0.0)),
            Some(NegotiationStep::ActivateOrientation)
        );
        assert_eq!(n.state(), PermissionState::GrantedImplicit);
        assert_eq!(n.on_probe_timeout(), None);
        assert!(!n.consent_shown());
    }

    #[test]
    fn incomplete_sample_does_not_count() {
        let mut n = PermissionNegotiator::new();
        let partial = OrientationSample {
            alpha: None,
            beta: Some(1.0),
            gamma: Some(2.0),
        };
        assert_eq!(n.on_orientation(&partial), None);
        assert_eq!(n.state(), PermissionState::Probing);
    }

    #[test]
    fn timeout_shows_prompt_once() {
        let mut n = PermissionNegotiator::new();
        assert_eq!(n.on_probe_timeout(), Some(NegotiationStep::ShowConsent));
        assert_eq!(n.on_probe_timeout(), None);
        assert_eq!(n.state(), PermissionState::AwaitingManualConsent);
        assert!(n.consent_shown());
    }

    #[test]
    fn denial_keeps_waiting_and_allows_retry() {
        let mut n = PermissionNegotiator::new();
        n.on_probe_timeout();
        assert_eq!(
            n.on_consent_acknowledged(),
            Some(NegotiationStep::RequestPermission)
        );
        assert_eq!(n.on_permission_result(Ok(PermissionResponse::Denied)), None);
        assert_eq!(
            n.on_permission_result(Err(PermissionError::Rejected("NotAllowedError".into()))),
            None
        );
        assert_eq!(n.state(), PermissionState::AwaitingManualConsent);
        assert_eq!(
            n.on_consent_acknowledged(),
            Some(NegotiationStep::RequestPermission)
        );
        assert_eq!(
            n.on_permission_result(Ok(PermissionResponse::Granted)),
            Some(NegotiationStep::ConsentGranted)
        );
        assert_eq!(n.state(), PermissionState::GrantedManual);
    }

    #[test]
    fn acknowledgement_before_prompt_is_ignored() {
        let mut n = PermissionNegotiator::new();
        assert_eq!(n.on_consent_acknowledged(), None);
        assert_eq!(n.on_permission_result(Ok(PermissionResponse::Granted)), None);
        assert_eq!(n.state(), PermissionState::Probing);
    }

    #[test]
    fn platform_answer_strings() {
        assert_eq!(
            PermissionResponse::from_platform("granted"),
            PermissionResponse::Granted
        );
        assert_eq!(
            PermissionResponse::from_platform("denied"),
            PermissionResponse::Denied
        );
        assert_eq!(
            PermissionResponse::from_platform("prompt"),
            PermissionResponse::Denied
        );
    }
}
