//! Login-confirmation buttons.
//!
//! When a login arrives from an unknown address, the account owner is sent
//! a button whose interaction id has the form
//! `<prefix>/<ownerUserId>/<token>`. Pressing it resolves the timed action
//! registered under `token`, which whitelists the address.

use crate::TimedActions;

/// Shown when the pending login was confirmed.
pub const ACCEPTED_MESSAGE: &str = "Account login has been accepted.\n\n\
The IP used to log into EmuFeral has been saved, further logins from this address \
will not be verified and login will be confirmed automatically.\n\n\
You can remove whitelisted IPs via ingame commands.";

/// Shown when the token was unknown, already used, or past its deadline.
pub const EXPIRED_MESSAGE: &str = "Login request has expired.";

/// Result of pressing a confirmation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Accepted,
    Expired,
}

impl ConfirmationOutcome {
    /// The reply shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::Accepted => ACCEPTED_MESSAGE,
            Self::Expired => EXPIRED_MESSAGE,
        }
    }
}

/// Resolves a confirmation button press.
///
/// Returns `None` if `interaction_id` is malformed or belongs to somebody
/// other than `requester`; the caller should then stay silent. Otherwise
/// the timed action is consumed and the outcome says whether it ran.
pub fn resolve_confirmation(
    actions: &TimedActions,
    interaction_id: &str,
    requester: &str,
) -> Option<ConfirmationOutcome> {
    // Anything after a third `/` is ignored.
    let mut parts = interaction_id.split('/').skip(1);
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let token = parts.next().filter(|s| !s.is_empty())?;

    if owner != requester {
        tracing::debug!(%owner, %requester, "confirmation pressed by someone else");
        return None;
    }

    let outcome = if actions.run_action(token) {
        ConfirmationOutcome::Accepted
    } else {
        ConfirmationOutcome::Expired
    };
    tracing::info!(%owner, ?outcome, "login confirmation resolved");
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_resolve_confirmation_owner_with_live_token_accepts() {
        let actions = TimedActions::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let token = actions.issue(Duration::from_secs(300), move || {
            flag.store(true, Ordering::SeqCst);
        });

        let outcome = resolve_confirmation(&actions, &format!("2fa/42/{token}"), "42");

        assert_eq!(outcome, Some(ConfirmationOutcome::Accepted));
        assert!(ran.load(Ordering::SeqCst));
        assert!(outcome.unwrap().message().starts_with("Account login has been accepted."));
    }

    #[test]
    fn test_resolve_confirmation_second_press_is_expired() {
        let actions = TimedActions::new();
        let token = actions.issue(Duration::from_secs(300), || {});
        let id = format!("2fa/42/{token}");

        resolve_confirmation(&actions, &id, "42");
        let outcome = resolve_confirmation(&actions, &id, "42");

        assert_eq!(outcome, Some(ConfirmationOutcome::Expired));
        assert_eq!(outcome.unwrap().message(), "Login request has expired.");
    }

    #[test]
    fn test_resolve_confirmation_past_deadline_is_expired() {
        let actions = TimedActions::new();
        actions.register("tok", Instant::now(), || {});

        let outcome = resolve_confirmation(&actions, "2fa/42/tok", "42");

        assert_eq!(outcome, Some(ConfirmationOutcome::Expired));
    }

    #[test]
    fn test_resolve_confirmation_other_user_is_neutral() {
        let actions = TimedActions::new();
        let token = actions.issue(Duration::from_secs(300), || {});

        let outcome = resolve_confirmation(&actions, &format!("2fa/42/{token}"), "99");

        assert_eq!(outcome, None);
        // The action stays available for its owner.
        assert!(actions.contains(&token));
    }

    #[test]
    fn test_resolve_confirmation_ignores_trailing_segments() {
        let actions = TimedActions::new();
        let token = actions.issue(Duration::from_secs(300), || {});

        let outcome = resolve_confirmation(&actions, &format!("2fa/42/{token}/extra"), "42");

        assert_eq!(outcome, Some(ConfirmationOutcome::Accepted));
        assert!(!actions.contains(&token));
    }

    #[test]
    fn test_resolve_confirmation_malformed_id_is_neutral() {
        let actions = TimedActions::new();
        assert_eq!(resolve_confirmation(&actions, "2fa", "42"), None);
        assert_eq!(resolve_confirmation(&actions, "2fa/42", "42"), None);
        assert_eq!(resolve_confirmation(&actions, "2fa/42/", "42"), None);
        assert_eq!(resolve_confirmation(&actions, "2fa//tok", ""), None);
    }
}
