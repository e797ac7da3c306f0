//! One-shot actions that can be triggered by token until they expire.
//!
//! An action is registered under a secret token with a deadline. The
//! first [`TimedActions::run_action`] call with that token consumes it;
//! the effect only runs if the deadline hasn't passed. Either way the
//! token can never be used again.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::generate_token;

type Effect = Box<dyn FnOnce() + Send + 'static>;

struct TimedAction {
    expiry: Instant,
    effect: Effect,
}

/// Registry of pending timed actions.
///
/// Safe to share between connection tasks through an `Arc`.
#[derive(Default)]
pub struct TimedActions {
    actions: Mutex<HashMap<String, TimedAction>>,
}

impl TimedActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `effect` under `token`, replacing any action that was
    /// already pending under the same token.
    pub fn register<F>(&self, token: impl Into<String>, expiry: Instant, effect: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.lock().insert(
            token.into(),
            TimedAction {
                expiry,
                effect: Box::new(effect),
            },
        );
    }

    /// Registers `effect` under a freshly generated token that expires
    /// after `ttl`, and returns the token.
    pub fn issue<F>(&self, ttl: Duration, effect: F) -> String
    where
        F: FnOnce() + Send + 'static,
    {
        let expiry = Instant::now() + ttl;
        let mut actions = self.actions.lock();
        let mut token = generate_token();
        while actions.contains_key(&token) {
            token = generate_token();
        }
        actions.insert(
            token.clone(),
            TimedAction {
                expiry,
                effect: Box::new(effect),
            },
        );
        token
    }

    /// Consumes the action registered under `token`.
    ///
    /// Returns `true` if the action existed and was still valid, in which
    /// case its effect has run. Returns `false` for unknown, already-used
    /// or expired tokens.
    pub fn run_action(&self, token: &str) -> bool {
        // The effect runs outside the lock so it may register new actions.
        let Some(action) = self.actions.lock().remove(token) else {
            return false;
        };

        if Instant::now() >= action.expiry {
            tracing::debug!("timed action expired before use");
            return false;
        }

        (action.effect)();
        true
    }

    /// Drops every action whose deadline has passed. Returns how many
    /// were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut actions = self.actions.lock();
        let before = actions.len();
        actions.retain(|_, action| now < action.expiry);
        before - actions.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.actions.lock().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.actions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.lock().is_empty()
    }
}

impl fmt::Debug for TimedActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedActions")
            .field("pending", &self.len())
            .finish()
    }
}
