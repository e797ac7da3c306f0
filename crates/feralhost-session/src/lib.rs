//! Player sessions for feralhost.
//!
//! This crate handles who is connected and what they are allowed to
//! confirm:
//!
//! 1. **Authentication**: mapping a presented token to an account
//!    ([`Authenticator`], [`TokenDirectory`])
//! 2. **Session tracking**: one live session per account per server
//!    ([`SessionManager`])
//! 3. **Timed actions**: one-shot effects keyed by a secret token that
//!    only run before their deadline ([`TimedActions`]), and the
//!    login-confirmation flow built on top of them
//!    ([`resolve_confirmation`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)      ← authenticates each connection, owns the managers
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← provides AccountId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod confirmation;
mod error;
mod manager;
mod session;
mod timed;
mod token;

pub use auth::{Authenticator, TokenDirectory};
pub use confirmation::{
    ACCEPTED_MESSAGE, ConfirmationOutcome, EXPIRED_MESSAGE, resolve_confirmation,
};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::Session;
pub use timed::TimedActions;
pub use token::generate_token;
