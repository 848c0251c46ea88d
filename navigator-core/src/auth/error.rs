//! Errors reported by identity providers and the auth session.

use thiserror::Error;

/// Recoverable failure of a single auth operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The operation needs a signed-in user.
    #[error("no user is signed in")]
    NotSignedIn,
    /// Email and password do not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Registration used an email that already has an account.
    #[error("an account already exists for {email}")]
    EmailInUse {
        /// Email that was registered.
        email: String,
    },
    /// The provider rejected the password as too weak.
    #[error("password must be at least {min_length} characters")]
    WeakPassword {
        /// Minimum accepted length.
        min_length: usize,
    },
    /// Sign-in succeeded but the email address is unverified; the session
    /// was signed out again.
    #[error("email {email} is not verified; check your inbox for the verification link")]
    EmailNotVerified {
        /// Email of the unverified account.
        email: String,
    },
    /// No account exists for the email.
    #[error("no account exists for {email}")]
    UnknownAccount {
        /// Email that was looked up.
        email: String,
    },
    /// Any other provider failure.
    #[error("identity provider error: {message}")]
    Provider {
        /// Provider-supplied description.
        message: String,
    },
}
