//! Identity provider seam.
//!
//! The hosted identity service is an external collaborator. The navigator
//! talks to it through [`IdentityProvider`] and layers the dashboard's
//! sign-in rules on top in [`AuthSession`].

mod error;
mod session;

pub use error::AuthError;
pub use session::{AuthSession, VerificationOutcome};

/// Profile of an account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Provider-assigned account id.
    pub uid: String,
    /// Account email address.
    pub email: String,
    /// Name shown in the navigation bar.
    pub display_name: Option<String>,
    /// Whether the email address has been verified.
    pub email_verified: bool,
}

/// Operations offered by a hosted identity service.
///
/// Implementations keep track of the signed-in user themselves; every method
/// is a single round trip and errors are recoverable.
pub trait IdentityProvider {
    /// Create an account with a display name and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailInUse`] or [`AuthError::WeakPassword`] when
    /// the provider rejects the account.
    fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserProfile, AuthError>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for a wrong password.
    fn sign_in(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError>;

    /// Sign the current user out.
    ///
    /// # Errors
    ///
    /// Returns provider failures.
    fn sign_out(&mut self) -> Result<(), AuthError>;

    /// Email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownAccount`] when no account matches.
    fn send_password_reset(&mut self, email: &str) -> Result<(), AuthError>;

    /// Email a verification link to the current user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] without a current user.
    fn send_email_verification(&mut self) -> Result<(), AuthError>;

    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserProfile>;
}
