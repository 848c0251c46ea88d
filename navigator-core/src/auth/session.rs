//! Dashboard sign-in rules on top of an identity provider.

use log::{info, warn};

use super::{AuthError, IdentityProvider, UserProfile};
use crate::{EventBus, NavigatorEvent};

/// Result of asking for a verification email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// A new verification email was sent.
    Sent,
    /// The address is already verified; nothing was sent.
    AlreadyVerified,
}

/// Wraps an [`IdentityProvider`] and publishes session transitions.
///
/// Only verified accounts stay signed in. Successful sign-in and sign-out
/// publish [`NavigatorEvent::SignedIn`] and [`NavigatorEvent::SignedOut`].
#[derive(Debug)]
pub struct AuthSession<P> {
    provider: P,
}

impl<P: IdentityProvider> AuthSession<P> {
    /// Wrap `provider`.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Borrow the wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Register an account and send its verification email.
    ///
    /// The new account is signed out again so it must verify before signing
    /// in. No event is published.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from any of the three steps.
    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserProfile, AuthError> {
        let profile = self.provider.register(email, password, display_name)?;
        self.provider.send_email_verification()?;
        self.provider.sign_out()?;
        info!("Registered {email}; verification email sent");
        Ok(profile)
    }

    /// Sign in and publish [`NavigatorEvent::SignedIn`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailNotVerified`] after signing straight back
    /// out when the account is unverified, and propagates provider failures.
    pub fn sign_in(
        &mut self,
        email: &str,
        password: &str,
        bus: &mut EventBus,
    ) -> Result<UserProfile, AuthError> {
        let profile = self.provider.sign_in(email, password)?;
        if !profile.email_verified {
            warn!("Rejected sign-in for unverified account {email}");
            self.provider.sign_out()?;
            return Err(AuthError::EmailNotVerified {
                email: profile.email,
            });
        }
        bus.publish(&NavigatorEvent::SignedIn(profile.clone()));
        Ok(profile)
    }

    /// Sign out and publish [`NavigatorEvent::SignedOut`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] without a current user.
    pub fn sign_out(&mut self, bus: &mut EventBus) -> Result<(), AuthError> {
        if self.provider.current_user().is_none() {
            return Err(AuthError::NotSignedIn);
        }
        self.provider.sign_out()?;
        bus.publish(&NavigatorEvent::SignedOut);
        Ok(())
    }

    /// Send a password reset link.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub fn reset_password(&mut self, email: &str) -> Result<(), AuthError> {
        self.provider.send_password_reset(email)
    }

    /// Re-send the verification email of the current user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] without a current user.
    pub fn send_verification(&mut self) -> Result<VerificationOutcome, AuthError> {
        let user = self.provider.current_user().ok_or(AuthError::NotSignedIn)?;
        if user.email_verified {
            return Ok(VerificationOutcome::AlreadyVerified);
        }
        self.provider.send_email_verification()?;
        Ok(VerificationOutcome::Sent)
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.provider.current_user()
    }

    /// Report whether a verified user is signed in.
    pub fn is_verified(&self) -> bool {
        self.current_user().is_some_and(|user| user.email_verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryIdentityProvider;
    use rstest::{fixture, rstest};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[fixture]
    fn session() -> AuthSession<MemoryIdentityProvider> {
        let mut provider = MemoryIdentityProvider::default();
        provider.add_account("amira@example.tn", "secret-pass", true);
        provider.add_account("omar@example.tn", "secret-pass", false);
        AuthSession::new(provider)
    }

    fn recording_bus() -> (EventBus, Rc<RefCell<Vec<NavigatorEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut bus = EventBus::new();
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (bus, events)
    }

    #[rstest]
    fn verified_sign_in_publishes_event(mut session: AuthSession<MemoryIdentityProvider>) {
        let (mut bus, events) = recording_bus();
        let profile = session
            .sign_in("amira@example.tn", "secret-pass", &mut bus)
            .expect("verified account signs in");
        assert!(session.is_verified());
        assert_eq!(*events.borrow(), vec![NavigatorEvent::SignedIn(profile)]);
    }

    #[rstest]
    fn unverified_sign_in_signs_back_out(mut session: AuthSession<MemoryIdentityProvider>) {
        let (mut bus, events) = recording_bus();
        let err = session
            .sign_in("omar@example.tn", "secret-pass", &mut bus)
            .expect_err("unverified account");
        assert!(matches!(err, AuthError::EmailNotVerified { .. }));
        assert!(session.current_user().is_none());
        assert!(events.borrow().is_empty());
    }

    #[rstest]
    fn wrong_password_is_rejected(mut session: AuthSession<MemoryIdentityProvider>) {
        let (mut bus, _) = recording_bus();
        assert_eq!(
            session.sign_in("amira@example.tn", "nope-nope", &mut bus),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[rstest]
    fn registration_sends_verification_and_signs_out(
        mut session: AuthSession<MemoryIdentityProvider>,
    ) {
        let profile = session
            .register("lina@example.tn", "long-enough", "Lina")
            .expect("register");
        assert_eq!(profile.display_name.as_deref(), Some("Lina"));
        assert!(session.current_user().is_none());
        assert_eq!(
            session.provider().verification_emails(),
            &["lina@example.tn".to_owned()]
        );
    }

    #[rstest]
    fn sign_out_publishes_event(mut session: AuthSession<MemoryIdentityProvider>) {
        let (mut bus, events) = recording_bus();
        session
            .sign_in("amira@example.tn", "secret-pass", &mut bus)
            .expect("sign in");
        session.sign_out(&mut bus).expect("sign out");
        assert_eq!(events.borrow().last(), Some(&NavigatorEvent::SignedOut));
        assert_eq!(session.sign_out(&mut bus), Err(AuthError::NotSignedIn));
    }

    #[rstest]
    fn verification_for_verified_user_is_informational(
        mut session: AuthSession<MemoryIdentityProvider>,
    ) {
        let (mut bus, _) = recording_bus();
        assert_eq!(session.send_verification(), Err(AuthError::NotSignedIn));
        session
            .sign_in("amira@example.tn", "secret-pass", &mut bus)
            .expect("sign in");
        assert_eq!(
            session.send_verification(),
            Ok(VerificationOutcome::AlreadyVerified)
        );
    }

    #[rstest]
    fn reset_requires_known_account(mut session: AuthSession<MemoryIdentityProvider>) {
        assert!(session.reset_password("amira@example.tn").is_ok());
        assert!(matches!(
            session.reset_password("ghost@example.tn"),
            Err(AuthError::UnknownAccount { .. })
        ));
    }
}
