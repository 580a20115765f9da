//! Who is on the other end of the form, and what to do when nobody is.

use crate::{checkout::Navigation, models::User};

/// Identity as seen by the address form.
///
/// `Loading` must be kept apart from `Anonymous`: redirecting while the
/// session is still being resolved would bounce a signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    Loading,
    Anonymous,
    Authenticated(User),
}

impl IdentityState {
    pub fn user(&self) -> Option<&User> {
        match self {
            IdentityState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

impl From<Option<User>> for IdentityState {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => IdentityState::Authenticated(user),
            None => IdentityState::Anonymous,
        }
    }
}

/// Entry guard for the address form. Redirects to the cart once, the first
/// time identity resolves to nobody.
#[derive(Debug, Default)]
pub struct IdentityGuard {
    redirected: bool,
}

impl IdentityGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, state: &IdentityState) -> Option<Navigation> {
        match state {
            IdentityState::Loading | IdentityState::Authenticated(_) => None,
            IdentityState::Anonymous if self.redirected => None,
            IdentityState::Anonymous => {
                tracing::debug!("no shopper identity, redirecting to cart");
                self.redirected = true;
                Some(Navigation::Cart)
            }
        }
    }

    pub fn has_redirected(&self) -> bool {
        self.redirected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shopper() -> User {
        User {
            id: "u-1".into(),
            token: "t".into(),
        }
    }

    #[test]
    fn loading_never_redirects() {
        let mut guard = IdentityGuard::new();
        for _ in 0..3 {
            assert_eq!(guard.observe(&IdentityState::Loading), None);
        }
        assert!(!guard.has_redirected());
    }

    #[test]
    fn anonymous_redirects_exactly_once() {
        let mut guard = IdentityGuard::new();
        assert_eq!(guard.observe(&IdentityState::Loading), None);
        assert_eq!(
            guard.observe(&IdentityState::Anonymous),
            Some(Navigation::Cart)
        );
        assert_eq!(guard.observe(&IdentityState::Anonymous), None);
        assert_eq!(guard.observe(&IdentityState::Loading), None);
        assert_eq!(guard.observe(&IdentityState::Anonymous), None);
    }

    #[test]
    fn authenticated_stays_on_form() {
        let mut guard = IdentityGuard::new();
        let state = IdentityState::from(Some(shopper()));
        assert_eq!(guard.observe(&state), None);
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("u-1"));
    }
}
