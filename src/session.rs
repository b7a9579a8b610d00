use crate::models::User;

/// Explicit session handle passed to flows that need identity.
///
/// Lifecycle: anonymous → authenticated → anonymous. Credential exchange
/// itself is handled by the auth provider behind the gateway; this type
/// only tracks who the client believes is signed in.
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Session {
    pub fn authenticate(&mut self, user: User) {
        *self = Session::Authenticated(user);
    }

    pub fn sign_out(&mut self) {
        *self = Session::Anonymous;
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}
