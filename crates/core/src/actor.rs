//! The three identity classes a request can act under.

use crate::types::DbId;

/// The resolved identity of the caller, supplied by the API layer's
/// auth extractors.
///
/// A caller is exactly one of:
/// - a **guest**, identified by an opaque bearer session token,
/// - a **member**, an authenticated non-admin user,
/// - an **admin**, an authenticated user with the admin flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Guest { token: String },
    Member { user_id: DbId },
    Admin { user_id: DbId },
}

impl Actor {
    /// The internal user id, if the actor is an authenticated user.
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Actor::Guest { .. } => None,
            Actor::Member { user_id } | Actor::Admin { user_id } => Some(*user_id),
        }
    }

    /// The guest session token, if the actor is a guest.
    pub fn guest_token(&self) -> Option<&str> {
        match self {
            Actor::Guest { token } => Some(token),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_has_token_but_no_user_id() {
        let actor = Actor::Guest {
            token: "abc".into(),
        };
        assert_eq!(actor.guest_token(), Some("abc"));
        assert_eq!(actor.user_id(), None);
        assert!(!actor.is_admin());
    }

    #[test]
    fn admin_has_user_id() {
        let actor = Actor::Admin { user_id: 7 };
        assert_eq!(actor.user_id(), Some(7));
        assert!(actor.is_admin());
    }
}
