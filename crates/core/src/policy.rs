//! Access policy for the three actor classes.
//!
//! Policy table (see the handler modules for the call sites):
//!
//! | Action                          | Guest | Member | Admin |
//! |---------------------------------|-------|--------|-------|
//! | Create print/filament request   | yes   | yes    | yes   |
//! | View own request                | yes   | yes    | yes   |
//! | View public requests            | yes   | yes    | yes   |
//! | View all requests               | no    | no     | yes   |
//! | Edit own request (pre-Accepted) | yes   | yes    | yes   |
//! | Change request status           | no    | no     | yes   |
//! | Edit arbitrary request          | no    | no     | yes   |
//! | Manage filaments / printers     | no    | no     | yes   |
//!
//! Which *fields* an owner may edit is enforced structurally: the
//! owner-edit DTO simply does not carry the admin-only fields.

use crate::actor::Actor;
use crate::error::CoreError;
use crate::types::DbId;

/// Require the admin capability, returning the admin's user id.
///
/// Guests and members always receive `Forbidden`, regardless of what
/// they own -- this is never downgraded.
pub fn ensure_admin(actor: &Actor) -> Result<DbId, CoreError> {
    match actor {
        Actor::Admin { user_id } => Ok(*user_id),
        _ => Err(CoreError::Forbidden("Admin capability required".into())),
    }
}

/// Whether the actor owns a request tagged with the given user id or
/// guest token.
///
/// Ownership is by user-id match for members/admins and by bearer
/// token match for guests. A request carries exactly one of the two
/// tags.
pub fn is_owner(
    actor: &Actor,
    owner_user_id: Option<DbId>,
    owner_guest_token: Option<&str>,
) -> bool {
    match actor {
        Actor::Guest { token } => owner_guest_token == Some(token.as_str()),
        Actor::Member { user_id } | Actor::Admin { user_id } => owner_user_id == Some(*user_id),
    }
}

/// Require that the actor may view a request: admins see everything,
/// owners see their own, and anyone sees public requests.
pub fn ensure_can_view(
    actor: &Actor,
    owner_user_id: Option<DbId>,
    owner_guest_token: Option<&str>,
    is_public: bool,
) -> Result<(), CoreError> {
    if actor.is_admin() || is_public || is_owner(actor, owner_user_id, owner_guest_token) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not permitted to view this request".into(),
        ))
    }
}

/// Require that the actor may edit a request through the owner
/// surface.
///
/// Admins pass unconditionally. Owners pass only while the request is
/// still in an owner-editable state (`editable_state` -- pending or
/// accepted, decided by the caller from the current status).
pub fn ensure_owner_can_edit(
    actor: &Actor,
    owner_user_id: Option<DbId>,
    owner_guest_token: Option<&str>,
    editable_state: bool,
) -> Result<(), CoreError> {
    if actor.is_admin() {
        return Ok(());
    }
    if !is_owner(actor, owner_user_id, owner_guest_token) {
        return Err(CoreError::Forbidden(
            "Only the request owner may edit it".into(),
        ));
    }
    if !editable_state {
        return Err(CoreError::InvalidArgument(
            "Request can no longer be edited by its owner".into(),
        ));
    }
    Ok(())
}

/// Whether a status transition is allowed.
///
/// Deliberately permissive: any admin may move a request to any
/// target state. Kept as the single substitution point so a stricter
/// transition graph can be introduced without touching callers.
pub fn transition_allowed<S>(_from: &S, _to: &S) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn guest() -> Actor {
        Actor::Guest {
            token: "tok-1".into(),
        }
    }

    #[test]
    fn ensure_admin_rejects_guest_and_member() {
        assert_matches!(ensure_admin(&guest()), Err(CoreError::Forbidden(_)));
        assert_matches!(
            ensure_admin(&Actor::Member { user_id: 3 }),
            Err(CoreError::Forbidden(_))
        );
        assert_eq!(ensure_admin(&Actor::Admin { user_id: 9 }).unwrap(), 9);
    }

    #[test]
    fn guest_owns_by_token_only() {
        assert!(is_owner(&guest(), None, Some("tok-1")));
        assert!(!is_owner(&guest(), None, Some("tok-2")));
        // A guest never owns a user-tagged request.
        assert!(!is_owner(&guest(), Some(3), None));
    }

    #[test]
    fn member_owns_by_user_id_only() {
        let member = Actor::Member { user_id: 3 };
        assert!(is_owner(&member, Some(3), None));
        assert!(!is_owner(&member, Some(4), None));
        assert!(!is_owner(&member, None, Some("tok-1")));
    }

    #[test]
    fn non_public_request_hidden_from_strangers() {
        let member = Actor::Member { user_id: 3 };
        assert_matches!(
            ensure_can_view(&member, Some(4), None, false),
            Err(CoreError::Forbidden(_))
        );
        assert!(ensure_can_view(&member, Some(4), None, true).is_ok());
        assert!(ensure_can_view(&member, Some(3), None, false).is_ok());
        assert!(ensure_can_view(&Actor::Admin { user_id: 1 }, Some(4), None, false).is_ok());
    }

    #[test]
    fn owner_edit_blocked_after_accepted_state() {
        let member = Actor::Member { user_id: 3 };
        assert!(ensure_owner_can_edit(&member, Some(3), None, true).is_ok());
        assert_matches!(
            ensure_owner_can_edit(&member, Some(3), None, false),
            Err(CoreError::InvalidArgument(_))
        );
        // Admins bypass the state gate.
        assert!(ensure_owner_can_edit(&Actor::Admin { user_id: 1 }, Some(3), None, false).is_ok());
    }

    #[test]
    fn transitions_are_permissive() {
        assert!(transition_allowed(&"pending", &"completed"));
        assert!(transition_allowed(&"completed", &"pending"));
    }
}
