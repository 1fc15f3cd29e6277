//! Resource mutation authorization.

use crate::models::identity::{PublicIdentity, Role};

/// Owner-or-admin rule for mutating a resource.
///
/// Pure: the caller loads the resource and supplies its owner id. Edit and
/// delete use the same rule.
pub fn can_mutate(identity: &PublicIdentity, resource_owner_id: &str) -> bool {
    identity.role == Role::Admin || identity.id == resource_owner_id
}
