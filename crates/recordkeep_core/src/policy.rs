//! crates/recordkeep_core/src/policy.rs
//!
//! The single authorization rule consulted before every console operation.

use crate::domain::{Action, EntityKind, Role};

/// Returns whether `role` may perform `action` on the `entity` collection.
///
/// admin: everything. moderator: read/create/update on everything but users.
/// user: read on everything but users.
pub fn can(role: Role, action: Action, entity: EntityKind) -> bool {
    match (role, entity) {
        (Role::Admin, _) => true,
        (_, EntityKind::User) => false,
        (Role::Moderator, _) => action != Action::Delete,
        (Role::User, _) => action == Action::Read,
    }
}

/// The actions `role` may perform on `entity`, in `Action::ALL` order.
pub fn allowed_actions(role: Role, entity: EntityKind) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| can(role, *action, entity))
        .collect()
}

/// One human-readable line per role, e.g. for the dashboard.
pub fn describe(role: Role) -> String {
    let mut parts = Vec::new();
    for entity in EntityKind::ALL {
        let actions = allowed_actions(role, entity);
        if actions.is_empty() {
            continue;
        }
        let verbs: Vec<&str> = actions.iter().map(Action::as_str).collect();
        parts.push(format!("{}: {}", entity.plural().to_lowercase(), verbs.join("/")));
    }
    format!("{} can {}", role, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_do_everything() {
        for entity in EntityKind::ALL {
            for action in Action::ALL {
                assert!(can(Role::Admin, action, entity), "{action} {entity}");
            }
        }
    }

    #[test]
    fn only_admin_touches_users() {
        for action in Action::ALL {
            assert!(!can(Role::Moderator, action, EntityKind::User));
            assert!(!can(Role::User, action, EntityKind::User));
        }
    }

    #[test]
    fn moderator_creates_and_updates_but_never_deletes() {
        for entity in [
            EntityKind::Person,
            EntityKind::Company,
            EntityKind::Category,
            EntityKind::Record,
        ] {
            assert!(can(Role::Moderator, Action::Read, entity));
            assert!(can(Role::Moderator, Action::Create, entity));
            assert!(can(Role::Moderator, Action::Update, entity));
            assert!(!can(Role::Moderator, Action::Delete, entity));
        }
    }

    #[test]
    fn user_is_read_only() {
        assert_eq!(
            allowed_actions(Role::User, EntityKind::Record),
            vec![Action::Read]
        );
        assert!(allowed_actions(Role::User, EntityKind::User).is_empty());
    }

    #[test]
    fn capabilities_nest() {
        for entity in EntityKind::ALL {
            for action in Action::ALL {
                if can(Role::User, action, entity) {
                    assert!(can(Role::Moderator, action, entity));
                }
                if can(Role::Moderator, action, entity) {
                    assert!(can(Role::Admin, action, entity));
                }
            }
        }
    }

    #[test]
    fn describe_skips_unreachable_collections() {
        let line = describe(Role::User);
        assert!(line.starts_with("user can "));
        assert!(!line.contains("users:"));
        assert!(line.contains("records: read"));
    }
}
