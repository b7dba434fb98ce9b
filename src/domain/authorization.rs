//! Authorization layer
//!
//! Decides whether an authenticated principal may perform an operation on a
//! resource. Callers resolve the resource's owner first (see
//! `services::ownership`) and hand the result in as a [`Resource`].
//! A denial is reported to clients as `NotFound` so that the existence of
//! other users' records is never revealed.

use super::DomainError;

/// The authenticated user making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Delete
        )
    }
}

/// A resource reduced to the facts the rules need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Shared catalog data, not owner-scoped
    Book,
    Shelf { owner_id: i32 },
    UserBook { owner_id: i32 },
    ReadingSession { owner_id: i32 },
    Note { owner_id: i32 },
    Review { owner_id: i32, is_public: bool },
    Quote { owner_id: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn authorize(principal: &Principal, resource: &Resource, operation: Operation) -> Decision {
    let owns = |owner_id: i32| {
        if owner_id == principal.user_id {
            Decision::Allow
        } else {
            Decision::Deny
        }
    };

    match *resource {
        Resource::Book => Decision::Allow,
        Resource::Shelf { owner_id }
        | Resource::UserBook { owner_id }
        | Resource::ReadingSession { owner_id }
        | Resource::Note { owner_id }
        | Resource::Quote { owner_id } => owns(owner_id),
        Resource::Review {
            owner_id,
            is_public,
        } => {
            // Public reviews only leak through listings; detail access stays owner-scoped
            if operation == Operation::List && is_public {
                Decision::Allow
            } else {
                owns(owner_id)
            }
        }
    }
}

/// `authorize`, with a denial turned into `NotFound`
pub fn ensure(
    principal: &Principal,
    resource: &Resource,
    operation: Operation,
) -> Result<(), DomainError> {
    match authorize(principal, resource, operation) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!(
                user_id = principal.user_id,
                ?resource,
                ?operation,
                write = operation.is_write(),
                "Access denied"
            );
            Err(DomainError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal {
            user_id: 1,
            username: "alice".to_string(),
        }
    }

    #[test]
    fn books_are_open_to_any_principal() {
        for op in [
            Operation::List,
            Operation::Read,
            Operation::Create,
            Operation::Update,
            Operation::Delete,
        ] {
            assert_eq!(authorize(&alice(), &Resource::Book, op), Decision::Allow);
        }
    }

    #[test]
    fn owned_resources_require_ownership() {
        let mine = Resource::Shelf { owner_id: 1 };
        let theirs = Resource::Quote { owner_id: 2 };

        assert_eq!(authorize(&alice(), &mine, Operation::Update), Decision::Allow);
        assert_eq!(authorize(&alice(), &theirs, Operation::Read), Decision::Deny);
        assert_eq!(authorize(&alice(), &theirs, Operation::List), Decision::Deny);
    }

    #[test]
    fn public_reviews_are_visible_only_in_listings() {
        let public = Resource::Review {
            owner_id: 2,
            is_public: true,
        };
        let private = Resource::Review {
            owner_id: 2,
            is_public: false,
        };

        assert_eq!(authorize(&alice(), &public, Operation::List), Decision::Allow);
        assert_eq!(authorize(&alice(), &public, Operation::Read), Decision::Deny);
        assert_eq!(authorize(&alice(), &public, Operation::Delete), Decision::Deny);
        assert_eq!(authorize(&alice(), &private, Operation::List), Decision::Deny);
    }

    #[test]
    fn denial_maps_to_not_found() {
        let err = ensure(&alice(), &Resource::UserBook { owner_id: 9 }, Operation::Read)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
