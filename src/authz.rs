use uuid::Uuid;

use crate::models::{Comment, CommentReply, Post, Report, User, UserRole};

/// Resources that belong to a single user
///
/// Implemented by every entity with an author/reporter column so the
/// ownership rule below can be written once instead of inline in each
/// mutating handler.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for CommentReply {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Report {
    fn owner_id(&self) -> Uuid {
        self.reporter_id
    }
}

/// The single authorization rule for mutating operations: the actor may
/// update or delete a resource when they own it or hold the admin role.
pub fn can_modify<R: Owned>(actor: &User, resource: &R) -> bool {
    actor.role == UserRole::Admin || actor.id == resource.owner_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "tester".to_string(),
            email: "tester@example.com".to_string(),
            password: "hash".to_string(),
            role,
            enabled: true,
            blocked: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn make_post(user_id: Uuid) -> Post {
        Post {
            id: 1,
            user_id,
            title: "title".to_string(),
            content: "content".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_may_modify_own_post() {
        let owner = make_user(UserRole::User);
        let post = make_post(owner.id);
        assert!(can_modify(&owner, &post));
    }

    #[test]
    fn admin_may_modify_any_post() {
        let admin = make_user(UserRole::Admin);
        let post = make_post(Uuid::new_v4());
        assert!(can_modify(&admin, &post));
    }

    #[test]
    fn stranger_may_not_modify_post() {
        let stranger = make_user(UserRole::User);
        let post = make_post(Uuid::new_v4());
        assert!(!can_modify(&stranger, &post));
    }

    #[test]
    fn report_owner_is_the_reporter() {
        let reporter = make_user(UserRole::User);
        let report = Report {
            id: 9,
            reporter_id: reporter.id,
            post_id: Some(1),
            comment_id: None,
            reason: "spam".to_string(),
            status: crate::models::ReportStatus::Pending,
            created_at: Utc::now(),
        };
        assert!(can_modify(&reporter, &report));

        let other = make_user(UserRole::User);
        assert!(!can_modify(&other, &report));
    }
}
