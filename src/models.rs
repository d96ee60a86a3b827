use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User role enumeration for role-based access control (RBAC)
///
/// Stored in the database as a PostgreSQL ENUM type called "user_role".
/// The `#[sqlx(type_name = "user_role", rename_all = "lowercase")]` attribute
/// maps variants to their lowercase database form (Admin -> "admin").
///
/// `PartialEq` enables direct comparisons like `user.role == UserRole::Admin`,
/// which the authorization predicate and the role-check middleware rely on.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Admin, // Full system access, including moderation and user management
    User,  // Standard permissions: author posts, comment, like, save, report
}

impl UserRole {
    /// Convert role to its string representation (used in DTOs and the JWT role claim)
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

/// Review state of an abuse report
///
/// Stored as the PostgreSQL ENUM "report_status". New reports always start
/// as Pending; administrators move them to Reviewed or Dismissed.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Dismissed,
}

impl ReportStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    /// Parse a client-supplied status string, case-insensitively
    /// ("PENDING" and "pending" are both accepted). Returns None for
    /// anything else so the handler can reject with a 400.
    pub fn from_str(value: &str) -> Option<ReportStatus> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Some(ReportStatus::Pending),
            "reviewed" => Some(ReportStatus::Reviewed),
            "dismissed" => Some(ReportStatus::Dismissed),
            _ => None,
        }
    }
}

/// User model representing the users table
///
/// Maps directly to database rows via SQLx's FromRow derive.
///
/// Security notes:
/// - `password`: stores the argon2 hash, never plain text
/// - `enabled`: account active flag (reserved for deactivation flows)
/// - `blocked`: set by administrators; blocked users fail authentication
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid, // Primary key (UUID rather than a guessable sequential id)
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub enabled: bool,
    pub blocked: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Blog post authored by a user
///
/// Categories are attached through the post_categories join table
/// (many-to-many) and are loaded with an explicit join, never lazily.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub id: i64,
    pub user_id: Uuid, // Foreign key: the author
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category with a unique name, referenced by posts
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Comment on a post (one post, many comments)
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Comment {
    pub id: i64,
    pub user_id: Uuid, // Foreign key: who wrote this comment
    pub post_id: i64,  // Foreign key: which post it belongs to
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-level reply to a comment
///
/// Replies hang off a comment, never off another reply; the nesting
/// stops at depth one by construction.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct CommentReply {
    pub id: i64,
    pub user_id: Uuid,
    pub comment_id: i64, // Foreign key: the parent comment
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Like marker: the row's existence IS the state
///
/// (post_id, user_id) carries a unique index, so a user can like a post
/// at most once.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PostLike {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Bookmark pairing a user with a post, unique per (user_id, post_id)
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct SavedPost {
    pub id: i64,
    pub user_id: Uuid,
    pub post_id: i64,
    pub saved_at: DateTime<Utc>,
}

/// Abuse report filed against a post or a comment
///
/// Exactly one of post_id / comment_id is set; a CHECK constraint in the
/// schema enforces it alongside the handler-level validation.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Report {
    pub id: i64,
    pub reporter_id: Uuid,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Append-only record of a named action
///
/// `actor_id` is optional: the acting user may be unresolvable (or later
/// deleted, the FK sets it to NULL) and the entry must survive either way.
/// `entity_id` is stored as text because users are keyed by UUID while
/// every other entity uses a numeric id.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct AuditLog {
    pub id: i64,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_status_parses_any_casing() {
        assert_eq!(
            ReportStatus::from_str("PENDING"),
            Some(ReportStatus::Pending)
        );
        assert_eq!(
            ReportStatus::from_str("reviewed"),
            Some(ReportStatus::Reviewed)
        );
        assert_eq!(
            ReportStatus::from_str("Dismissed"),
            Some(ReportStatus::Dismissed)
        );
    }

    #[test]
    fn report_status_rejects_unknown_values() {
        assert_eq!(ReportStatus::from_str("approved"), None);
        assert_eq!(ReportStatus::from_str(""), None);
    }

    #[test]
    fn report_status_round_trips_through_to_str() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Reviewed,
            ReportStatus::Dismissed,
        ] {
            assert_eq!(ReportStatus::from_str(status.to_str()), Some(status));
        }
    }
}
