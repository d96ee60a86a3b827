use crate::models::{
    AuditLog, Category, Comment, CommentReply, Post, Report, SavedPost, User,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// DTOs (Data Transfer Objects) define the structure of data exchanged with
// clients. They are separate from database models to control exactly what
// is exposed: password hashes never leave the server, and related records
// are embedded explicitly instead of leaking whole rows.

// ============================================================================
// Authentication DTOs
// ============================================================================

/// Registration request from client
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "confirmPassword")]
    pub password_confirm: String,
}

/// Login request
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

// ============================================================================
// User Response DTOs (filtered data for clients)
// ============================================================================

/// Client-safe user data; excludes the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub enabled: bool,
    #[serde(rename = "isBlocked")]
    pub is_blocked: bool,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            enabled: user.enabled,
            is_blocked: user.blocked,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

/// Single user response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

/// User list with count
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

/// Login success response: the JWT plus the authenticated user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub user: FilterUserDto,
}

/// Generic success response
#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

// ============================================================================
// Category DTOs
// ============================================================================

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CategoryInputDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

impl CategoryDto {
    pub fn filter_category(category: &Category) -> Self {
        CategoryDto {
            id: category.id,
            name: category.name.to_owned(),
        }
    }

    pub fn filter_categories(categories: &[Category]) -> Vec<CategoryDto> {
        categories.iter().map(CategoryDto::filter_category).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponseDto {
    pub status: String,
    pub data: CategoryDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListResponseDto {
    pub status: String,
    pub data: Vec<CategoryDto>,
}

// ============================================================================
// Post DTOs
// ============================================================================

/// Post creation request; `categoryIds` may name categories to attach
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePostDto {
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,

    #[serde(rename = "categoryIds")]
    pub category_ids: Option<Vec<i64>>,
}

/// Post update request; when `categoryIds` is present the attached set is
/// replaced wholesale, when absent it is left untouched
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,

    #[serde(rename = "categoryIds")]
    pub category_ids: Option<Vec<i64>>,
}

/// Full post data with its author and categories embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: String,
    pub author: FilterUserDto,
    pub categories: Vec<CategoryDto>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl PostDto {
    pub fn from_parts(post: &Post, author: &User, categories: Vec<CategoryDto>) -> Self {
        PostDto {
            id: post.id,
            title: post.title.to_owned(),
            content: post.content.to_owned(),
            author_id: author.id.to_string(),
            author: FilterUserDto::filter_user(author),
            categories,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponseDto {
    pub status: String,
    pub data: PostDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostListResponseDto {
    pub status: String,
    pub data: Vec<PostDto>,
    pub results: i64,
}

// ============================================================================
// Comment & Reply DTOs
// ============================================================================

/// Body for creating or editing a comment (and for replies below)
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CommentInputDto {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Content must be between 1 and 1000 characters"
    ))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: i64,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: String,
    pub author: FilterUserDto,
    #[serde(rename = "postId")]
    pub post_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl CommentDto {
    pub fn from_parts(comment: &Comment, author: &User) -> Self {
        CommentDto {
            id: comment.id,
            content: comment.content.to_owned(),
            author_id: author.id.to_string(),
            author: FilterUserDto::filter_user(author),
            post_id: comment.post_id,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponseDto {
    pub status: String,
    pub data: CommentDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentListResponseDto {
    pub status: String,
    pub data: Vec<CommentDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyDto {
    pub id: i64,
    pub content: String,
    #[serde(rename = "authorId")]
    pub author_id: String,
    pub author: FilterUserDto,
    #[serde(rename = "parentCommentId")]
    pub parent_comment_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ReplyDto {
    pub fn from_parts(reply: &CommentReply, author: &User) -> Self {
        ReplyDto {
            id: reply.id,
            content: reply.content.to_owned(),
            author_id: author.id.to_string(),
            author: FilterUserDto::filter_user(author),
            parent_comment_id: reply.comment_id,
            created_at: reply.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyResponseDto {
    pub status: String,
    pub data: ReplyDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyListResponseDto {
    pub status: String,
    pub data: Vec<ReplyDto>,
}

// ============================================================================
// Like & Save DTOs
// ============================================================================

// The toggle/count/boolean endpoints answer with small bare objects rather
// than the status/data envelope; their whole payload is the one fact.

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeToggleResponseDto {
    pub liked: bool,
    #[serde(rename = "likeCount")]
    pub like_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeCountResponseDto {
    #[serde(rename = "likeCount")]
    pub like_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IsLikedResponseDto {
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveToggleResponseDto {
    pub saved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IsSavedResponseDto {
    #[serde(rename = "isSaved")]
    pub is_saved: bool,
}

/// A bookmark with its post embedded, for the "my saved posts" listing
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedPostDto {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub post: PostDto,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl SavedPostDto {
    pub fn from_parts(saved: &SavedPost, post: PostDto) -> Self {
        SavedPostDto {
            id: saved.id,
            user_id: saved.user_id.to_string(),
            post,
            saved_at: saved.saved_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedPostListResponseDto {
    pub status: String,
    pub data: Vec<SavedPostDto>,
}

// ============================================================================
// Report DTOs
// ============================================================================

/// Report creation request
///
/// Exactly one of postId / commentId must be set; the handler rejects
/// anything else before touching the database.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReportDto {
    #[serde(rename = "postId")]
    pub post_id: Option<i64>,

    #[serde(rename = "commentId")]
    pub comment_id: Option<i64>,

    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateReportStatusDto {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportDto {
    pub id: i64,
    #[serde(rename = "reporterId")]
    pub reporter_id: String,
    pub reporter: FilterUserDto,
    #[serde(rename = "postId")]
    pub post_id: Option<i64>,
    #[serde(rename = "commentId")]
    pub comment_id: Option<i64>,
    pub reason: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ReportDto {
    pub fn from_parts(report: &Report, reporter: &User) -> Self {
        ReportDto {
            id: report.id,
            reporter_id: reporter.id.to_string(),
            reporter: FilterUserDto::filter_user(reporter),
            post_id: report.post_id,
            comment_id: report.comment_id,
            reason: report.reason.to_owned(),
            status: report.status.to_str().to_string(),
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponseDto {
    pub status: String,
    pub data: ReportDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportListResponseDto {
    pub status: String,
    pub data: Vec<ReportDto>,
}

// ============================================================================
// Admin DTOs
// ============================================================================

/// Aggregate counters for the admin dashboard
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStatsDto {
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "totalPosts")]
    pub total_posts: i64,
    #[serde(rename = "totalComments")]
    pub total_comments: i64,
    #[serde(rename = "totalReports")]
    pub total_reports: i64,
    #[serde(rename = "pendingReports")]
    pub pending_reports: i64,
}

/// Filters for the audit log listing; either entityType+entityId or
/// actorId, or nothing for the full tail
#[derive(Debug, Deserialize)]
pub struct AuditLogsQueryDto {
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(rename = "entityId")]
    pub entity_id: Option<String>,
    #[serde(rename = "actorId")]
    pub actor_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLogDto {
    pub id: i64,
    #[serde(rename = "actorId")]
    pub actor_id: Option<String>,
    pub action: String,
    #[serde(rename = "entityType")]
    pub entity_type: String,
    #[serde(rename = "entityId")]
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditLogDto {
    pub fn filter_log(log: &AuditLog) -> Self {
        AuditLogDto {
            id: log.id,
            actor_id: log.actor_id.map(|id| id.to_string()),
            action: log.action.to_owned(),
            entity_type: log.entity_type.to_owned(),
            entity_id: log.entity_id.to_owned(),
            timestamp: log.timestamp,
        }
    }

    pub fn filter_logs(logs: &[AuditLog]) -> Vec<AuditLogDto> {
        logs.iter().map(AuditLogDto::filter_log).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLogListResponseDto {
    pub status: String,
    pub data: Vec<AuditLogDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportStatus, UserRole};
    use chrono::Utc;
    use uuid::Uuid;
    use validator::Validate;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hash".to_string(),
            role: UserRole::User,
            enabled: true,
            blocked: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn filter_user_excludes_password_and_uses_camel_case() {
        let user = sample_user();
        let dto = FilterUserDto::filter_user(&user);
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["isBlocked"], false);
        assert!(json.get("password").is_none());
    }

    #[test]
    fn post_dto_embeds_categories_by_id() {
        let author = sample_user();
        let post = Post {
            id: 7,
            user_id: author.id,
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let categories = vec![
            CategoryDto { id: 1, name: "rust".to_string() },
            CategoryDto { id: 2, name: "axum".to_string() },
        ];

        let dto = PostDto::from_parts(&post, &author, categories);
        let ids: Vec<i64> = dto.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["authorId"], author.id.to_string());
        assert_eq!(json["categories"][0]["name"], "rust");
    }

    #[test]
    fn create_report_dto_accepts_camel_case_target_keys() {
        let dto: CreateReportDto =
            serde_json::from_str(r#"{"postId": 4, "reason": "spam"}"#).unwrap();
        assert_eq!(dto.post_id, Some(4));
        assert_eq!(dto.comment_id, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn report_dto_serializes_status_lowercase() {
        let reporter = sample_user();
        let report = Report {
            id: 1,
            reporter_id: reporter.id,
            post_id: Some(4),
            comment_id: None,
            reason: "spam".to_string(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(ReportDto::from_parts(&report, &reporter)).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["postId"], 4);
        assert_eq!(json["commentId"], serde_json::Value::Null);
    }

    #[test]
    fn toggle_responses_use_expected_keys() {
        let like = serde_json::to_value(LikeToggleResponseDto {
            liked: true,
            like_count: 3,
        })
        .unwrap();
        assert_eq!(like["liked"], true);
        assert_eq!(like["likeCount"], 3);

        let saved = serde_json::to_value(SaveToggleResponseDto { saved: false }).unwrap();
        assert_eq!(saved["saved"], false);
    }

    #[test]
    fn admin_stats_serializes_camel_case() {
        let json = serde_json::to_value(AdminStatsDto {
            total_users: 1,
            total_posts: 2,
            total_comments: 3,
            total_reports: 4,
            pending_reports: 5,
        })
        .unwrap();
        assert_eq!(json["totalUsers"], 1);
        assert_eq!(json["pendingReports"], 5);
    }

    #[test]
    fn register_dto_requires_matching_passwords() {
        let dto = RegisterUserDto {
            name: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "different".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn comment_input_enforces_length_bounds() {
        let empty = CommentInputDto { content: "".to_string() };
        assert!(empty.validate().is_err());

        let too_long = CommentInputDto { content: "x".repeat(1001) };
        assert!(too_long.validate().is_err());

        let fine = CommentInputDto { content: "looks good".to_string() };
        assert!(fine.validate().is_ok());
    }
}
