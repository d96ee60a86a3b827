use sqlx::{Pool, Postgres};

mod user;
pub use user::UserExt;

mod post;
pub use post::PostExt;

mod category;
pub use category::CategoryExt;

mod comment;
pub use comment::CommentExt;

mod reply;
pub use reply::ReplyExt;

mod like;
pub use like::LikeExt;

mod saved;
pub use saved::SavedExt;

mod report;
pub use report::ReportExt;

mod audit;
pub use audit::AuditExt;

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: Pool<Postgres>,
}
impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}
