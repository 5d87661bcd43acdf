pub mod articles;
pub mod keywords;
pub mod subscriptions;
pub mod traits;

use std::sync::{Mutex, MutexGuard};

use diesel::sqlite::SqliteConnection;
use tracing::error;

use crate::errors::ApiError;

pub use articles::SqliteArticleRepository;
pub use keywords::SqliteKeywordRepository;
pub use subscriptions::SqliteSubscriptionRepository;
pub use traits::{
    ArticleRepository, ArticleSort, KeywordRepository, ListArticlesParams, ListArticlesResult,
    SubscriptionRepository,
};

fn lock(db: &Mutex<SqliteConnection>) -> Result<MutexGuard<'_, SqliteConnection>, ApiError> {
    db.lock().map_err(|_| {
        error!("Database connection mutex poisoned");
        ApiError::InternalError
    })
}

fn is_unique_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}
