use super::traits::KeywordRepository;
use super::{is_unique_violation, lock};
use crate::errors::ApiError;
use crate::models::{KeywordConfig, KeywordConfigChanges, NewKeywordConfig};
use crate::schema::keyword_configs;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteKeywordRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteKeywordRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

fn map_write_error(err: diesel::result::Error) -> ApiError {
    if is_unique_violation(&err) {
        ApiError::AlreadyExists("Keyword")
    } else {
        ApiError::DatabaseError(err)
    }
}

#[async_trait]
impl KeywordRepository for SqliteKeywordRepository {
    async fn list_all(&self) -> Result<Vec<KeywordConfig>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = keyword_configs::table
            .select(KeywordConfig::as_select())
            .order_by((keyword_configs::created_at.desc(), keyword_configs::id.desc()))
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn list_active(&self) -> Result<Vec<KeywordConfig>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = keyword_configs::table
            .filter(keyword_configs::is_active.eq(true))
            .select(KeywordConfig::as_select())
            .order_by(keyword_configs::id.asc())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn create(&self, keyword: &NewKeywordConfig) -> Result<KeywordConfig, ApiError> {
        let mut conn = lock(&self.db)?;
        diesel::insert_into(keyword_configs::table)
            .values(keyword)
            .returning(KeywordConfig::as_returning())
            .get_result(&mut *conn)
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        id: i32,
        changes: &KeywordConfigChanges,
    ) -> Result<Option<KeywordConfig>, ApiError> {
        let mut conn = lock(&self.db)?;

        // An empty changeset is rejected by diesel, so read the row instead.
        if changes.is_empty() {
            let result = keyword_configs::table
                .find(id)
                .select(KeywordConfig::as_select())
                .first(&mut *conn)
                .optional()?;
            return Ok(result);
        }

        diesel::update(keyword_configs::table.find(id))
            .set(changes)
            .returning(KeywordConfig::as_returning())
            .get_result(&mut *conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut conn = lock(&self.db)?;
        let deleted = diesel::delete(keyword_configs::table.find(id)).execute(&mut *conn)?;
        Ok(deleted > 0)
    }

    async fn seed_defaults(&self, defaults: &[NewKeywordConfig]) -> Result<usize, ApiError> {
        let mut conn = lock(&self.db)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let existing: i64 = keyword_configs::table.count().get_result(conn)?;
            if existing > 0 {
                return Ok(0);
            }
            diesel::insert_into(keyword_configs::table)
                .values(defaults)
                .execute(conn)
        })
        .map_err(ApiError::from)
    }
}

/// Keywords a fresh installation starts with.
pub fn default_keywords() -> Vec<NewKeywordConfig> {
    [
        ("健康", "健康养生"),
        ("养生", "健康养生"),
        ("科技", "科技数码"),
        ("互联网", "科技数码"),
        ("职场", "职场成长"),
        ("理财", "财经理财"),
    ]
    .into_iter()
    .map(|(keyword, category)| NewKeywordConfig {
        keyword: keyword.to_string(),
        category: category.to_string(),
        is_active: true,
    })
    .collect()
}
