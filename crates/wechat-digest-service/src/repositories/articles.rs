use super::traits::{ArticleRepository, ArticleSort, ListArticlesParams, ListArticlesResult};
use super::lock;
use crate::errors::ApiError;
use crate::models::{Article, NewArticle};
use crate::schema::articles;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel::upsert::excluded;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteArticleRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteArticleRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

/// `%needle%` with LIKE metacharacters escaped by `\`.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// SQLite LIKE folds ASCII case only.
fn filtered(params: &ListArticlesParams) -> articles::BoxedQuery<'static, Sqlite> {
    let mut query = articles::table.into_boxed();

    if let Some(category) = &params.category {
        query = query.filter(articles::category.eq(category.clone()));
    }

    if let Some(keyword) = &params.keyword {
        let pattern = like_pattern(keyword);
        query = query.filter(
            articles::title
                .like(pattern.clone())
                .escape('\\')
                .or(articles::summary.like(pattern).escape('\\')),
        );
    }

    if let Some(account) = &params.account {
        query = query.filter(
            articles::account_name
                .like(like_pattern(account))
                .escape('\\'),
        );
    }

    query
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn upsert(&self, article: &NewArticle) -> Result<(), ApiError> {
        let mut conn = lock(&self.db)?;
        diesel::insert_into(articles::table)
            .values(article)
            .on_conflict(articles::url)
            .do_update()
            .set((
                articles::read_count.eq(excluded(articles::read_count)),
                articles::like_count.eq(excluded(articles::like_count)),
            ))
            .execute(&mut *conn)?;
        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = articles::table
            .filter(articles::url.eq(url))
            .select(Article::as_select())
            .first::<Article>(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn list(&self, params: &ListArticlesParams) -> Result<ListArticlesResult, ApiError> {
        let mut conn = lock(&self.db)?;

        let total: i64 = filtered(params).count().get_result(&mut *conn)?;

        let query = filtered(params).select(Article::as_select());
        let query = match params.sort {
            ArticleSort::Hot => query.order_by((
                articles::read_count.desc(),
                articles::published_at.desc(),
                articles::id.desc(),
            )),
            ArticleSort::Latest => {
                query.order_by((articles::published_at.desc(), articles::id.desc()))
            }
        };

        let items = query
            .limit(i64::from(params.limit))
            .offset(i64::from(params.offset))
            .load::<Article>(&mut *conn)?;

        Ok(ListArticlesResult {
            items,
            total: total as u64,
        })
    }
}
