use chrono::NaiveDateTime;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};

/// Category given to articles that did not come from a keyword search.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Search terms that produced an article, stored as a JSON array in a text column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(transparent)]
pub struct Keywords(pub Vec<String>);

impl Keywords {
    pub fn single(term: impl Into<String>) -> Self {
        Keywords(vec![term.into()])
    }
}

impl FromSql<Text, Sqlite> for Keywords {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(Keywords(serde_json::from_str(&raw)?))
    }
}

impl ToSql<Text, Sqlite> for Keywords {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(serde_json::to_string(&self.0)?);
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub cover_url: Option<String>,
    pub account_name: String,
    pub read_count: i64,
    pub like_count: i64,
    pub published_at: NaiveDateTime,
    pub fetched_at: NaiveDateTime,
    pub category: String,
    pub keywords: Keywords,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::articles)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub cover_url: Option<String>,
    pub account_name: String,
    pub read_count: i64,
    pub like_count: i64,
    pub published_at: NaiveDateTime,
    pub fetched_at: NaiveDateTime,
    pub category: String,
    pub keywords: Keywords,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::keyword_configs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct KeywordConfig {
    pub id: i32,
    pub keyword: String,
    pub category: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::keyword_configs)]
pub struct NewKeywordConfig {
    pub keyword: String,
    pub category: String,
    pub is_active: bool,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::keyword_configs)]
pub struct KeywordConfigChanges {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl KeywordConfigChanges {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.category.is_none() && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i32,
    pub account_name: String,
    pub account_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub account_name: String,
    pub account_id: Option<String>,
    pub is_active: bool,
}

/// Partial update; `None` fields are left untouched. `account_id` cannot be
/// cleared through this type.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct SubscriptionChanges {
    pub account_name: Option<String>,
    pub account_id: Option<String>,
    pub is_active: Option<bool>,
}

impl SubscriptionChanges {
    pub fn is_empty(&self) -> bool {
        self.account_name.is_none() && self.account_id.is_none() && self.is_active.is_none()
    }
}
