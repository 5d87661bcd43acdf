use super::traits::SubscriptionRepository;
use super::{is_unique_violation, lock};
use crate::errors::ApiError;
use crate::models::{NewSubscription, Subscription, SubscriptionChanges};
use crate::schema::subscriptions;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteSubscriptionRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteSubscriptionRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }
}

fn map_write_error(err: diesel::result::Error) -> ApiError {
    if is_unique_violation(&err) {
        ApiError::AlreadyExists("Subscription")
    } else {
        ApiError::DatabaseError(err)
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn list_all(&self) -> Result<Vec<Subscription>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = subscriptions::table
            .select(Subscription::as_select())
            .order_by((subscriptions::created_at.desc(), subscriptions::id.desc()))
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn list_active(&self) -> Result<Vec<Subscription>, ApiError> {
        let mut conn = lock(&self.db)?;
        let result = subscriptions::table
            .filter(subscriptions::is_active.eq(true))
            .select(Subscription::as_select())
            .order_by(subscriptions::id.asc())
            .load(&mut *conn)?;
        Ok(result)
    }

    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, ApiError> {
        let mut conn = lock(&self.db)?;
        diesel::insert_into(subscriptions::table)
            .values(subscription)
            .returning(Subscription::as_returning())
            .get_result(&mut *conn)
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        id: i32,
        changes: &SubscriptionChanges,
    ) -> Result<Option<Subscription>, ApiError> {
        let mut conn = lock(&self.db)?;

        if changes.is_empty() {
            let result = subscriptions::table
                .find(id)
                .select(Subscription::as_select())
                .first(&mut *conn)
                .optional()?;
            return Ok(result);
        }

        diesel::update(subscriptions::table.find(id))
            .set(changes)
            .returning(Subscription::as_returning())
            .get_result(&mut *conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut conn = lock(&self.db)?;
        let deleted = diesel::delete(subscriptions::table.find(id)).execute(&mut *conn)?;
        Ok(deleted > 0)
    }
}
