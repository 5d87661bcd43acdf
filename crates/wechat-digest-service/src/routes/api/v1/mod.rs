use axum::{
    Router,
    routing::{get, put},
};

use crate::AppState;

mod articles;
mod cron;
mod keywords;
mod subscriptions;

pub fn create_api_v1_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/articles", get(articles::list_articles::<S>))
        .route(
            "/keywords",
            get(keywords::list_keywords::<S>).post(keywords::create_keyword::<S>),
        )
        .route(
            "/keywords/{id}",
            put(keywords::update_keyword::<S>).delete(keywords::delete_keyword::<S>),
        )
        .route(
            "/subscriptions",
            get(subscriptions::list_subscriptions::<S>)
                .post(subscriptions::create_subscription::<S>),
        )
        .route(
            "/subscriptions/{id}",
            put(subscriptions::update_subscription::<S>)
                .delete(subscriptions::delete_subscription::<S>),
        )
        .route("/cron/fetch", get(cron::trigger_fetch::<S>))
}
