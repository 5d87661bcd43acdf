#![allow(dead_code)]

use axum_test::TestServer;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};
use wechat_digest_service::{
    DefaultAppState,
    config::Settings,
    create_app,
    test_helpers::{StubFetcher, establish_test_connection, test_settings},
};

pub use wechat_digest_service::test_helpers::{
    TEST_ADMIN_PASSWORD, TEST_CRON_SECRET, listing_item, listing_page, test_utils,
};

pub type TestState = DefaultAppState<StubFetcher>;

pub fn create_test_state(
    fetcher: StubFetcher,
    settings: Settings,
) -> (TestState, Arc<Mutex<SqliteConnection>>) {
    let db = Arc::new(Mutex::new(establish_test_connection()));
    let state = DefaultAppState::with_fetcher(db.clone(), fetcher, settings);
    (state, db)
}

pub mod server_utils {
    use super::*;

    pub fn create_test_server() -> (TestServer, Arc<Mutex<SqliteConnection>>) {
        let (server, _state, db) = create_test_server_with(StubFetcher::new(), test_settings());
        (server, db)
    }

    pub fn create_test_server_with(
        fetcher: StubFetcher,
        settings: Settings,
    ) -> (TestServer, TestState, Arc<Mutex<SqliteConnection>>) {
        let (state, db) = create_test_state(fetcher, settings);
        let server = TestServer::new(create_app(state.clone())).unwrap();
        (server, state, db)
    }
}
