#[path = "../common/mod.rs"]
mod common;

mod articles;
mod cron;
mod health;
mod keywords;
mod subscriptions;
