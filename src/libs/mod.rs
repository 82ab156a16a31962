pub mod activity;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod fetcher;
pub mod listener;
pub mod messages;
pub mod notify;
pub mod poller;
pub mod rate_limiter;
pub mod recorder;
pub mod snapshot;
pub mod tracker;
pub mod vehicle;
pub mod view;
