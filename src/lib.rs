pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod normalize;
pub mod notify;
pub mod radio;
pub mod services;
pub mod watch;

/// Custom data passed to all commands
pub struct Data {
    pub config: config::Config,
    pub http_client: reqwest::Client,
    pub db: db::Database,
    pub watch: services::watchword::WatchwordService,
    pub notifier: notify::Notifier,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
