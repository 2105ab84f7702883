// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod console;
pub mod host;
pub mod http_feed;
