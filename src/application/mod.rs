// Application layer - Use cases and ports
pub mod scheduler;
pub mod snapshot_cache;
pub mod telemetry_feed;
pub mod telemetry_service;
