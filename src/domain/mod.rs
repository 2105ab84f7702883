// Domain layer - Core telemetry and plotting models
pub mod plot;
pub mod telemetry;
pub mod zoom;
