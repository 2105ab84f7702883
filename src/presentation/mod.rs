// Presentation layer - Dashboard composition and device-facing output ports
pub mod dashboard;
pub mod gauge;
pub mod surface;
