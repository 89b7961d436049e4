// Domain layer - panels, points and payloads
pub mod dashboard;
pub mod error;
pub mod panel;
pub mod payload;
pub mod telemetry;
