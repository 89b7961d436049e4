// Application layer - panel build pipeline and use cases
pub mod aggregator;
pub mod dashboard_service;
pub mod hover;
pub mod panel_builder;
pub mod panel_registry;
pub mod point_storage;
pub mod series_builder;
