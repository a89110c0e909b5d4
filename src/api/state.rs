//! Application state for the grade engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::service::ReportService;

/// Shared application state.
///
/// Holds the report pipeline built from the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    service: Arc<ReportService>,
}

impl AppState {
    /// Creates a new application state around a report service.
    pub fn new(service: ReportService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the report service.
    pub fn service(&self) -> &ReportService {
        &self.service
    }
}
