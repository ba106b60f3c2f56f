//! Runtime configuration and the top-level dashboard state.
//!
//! `DashboardState` is the single owner of the collections, the filters, the
//! loading flag, and the derived view-model. Every mutation goes through a
//! named operation and ends with a full synchronous rebuild, so a consumer
//! can never observe a view-model that lags the state that produced it.

use crate::filter::FilterState;
use crate::model::Collections;
use crate::view::{self, ViewModel};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub data_dir: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("API_BASE")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}

pub struct DashboardState {
    data: Collections,
    filters: FilterState,
    loading: bool,
    view: ViewModel,
}

impl DashboardState {
    /// Starts loading with empty collections and inactive filters.
    pub fn new() -> Self {
        let data = Collections::default();
        let filters = FilterState::new();
        let view = view::build(&data, &filters);
        Self {
            data,
            filters,
            loading: true,
            view,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn data(&self) -> &Collections {
        &self.data
    }

    /// Install the fetched collections and clear the loading flag. Runs once
    /// per load; the flag goes false here on success and failure paths alike
    /// (a failed batch arrives as empty collections).
    pub fn finish_load(&mut self, data: Collections) {
        self.data = data;
        self.loading = false;
        self.recompute();
    }

    pub fn set_project(&mut self, id: &str) {
        // Deliberately leaves an incompatible recipe selector in place.
        self.filters.selected_project = id.to_string();
        self.recompute();
    }

    pub fn set_recipe(&mut self, id: &str) {
        self.filters.selected_recipe = id.to_string();
        self.recompute();
    }

    pub fn set_start_date(&mut self, date: &str) {
        self.filters.start_date = date.to_string();
        self.recompute();
    }

    pub fn set_end_date(&mut self, date: &str) {
        self.filters.end_date = date.to_string();
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.view = view::build(&self.data, &self.filters);
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
