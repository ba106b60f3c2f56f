//! Analytics core for the integration-platform dashboard: load four
//! collections from the backend API, filter them client-side, and derive
//! the render-ready view-model.

pub mod api;
pub mod filter;
pub mod logging;
pub mod model;
pub mod render;
pub mod state;
pub mod view;
