//! HTTP API handlers for cmx-ui

pub mod export;
pub mod health;
pub mod matrix;
pub mod products;
pub mod snapshot;
pub mod summary;
pub mod tags;
pub mod ui;

pub use export::export_matrix_csv;
pub use health::health_routes;
pub use matrix::{matrix, product_tag_feature_list, tag_feature_list};
pub use products::{product_detail, product_list};
pub use snapshot::{app_state_info, reload};
pub use summary::{summary, update_logs};
pub use tags::tags;
pub use ui::{serve_app_js, serve_index};
