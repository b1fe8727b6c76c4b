//! UIコンポーネント

pub mod boundary_controls;
pub mod category_list;
pub mod issue_modal;
pub mod layer_panel;
pub mod photo_viewer;
pub mod sidebar;
pub mod stats_block;
