//! Birmingham 311 Map Common Library
//!
//! 地図クライアント(WASM)から使う型とロジック。ブラウザに依存しないのでホストでテストできる。

pub mod address;
pub mod analytics;
pub mod api;
pub mod boundary;
pub mod category;
pub mod config;
pub mod detail;
pub mod error;
pub mod format;
pub mod geo;
pub mod panel;
pub mod photo;
pub mod route;
pub mod selection;
pub mod surface;
pub mod sync;
pub mod timeline;
pub mod types;
pub mod view_model;

pub use api::{Endpoints, ImageVariant};
pub use boundary::{BoundaryLayerDef, BoundaryRegistry, LabelMarker};
pub use category::{CategoryConfig, CategoryGroup, CategoryGroups, CategoryIndex};
pub use config::{HeatmapOptions, LayerConfigResponse, MapConfig};
pub use detail::IssueDetail;
pub use error::{Error, Result};
pub use selection::SelectedCategories;
pub use surface::MapSurface;
pub use sync::{LayerSynchronizer, SyncReport};
pub use types::{Comment, ImageInfo, Issue, LatLng};
pub use view_model::{Effects, PanelEvent, ViewModel};
