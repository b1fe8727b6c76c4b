//! 地図描画（Leaflet）

mod bridge;
mod surface;

pub use bridge::{create_map, JsMapOptions};
pub use surface::{LeafletSurface, SurfaceCallbacks};
