//! Leafletによる MapSurface 実装

use super::bridge::{self, JsIssueMarker, JsLabelOptions, JsPhoto};
use bham311_common::format::escape_html;
use bham311_common::photo::PhotoMarker;
use bham311_common::{BoundaryLayerDef, HeatmapOptions, Issue, LatLng, MapSurface, Result};
use gloo::console;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// マーカーと写真のクリック等、JS側から呼ばれるコールバック
pub struct SurfaceCallbacks {
    /// 引数: Issue ID
    pub open_issue: Closure<dyn Fn(String)>,
    /// 引数: Issue ID。CSSの `url(...)` 値か null の `Promise` を返す
    pub lookup_thumbnail: Closure<dyn Fn(String) -> js_sys::Promise>,
    /// 引数: Issue ID, 画像URL
    pub open_photo: Closure<dyn Fn(String, String)>,
}

pub struct LeafletSurface {
    map: JsValue,
    thumbnail_size: u32,
    callbacks: SurfaceCallbacks,
}

/// JSON互換の形（MapではなくObject）でJSに渡す
fn to_js<T: Serialize + ?Sized>(value: &T) -> Option<JsValue> {
    match value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(js) => Some(js),
        Err(e) => {
            console::error!("JS変換失敗:", e.to_string());
            None
        }
    }
}

impl LeafletSurface {
    pub fn new(map: JsValue, thumbnail_size: u32, callbacks: SurfaceCallbacks) -> Self {
        Self {
            map,
            thumbnail_size,
            callbacks,
        }
    }

    /// 境界定義1件分のレイヤー（ラベル定義ならラベル、必要なら境界線も重ねる）
    pub fn build_boundary_layer(&self, def: &BoundaryLayerDef, geojson: &Value) -> Result<JsValue> {
        let outline = || {
            let style = to_js(&def.line_style()).unwrap_or(JsValue::UNDEFINED);
            let data = to_js(geojson).unwrap_or(JsValue::NULL);
            bridge::geo_json_layer(&data, &style)
        };

        if !def.labels {
            return Ok(outline());
        }

        let labels: Vec<_> = def
            .label_markers(geojson)?
            .into_iter()
            .map(|mut label| {
                label.text = escape_html(&label.text);
                label
            })
            .collect();
        let options = JsLabelOptions::from_def(def);
        let label_layer = match (to_js(&labels), to_js(&options)) {
            (Some(labels), Some(options)) => bridge::label_layer(&labels, &options),
            _ => bridge::empty_layer(),
        };

        if def.outline_with_labels {
            let layers = js_sys::Array::of2(&outline(), &label_layer);
            Ok(bridge::layer_group(&layers))
        } else {
            Ok(label_layer)
        }
    }

    pub fn build_photo_layer(&self, photos: &[PhotoMarker]) -> JsValue {
        let photos: Vec<JsPhoto> = photos.iter().map(JsPhoto::from).collect();
        match to_js(&photos) {
            Some(js) => bridge::photo_layer(
                &js,
                self.thumbnail_size,
                self.callbacks.open_photo.as_ref().unchecked_ref(),
            ),
            None => bridge::empty_layer(),
        }
    }
}

impl MapSurface for LeafletSurface {
    type Layer = JsValue;

    fn add_layer(&mut self, layer: &JsValue) {
        bridge::add_layer(&self.map, layer);
    }

    fn remove_layer(&mut self, layer: &JsValue) {
        bridge::remove_layer(&self.map, layer);
    }

    fn has_layer(&self, layer: &JsValue) -> bool {
        bridge::has_layer(&self.map, layer)
    }

    fn bring_to_front(&mut self, layer: &JsValue) {
        bridge::bring_to_front(layer);
    }

    fn build_marker_layer(&mut self, category: &str, issues: &[Issue]) -> JsValue {
        let markers: Vec<JsIssueMarker> = issues.iter().filter_map(JsIssueMarker::from_issue).collect();
        console::log!(format!("マーカー作成: {} ({}件)", category, markers.len()));
        match to_js(&markers) {
            Some(js) => bridge::marker_layer(
                &js,
                self.thumbnail_size,
                self.callbacks.open_issue.as_ref().unchecked_ref(),
                self.callbacks.lookup_thumbnail.as_ref().unchecked_ref(),
            ),
            None => bridge::empty_layer(),
        }
    }

    fn build_heat_layer(&mut self, points: &[LatLng], options: &HeatmapOptions) -> JsValue {
        match (to_js(points), to_js(options)) {
            (Some(points), Some(options)) => bridge::heat_layer(&points, &options),
            _ => bridge::empty_layer(),
        }
    }
}
