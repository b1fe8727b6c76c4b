//! Leaflet Bridge バインディング
//!
//! 地図の生成とレイヤー操作をJavaScript側（js/leaflet-bridge.js）に委譲する。

use bham311_common::format::{css_color, css_url, escape_html};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/leaflet-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = "createMap", catch)]
    pub fn create_map(container_id: &str, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "addLayer")]
    pub fn add_layer(map: &JsValue, layer: &JsValue);

    #[wasm_bindgen(js_name = "removeLayer")]
    pub fn remove_layer(map: &JsValue, layer: &JsValue);

    #[wasm_bindgen(js_name = "hasLayer")]
    pub fn has_layer(map: &JsValue, layer: &JsValue) -> bool;

    #[wasm_bindgen(js_name = "bringToFront")]
    pub fn bring_to_front(layer: &JsValue);

    #[wasm_bindgen(js_name = "emptyLayer")]
    pub fn empty_layer() -> JsValue;

    #[wasm_bindgen(js_name = "layerGroup")]
    pub fn layer_group(layers: &js_sys::Array) -> JsValue;

    #[wasm_bindgen(js_name = "heatLayer")]
    pub fn heat_layer(points: &JsValue, options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_name = "markerLayer")]
    pub fn marker_layer(
        markers: &JsValue,
        thumbnail_size: u32,
        on_click: &js_sys::Function,
        lookup_thumbnail: &js_sys::Function,
    ) -> JsValue;

    #[wasm_bindgen(js_name = "geoJsonLayer")]
    pub fn geo_json_layer(geojson: &JsValue, style: &JsValue) -> JsValue;

    #[wasm_bindgen(js_name = "labelLayer")]
    pub fn label_layer(labels: &JsValue, options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_name = "photoLayer")]
    pub fn photo_layer(photos: &JsValue, size: u32, on_click: &js_sys::Function) -> JsValue;
}

// ============================================
// JavaScript側に渡すデータ
// ============================================

/// 地図の初期設定
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsMapOptions {
    pub center: bham311_common::LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
    pub tile_subdomains: String,
    pub tile_max_zoom: u8,
}

impl From<&bham311_common::MapConfig> for JsMapOptions {
    fn from(config: &bham311_common::MapConfig) -> Self {
        Self {
            center: config.center,
            zoom: config.zoom,
            min_zoom: config.min_zoom,
            tile_url: config.tile_url.clone(),
            tile_attribution: config.tile_attribution.clone(),
            tile_subdomains: config.tile_subdomains.clone(),
            tile_max_zoom: config.tile_max_zoom,
        }
    }
}

/// カテゴリマーカー1件
///
/// `title` はエスケープ済みHTML、`thumbnail_background` はCSSの `url(...)` 値
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsIssueMarker {
    pub id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub thumbnail_background: Option<String>,
}

impl JsIssueMarker {
    pub fn from_issue(issue: &bham311_common::Issue) -> Option<Self> {
        let position = issue.location()?;
        let category = escape_html(issue.category_name());
        let title = match issue.address_text() {
            Some(address) => format!("{}<br>{}", category, escape_html(address)),
            None => category,
        };
        Some(Self {
            id: issue.id().map(str::to_string),
            lat: position.lat,
            lng: position.lng,
            title,
            thumbnail_background: issue.thumbnail_url().map(css_url),
        })
    }
}

/// 境界ラベルの文字設定
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsLabelOptions {
    pub color: String,
    pub font_size_px: u32,
    pub font_weight: u32,
}

impl JsLabelOptions {
    /// 色として解釈できない値は黒にする
    pub fn from_def(def: &bham311_common::BoundaryLayerDef) -> Self {
        Self {
            color: css_color(&def.color).unwrap_or("black").to_string(),
            font_size_px: def.label_style.font_size_px,
            font_weight: def.label_style.font_weight,
        }
    }
}

/// 写真マーカー1件。`image_url` はクリック時にそのまま返す
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsPhoto {
    pub issue_id: String,
    pub position: bham311_common::LatLng,
    pub image_url: String,
    pub background: String,
}

impl From<&bham311_common::photo::PhotoMarker> for JsPhoto {
    fn from(marker: &bham311_common::photo::PhotoMarker) -> Self {
        Self {
            issue_id: marker.issue_id.clone(),
            position: marker.position,
            image_url: marker.image_url.clone(),
            background: css_url(&marker.image_url),
        }
    }
}
