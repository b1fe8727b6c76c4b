//! 境界レイヤー
//!
//! 市域・コミュニティ・近隣地区・郵便番号区域の境界線とラベル。
//! カテゴリ選択とは独立して表示状態を持つ。

use crate::error::Result;
use crate::geo::{label_features, LabelFeature};
use crate::surface::MapSurface;
use crate::types::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 境界線の描画スタイル（Leafletのpathオプション）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundaryStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill: bool,
    pub fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            color: "white".into(),
            weight: 2.0,
            opacity: 0.5,
            fill: false,
            fill_opacity: 0.0,
            fill_color: None,
            class_name: None,
        }
    }
}

impl BoundaryStyle {
    fn outline(color: &str, weight: f64, opacity: f64) -> Self {
        Self {
            color: color.into(),
            weight,
            opacity,
            class_name: Some("multiply-blend".into()),
            ..Default::default()
        }
    }
}

/// ラベル位置の決め方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelPlacement {
    /// 頂点の重心
    #[default]
    Centroid,
    /// 外接矩形の中心
    BoundsCenter,
}

/// ラベルの文字スタイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelStyle {
    pub font_size_px: u32,
    pub font_weight: u32,
    pub placement: LabelPlacement,
    /// 配置後に加える (緯度, 経度) のずれ
    pub offset: (f64, f64),
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size_px: 9,
            font_weight: 400,
            placement: LabelPlacement::Centroid,
            offset: (0.0, 0.0),
        }
    }
}

/// 境界レイヤー定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryLayerDef {
    pub name: String,
    /// `/api/boundaries/{filename}`
    pub filename: String,
    pub color: String,
    pub visible: bool,
    /// trueなら地物ごとのラベルレイヤー
    #[serde(default)]
    pub labels: bool,
    /// ラベルレイヤーでも境界線を描く
    #[serde(default)]
    pub outline_with_labels: bool,
    /// 表示変更のたびに最前面へ
    #[serde(default)]
    pub keep_on_top: bool,
    /// パネルで字下げ表示
    #[serde(default)]
    pub indent: bool,
    #[serde(default)]
    pub style: Option<BoundaryStyle>,
    #[serde(default)]
    pub label_style: LabelStyle,
}

impl BoundaryLayerDef {
    pub fn new(name: &str, filename: &str, color: &str, visible: bool) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            color: color.into(),
            visible,
            labels: false,
            outline_with_labels: false,
            keep_on_top: false,
            indent: false,
            style: None,
            label_style: LabelStyle::default(),
        }
    }

    /// 境界線のスタイル（未指定なら色から作る）
    pub fn line_style(&self) -> BoundaryStyle {
        self.style.clone().unwrap_or_else(|| BoundaryStyle {
            color: self.color.clone(),
            ..Default::default()
        })
    }

    /// パネルのチェックボックスID
    pub fn dom_id(&self) -> String {
        format!("boundary-{}", crate::format::slug(&self.name))
    }

    /// GeoJSONからラベルを作る
    pub fn label_markers(&self, collection: &Value) -> Result<Vec<LabelMarker>> {
        Ok(label_features(collection)?
            .iter()
            .filter_map(|f| self.place_label(f))
            .collect())
    }

    fn place_label(&self, feature: &LabelFeature) -> Option<LabelMarker> {
        let base = match self.label_style.placement {
            LabelPlacement::Centroid => feature.centroid()?,
            LabelPlacement::BoundsCenter => feature.bounds_center()?,
        };
        let (dlat, dlng) = self.label_style.offset;
        Some(LabelMarker {
            text: feature.name.clone(),
            position: LatLng::new(base.lat + dlat, base.lng + dlng),
        })
    }
}

/// 境界ラベル1件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMarker {
    pub text: String,
    pub position: LatLng,
}

/// 既定の境界レイヤー
pub fn default_boundary_layers() -> Vec<BoundaryLayerDef> {
    let city = BoundaryLayerDef {
        keep_on_top: true,
        style: Some(BoundaryStyle {
            color: "magenta".into(),
            weight: 4.0,
            opacity: 1.0,
            fill_color: Some("transparent".into()),
            class_name: Some("city-boundary-shadow multiply-blend".into()),
            ..Default::default()
        }),
        ..BoundaryLayerDef::new("City boundary", "city_limits", "magenta", true)
    };

    let community = BoundaryLayerDef {
        style: Some(BoundaryStyle::outline("cyan", 4.0, 0.8)),
        ..BoundaryLayerDef::new("Community Boundaries", "community", "cyan", true)
    };

    let community_labels = BoundaryLayerDef {
        labels: true,
        indent: true,
        label_style: LabelStyle {
            font_size_px: 10,
            font_weight: 700,
            placement: LabelPlacement::BoundsCenter,
            offset: (0.0, 0.0),
        },
        ..BoundaryLayerDef::new("Community Labels", "community", "cyan", true)
    };

    let neighborhoods = BoundaryLayerDef {
        style: Some(BoundaryStyle::outline("white", 1.0, 0.6)),
        ..BoundaryLayerDef::new("Neighborhood Boundaries", "neighborhoods", "white", true)
    };

    let neighborhood_labels = BoundaryLayerDef {
        labels: true,
        indent: true,
        label_style: LabelStyle {
            offset: (-0.002, -0.001),
            ..Default::default()
        },
        ..BoundaryLayerDef::new("Neighborhood Labels", "neighborhoods", "white", true)
    };

    let zcta = BoundaryLayerDef {
        labels: true,
        outline_with_labels: true,
        style: Some(BoundaryStyle::outline("orange", 2.0, 0.5)),
        label_style: LabelStyle {
            font_size_px: 8,
            font_weight: 500,
            placement: LabelPlacement::BoundsCenter,
            offset: (0.0, 0.0),
        },
        ..BoundaryLayerDef::new("Census ZCTA (ZIP) 2023", "zcta_boundaries", "orange", false)
    };

    vec![city, community, community_labels, neighborhoods, neighborhood_labels, zcta]
}

/// 取得すべきファイル（重複を除き定義順）
pub fn unique_files(defs: &[BoundaryLayerDef]) -> Vec<&str> {
    let mut files: Vec<&str> = Vec::new();
    for def in defs {
        if !files.contains(&def.filename.as_str()) {
            files.push(&def.filename);
        }
    }
    files
}

/// 読み込み済み境界レイヤーの管理
///
/// 表示状態の正はビューモデル側にあり、ここは地図上のレイヤーを出し入れするだけ。
#[derive(Debug, Clone)]
pub struct BoundaryRegistry<L> {
    layers: HashMap<String, L>,
    keep_on_top: Vec<String>,
}

impl<L: Clone> BoundaryRegistry<L> {
    pub fn new(defs: &[BoundaryLayerDef]) -> Self {
        Self {
            layers: HashMap::new(),
            keep_on_top: defs
                .iter()
                .filter(|d| d.keep_on_top)
                .map(|d| d.name.clone())
                .collect(),
        }
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// 読み込み完了したレイヤーを登録し、現在の表示状態を反映
    pub fn insert<S>(&mut self, surface: &mut S, name: &str, layer: L, visible: bool)
    where
        S: MapSurface<Layer = L>,
    {
        if let Some(old) = self.layers.insert(name.to_string(), layer) {
            surface.remove_layer(&old);
        }
        self.set_visible(surface, name, visible);
    }

    /// 表示を切り替える。未読込ならfalse
    pub fn set_visible<S>(&mut self, surface: &mut S, name: &str, visible: bool) -> bool
    where
        S: MapSurface<Layer = L>,
    {
        let Some(layer) = self.layers.get(name) else {
            return false;
        };
        match (visible, surface.has_layer(layer)) {
            (true, false) => surface.add_layer(layer),
            (false, true) => surface.remove_layer(layer),
            _ => {}
        }
        self.raise_pinned(surface);
        true
    }

    fn raise_pinned<S>(&self, surface: &mut S)
    where
        S: MapSurface<Layer = L>,
    {
        for name in &self.keep_on_top {
            if let Some(layer) = self.layers.get(name) {
                if surface.has_layer(layer) {
                    surface.bring_to_front(layer);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeatmapOptions;
    use crate::types::Issue;
    use serde_json::json;

    #[derive(Default)]
    struct FakeSurface {
        on_map: Vec<u32>,
        fronted: Vec<u32>,
    }

    impl MapSurface for FakeSurface {
        type Layer = u32;
        fn add_layer(&mut self, layer: &u32) {
            self.on_map.push(*layer);
        }
        fn remove_layer(&mut self, layer: &u32) {
            self.on_map.retain(|l| l != layer);
        }
        fn has_layer(&self, layer: &u32) -> bool {
            self.on_map.contains(layer)
        }
        fn bring_to_front(&mut self, layer: &u32) {
            self.fronted.push(*layer);
        }
        fn build_marker_layer(&mut self, _: &str, _: &[Issue]) -> u32 {
            unreachable!()
        }
        fn build_heat_layer(&mut self, _: &[LatLng], _: &HeatmapOptions) -> u32 {
            unreachable!()
        }
    }

    #[test]
    fn test_default_layers() {
        let defs = default_boundary_layers();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "City boundary",
                "Community Boundaries",
                "Community Labels",
                "Neighborhood Boundaries",
                "Neighborhood Labels",
                "Census ZCTA (ZIP) 2023",
            ]
        );
        assert!(!defs[5].visible);
        assert!(defs[0].keep_on_top);
        assert_eq!(unique_files(&defs), vec!["city_limits", "community", "neighborhoods", "zcta_boundaries"]);
    }

    #[test]
    fn test_line_style_fallback() {
        let def = BoundaryLayerDef::new("Wards", "wards", "yellow", true);
        let style = def.line_style();
        assert_eq!(style.color, "yellow");
        assert_eq!(style.weight, 2.0);
        assert!(!style.fill);
    }

    #[test]
    fn test_style_serializes_for_leaflet() {
        let json = serde_json::to_value(default_boundary_layers()[0].line_style()).unwrap();
        assert_eq!(json["fillOpacity"], 0.0);
        assert_eq!(json["className"], "city-boundary-shadow multiply-blend");
    }

    #[test]
    fn test_neighborhood_label_offset() {
        let def = &default_boundary_layers()[4];
        let fc = json!({"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"name": "Avondale"},
            "geometry": {"type": "Point", "coordinates": [-86.8, 33.5]}
        }]});
        let labels = def.label_markers(&fc).unwrap();
        assert_eq!(labels[0].text, "Avondale");
        assert!((labels[0].position.lat - 33.498).abs() < 1e-9);
        assert!((labels[0].position.lng - -86.801).abs() < 1e-9);
    }

    #[test]
    fn test_dom_id() {
        let def = &default_boundary_layers()[5];
        assert_eq!(def.dom_id(), "boundary-Census-ZCTA-(ZIP)-2023");
    }

    #[test]
    fn test_registry_visibility_and_pinning() {
        let defs = default_boundary_layers();
        let mut registry = BoundaryRegistry::new(&defs);
        let mut surface = FakeSurface::default();

        assert!(!registry.set_visible(&mut surface, "City boundary", true));

        registry.insert(&mut surface, "City boundary", 1, true);
        registry.insert(&mut surface, "Community Boundaries", 2, true);
        assert_eq!(surface.on_map, vec![1, 2]);
        assert_eq!(surface.fronted.last(), Some(&1));

        registry.set_visible(&mut surface, "Community Boundaries", false);
        assert_eq!(surface.on_map, vec![1]);

        registry.set_visible(&mut surface, "City boundary", false);
        let fronted = surface.fronted.len();
        registry.set_visible(&mut surface, "Community Boundaries", true);
        assert_eq!(surface.fronted.len(), fronted);
    }

    #[test]
    fn test_registry_insert_hidden() {
        let defs = default_boundary_layers();
        let mut registry = BoundaryRegistry::new(&defs);
        let mut surface = FakeSurface::default();
        registry.insert(&mut surface, "Census ZCTA (ZIP) 2023", 9, false);
        assert!(registry.is_loaded("Census ZCTA (ZIP) 2023"));
        assert!(surface.on_map.is_empty());
    }
}
