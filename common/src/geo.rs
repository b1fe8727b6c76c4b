//! GeoJSONの簡易処理
//!
//! 境界ラベルの配置に必要な分だけ読む: 地物名、頂点の重心、外接矩形の中心。
//! 描画用のGeoJSON自体は加工せずLeafletに渡す。

use crate::error::{Error, Result};
use crate::types::LatLng;
use serde_json::Value;

/// ラベル名として参照するプロパティ（先勝ち）
const NAME_KEYS: &[&str] = &[
    "name",
    "NAME",
    "community",
    "neighborhood",
    "ZCTA5CE20",
    "ZCTA5CE10",
];

/// 外接矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for p in &points[1..] {
            bounds.south = bounds.south.min(p.lat);
            bounds.north = bounds.north.max(p.lat);
            bounds.west = bounds.west.min(p.lng);
            bounds.east = bounds.east.max(p.lng);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// ラベル付けに使う地物
#[derive(Debug, Clone, PartialEq)]
pub struct LabelFeature {
    pub name: String,
    /// リングを閉じる末尾の重複点を除いた全頂点
    pub vertices: Vec<LatLng>,
}

impl LabelFeature {
    /// 頂点の算術平均
    pub fn centroid(&self) -> Option<LatLng> {
        if self.vertices.is_empty() {
            return None;
        }
        let n = self.vertices.len() as f64;
        let (lat, lng) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(a, b), p| (a + p.lat, b + p.lng));
        Some(LatLng::new(lat / n, lng / n))
    }

    pub fn bounds_center(&self) -> Option<LatLng> {
        Bounds::from_points(&self.vertices).map(|b| b.center())
    }
}

/// FeatureCollectionからラベル用の地物を取り出す
///
/// Point / Polygon / MultiPolygon 以外のジオメトリは読み飛ばす。
pub fn label_features(collection: &Value) -> Result<Vec<LabelFeature>> {
    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::InvalidGeoJson("missing features array".into()))?;

    Ok(features.iter().filter_map(parse_feature).collect())
}

/// 地物のラベル名
pub fn feature_name(feature: &Value) -> String {
    let props = feature.get("properties");
    NAME_KEYS
        .iter()
        .filter_map(|k| props.and_then(|p| p.get(*k)))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

fn parse_feature(feature: &Value) -> Option<LabelFeature> {
    let geometry = feature.get("geometry")?;
    let coords = geometry.get("coordinates")?;
    let vertices = match geometry.get("type")?.as_str()? {
        "Point" => position(coords).into_iter().collect(),
        "Polygon" => polygon_vertices(coords),
        "MultiPolygon" => coords
            .as_array()?
            .iter()
            .flat_map(polygon_vertices)
            .collect(),
        _ => return None,
    };
    Some(LabelFeature {
        name: feature_name(feature),
        vertices,
    })
}

fn polygon_vertices(rings: &Value) -> Vec<LatLng> {
    let Some(rings) = rings.as_array() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for ring in rings.iter().filter_map(Value::as_array) {
        let mut points: Vec<LatLng> = ring.iter().filter_map(position).collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        out.extend(points);
    }
    out
}

/// GeoJSONの座標は [経度, 緯度]
fn position(value: &Value) -> Option<LatLng> {
    let arr = value.as_array()?;
    let lng = arr.first()?.as_f64()?;
    let lat = arr.get(1)?.as_f64()?;
    Some(LatLng::new(lat, lng))
}
