//! 地図クライアントの設定
//!
//! 組み込みの既定値を持ち、JSON文字列やサーバの `/api/layer_config` で上書きできる。

use crate::boundary::{default_boundary_layers, BoundaryLayerDef};
use crate::error::{Error, Result};
use crate::types::LatLng;
use serde::{Deserialize, Serialize};

/// ヒートマップ描画オプション（Leaflet.heatにそのまま渡す）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatmapOptions {
    pub min_opacity: f64,
    pub max_zoom: u8,
    pub radius: u32,
    pub blur: u32,
    /// (位置, 色) の組。位置は0.0〜1.0
    pub gradient: Vec<(f64, String)>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        let stops = [
            (0.0, "navy"),
            (0.1, "blue"),
            (0.2, "cyan"),
            (0.3, "lime"),
            (0.4, "lime"),
            (0.5, "yellow"),
            (0.65, "orange"),
            (0.8, "orange"),
            (0.9, "red"),
            (1.0, "darkred"),
        ];
        Self {
            min_opacity: 0.1,
            max_zoom: 18,
            radius: 30,
            blur: 22,
            gradient: stops.iter().map(|(p, c)| (*p, c.to_string())).collect(),
        }
    }
}

/// 地図クライアント全体の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    /// APIのベースURL（同一オリジンなら空）
    pub api_base: String,
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub tile_url: String,
    pub tile_attribution: String,
    pub tile_subdomains: String,
    pub tile_max_zoom: u8,
    /// 初期選択するカテゴリ数
    pub top_n: usize,
    /// この件数以下のカテゴリは"Other"へ集約
    pub low_count_threshold: usize,
    /// Issue一覧の取得上限
    pub issue_limit: usize,
    pub max_photos: usize,
    pub thumbnail_size: u32,
    /// バッチAPIが使えない場合の個別取得の同時数
    pub photo_fetch_chunk: usize,
    pub mobile_breakpoint: f64,
    pub heatmap: HeatmapOptions,
    pub boundary_layers: Vec<BoundaryLayerDef>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            center: LatLng::new(33.5186, -86.8025),
            zoom: 13,
            min_zoom: 13,
            tile_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".into(),
            tile_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>".into(),
            tile_subdomains: "abcd".into(),
            tile_max_zoom: 20,
            top_n: 10,
            low_count_threshold: 2,
            issue_limit: 20_000,
            max_photos: 500,
            thumbnail_size: 40,
            photo_fetch_chunk: 20,
            mobile_breakpoint: 768.0,
            heatmap: HeatmapOptions::default(),
            boundary_layers: default_boundary_layers(),
        }
    }
}

/// `/api/layer_config` のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerConfigResponse {
    pub layer_configs: Vec<BoundaryLayerDef>,
}

impl MapConfig {
    /// JSON文字列から読み込み（未指定の項目は既定値）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// サーバ設定を適用（空なら既定の境界レイヤーを維持）
    ///
    /// サーバ定義にスタイルが無ければ、同じファイル・同じ種別の既定定義から補う。
    pub fn apply_layer_config(&mut self, response: LayerConfigResponse) {
        if response.layer_configs.is_empty() {
            return;
        }
        let defaults = default_boundary_layers();
        self.boundary_layers = response
            .layer_configs
            .into_iter()
            .map(|mut def| {
                let known = defaults
                    .iter()
                    .find(|d| d.filename == def.filename && d.labels == def.labels);
                if let (None, Some(known)) = (&def.style, known) {
                    def.style = known.style.clone();
                    def.label_style = known.label_style.clone();
                    def.keep_on_top |= known.keep_on_top;
                    def.outline_with_labels |= known.outline_with_labels;
                    def.indent |= known.indent;
                }
                def
            })
            .collect();
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("topN must be at least 1".into()));
        }
        if self.photo_fetch_chunk == 0 {
            return Err(Error::Config("photoFetchChunk must be at least 1".into()));
        }
        if self.min_zoom > self.zoom {
            return Err(Error::Config(format!(
                "minZoom {} exceeds zoom {}",
                self.min_zoom, self.zoom
            )));
        }
        Ok(())
    }

    pub fn is_mobile(&self, viewport_width: f64) -> bool {
        viewport_width <= self.mobile_breakpoint
    }
}
