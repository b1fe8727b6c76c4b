//! 地図ライブラリとの境界
//!
//! 同期処理や境界レイヤー管理はこのトレイト越しに地図を操作する。
//! WASM側ではLeafletブリッジが実装し、テストでは記録用の実装を使う。

use crate::config::HeatmapOptions;
use crate::types::{Issue, LatLng};

pub trait MapSurface {
    /// 地図上のレイヤーへのハンドル
    type Layer: Clone;

    fn add_layer(&mut self, layer: &Self::Layer);

    fn remove_layer(&mut self, layer: &Self::Layer);

    fn has_layer(&self, layer: &Self::Layer) -> bool;

    fn bring_to_front(&mut self, layer: &Self::Layer);

    /// カテゴリ1件分のマーカーレイヤーを作る（地図には追加しない）
    fn build_marker_layer(&mut self, category: &str, issues: &[Issue]) -> Self::Layer;

    /// ヒートマップレイヤーを作る（地図には追加しない）
    fn build_heat_layer(&mut self, points: &[LatLng], options: &HeatmapOptions) -> Self::Layer;
}
