//! カテゴリ表示の同期
//!
//! 選択中カテゴリの集合と地図上のレイヤーを突き合わせる:
//! 1. 選択から外れたカテゴリのマーカーレイヤーを外す
//! 2. ヒートマップを外し、選択中Issueの座標から作り直す（点が無ければ追加しない）
//! 3. 選択中カテゴリのマーカーレイヤーを初回だけ作ってキャッシュし、地図に載せる
//!
//! 呼び出しごとに冪等。連続操作は最後の呼び出しの状態になる。

use crate::category::CategoryIndex;
use crate::config::HeatmapOptions;
use crate::selection::SelectedCategories;
use crate::surface::MapSurface;
use std::collections::HashMap;

/// 1回の同期結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub heat_points: usize,
    /// 地図に載っているマーカーレイヤーのカテゴリ
    pub visible_categories: Vec<String>,
    /// 今回初めて作ったマーカーレイヤーのカテゴリ
    pub newly_loaded: Vec<String>,
    pub removed: Vec<String>,
}

/// マーカーレイヤーのキャッシュとヒートマップを持つ同期器
#[derive(Debug, Clone)]
pub struct LayerSynchronizer<L> {
    markers: HashMap<String, L>,
    heat: Option<L>,
}

impl<L> Default for LayerSynchronizer<L> {
    fn default() -> Self {
        Self {
            markers: HashMap::new(),
            heat: None,
        }
    }
}

impl<L: Clone> LayerSynchronizer<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, category: &str) -> bool {
        self.markers.contains_key(category)
    }

    pub fn heat_layer(&self) -> Option<&L> {
        self.heat.as_ref()
    }

    pub fn sync<S>(
        &mut self,
        surface: &mut S,
        index: &CategoryIndex,
        selected: &SelectedCategories,
        options: &HeatmapOptions,
    ) -> SyncReport
    where
        S: MapSurface<Layer = L>,
    {
        let mut report = SyncReport::default();

        let mut cached: Vec<&String> = self.markers.keys().collect();
        cached.sort();
        for category in cached {
            if selected.contains(category) {
                continue;
            }
            let layer = &self.markers[category];
            if surface.has_layer(layer) {
                surface.remove_layer(layer);
                report.removed.push(category.clone());
            }
        }

        if let Some(heat) = self.heat.take() {
            surface.remove_layer(&heat);
        }

        let categories = selected.sorted();
        let points = index.locations(categories.iter().copied());
        report.heat_points = points.len();
        if !points.is_empty() {
            let heat = surface.build_heat_layer(&points, options);
            surface.add_layer(&heat);
            self.heat = Some(heat);
        }

        for category in categories {
            if !index.contains(category) {
                continue;
            }
            let layer = match self.markers.get(category) {
                Some(layer) => layer.clone(),
                None => {
                    let layer = surface.build_marker_layer(category, index.issues(category));
                    self.markers.insert(category.to_string(), layer.clone());
                    report.newly_loaded.push(category.to_string());
                    layer
                }
            };
            if !surface.has_layer(&layer) {
                surface.add_layer(&layer);
            }
            report.visible_categories.push(category.to_string());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, LatLng};
    use std::collections::BTreeSet;

    /// 地図操作を記録するだけのサーフェス
    #[derive(Default)]
    struct RecordingSurface {
        next_id: u32,
        on_map: BTreeSet<u32>,
        kinds: HashMap<u32, String>,
        heat_sizes: HashMap<u32, usize>,
        marker_builds: usize,
    }

    impl RecordingSurface {
        fn visible_markers(&self) -> BTreeSet<String> {
            self.on_map
                .iter()
                .filter_map(|id| self.kinds.get(id))
                .filter(|k| k.starts_with("marker:"))
                .cloned()
                .collect()
        }

        fn visible_heat_points(&self) -> Option<usize> {
            self.on_map
                .iter()
                .find_map(|id| self.heat_sizes.get(id).copied())
        }
    }

    impl MapSurface for RecordingSurface {
        type Layer = u32;

        fn add_layer(&mut self, layer: &u32) {
            self.on_map.insert(*layer);
        }

        fn remove_layer(&mut self, layer: &u32) {
            self.on_map.remove(layer);
        }

        fn has_layer(&self, layer: &u32) -> bool {
            self.on_map.contains(layer)
        }

        fn bring_to_front(&mut self, _layer: &u32) {}

        fn build_marker_layer(&mut self, category: &str, _issues: &[Issue]) -> u32 {
            self.next_id += 1;
            self.marker_builds += 1;
            self.kinds.insert(self.next_id, format!("marker:{}", category));
            self.next_id
        }

        fn build_heat_layer(&mut self, points: &[LatLng], _options: &HeatmapOptions) -> u32 {
            self.next_id += 1;
            self.kinds.insert(self.next_id, "heat".to_string());
            self.heat_sizes.insert(self.next_id, points.len());
            self.next_id
        }
    }

    fn index() -> CategoryIndex {
        let mut issues = Vec::new();
        for (category, n) in [("Potholes", 3), ("Weeds", 2), ("Litter", 1)] {
            for i in 0..n {
                issues.push(Issue {
                    category: Some(category.to_string()),
                    latitude: Some(33.5 + i as f64 * 0.01),
                    longitude: Some(-86.8),
                    within_city_limits: true,
                    ..Default::default()
                });
            }
        }
        CategoryIndex::build(&issues)
    }

    #[test]
    fn test_sync_builds_heat_and_markers() {
        let index = index();
        let mut surface = RecordingSurface::default();
        let mut sync = LayerSynchronizer::new();
        let selected = SelectedCategories::from_names(["Potholes", "Weeds"]);

        let report = sync.sync(&mut surface, &index, &selected, &HeatmapOptions::default());
        assert_eq!(report.heat_points, 5);
        assert_eq!(report.newly_loaded, vec!["Potholes", "Weeds"]);
        assert_eq!(surface.visible_heat_points(), Some(5));
        assert_eq!(surface.visible_markers().len(), 2);
    }

    #[test]
    fn test_markers_built_once_per_category() {
        let index = index();
        let mut surface = RecordingSurface::default();
        let mut sync = LayerSynchronizer::new();
        let options = HeatmapOptions::default();

        let mut selected = SelectedCategories::from_names(["Potholes"]);
        sync.sync(&mut surface, &index, &selected, &options);
        selected.remove("Potholes");
        sync.sync(&mut surface, &index, &selected, &options);
        selected.insert("Potholes");
        let report = sync.sync(&mut surface, &index, &selected, &options);

        assert!(report.newly_loaded.is_empty());
        assert_eq!(surface.marker_builds, 1);
        assert!(sync.is_loaded("Potholes"));
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let index = index();
        let mut surface = RecordingSurface::default();
        let mut sync = LayerSynchronizer::new();
        let options = HeatmapOptions::default();
        let mut selected = SelectedCategories::from_names(["Potholes", "Litter"]);

        sync.sync(&mut surface, &index, &selected, &options);
        let markers_before = surface.visible_markers();
        let heat_before = surface.visible_heat_points();

        selected.remove("Litter");
        sync.sync(&mut surface, &index, &selected, &options);
        assert_ne!(surface.visible_markers(), markers_before);

        selected.insert("Litter");
        sync.sync(&mut surface, &index, &selected, &options);
        assert_eq!(surface.visible_markers(), markers_before);
        assert_eq!(surface.visible_heat_points(), heat_before);
    }

    #[test]
    fn test_select_none_empties_heatmap() {
        let index = index();
        let mut surface = RecordingSurface::default();
        let mut sync = LayerSynchronizer::new();
        let options = HeatmapOptions::default();

        sync.sync(
            &mut surface,
            &index,
            &SelectedCategories::from_names(["Potholes", "Weeds", "Litter"]),
            &options,
        );
        let report = sync.sync(&mut surface, &index, &SelectedCategories::new(), &options);

        assert_eq!(report.heat_points, 0);
        assert!(sync.heat_layer().is_none());
        assert_eq!(surface.visible_heat_points(), None);
        assert!(surface.visible_markers().is_empty());
        assert!(surface.on_map.is_empty());
    }

    #[test]
    fn test_unknown_selected_category_is_ignored() {
        let index = index();
        let mut surface = RecordingSurface::default();
        let mut sync = LayerSynchronizer::new();

        let report = sync.sync(
            &mut surface,
            &index,
            &SelectedCategories::from_names(["Nope"]),
            &HeatmapOptions::default(),
        );
        assert_eq!(report.heat_points, 0);
        assert!(report.visible_categories.is_empty());
        assert_eq!(surface.marker_builds, 0);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let index = index();
        let mut surface = RecordingSurface::default();
        let mut sync = LayerSynchronizer::new();
        let options = HeatmapOptions::default();
        let selected = SelectedCategories::from_names(["Weeds"]);

        sync.sync(&mut surface, &index, &selected, &options);
        let first = surface.on_map.len();
        sync.sync(&mut surface, &index, &selected, &options);
        assert_eq!(surface.on_map.len(), first);
        assert_eq!(surface.marker_builds, 1);
    }
}
