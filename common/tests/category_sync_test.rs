//! カテゴリ選択と地図同期のテスト
//!
//! APIレスポンス相当のJSONから読み込み、パネル操作を通して地図状態を検証

use bham311_common::category::{top_categories, OTHER_CATEGORY};
use bham311_common::{
    CategoryGroup, Effects, HeatmapOptions, Issue, LatLng, LayerSynchronizer, MapConfig,
    MapSurface, PanelEvent, ViewModel,
};
use std::collections::{BTreeSet, HashMap};

/// 地図上のレイヤーを記録するだけのサーフェス
#[derive(Default)]
struct MemorySurface {
    next: u32,
    on_map: BTreeSet<u32>,
    markers: HashMap<u32, String>,
    heat: HashMap<u32, usize>,
    builds: HashMap<String, usize>,
}

impl MemorySurface {
    fn marker_categories(&self) -> BTreeSet<String> {
        self.on_map
            .iter()
            .filter_map(|id| self.markers.get(id).cloned())
            .collect()
    }

    fn heat_points(&self) -> Option<usize> {
        self.on_map.iter().find_map(|id| self.heat.get(id).copied())
    }
}

impl MapSurface for MemorySurface {
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
        self.next += 1;
        self.markers.insert(self.next, category.to_string());
        *self.builds.entry(category.to_string()).or_default() += 1;
        self.next
    }

    fn build_heat_layer(&mut self, points: &[LatLng], _options: &HeatmapOptions) -> u32 {
        self.next += 1;
        self.heat.insert(self.next, points.len());
        self.next
    }
}

/// 件数が 13, 12, ..., 1 の13カテゴリ（カテゴリ名は件数の少ない順に出現）
fn fixture() -> Vec<Issue> {
    let mut records = Vec::new();
    for n in 1..=13u32 {
        for i in 0..n {
            records.push(serde_json::json!({
                "issue_id": n * 100 + i,
                "request_type_full_category": format!("Category {:02}", n),
                "latitude": format!("{}", 33.5 + f64::from(i) * 0.001),
                "longitude": -86.8,
                "within_city_limits": 1
            }));
        }
    }
    records.push(serde_json::json!({
        "issue_id": 9999,
        "request_type_full_category": "Category 13",
        "latitude": 33.4,
        "longitude": -86.9,
        "within_city_limits": 0
    }));
    serde_json::from_value(serde_json::Value::Array(records)).expect("fixture")
}

struct Harness {
    vm: ViewModel,
    surface: MemorySurface,
    sync: LayerSynchronizer<u32>,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            vm: ViewModel::new(MapConfig::default(), 1280.0),
            surface: MemorySurface::default(),
            sync: LayerSynchronizer::new(),
        };
        let effects = harness.vm.load_issues(fixture());
        harness.run(effects);
        harness
    }

    fn apply(&mut self, event: PanelEvent) {
        let effects = self.vm.apply(event);
        self.run(effects);
    }

    fn run(&mut self, effects: Effects) {
        if effects.resync_categories {
            let options = self.vm.config().heatmap.clone();
            self.sync
                .sync(&mut self.surface, self.vm.index(), self.vm.selected(), &options);
        }
    }

    fn snapshot(&self) -> (BTreeSet<String>, Option<usize>) {
        (self.surface.marker_categories(), self.surface.heat_points())
    }
}

#[test]
fn test_top_ten_ordering() {
    let top = top_categories(&fixture(), 10);
    let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
    let expected: Vec<String> = (4..=13).rev().map(|n| format!("Category {:02}", n)).collect();
    assert_eq!(names, expected);
    // 市域外の1件は数えない
    assert_eq!(top[0].1, 13);
}

#[test]
fn test_initial_groups() {
    let h = Harness::new();
    let groups = h.vm.groups();
    assert_eq!(groups.top.len(), 10);
    assert_eq!(groups.others.len(), 2);
    assert_eq!(groups.others[0].name, "Category 03");
    assert_eq!(groups.others[1].name, OTHER_CATEGORY);
    assert_eq!(groups.others[1].count, 3);
    assert_eq!(h.surface.marker_categories().len(), 10);
}

#[test]
fn test_toggle_twice_restores_map() {
    let mut h = Harness::new();
    let before = h.snapshot();

    h.apply(PanelEvent::ToggleCategory {
        name: "Category 07".into(),
        checked: false,
    });
    assert_ne!(h.snapshot(), before);

    h.apply(PanelEvent::ToggleCategory {
        name: "Category 07".into(),
        checked: true,
    });
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.surface.builds["Category 07"], 1);
}

#[test]
fn test_select_all_then_none_empties_heatmap() {
    let mut h = Harness::new();
    for group in [CategoryGroup::Top, CategoryGroup::Others] {
        h.apply(PanelEvent::SelectGroup { group, checked: true });
    }
    assert_eq!(h.vm.selected().len(), 13);
    assert_eq!(h.surface.heat_points(), Some(91));

    for group in [CategoryGroup::Top, CategoryGroup::Others] {
        h.apply(PanelEvent::SelectGroup { group, checked: false });
    }
    assert!(h.vm.selected().is_empty());
    assert_eq!(h.surface.heat_points(), None);
    assert!(h.surface.marker_categories().is_empty());
}

#[test]
fn test_other_toggles_low_count_members() {
    let mut h = Harness::new();
    h.apply(PanelEvent::ToggleCategory {
        name: OTHER_CATEGORY.into(),
        checked: true,
    });
    let markers = h.surface.marker_categories();
    assert!(markers.contains("Category 01"));
    assert!(markers.contains("Category 02"));

    h.apply(PanelEvent::ToggleCategory {
        name: OTHER_CATEGORY.into(),
        checked: false,
    });
    assert!(!h.vm.selected().contains("Category 01"));
    assert!(!h.surface.marker_categories().contains("Category 02"));
}
