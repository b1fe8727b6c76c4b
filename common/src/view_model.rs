//! 画面全体の状態
//!
//! UIイベントは `PanelEvent` として `ViewModel::apply` に渡し、
//! 地図に反映すべき変更を `Effects` として受け取る。
//! 地図やネットワークには触れない。

use crate::boundary::BoundaryLayerDef;
use crate::category::{CategoryGroup, CategoryGroups, CategoryIndex};
use crate::config::{LayerConfigResponse, MapConfig};
use crate::panel::{PanelState, StatsSummary};
use crate::route::{issue_id_from_path, issue_path};
use crate::selection::SelectedCategories;
use crate::types::Issue;

/// パネル等からのUIイベント
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    ToggleCategory { name: String, checked: bool },
    SelectGroup { group: CategoryGroup, checked: bool },
    ToggleBoundary { name: String, visible: bool },
    /// 境界の "Select all" / "Select none"
    SetAllBoundaries(bool),
    TogglePhotos(bool),
    TogglePanel,
    ToggleOtherGroup,
    ToggleSidebar,
    OpenIssue(String),
    CloseIssue,
    /// ブラウザの戻る・進む（引数は新しいパス）。履歴には積まない
    Navigate(String),
}

/// 地図・履歴への反映内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// カテゴリ表示の同期が必要
    pub resync_categories: bool,
    /// 写真レイヤーの作り直しが必要
    pub refresh_photos: bool,
    /// 写真レイヤーを外す
    pub clear_photos: bool,
    /// (レイヤー名, 表示) の変更
    pub boundary_changes: Vec<(String, bool)>,
    /// 履歴に積むパス
    pub push_route: Option<String>,
    /// 詳細を取得して表示するIssue
    pub open_detail: Option<String>,
    pub close_detail: bool,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn categories_changed(photos_enabled: bool) -> Self {
        Self {
            resync_categories: true,
            refresh_photos: photos_enabled,
            ..Default::default()
        }
    }
}

/// 境界レイヤー1件の表示状態
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryToggle {
    pub def: BoundaryLayerDef,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct ViewModel {
    config: MapConfig,
    issues: Vec<Issue>,
    index: CategoryIndex,
    groups: CategoryGroups,
    selected: SelectedCategories,
    boundaries: Vec<BoundaryToggle>,
    photos_enabled: bool,
    panel: PanelState,
    stats: StatsSummary,
    loaded: bool,
    open_issue: Option<String>,
    /// データ読込前に `/issue/{id}` で開かれた場合のID
    pending_issue: Option<String>,
}

impl ViewModel {
    pub fn new(config: MapConfig, viewport_width: f64) -> Self {
        let panel = PanelState::initial(config.is_mobile(viewport_width));
        let boundaries = toggles(&config.boundary_layers);
        Self {
            config,
            issues: Vec::new(),
            index: CategoryIndex::default(),
            groups: CategoryGroups::default(),
            selected: SelectedCategories::new(),
            boundaries,
            photos_enabled: false,
            panel,
            stats: StatsSummary::default(),
            loaded: false,
            open_issue: None,
            pending_issue: None,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    pub fn groups(&self) -> &CategoryGroups {
        &self.groups
    }

    pub fn selected(&self) -> &SelectedCategories {
        &self.selected
    }

    /// パネルの行のチェック状態
    pub fn category_checked(&self, name: &str) -> bool {
        self.groups
            .top
            .iter()
            .chain(self.groups.others.iter())
            .any(|c| c.name == name && c.visible)
    }

    pub fn boundaries(&self) -> &[BoundaryToggle] {
        &self.boundaries
    }

    pub fn boundary_visible(&self, name: &str) -> bool {
        self.boundaries
            .iter()
            .any(|b| b.def.name == name && b.visible)
    }

    pub fn photos_enabled(&self) -> bool {
        self.photos_enabled
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn stats(&self) -> &StatsSummary {
        &self.stats
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn open_issue(&self) -> Option<&str> {
        self.open_issue.as_deref()
    }

    pub fn find_issue(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id() == Some(id))
    }

    /// サーバの境界レイヤー設定を反映（表示状態は定義の初期値に戻る）
    pub fn apply_layer_config(&mut self, response: LayerConfigResponse) {
        self.config.apply_layer_config(response);
        self.boundaries = toggles(&self.config.boundary_layers);
    }

    /// 起動時のパス。Issueのパスならデータ読込後に開く
    pub fn set_initial_path(&mut self, path: &str) {
        self.pending_issue = issue_id_from_path(path).map(str::to_string);
    }

    /// Issue一覧を取り込み、上位カテゴリを選択する
    pub fn load_issues(&mut self, issues: Vec<Issue>) -> Effects {
        self.index = CategoryIndex::build(&issues);
        self.groups = CategoryGroups::build(
            &self.index,
            self.config.top_n,
            self.config.low_count_threshold,
        );
        self.selected = SelectedCategories::from_names(self.groups.preselected());
        self.stats.loaded = issues.len();
        self.stats.within_city_limits = issues.iter().filter(|i| i.within_city_limits).count();
        self.issues = issues;
        self.loaded = true;

        let mut effects = Effects::categories_changed(self.photos_enabled);
        if let Some(id) = self.pending_issue.take() {
            self.open_issue = Some(id.clone());
            effects.open_detail = Some(id);
        }
        effects
    }

    /// Issue一覧が取れなかった。カテゴリ無しのまま読込済みとして扱う
    pub fn mark_load_failed(&mut self) -> Effects {
        self.index = CategoryIndex::default();
        self.groups = CategoryGroups::default();
        self.selected = SelectedCategories::new();
        self.issues.clear();
        self.stats.loaded = 0;
        self.stats.within_city_limits = 0;
        self.loaded = true;

        let mut effects = Effects::default();
        if let Some(id) = self.pending_issue.take() {
            self.open_issue = Some(id.clone());
            effects.open_detail = Some(id);
        }
        effects
    }

    pub fn set_total_in_dataset(&mut self, total: Option<u64>) {
        self.stats.total_in_dataset = total.filter(|t| *t > 0);
    }

    /// `raw` は同期時刻そのもの、`label` はその表示用文字列
    pub fn set_last_sync(&mut self, raw: Option<String>, label: Option<String>) {
        match label {
            Some(label) => {
                self.stats.last_updated = Some(label);
                self.stats.last_sync_time = raw;
            }
            None => self.stats.mark_last_updated_unavailable(),
        }
    }

    pub fn apply(&mut self, event: PanelEvent) -> Effects {
        match event {
            PanelEvent::ToggleCategory { name, checked } => {
                if self.selected.toggle(&mut self.groups, &name, checked) {
                    Effects::categories_changed(self.photos_enabled)
                } else {
                    Effects::default()
                }
            }
            PanelEvent::SelectGroup { group, checked } => {
                if self.selected.set_group(&mut self.groups, group, checked) {
                    Effects::categories_changed(self.photos_enabled)
                } else {
                    Effects::default()
                }
            }
            PanelEvent::ToggleBoundary { name, visible } => {
                let mut effects = Effects::default();
                for toggle in self.boundaries.iter_mut().filter(|b| b.def.name == name) {
                    if toggle.visible != visible {
                        toggle.visible = visible;
                        effects.boundary_changes.push((name.clone(), visible));
                    }
                }
                effects
            }
            PanelEvent::SetAllBoundaries(visible) => {
                let mut effects = Effects::default();
                for toggle in self.boundaries.iter_mut().filter(|b| b.visible != visible) {
                    toggle.visible = visible;
                    effects.boundary_changes.push((toggle.def.name.clone(), visible));
                }
                effects
            }
            PanelEvent::TogglePhotos(enabled) => {
                if self.photos_enabled == enabled {
                    return Effects::default();
                }
                self.photos_enabled = enabled;
                Effects {
                    refresh_photos: enabled,
                    clear_photos: !enabled,
                    ..Default::default()
                }
            }
            PanelEvent::TogglePanel => {
                self.panel.expanded = !self.panel.expanded;
                Effects::default()
            }
            PanelEvent::ToggleOtherGroup => {
                self.panel.others_expanded = !self.panel.others_expanded;
                Effects::default()
            }
            PanelEvent::ToggleSidebar => {
                self.panel.sidebar_open = !self.panel.sidebar_open;
                Effects::default()
            }
            PanelEvent::OpenIssue(id) => {
                self.open_issue = Some(id.clone());
                Effects {
                    push_route: Some(issue_path(&id)),
                    open_detail: Some(id),
                    ..Default::default()
                }
            }
            PanelEvent::CloseIssue => {
                if self.open_issue.take().is_none() {
                    return Effects::default();
                }
                Effects {
                    push_route: Some("/".to_string()),
                    close_detail: true,
                    ..Default::default()
                }
            }
            PanelEvent::Navigate(path) => match issue_id_from_path(&path) {
                Some(id) if self.open_issue.as_deref() == Some(id) => Effects::default(),
                Some(id) if !self.loaded => {
                    self.pending_issue = Some(id.to_string());
                    Effects::default()
                }
                Some(id) => {
                    self.open_issue = Some(id.to_string());
                    Effects {
                        open_detail: Some(id.to_string()),
                        ..Default::default()
                    }
                }
                None => Effects {
                    close_detail: self.open_issue.take().is_some(),
                    ..Default::default()
                },
            },
        }
    }
}

fn toggles(defs: &[BoundaryLayerDef]) -> Vec<BoundaryToggle> {
    defs.iter()
        .map(|def| BoundaryToggle {
            def: def.clone(),
            visible: def.visible,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::OTHER_CATEGORY;

    fn issues() -> Vec<Issue> {
        let mut out = Vec::new();
        for (category, n) in [("Potholes", 5), ("Weeds", 3), ("Litter", 1), ("Noise", 1)] {
            for i in 0..n {
                out.push(Issue {
                    issue_id: Some(format!("{}-{}", category, i)),
                    category: Some(category.into()),
                    latitude: Some(33.5),
                    longitude: Some(-86.8),
                    within_city_limits: true,
                    ..Default::default()
                });
            }
        }
        out
    }

    fn loaded() -> ViewModel {
        let config = MapConfig {
            top_n: 2,
            ..Default::default()
        };
        let mut vm = ViewModel::new(config, 1280.0);
        vm.load_issues(issues());
        vm
    }

    #[test]
    fn test_load_preselects_top() {
        let vm = loaded();
        assert_eq!(vm.selected().sorted(), vec!["Potholes", "Weeds"]);
        assert_eq!(vm.groups().others.len(), 1);
        assert_eq!(vm.groups().others[0].name, OTHER_CATEGORY);
        assert_eq!(vm.stats().within_city_limits, 10);
        assert!(vm.panel().expanded);
    }

    #[test]
    fn test_other_toggles_members() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::ToggleCategory {
            name: OTHER_CATEGORY.into(),
            checked: true,
        });
        assert!(effects.resync_categories);
        assert!(!effects.refresh_photos);
        assert!(vm.selected().contains("Litter"));
        assert!(vm.selected().contains("Noise"));
        assert!(vm.category_checked(OTHER_CATEGORY));
        assert!(!vm.category_checked("Litter"));
    }

    #[test]
    fn test_photos_refresh_follows_selection() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::TogglePhotos(true));
        assert!(effects.refresh_photos);
        let effects = vm.apply(PanelEvent::SelectGroup {
            group: CategoryGroup::Top,
            checked: false,
        });
        assert!(effects.resync_categories && effects.refresh_photos);
        assert!(vm.selected().is_empty());

        let effects = vm.apply(PanelEvent::TogglePhotos(false));
        assert!(effects.clear_photos);
    }

    #[test]
    fn test_unknown_category_is_noop() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::ToggleCategory {
            name: "Nope".into(),
            checked: true,
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_boundary_toggle() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::ToggleBoundary {
            name: "Census ZCTA (ZIP) 2023".into(),
            visible: true,
        });
        assert_eq!(effects.boundary_changes, vec![("Census ZCTA (ZIP) 2023".to_string(), true)]);
        assert!(vm.boundary_visible("Census ZCTA (ZIP) 2023"));
        let again = vm.apply(PanelEvent::ToggleBoundary {
            name: "Census ZCTA (ZIP) 2023".into(),
            visible: true,
        });
        assert!(again.is_empty());
    }

    #[test]
    fn test_set_all_boundaries() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::SetAllBoundaries(true));
        // 初期状態で非表示なのはZCTAだけ
        assert_eq!(effects.boundary_changes.len(), 1);
        let effects = vm.apply(PanelEvent::SetAllBoundaries(false));
        assert_eq!(effects.boundary_changes.len(), 6);
        assert!(vm.boundaries().iter().all(|b| !b.visible));
    }

    #[test]
    fn test_issue_route_round_trip() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::OpenIssue("Weeds-1".into()));
        assert_eq!(effects.push_route.as_deref(), Some("/issue/Weeds-1"));
        assert_eq!(vm.open_issue(), Some("Weeds-1"));

        let effects = vm.apply(PanelEvent::CloseIssue);
        assert_eq!(effects.push_route.as_deref(), Some("/"));
        assert!(effects.close_detail);
        assert!(vm.apply(PanelEvent::CloseIssue).is_empty());
    }

    #[test]
    fn test_navigate_does_not_push() {
        let mut vm = loaded();
        let effects = vm.apply(PanelEvent::Navigate("/issue/Weeds-2".into()));
        assert_eq!(effects.open_detail.as_deref(), Some("Weeds-2"));
        assert!(effects.push_route.is_none());
        assert!(vm.apply(PanelEvent::Navigate("/issue/Weeds-2".into())).is_empty());

        let effects = vm.apply(PanelEvent::Navigate("/".into()));
        assert!(effects.close_detail);
        assert!(effects.push_route.is_none());
        assert_eq!(vm.open_issue(), None);
        assert!(vm.apply(PanelEvent::Navigate("/".into())).is_empty());
    }

    #[test]
    fn test_pending_issue_opens_after_load() {
        let mut vm = ViewModel::new(MapConfig::default(), 400.0);
        assert!(!vm.panel().expanded);
        vm.set_initial_path("/issue/Potholes-0");
        let effects = vm.load_issues(issues());
        assert_eq!(effects.open_detail.as_deref(), Some("Potholes-0"));
        assert!(effects.push_route.is_none());
        assert!(vm.find_issue("Potholes-0").is_some());
    }

    #[test]
    fn test_load_failure_leaves_empty_panel() {
        let mut vm = ViewModel::new(MapConfig::default(), 1280.0);
        vm.set_initial_path("/issue/77");
        let effects = vm.mark_load_failed();

        assert!(vm.is_loaded());
        assert!(vm.groups().top.is_empty());
        assert!(vm.groups().others.is_empty());
        assert!(vm.selected().is_empty());
        assert_eq!(vm.stats().loaded, 0);
        assert_eq!(effects.open_detail.as_deref(), Some("77"));
        assert!(!effects.resync_categories);
    }

    #[test]
    fn test_stats_fallback() {
        let mut vm = loaded();
        vm.set_total_in_dataset(Some(0));
        assert_eq!(vm.stats().total(), 10);
        vm.set_total_in_dataset(Some(25_000));
        assert_eq!(vm.stats().total(), 25_000);
    }
}
