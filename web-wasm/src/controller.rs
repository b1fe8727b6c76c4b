//! 画面の制御
//!
//! UIイベントを `ViewModel` に渡し、返ってきた `Effects` を地図・履歴・通信に反映する。
//! 状態はLeptosのシグナルとStoredValueに置き、コントローラ自体はCopyなハンドルとして
//! コンポーネントへ渡す。

use crate::api::ApiClient;
use crate::browser;
use crate::map::{create_map, JsMapOptions, LeafletSurface, SurfaceCallbacks};
use crate::time;
use bham311_common::analytics::{community_rows, issue_type_blocks, CommunityRow, IssueTypeBlock};
use bham311_common::boundary::unique_files;
use bham311_common::format::css_url;
use bham311_common::photo::{
    batch_request, photo_candidates, photo_marker, photo_markers, sample_evenly, PhotoCaption,
    PhotoMarker,
};
use bham311_common::route::share_url;
use bham311_common::{
    BoundaryRegistry, Effects, ImageVariant, Issue, IssueDetail, LayerSynchronizer, MapConfig,
    MapSurface, PanelEvent, ViewModel,
};
use futures::future::join_all;
use gloo::console;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

/// 地図を描画する要素のID（index.html）
pub const MAP_CONTAINER_ID: &str = "map";

const LOAD_ERROR_MESSAGE: &str = "Error loading map data. Please refresh the page.";

/// 非同期に取得する表示内容
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Failed(String),
    Ready(T),
}

/// 拡大表示中の写真
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoView {
    pub image_url: String,
    pub caption: Option<PhotoCaption>,
}

/// 地図とその上のレイヤー
struct MapRuntime {
    surface: LeafletSurface,
    categories: LayerSynchronizer<JsValue>,
    boundaries: BoundaryRegistry<JsValue>,
    photos: Option<JsValue>,
}

#[derive(Clone, Copy)]
pub struct AppController {
    pub vm: RwSignal<ViewModel>,
    /// 詳細モーダル。None は閉じている
    pub detail: RwSignal<Option<Loadable<IssueDetail>>>,
    pub photo_view: RwSignal<Option<PhotoView>>,
    pub issue_types: RwSignal<Loadable<Vec<IssueTypeBlock>>>,
    pub community_rows: RwSignal<Loadable<Vec<CommunityRow>>>,
    /// 共有リンクをコピーした直後
    pub share_copied: RwSignal<bool>,
    pub load_error: RwSignal<Option<String>>,
    api: StoredValue<ApiClient>,
    runtime: StoredValue<Option<MapRuntime>, LocalStorage>,
    /// 写真の取得結果が古くなったかの判定用
    photo_generation: StoredValue<u64>,
}

impl AppController {
    pub fn new(config: MapConfig) -> Self {
        let api = ApiClient::new(&config.api_base);
        let vm = ViewModel::new(config, browser::viewport_width());
        Self {
            vm: RwSignal::new(vm),
            detail: RwSignal::new(None),
            photo_view: RwSignal::new(None),
            issue_types: RwSignal::new(Loadable::Loading),
            community_rows: RwSignal::new(Loadable::Loading),
            share_copied: RwSignal::new(false),
            load_error: RwSignal::new(None),
            api: StoredValue::new(api),
            runtime: StoredValue::new_local(None),
            photo_generation: StoredValue::new(0),
        }
    }

    /// 地図を作り、データの読み込みを始める（#map要素が存在すること）
    pub fn start(self) {
        self.vm.update(|vm| vm.set_initial_path(&browser::pathname()));

        if let Err(e) = self.mount_map() {
            console::error!("地図の初期化に失敗:", e);
        }

        browser::on_popstate(move |path| self.dispatch(PanelEvent::Navigate(path)));

        spawn_local(self.load_data());
        spawn_local(self.load_sidebar());
    }

    pub fn dispatch(self, event: PanelEvent) {
        let effects = self.vm.try_update(|vm| vm.apply(event)).unwrap_or_default();
        self.run(effects);
    }

    pub fn share(self, issue_id: String) {
        let url = share_url(&browser::origin(), &issue_id);
        spawn_local(async move {
            match browser::copy_to_clipboard(&url).await {
                Ok(()) => {
                    self.share_copied.set(true);
                    Timeout::new(2_000, move || self.share_copied.set(false)).forget();
                }
                Err(e) => {
                    console::error!("Failed to copy to clipboard:", e);
                    gloo::dialogs::alert(&format!("Share this issue: {}", url));
                }
            }
        });
    }

    pub fn close_photo(self) {
        self.photo_view.set(None);
    }

    fn run(self, effects: Effects) {
        if effects.is_empty() {
            return;
        }
        if effects.resync_categories {
            self.sync_categories();
        }
        if !effects.boundary_changes.is_empty() {
            self.runtime.update_value(|rt| {
                let Some(rt) = rt else { return };
                for (name, visible) in &effects.boundary_changes {
                    if !rt.boundaries.set_visible(&mut rt.surface, name, *visible) {
                        console::warn!(format!("境界レイヤー未読込: {}", name));
                    }
                }
            });
        }
        if effects.clear_photos {
            self.clear_photos();
        }
        if effects.refresh_photos {
            self.refresh_photos();
        }
        if let Some(path) = &effects.push_route {
            browser::push_path(path);
        }
        if effects.close_detail {
            self.detail.set(None);
        }
        if let Some(id) = effects.open_detail {
            self.load_detail(id);
        }
    }

    // ============================================
    // 地図
    // ============================================

    fn mount_map(self) -> Result<(), JsValue> {
        let (options, thumbnail_size, defs) = self.vm.with_untracked(|vm| {
            let config = vm.config();
            (
                JsMapOptions::from(config),
                config.thumbnail_size,
                config.boundary_layers.clone(),
            )
        });
        let options = serde_wasm_bindgen::to_value(&options)?;
        let map = create_map(MAP_CONTAINER_ID, &options)?;

        let surface = LeafletSurface::new(map, thumbnail_size, self.callbacks());
        self.runtime.set_value(Some(MapRuntime {
            surface,
            categories: LayerSynchronizer::new(),
            boundaries: BoundaryRegistry::new(&defs),
            photos: None,
        }));
        Ok(())
    }

    fn callbacks(self) -> SurfaceCallbacks {
        let open_issue = Closure::new(move |id: String| self.dispatch(PanelEvent::OpenIssue(id)));

        let lookup_thumbnail = Closure::new(move |id: String| {
            let api = self.api.get_value();
            wasm_bindgen_futures::future_to_promise(async move {
                let url = match api.image(&id, Some(ImageVariant::Thumbnail)).await {
                    Ok(info) => info.usable_url().map(css_url),
                    Err(e) => {
                        console::warn!(format!("サムネイル取得失敗 {}: {}", id, e));
                        None
                    }
                };
                Ok(url.map(JsValue::from).unwrap_or(JsValue::NULL))
            })
        });

        let open_photo =
            Closure::new(move |id: String, thumbnail: String| self.open_photo(id, thumbnail));

        SurfaceCallbacks {
            open_issue,
            lookup_thumbnail,
            open_photo,
        }
    }

    fn sync_categories(self) {
        self.vm.with_untracked(|vm| {
            self.runtime.update_value(|rt| {
                let Some(rt) = rt else { return };
                let report = rt.categories.sync(
                    &mut rt.surface,
                    vm.index(),
                    vm.selected(),
                    &vm.config().heatmap,
                );
                console::log!(format!(
                    "カテゴリ同期: 表示{}件 新規{}件 ヒートマップ{}点",
                    report.visible_categories.len(),
                    report.newly_loaded.len(),
                    report.heat_points
                ));
            });
        });
    }

    // ============================================
    // データ読み込み
    // ============================================

    async fn load_data(self) {
        let api = self.api.get_value();

        match api.layer_config().await {
            Ok(response) => self.vm.update(|vm| vm.apply_layer_config(response)),
            Err(e) => console::warn!(format!("レイヤー設定の取得失敗、既定値を使用: {}", e)),
        }

        spawn_local(self.load_boundaries());
        spawn_local(self.load_stats());

        let limit = self.vm.with_untracked(|vm| vm.config().issue_limit);
        match api.issues(limit).await {
            Ok(issues) => {
                console::log!(format!("Issue {}件を読み込み", issues.len()));
                let effects = self
                    .vm
                    .try_update(|vm| vm.load_issues(issues))
                    .unwrap_or_default();
                self.run(effects);
            }
            Err(e) => {
                console::error!(format!("Issue一覧の取得失敗: {}", e));
                self.load_error.set(Some(LOAD_ERROR_MESSAGE.to_string()));
                let effects = self
                    .vm
                    .try_update(|vm| vm.mark_load_failed())
                    .unwrap_or_default();
                self.run(effects);
            }
        }
    }

    /// 境界ファイルは1回ずつ取得し、同じファイルを使う定義で共有する
    async fn load_boundaries(self) {
        let defs = self.vm.with_untracked(|vm| vm.config().boundary_layers.clone());
        self.runtime.update_value(|rt| {
            if let Some(rt) = rt {
                rt.boundaries = BoundaryRegistry::new(&defs);
            }
        });

        let api = self.api.get_value();
        let files = unique_files(&defs);
        let results = join_all(files.iter().map(|file| api.boundary(file))).await;

        let mut geojson: HashMap<&str, Value> = HashMap::new();
        for (file, result) in files.into_iter().zip(results) {
            match result {
                Ok(value) => {
                    geojson.insert(file, value);
                }
                Err(e) => console::warn!(format!("境界 {} の取得失敗: {}", file, e)),
            }
        }

        for def in &defs {
            let Some(data) = geojson.get(def.filename.as_str()) else {
                continue;
            };
            let visible = self.vm.with_untracked(|vm| vm.boundary_visible(&def.name));
            self.runtime.update_value(|rt| {
                let Some(rt) = rt else { return };
                match rt.surface.build_boundary_layer(def, data) {
                    Ok(layer) => rt.boundaries.insert(&mut rt.surface, &def.name, layer, visible),
                    Err(e) => console::warn!(format!("境界レイヤー {} を作成できません: {}", def.name, e)),
                }
            });
        }
    }

    async fn load_stats(self) {
        let api = self.api.get_value();

        let total = match api.stats().await {
            Ok(stats) => stats.total_issues,
            Err(e) => {
                console::warn!(format!("統計の取得失敗: {}", e));
                None
            }
        };
        self.vm.update(|vm| vm.set_total_in_dataset(total));

        let raw = match api.last_sync().await {
            Ok(sync) => sync.last_sync_time,
            Err(e) => {
                console::warn!(format!("最終同期時刻の取得失敗: {}", e));
                None
            }
        };
        let label = raw.as_deref().and_then(time::database_time);
        self.vm.update(|vm| vm.set_last_sync(raw, label));
    }

    async fn load_sidebar(self) {
        let api = self.api.get_value();

        let blocks = match api.community_top_issues().await {
            Ok(data) => Loadable::Ready(issue_type_blocks(&data)),
            Err(e) => {
                console::error!(format!("Error loading community stats: {}", e));
                Loadable::Failed("Error loading community statistics.".to_string())
            }
        };
        self.issue_types.set(blocks);

        let rows = match api.top_issue_per_community().await {
            Ok(data) => Loadable::Ready(community_rows(&data)),
            Err(e) => {
                console::error!(format!("Error loading top issue per community: {}", e));
                Loadable::Failed("Error loading top issue data.".to_string())
            }
        };
        self.community_rows.set(rows);
    }

    // ============================================
    // 写真
    // ============================================

    fn clear_photos(self) {
        self.photo_generation.update_value(|g| *g += 1);
        self.runtime.update_value(|rt| {
            let Some(rt) = rt else { return };
            if let Some(layer) = rt.photos.take() {
                rt.surface.remove_layer(&layer);
            }
        });
    }

    fn refresh_photos(self) {
        self.clear_photos();
        let generation = self.photo_generation.get_value();

        spawn_local(async move {
            let photos = self.fetch_photos().await;
            let current = self.photo_generation.get_value() == generation
                && self.vm.with_untracked(|vm| vm.photos_enabled());
            if !current {
                return;
            }
            console::log!(format!("写真 {}件", photos.len()));
            if photos.is_empty() {
                return;
            }
            self.runtime.update_value(|rt| {
                let Some(rt) = rt else { return };
                let layer = rt.surface.build_photo_layer(&photos);
                rt.surface.add_layer(&layer);
                rt.photos = Some(layer);
            });
        });
    }

    /// バッチAPIで取得し、失敗したら一定数ずつ個別に取得する
    async fn fetch_photos(self) -> Vec<PhotoMarker> {
        let (issues, chunk_size): (Vec<Issue>, usize) = self.vm.with_untracked(|vm| {
            let candidates = photo_candidates(vm.index(), vm.selected());
            let sampled = sample_evenly(&candidates, vm.config().max_photos);
            (
                sampled.into_iter().cloned().collect(),
                vm.config().photo_fetch_chunk.max(1),
            )
        });
        if issues.is_empty() {
            return Vec::new();
        }
        let issues: Vec<&Issue> = issues.iter().collect();
        let api = self.api.get_value();

        match api.images_batch(&batch_request(&issues)).await {
            Ok(images) => return photo_markers(&issues, &images),
            Err(e) => console::warn!(format!("バッチ画像取得失敗、個別取得に切り替え: {}", e)),
        }

        let api = &api;
        let mut markers = Vec::new();
        for chunk in issues.chunks(chunk_size) {
            let results = join_all(chunk.iter().map(|issue| async move {
                let id = issue.id()?;
                let info = api.image(id, Some(ImageVariant::Thumbnail)).await.ok()?;
                photo_marker(issue, &info)
            }))
            .await;
            markers.extend(results.into_iter().flatten());
        }
        markers
    }

    /// フル解像度を取りに行き、無ければサムネイルのまま拡大する
    fn open_photo(self, issue_id: String, thumbnail_url: String) {
        spawn_local(async move {
            let api = self.api.get_value();
            let image_url = match api.image(&issue_id, Some(ImageVariant::Full)).await {
                Ok(info) => info
                    .usable_url()
                    .map(str::to_string)
                    .unwrap_or(thumbnail_url),
                Err(_) => thumbnail_url,
            };
            let caption = self
                .vm
                .with_untracked(|vm| vm.find_issue(&issue_id).map(PhotoCaption::new));
            self.photo_view.set(Some(PhotoView { image_url, caption }));
        });
    }

    // ============================================
    // 詳細
    // ============================================

    /// Issue本体の失敗はエラー表示、コメントと画像の失敗は空扱い
    fn load_detail(self, id: String) {
        self.detail.set(Some(Loadable::Loading));

        spawn_local(async move {
            let api = self.api.get_value();
            let issue = match api.issue(&id).await {
                Ok(issue) => issue,
                Err(e) => {
                    console::error!(format!("Error loading issue details {}: {}", id, e));
                    if self.is_open(&id) {
                        self.detail.set(Some(Loadable::Failed(e.to_string())));
                    }
                    return;
                }
            };

            let (comments, image) = futures::join!(api.comments(&id), api.image(&id, None));
            let comments = comments.unwrap_or_else(|e| {
                console::warn!(format!("コメント取得失敗 {}: {}", id, e));
                Vec::new()
            });
            let image = image
                .map_err(|e| console::warn!(format!("画像情報取得失敗 {}: {}", id, e)))
                .ok();

            if self.is_open(&id) {
                let detail = IssueDetail::build(&issue, &comments, image.as_ref());
                self.detail.set(Some(Loadable::Ready(detail)));
            }
        });
    }

    fn is_open(self, id: &str) -> bool {
        self.vm.with_untracked(|vm| vm.open_issue() == Some(id))
    }
}
