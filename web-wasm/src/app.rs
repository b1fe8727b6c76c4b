//! メインアプリケーションコンポーネント

use crate::components::{
    issue_modal::IssueModal, layer_panel::LayerPanel, photo_viewer::PhotoViewer,
    sidebar::Sidebar,
};
use crate::browser;
use crate::controller::AppController;
use bham311_common::MapConfig;
use gloo::console;
use leptos::prelude::*;

/// 埋め込み設定があれば読み、無いか不正なら既定値
fn load_config() -> MapConfig {
    let Some(json) = browser::inline_config() else {
        return MapConfig::default();
    };
    MapConfig::from_json(&json).unwrap_or_else(|e| {
        console::warn!(format!("設定の読み込み失敗、既定値を使用: {}", e));
        MapConfig::default()
    })
}

/// 地図本体（#map）はindex.html側にあり、ここはその上に重なるUIを描く
#[component]
pub fn App() -> impl IntoView {
    let controller = AppController::new(load_config());
    controller.start();

    let load_error = controller.load_error;

    view! {
        <div class="map-overlay">
            <LayerPanel controller=controller />
            <Sidebar controller=controller />
            {move || load_error.get().map(|message| view! { <div class="load-error">{message}</div> })}
            <IssueModal controller=controller />
            <PhotoViewer controller=controller />
        </div>
    }
}
