//! ブラウザAPIの薄いラッパー（履歴・URL・クリップボード・埋め込み設定）

use gloo::console;
use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(module = "/js/clipboard.js")]
extern "C" {
    #[wasm_bindgen(js_name = "copyText", catch)]
    fn copy_text_js(text: &str) -> Result<js_sys::Promise, JsValue>;
}

pub fn pathname() -> String {
    gloo::utils::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string())
}

pub fn origin() -> String {
    gloo::utils::window()
        .location()
        .origin()
        .unwrap_or_default()
}

pub fn viewport_width() -> f64 {
    gloo::utils::window()
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(1024.0)
}

/// index.html に埋め込まれた設定JSON（`<script id="map-config">`）
pub fn inline_config() -> Option<String> {
    gloo::utils::document()
        .get_element_by_id("map-config")
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty())
}

/// 現在と同じパスなら積まない
pub fn push_path(path: &str) {
    if pathname() == path {
        return;
    }
    let result = gloo::utils::window()
        .history()
        .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
    if let Err(e) = result {
        console::warn!("history.pushState failed:", e);
    }
}

/// 戻る/進むでパスが変わったときに呼ぶ
pub fn on_popstate<F>(callback: F)
where
    F: Fn(String) + 'static,
{
    EventListener::new(&gloo::utils::window(), "popstate", move |_| {
        callback(pathname());
    })
    .forget();
}

pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let promise = copy_text_js(text).map_err(|e| format!("コピー失敗: {:?}", e))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("コピー失敗: {:?}", e))
}
