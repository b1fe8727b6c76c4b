//! 311 APIクライアント
//!
//! fetchの失敗は共通のErrorに変換して返す。リトライはしない。

use bham311_common::types::{
    parse_comments, BatchImageRequest, BatchImageResponse, CommunityTopIssues, IssueStats,
    LastSync, TopIssuePerCommunity,
};
use bham311_common::{
    Comment, Endpoints, Error, ImageInfo, ImageVariant, Issue, LayerConfigResponse, Result,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone)]
pub struct ApiClient {
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            endpoints: Endpoints::new(api_base),
        }
    }

    pub async fn layer_config(&self) -> Result<LayerConfigResponse> {
        get_json(&self.endpoints.layer_config(cache_buster())).await
    }

    /// 市域内のIssue一覧。配列以外のレスポンスはエラー
    pub async fn issues(&self, limit: usize) -> Result<Vec<Issue>> {
        let url = self.endpoints.issues(limit, cache_buster());
        match get_json::<Value>(&url).await? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect()),
            _ => Err(Error::MissingField("issues")),
        }
    }

    pub async fn issue(&self, id: &str) -> Result<Issue> {
        get_json(&self.endpoints.issue(id)).await
    }

    pub async fn comments(&self, id: &str) -> Result<Vec<Comment>> {
        let value: Value = get_json(&self.endpoints.comments(id)).await?;
        Ok(parse_comments(value))
    }

    pub async fn boundary(&self, filename: &str) -> Result<Value> {
        get_json(&self.endpoints.boundary(filename)).await
    }

    pub async fn image(&self, id: &str, variant: Option<ImageVariant>) -> Result<ImageInfo> {
        get_json(&self.endpoints.image(id, variant)).await
    }

    pub async fn images_batch(&self, request: &BatchImageRequest) -> Result<BatchImageResponse> {
        post_json(&self.endpoints.images_batch(), request).await
    }

    pub async fn last_sync(&self) -> Result<LastSync> {
        get_json(&self.endpoints.last_sync()).await
    }

    pub async fn stats(&self) -> Result<IssueStats> {
        get_json(&self.endpoints.stats()).await
    }

    pub async fn community_top_issues(&self) -> Result<CommunityTopIssues> {
        get_json(&self.endpoints.community_top_issues()).await
    }

    pub async fn top_issue_per_community(&self) -> Result<TopIssuePerCommunity> {
        get_json(&self.endpoints.top_issue_per_community()).await
    }
}

/// キャッシュ回避用のタイムスタンプ（ミリ秒）
fn cache_buster() -> u64 {
    js_sys::Date::now() as u64
}

fn network_error(err: JsValue) -> Error {
    Error::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    send(url, &opts, false).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T> {
    let body = serde_json::to_string(body)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));
    send(url, &opts, true).await
}

async fn send<T: DeserializeOwned>(url: &str, opts: &RequestInit, json_body: bool) -> Result<T> {
    let request = Request::new_with_str_and_init(url, opts).map_err(network_error)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(network_error)?;
    if json_body {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(network_error)?;
    }

    let window = gloo::utils::window();
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network_error)?;
    let resp: Response = resp_value.dyn_into().map_err(network_error)?;

    if !resp.ok() {
        return Err(Error::Http {
            status: resp.status(),
            url: url.to_string(),
        });
    }

    // 数値IDを崩さないようJSON文字列として受けてserde_jsonで読む
    let text = JsFuture::from(resp.text().map_err(network_error)?)
        .await
        .map_err(network_error)?;
    let text = text.as_string().ok_or(Error::MissingField("body"))?;
    Ok(serde_json::from_str(&text)?)
}
