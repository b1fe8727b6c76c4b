//! 写真サムネイルレイヤーの組み立て
//!
//! 対象Issueの選定と間引き、バッチ画像APIの結果からマーカー一覧を作る。
//! 取得そのものはWASM側。

use crate::address::AddressParts;
use crate::api::ImageVariant;
use crate::category::CategoryIndex;
use crate::selection::SelectedCategories;
use crate::types::{BatchImageRequest, BatchImageResponse, ImageInfo, Issue, LatLng};
use serde::Serialize;

/// 写真マーカー1件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoMarker {
    pub issue_id: String,
    pub position: LatLng,
    pub image_url: String,
}

/// 写真の対象となるIssue
///
/// 選択中カテゴリから集め、選択が空（または該当なし）なら全カテゴリ。
/// IDと座標を持つものだけを返す。
pub fn photo_candidates<'a>(
    index: &'a CategoryIndex,
    selected: &SelectedCategories,
) -> Vec<&'a Issue> {
    let mut issues: Vec<&Issue> = selected
        .sorted()
        .into_iter()
        .flat_map(|c| index.issues(c))
        .collect();
    if issues.is_empty() {
        issues = index.categories().flat_map(|c| index.issues(c)).collect();
    }
    issues
        .into_iter()
        .filter(|i| i.id().is_some() && i.location().is_some())
        .collect()
}

/// 上限を超える場合に等間隔で間引く（同じ入力なら同じ結果）
pub fn sample_evenly<T: Clone>(items: &[T], cap: usize) -> Vec<T> {
    if items.len() <= cap {
        return items.to_vec();
    }
    (0..cap).map(|i| items[i * items.len() / cap].clone()).collect()
}

/// バッチ画像APIのリクエスト
pub fn batch_request(issues: &[&Issue]) -> BatchImageRequest {
    BatchImageRequest {
        issue_ids: issues.iter().filter_map(|i| i.id()).map(str::to_string).collect(),
        variant: ImageVariant::Thumbnail.as_str().to_string(),
    }
}

/// 画像情報が使えるIssueだけマーカーにする
pub fn photo_markers(issues: &[&Issue], images: &BatchImageResponse) -> Vec<PhotoMarker> {
    issues
        .iter()
        .filter_map(|issue| {
            let id = issue.id()?;
            let info = images.get(id)?;
            photo_marker(issue, info)
        })
        .collect()
}

/// 個別取得の結果から1件分のマーカー
pub fn photo_marker(issue: &Issue, info: &ImageInfo) -> Option<PhotoMarker> {
    Some(PhotoMarker {
        issue_id: issue.id()?.to_string(),
        position: issue.location()?,
        image_url: info.usable_url()?.to_string(),
    })
}

/// 拡大表示のキャプション
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoCaption {
    pub category: String,
    /// `"{通り名}, {郵便番号}"`
    pub location: String,
    pub created_at: Option<String>,
    pub status: String,
}

impl PhotoCaption {
    pub fn new(issue: &Issue) -> Self {
        Self {
            category: issue
                .category
                .clone()
                .unwrap_or_else(|| "Category not available".to_string()),
            location: AddressParts::parse(issue.address_text()).headline(),
            created_at: issue.created_at.clone(),
            status: issue
                .status
                .clone()
                .unwrap_or_else(|| "Status not available".to_string()),
        }
    }
}
