//! APIレスポンスの型定義
//!
//! バックエンドが返すJSONは表記ゆれが多いため、寛容にデシリアライズする:
//! - Issue: 311リクエスト1件（座標は数値/文字列、市域フラグは0/1/bool）
//! - Comment / StatusChange: 複数のフィールド名を受け付ける
//! - ImageInfo: 画像URL（単体・バッチ共通）

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// カテゴリ未設定のIssueをまとめるカテゴリ名
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// 311サービスリクエスト1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    #[serde(deserialize_with = "de::opt_id")]
    pub issue_id: Option<String>,

    #[serde(rename = "issueId", deserialize_with = "de::opt_id", skip_serializing)]
    pub issue_id_camel: Option<String>,

    #[serde(deserialize_with = "de::opt_id", skip_serializing)]
    pub id: Option<String>,

    #[serde(rename = "request_type_full_category", deserialize_with = "de::opt_string")]
    pub category: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub status: Option<String>,

    #[serde(deserialize_with = "de::opt_coord")]
    pub latitude: Option<f64>,

    #[serde(deserialize_with = "de::opt_coord")]
    pub longitude: Option<f64>,

    #[serde(deserialize_with = "de::opt_string")]
    pub address: Option<String>,

    #[serde(rename = "Address", deserialize_with = "de::opt_string", skip_serializing)]
    pub address_upper: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub created_at: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub updated_at: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub description: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub summary: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub representative_image_url: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub representative_image: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub image_square_100x100: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub image_full_url: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub image_full: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub image_url: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub video_url: Option<String>,

    #[serde(deserialize_with = "de::flag")]
    pub within_city_limits: bool,

    #[serde(deserialize_with = "de::opt_string")]
    pub reporter_name: Option<String>,

    #[serde(deserialize_with = "de::opt_string", skip_serializing)]
    pub reported_by: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub reporter_email: Option<String>,

    #[serde(deserialize_with = "de::opt_string")]
    pub seeclickfix_url: Option<String>,

    #[serde(deserialize_with = "de::lenient_vec")]
    pub status_history: Vec<StatusChange>,
}

impl Issue {
    /// `issue_id` / `issueId` / `id` の順に最初に見つかったID
    pub fn id(&self) -> Option<&str> {
        self.issue_id
            .as_deref()
            .or(self.issue_id_camel.as_deref())
            .or(self.id.as_deref())
    }

    /// カテゴリ名（未設定は"Unknown"）
    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN_CATEGORY)
    }

    /// 有効な座標（0や非有限値は欠損扱い）
    pub fn location(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng))
                if lat.is_finite() && lng.is_finite() && lat != 0.0 && lng != 0.0 =>
            {
                Some(LatLng::new(lat, lng))
            }
            _ => None,
        }
    }

    pub fn address_text(&self) -> Option<&str> {
        self.address.as_deref().or(self.address_upper.as_deref())
    }

    pub fn reporter(&self) -> &str {
        self.reporter_name
            .as_deref()
            .or(self.reported_by.as_deref())
            .unwrap_or("Anonymous")
    }

    /// マーカーのホバー表示に使う画像URL（Issueレコード内にあるもの）
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.representative_image_url
            .as_deref()
            .or(self.image_square_100x100.as_deref())
            .or(self.image_full_url.as_deref())
    }

    /// 詳細表示用のSeeClickFixリンク
    pub fn seeclickfix_link(&self) -> Option<String> {
        if let Some(url) = &self.seeclickfix_url {
            return Some(url.clone());
        }
        self.id()
            .map(|id| format!("https://seeclickfix.com/issues/{}", id))
    }
}

/// ステータス履歴1件
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusChange {
    pub date: Option<String>,
    pub status: Option<String>,
    pub old_status: Option<String>,
}

impl<'de> Deserialize<'de> for StatusChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected an object"));
        }
        Ok(Self {
            date: first_string(&value, &["changed_at", "date", "created_at"]),
            status: first_string(&value, &["status", "new_status"]),
            old_status: first_string(&value, &["old_status"]),
        })
    }
}

/// コメント1件
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comment {
    pub date: Option<String>,
    pub text: Option<String>,
    pub commenter_name: Option<String>,
    pub commenter_email: Option<String>,
    pub image_full: Option<String>,
    pub image_square: Option<String>,
}

impl<'de> Deserialize<'de> for Comment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected an object"));
        }
        Ok(Self {
            date: first_string(
                &value,
                &["created_at", "date", "created_date", "timestamp", "time"],
            ),
            text: first_string(
                &value,
                &["comment", "text", "body", "description", "message"],
            ),
            commenter_name: first_string(
                &value,
                &["commenter_name", "author_name", "name", "user_name", "submitter_name"],
            ),
            commenter_email: first_string(
                &value,
                &["commenter_email", "author_email", "email", "user_email"],
            ),
            image_full: first_string(&value, &["media_image_full", "image_full"]),
            image_square: first_string(&value, &["media_image_square", "image_square_100x100"]),
        })
    }
}

/// コメントAPIのレスポンスを読む
///
/// 配列そのもの、または `{"comments": [...]}` のどちらも受け付け、読めない要素は捨てる。
pub fn parse_comments(value: Value) -> Vec<Comment> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("comments") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

/// 画像検索の結果（`/api/image/{id}` とバッチの各要素）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInfo {
    #[serde(deserialize_with = "de::opt_string")]
    pub image_url: Option<String>,
    pub error: Option<Value>,
}

impl ImageInfo {
    /// エラーがなくURLがある場合のみURLを返す
    pub fn usable_url(&self) -> Option<&str> {
        let has_error = match &self.error {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        };
        if has_error {
            return None;
        }
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// バッチ画像検索のリクエストボディ
#[derive(Debug, Clone, Serialize)]
pub struct BatchImageRequest {
    pub issue_ids: Vec<String>,
    pub variant: String,
}

/// バッチ画像検索のレスポンス（issue_id → ImageInfo）
pub type BatchImageResponse = HashMap<String, ImageInfo>;

/// `/api/last-sync`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LastSync {
    pub last_sync_time: Option<String>,
}

/// `/api/issues/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueStats {
    pub total_issues: Option<u64>,
}

/// コミュニティ別件数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityCount {
    pub community: String,
    pub count: u64,
}

/// `/api/stats/community-top-issues`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityTopIssues {
    pub issues: HashMap<String, Vec<CommunityCount>>,
    pub top5_issue_types: Vec<String>,
}

/// コミュニティで最も多いカテゴリ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityTopIssue {
    pub community: String,
    pub top_issue_type: String,
    pub count: u64,
    pub total_issues: u64,
}

/// `/api/stats/top-issue-per-community`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopIssuePerCommunity {
    pub communities: Vec<CommunityTopIssue>,
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k))
        .find_map(de::value_to_string)
}

mod de {
    use super::*;

    pub fn value_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(value_to_string))
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        opt_string(d)
    }

    pub fn opt_coord<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
            _ => false,
        })
    }

    pub fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
