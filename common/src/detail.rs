//! 詳細モーダルの表示内容
//!
//! Issue本体・コメント・画像情報を1つの読み取り専用ビューにまとめる。
//! コメントと画像は取得失敗時に空として渡される。

use crate::address::AddressParts;
use crate::timeline::{build_timeline, TimelineEvent};
use crate::types::{Comment, ImageInfo, Issue};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueDetail {
    pub id: String,
    pub category: String,
    pub status: String,
    pub address: AddressParts,
    pub description: Option<String>,
    pub reporter: String,
    pub reporter_email: Option<String>,
    pub image_url: Option<String>,
    pub square_image_url: Option<String>,
    pub video_url: Option<String>,
    pub seeclickfix_url: Option<String>,
    pub timeline: Vec<TimelineEvent>,
}

impl IssueDetail {
    pub fn build(issue: &Issue, comments: &[Comment], image: Option<&ImageInfo>) -> Self {
        Self {
            id: issue.id().unwrap_or_default().to_string(),
            category: issue.category_name().to_string(),
            status: issue
                .status
                .clone()
                .unwrap_or_else(|| "Status not available".to_string()),
            address: AddressParts::parse(issue.address_text()),
            description: issue
                .description
                .clone()
                .or_else(|| issue.summary.clone())
                .filter(|d| !d.trim().is_empty()),
            reporter: issue.reporter().to_string(),
            reporter_email: issue.reporter_email.clone().filter(|e| !e.is_empty()),
            image_url: full_image_url(issue, image),
            square_image_url: issue
                .image_square_100x100
                .clone()
                .or_else(|| issue.representative_image.clone()),
            video_url: issue.video_url.clone().filter(|v| !v.is_empty()),
            seeclickfix_url: issue.seeclickfix_link(),
            timeline: build_timeline(issue, comments),
        }
    }
}

/// 拡大表示の画像URL
///
/// 画像APIの結果を優先し、無ければIssueレコード内のURLを順に見る。
pub fn full_image_url(issue: &Issue, image: Option<&ImageInfo>) -> Option<String> {
    image
        .and_then(ImageInfo::usable_url)
        .or(issue.image_full_url.as_deref())
        .or(issue.representative_image_url.as_deref())
        .or(issue.image_url.as_deref())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue() -> Issue {
        Issue {
            issue_id: Some("77".into()),
            category: Some("Potholes".into()),
            latitude: Some(33.5),
            longitude: Some(-86.8),
            address: Some("100 20th St N, Birmingham, AL 35203".into()),
            image_url: Some("https://img/plain.jpg".into()),
            representative_image_url: Some("https://img/rep.jpg".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_precedence() {
        let issue = issue();
        let from_api = ImageInfo {
            image_url: Some("https://img/api.jpg".into()),
            error: None,
        };
        assert_eq!(
            full_image_url(&issue, Some(&from_api)).as_deref(),
            Some("https://img/api.jpg")
        );

        let failed = ImageInfo {
            image_url: Some("https://img/api.jpg".into()),
            error: Some(json!("not found")),
        };
        assert_eq!(
            full_image_url(&issue, Some(&failed)).as_deref(),
            Some("https://img/rep.jpg")
        );

        let mut bare = issue.clone();
        bare.representative_image_url = None;
        assert_eq!(full_image_url(&bare, None).as_deref(), Some("https://img/plain.jpg"));
    }

    #[test]
    fn test_build_detail() {
        let detail = IssueDetail::build(&issue(), &[], None);
        assert_eq!(detail.id, "77");
        assert_eq!(detail.address.street, "20th St N");
        assert_eq!(detail.address.zip, "35203");
        assert_eq!(detail.reporter, "Anonymous");
        assert_eq!(detail.status, "Status not available");
        assert_eq!(
            detail.seeclickfix_url.as_deref(),
            Some("https://seeclickfix.com/issues/77")
        );
        assert!(detail.timeline.is_empty());
    }

    #[test]
    fn test_build_detail_without_location() {
        let detail = IssueDetail::build(&Issue::default(), &[], None);
        assert_eq!(detail.address.zip, "Zip not available");
        assert!(detail.image_url.is_none());
    }
}
