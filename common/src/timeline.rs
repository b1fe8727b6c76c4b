//! 詳細表示のタイムライン
//!
//! Issueの作成・更新・ステータス履歴とコメントを1本の時系列にまとめる。
//! 新しい順に並べ、日付の無いイベントは末尾。

use crate::format::parse_timestamp;
use crate::types::{Comment, Issue};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

const STATUS_NOT_AVAILABLE: &str = "Status not available";

/// イベント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Status,
    Comment,
}

/// タイムライン1件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub kind: EventKind,
    /// APIから受け取ったままの日時文字列
    pub date: Option<String>,
    pub title: String,
    pub description: String,
    pub commenter: Option<String>,
    pub commenter_email: Option<String>,
    pub old_status: Option<String>,
    pub image_full: Option<String>,
    pub image_square: Option<String>,
}

impl TimelineEvent {
    fn status(title: &str, date: Option<String>, description: String) -> Self {
        Self {
            kind: EventKind::Status,
            date,
            title: title.to_string(),
            description,
            commenter: None,
            commenter_email: None,
            old_status: None,
            image_full: None,
            image_square: None,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

/// タイムラインを組み立てる
pub fn build_timeline(issue: &Issue, comments: &[Comment]) -> Vec<TimelineEvent> {
    let status = issue
        .status
        .clone()
        .unwrap_or_else(|| STATUS_NOT_AVAILABLE.to_string());
    let mut events = Vec::new();

    if let Some(created) = &issue.created_at {
        events.push(TimelineEvent::status(
            "Issue Created",
            Some(created.clone()),
            status.clone(),
        ));
    }

    if let Some(updated) = &issue.updated_at {
        if issue.created_at.as_ref() != Some(updated) {
            events.push(TimelineEvent::status(
                "Issue Updated",
                Some(updated.clone()),
                status.clone(),
            ));
        }
    }

    for change in &issue.status_history {
        let mut event = TimelineEvent::status(
            "Status Changed",
            change.date.clone(),
            change
                .status
                .clone()
                .unwrap_or_else(|| "Status updated".to_string()),
        );
        event.old_status = change.old_status.clone();
        events.push(event);
    }

    for comment in comments {
        let date = comment
            .date
            .clone()
            .or_else(|| issue.created_at.clone())
            .or_else(|| issue.updated_at.clone());
        events.push(TimelineEvent {
            kind: EventKind::Comment,
            date,
            title: "Comment".to_string(),
            description: comment
                .text
                .clone()
                .unwrap_or_else(|| "No comment text".to_string()),
            commenter: Some(
                comment
                    .commenter_name
                    .clone()
                    .unwrap_or_else(|| "Anonymous".to_string()),
            ),
            commenter_email: comment.commenter_email.clone(),
            old_status: None,
            image_full: comment.image_full.clone(),
            image_square: comment.image_square.clone(),
        });
    }

    sort_newest_first(&mut events);
    events
}

/// 新しい順（安定ソート。日付不明は末尾）
pub fn sort_newest_first(events: &mut [TimelineEvent]) {
    events.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
