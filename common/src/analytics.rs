//! サイドバーの集計表示

use crate::format::{format_count, truncate_label};
use crate::types::{CommunityTopIssues, TopIssuePerCommunity};
use serde::Serialize;

const ISSUE_TYPE_MAX_CHARS: usize = 60;
const COMMUNITY_TYPE_MAX_CHARS: usize = 50;

/// 「Most requested issue categories」の1ブロック
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueTypeBlock {
    /// `"1. Potholes"` 形式
    pub heading: String,
    /// `"(1,234 total)"`
    pub total: String,
    /// `"1. Southside: 120"`
    pub communities: Vec<String>,
}

/// 「Most requested category by community」の1行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityRow {
    pub community: String,
    pub issue_type: String,
    /// `"120 of 900 requests"`
    pub share: String,
}

/// 上位カテゴリごとのコミュニティ内訳（コミュニティが空のカテゴリは除く）
pub fn issue_type_blocks(data: &CommunityTopIssues) -> Vec<IssueTypeBlock> {
    data.top5_issue_types
        .iter()
        .enumerate()
        .filter_map(|(i, issue_type)| {
            let communities = data.issues.get(issue_type).filter(|c| !c.is_empty())?;
            let total: u64 = communities.iter().map(|c| c.count).sum();
            Some(IssueTypeBlock {
                heading: format!("{}. {}", i + 1, truncate_label(issue_type, ISSUE_TYPE_MAX_CHARS)),
                total: format!("({} total)", format_count(total)),
                communities: communities
                    .iter()
                    .enumerate()
                    .map(|(j, c)| format!("{}. {}: {}", j + 1, c.community, format_count(c.count)))
                    .collect(),
            })
        })
        .collect()
}

pub fn community_rows(data: &TopIssuePerCommunity) -> Vec<CommunityRow> {
    data.communities
        .iter()
        .map(|c| CommunityRow {
            community: c.community.clone(),
            issue_type: truncate_label(&c.top_issue_type, COMMUNITY_TYPE_MAX_CHARS),
            share: format!(
                "{} of {} requests",
                format_count(c.count),
                format_count(c.total_issues)
            ),
        })
        .collect()
}
