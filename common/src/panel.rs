//! 操作パネルの開閉状態と統計表示

use crate::format::{format_count, NOT_AVAILABLE};
use serde::Serialize;

pub const PANEL_TITLE: &str = "Birmingham 311 requests";

/// パネルとサイドバーの開閉
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub expanded: bool,
    /// "Other Categories (N)" グループ
    pub others_expanded: bool,
    pub sidebar_open: bool,
}

impl PanelState {
    /// デスクトップでは展開、モバイルでは折りたたみで開始
    pub fn initial(is_mobile: bool) -> Self {
        Self {
            expanded: !is_mobile,
            others_expanded: false,
            sidebar_open: false,
        }
    }

    /// 見出し横のボタン表示
    pub fn toggle_symbol(&self) -> &'static str {
        if self.expanded {
            "−"
        } else {
            "+"
        }
    }
}

/// 統計ブロックの内容
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    /// 統計APIの総件数（未取得ならNone）
    pub total_in_dataset: Option<u64>,
    /// 読み込んだIssue数
    pub loaded: usize,
    pub within_city_limits: usize,
    /// 整形済みの最終更新日時。None は取得中
    pub last_updated: Option<String>,
    /// `/api/last-sync` の生の時刻
    pub last_sync_time: Option<String>,
}

impl StatsSummary {
    pub fn total(&self) -> u64 {
        self.total_in_dataset.unwrap_or(self.loaded as u64)
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("Total requests in dataset: {}", format_count(self.total())),
            format!(
                "Requests within city limits: {}",
                format_count(self.within_city_limits as u64)
            ),
            format!(
                "Last updated {}",
                self.last_updated.as_deref().unwrap_or("Loading...")
            ),
        ]
    }

    /// 取得失敗時
    pub fn mark_last_updated_unavailable(&mut self) {
        self.last_updated = Some(NOT_AVAILABLE.to_string());
        self.last_sync_time = None;
    }

    /// 詳細表示フッターの最終更新。生の時刻を `format` で整形する
    pub fn footer_last_updated(&self, format: impl Fn(&str) -> Option<String>) -> String {
        match (&self.last_updated, &self.last_sync_time) {
            (None, _) => "Loading...".to_string(),
            (Some(_), Some(raw)) => format(raw).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            (Some(_), None) => NOT_AVAILABLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert!(PanelState::initial(false).expanded);
        assert!(!PanelState::initial(true).expanded);
        assert_eq!(PanelState::initial(true).toggle_symbol(), "+");
    }

    #[test]
    fn test_stats_lines() {
        let mut stats = StatsSummary {
            loaded: 1500,
            within_city_limits: 1400,
            ..Default::default()
        };
        assert_eq!(stats.lines()[0], "Total requests in dataset: 1,500");
        assert_eq!(stats.lines()[2], "Last updated Loading...");

        stats.total_in_dataset = Some(20_431);
        stats.mark_last_updated_unavailable();
        let lines = stats.lines();
        assert_eq!(lines[0], "Total requests in dataset: 20,431");
        assert_eq!(lines[1], "Requests within city limits: 1,400");
        assert_eq!(lines[2], "Last updated Not available");
    }

    #[test]
    fn test_footer_last_updated() {
        let format = |raw: &str| (raw == "2025-11-03T21:45:00").then(|| "11/03/2025, 15:45:00".to_string());
        let mut stats = StatsSummary::default();
        assert_eq!(stats.footer_last_updated(format), "Loading...");

        stats.last_updated = Some("3:45 p.m. Nov. 3, 2025".into());
        stats.last_sync_time = Some("2025-11-03T21:45:00".into());
        assert_eq!(stats.footer_last_updated(format), "11/03/2025, 15:45:00");

        stats.last_sync_time = Some("garbage".into());
        assert_eq!(stats.footer_last_updated(format), NOT_AVAILABLE);

        stats.mark_last_updated_unavailable();
        assert_eq!(stats.footer_last_updated(format), NOT_AVAILABLE);
    }
}
