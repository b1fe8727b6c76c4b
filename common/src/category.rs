//! カテゴリ集計
//!
//! 市域内のIssueをカテゴリ別にまとめ、件数順に並べてパネル用のグループを作る。
//! - 上位N件: 初期選択
//! - N位以下で件数が閾値超: "Other Categories"
//! - 件数が閾値以下: 合成カテゴリ"Other"に集約

use crate::types::{Issue, LatLng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 低件数カテゴリを集約する合成カテゴリ名
pub const OTHER_CATEGORY: &str = "Other";

/// パネルに並ぶカテゴリ1行分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub count: usize,
    pub visible: bool,
    /// "Other"のみ: 集約された低件数カテゴリ
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_categories: Vec<CategoryConfig>,
}

impl CategoryConfig {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            visible: false,
            sub_categories: Vec::new(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        !self.sub_categories.is_empty()
    }

    /// 選択集合に出し入れする実カテゴリ名
    pub fn member_names(&self) -> Vec<&str> {
        if self.is_aggregate() {
            self.sub_categories.iter().map(|c| c.name.as_str()).collect()
        } else {
            vec![self.name.as_str()]
        }
    }
}

/// 市域内Issueのカテゴリ別インデックス
///
/// ページ読込時に一度だけ作る。カテゴリの並びは初出順。
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    order: Vec<String>,
    by_category: HashMap<String, Vec<Issue>>,
}

impl CategoryIndex {
    pub fn build(issues: &[Issue]) -> Self {
        let mut index = Self::default();
        for issue in issues.iter().filter(|i| i.within_city_limits) {
            let name = issue.category_name();
            match index.by_category.get_mut(name) {
                Some(list) => list.push(issue.clone()),
                None => {
                    index.order.push(name.to_string());
                    index.by_category.insert(name.to_string(), vec![issue.clone()]);
                }
            }
        }
        index
    }

    pub fn issues(&self, category: &str) -> &[Issue] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: &str) -> bool {
        self.by_category.contains_key(category)
    }

    /// 初出順のカテゴリ名
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 件数降順（同数は初出順）
    pub fn ranked(&self) -> Vec<CategoryConfig> {
        let mut configs: Vec<CategoryConfig> = self
            .order
            .iter()
            .map(|name| CategoryConfig::new(name.clone(), self.issues(name).len()))
            .collect();
        configs.sort_by(|a, b| b.count.cmp(&a.count));
        configs
    }

    /// 指定カテゴリのうち座標を持つIssueの位置
    pub fn locations<'a, I>(&'a self, categories: I) -> Vec<LatLng>
    where
        I: IntoIterator<Item = &'a str>,
    {
        categories
            .into_iter()
            .flat_map(|c| self.issues(c).iter())
            .filter_map(Issue::location)
            .collect()
    }
}

/// パネル用に分けたカテゴリ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryGroups {
    /// 上位N件（初期表示）
    pub top: Vec<CategoryConfig>,
    /// それ以外（末尾に"Other"が付く場合あり）
    pub others: Vec<CategoryConfig>,
}

impl CategoryGroups {
    pub fn build(index: &CategoryIndex, top_n: usize, low_count_threshold: usize) -> Self {
        let ranked = index.ranked();

        let top: Vec<CategoryConfig> = ranked
            .iter()
            .take(top_n)
            .cloned()
            .map(|mut c| {
                c.visible = true;
                c
            })
            .collect();

        let mut others: Vec<CategoryConfig> = ranked
            .iter()
            .skip(top_n)
            .filter(|c| c.count > low_count_threshold)
            .cloned()
            .collect();

        // 上位に入った低件数カテゴリも"Other"に含まれる
        let low: Vec<CategoryConfig> = ranked
            .iter()
            .filter(|c| c.count <= low_count_threshold)
            .cloned()
            .collect();
        let low_total: usize = low.iter().map(|c| c.count).sum();
        if low_total > 0 {
            others.push(CategoryConfig {
                name: OTHER_CATEGORY.to_string(),
                count: low_total,
                visible: false,
                sub_categories: low,
            });
        }

        Self { top, others }
    }

    pub fn group(&self, group: CategoryGroup) -> &[CategoryConfig] {
        match group {
            CategoryGroup::Top => &self.top,
            CategoryGroup::Others => &self.others,
        }
    }

    pub fn group_mut(&mut self, group: CategoryGroup) -> &mut Vec<CategoryConfig> {
        match group {
            CategoryGroup::Top => &mut self.top,
            CategoryGroup::Others => &mut self.others,
        }
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut CategoryConfig> {
        self.top
            .iter_mut()
            .chain(self.others.iter_mut())
            .find(|c| c.name == name)
    }

    /// 初期選択されるカテゴリ名
    pub fn preselected(&self) -> Vec<String> {
        self.top.iter().map(|c| c.name.clone()).collect()
    }
}

/// カテゴリグループ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    Top,
    Others,
}

/// 上位N件のカテゴリ名を件数降順で返す
pub fn top_categories(issues: &[Issue], n: usize) -> Vec<(String, usize)> {
    CategoryIndex::build(issues)
        .ranked()
        .into_iter()
        .take(n)
        .map(|c| (c.name, c.count))
        .collect()
}
