//! 選択中カテゴリの集合
//!
//! チェックボックス操作で変化し、ヒートマップとマーカーの表示対象を決める。

use crate::category::{CategoryConfig, CategoryGroup, CategoryGroups};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedCategories {
    names: HashSet<String>,
}

impl SelectedCategories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// 名前順（描画順を安定させる用）
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// 1行分のチェック状態を反映（"Other"は配下カテゴリをまとめて出し入れ）
    pub fn set_config(&mut self, config: &mut CategoryConfig, checked: bool) -> bool {
        let mut changed = false;
        for name in config.member_names() {
            changed |= if checked {
                self.names.insert(name.to_string())
            } else {
                self.names.remove(name)
            };
        }
        config.visible = checked;
        changed
    }

    /// カテゴリ名でチェック状態を反映。該当行がなければfalse
    pub fn toggle(&mut self, groups: &mut CategoryGroups, name: &str, checked: bool) -> bool {
        match groups.find_mut(name) {
            Some(config) => {
                self.set_config(config, checked);
                true
            }
            None => false,
        }
    }

    /// グループ内で状態が異なる行だけを切り替える（"Select all" / "Select none"）
    pub fn set_group(&mut self, groups: &mut CategoryGroups, group: CategoryGroup, checked: bool) -> bool {
        let mut changed = false;
        for config in groups.group_mut(group).iter_mut() {
            if config.visible != checked {
                self.set_config(config, checked);
                changed = true;
            }
        }
        changed
    }
}
