//! `/issue/{id}` 形式のURLルーティング

const ISSUE_PREFIX: &str = "/issue/";

/// パスからIssue IDを取り出す（`/issue/123`、末尾スラッシュ可）
pub fn issue_id_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(ISSUE_PREFIX)?;
    let id = rest.trim_end_matches('/');
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}

pub fn issue_path(id: &str) -> String {
    format!("{}{}", ISSUE_PREFIX, id)
}

/// 共有用の絶対URL
pub fn share_url(origin: &str, id: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), issue_path(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_id_from_path() {
        assert_eq!(issue_id_from_path("/issue/123"), Some("123"));
        assert_eq!(issue_id_from_path("/issue/123/"), Some("123"));
        assert_eq!(issue_id_from_path("/issue/"), None);
        assert_eq!(issue_id_from_path("/issue/1/comments"), None);
        assert_eq!(issue_id_from_path("/"), None);
    }

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://map.example.org/", "987"),
            "https://map.example.org/issue/987"
        );
        assert_eq!(issue_path("5"), "/issue/5");
    }
}
