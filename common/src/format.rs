//! 表示用の文字列整形
//!
//! タイムゾーン変換そのものはブラウザ側（Intl）で行い、
//! ここでは受け取った文字列の後処理と時刻の解析・比較だけを扱う。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// 表示できない値のプレースホルダ
pub const NOT_AVAILABLE: &str = "Not available";

/// 3桁区切り（`12345` → `"12,345"`）
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 空白の連続を `-` にしてDOM IDに使う
pub fn slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

/// タイムゾーン指定の無い時刻文字列をUTCとして扱うため `Z` を付ける
pub fn normalize_utc(timestamp: &str) -> String {
    lazy_static::lazy_static! {
        static ref OFFSET_RE: Regex = Regex::new(r"[+-]\d{2}:\d{2}$").unwrap();
    }
    let trimmed = timestamp.trim();
    if trimmed.ends_with('Z') || OFFSET_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}Z", trimmed)
    }
}

/// APIの時刻文字列を解析する
///
/// RFC 3339、タイムゾーン無しの日時（UTC扱い）、日付のみに対応。
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalize_utc(trimmed)) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `AM` / `PM` を `a.m.` / `p.m.` に
pub fn meridiem_lower(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref AM_RE: Regex = Regex::new(r"(?i)\bAM\b").unwrap();
        static ref PM_RE: Regex = Regex::new(r"(?i)\bPM\b").unwrap();
    }
    let text = AM_RE.replace_all(text, "a.m.");
    PM_RE.replace_all(&text, "p.m.").into_owned()
}

/// 月名をAP式の略記に（March〜Julyはそのまま）
pub fn abbreviate_month(date: &str) -> String {
    const MONTHS: &[(&str, &str)] = &[
        ("January", "Jan."),
        ("February", "Feb."),
        ("August", "Aug."),
        ("September", "Sept."),
        ("October", "Oct."),
        ("November", "Nov."),
        ("December", "Dec."),
    ];
    MONTHS
        .iter()
        .fold(date.to_string(), |acc, (full, short)| acc.replace(full, short))
}

/// 「最終更新」表示
///
/// `time` はIntlの `"3:45 PM"`、`date` は `"November 3, 2025"` 形式を想定し、
/// `"3:45 p.m. Nov. 3, 2025"` を返す。どちらかが空なら "Not available"。
pub fn database_time_label(time: &str, date: &str) -> String {
    let (time, date) = (time.trim(), date.trim());
    if time.is_empty() || date.is_empty() || time == "Invalid Date" || date == "Invalid Date" {
        return NOT_AVAILABLE.to_string();
    }
    meridiem_lower(&format!("{} {}", time, abbreviate_month(date)))
}

/// 長い名前を `max` 文字で切って `...` を付ける
pub fn truncate_label(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// HTML断片に埋め込む文字列のエスケープ
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// CSSの `url("...")` 値。引用符とバックスラッシュをエスケープし、改行などの制御文字は落とす
pub fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len() + 7);
    out.push_str("url(\"");
    for ch in url.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out.push_str("\")");
    out
}

/// 色指定として使える文字だけなら返す（`#rrggbb`、色名、`rgb(...)` など）
pub fn css_color(text: &str) -> Option<&str> {
    let text = text.trim();
    let valid = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'));
    valid.then_some(text)
}
