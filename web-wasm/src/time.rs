//! 中部時間(America/Chicago)での日時表示
//!
//! タイムゾーン変換はブラウザのIntlに任せ、文字列の後処理は共通ライブラリで行う。

use bham311_common::format::{database_time_label, normalize_utc};
use js_sys::{Date, Object, Reflect};
use wasm_bindgen::JsValue;

const TIME_ZONE: &str = "America/Chicago";
const LOCALE: &str = "en-US";

fn options(pairs: &[(&str, &str)]) -> JsValue {
    let obj = Object::new();
    let _ = Reflect::set(&obj, &"timeZone".into(), &TIME_ZONE.into());
    for (k, v) in pairs {
        let _ = Reflect::set(&obj, &(*k).into(), &(*v).into());
    }
    obj.into()
}

fn parse(timestamp: &str, assume_utc: bool) -> Option<Date> {
    let text = if assume_utc {
        normalize_utc(timestamp)
    } else {
        timestamp.to_string()
    };
    let date = Date::new(&JsValue::from_str(&text));
    if date.get_time().is_nan() {
        None
    } else {
        Some(date)
    }
}

/// 「最終更新」表示（例: `3:45 p.m. Nov. 3, 2025`）。タイムゾーン無しはUTC扱い
pub fn database_time(timestamp: &str) -> Option<String> {
    let date = parse(timestamp, true)?;
    let time: String = date
        .to_locale_string(LOCALE, &options(&[("hour", "numeric"), ("minute", "2-digit")]))
        .into();
    let day: String = date
        .to_locale_date_string(
            LOCALE,
            &options(&[("month", "long"), ("day", "numeric"), ("year", "numeric")]),
        )
        .into();
    let label = database_time_label(&time, &day);
    (label != bham311_common::format::NOT_AVAILABLE).then_some(label)
}

/// 詳細表示の日時（`MM/DD/YYYY, hh:mm:ss AM`）
pub fn central_date_time(timestamp: &str) -> String {
    match parse(timestamp, false) {
        Some(date) => date
            .to_locale_string(
                LOCALE,
                &options(&[
                    ("year", "numeric"),
                    ("month", "2-digit"),
                    ("day", "2-digit"),
                    ("hour", "2-digit"),
                    ("minute", "2-digit"),
                    ("second", "2-digit"),
                ]),
            )
            .into(),
        None => "Date not available".to_string(),
    }
}

/// 詳細表示フッターの日時（`MM/DD/YYYY, HH:mm:ss`、24時間制）。タイムゾーン無しはUTC扱い
pub fn footer_date_time(timestamp: &str) -> Option<String> {
    let date = parse(timestamp, true)?;
    Some(
        date.to_locale_string(
            LOCALE,
            &options(&[
                ("year", "numeric"),
                ("month", "2-digit"),
                ("day", "2-digit"),
                ("hour", "2-digit"),
                ("minute", "2-digit"),
                ("second", "2-digit"),
                ("hourCycle", "h23"),
            ]),
        )
        .into(),
    )
}

/// 現在時刻（詳細表示のフッター用）
pub fn now_central() -> String {
    let now: String = Date::new_0().to_iso_string().into();
    footer_date_time(&now).unwrap_or_else(|| bham311_common::format::NOT_AVAILABLE.to_string())
}

/// 写真キャプションの日付（`MM/DD/YYYY`）
pub fn central_date(timestamp: &str) -> String {
    match parse(timestamp, false) {
        Some(date) => date
            .to_locale_date_string(
                LOCALE,
                &options(&[("year", "numeric"), ("month", "2-digit"), ("day", "2-digit")]),
            )
            .into(),
        None => "Date not available".to_string(),
    }
}
