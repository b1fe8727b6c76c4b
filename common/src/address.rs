//! 住所文字列から通り名と郵便番号を取り出す

use regex::Regex;
use serde::Serialize;

pub const STREET_NOT_AVAILABLE: &str = "Street name not available";
pub const ZIP_NOT_AVAILABLE: &str = "Zip not available";
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// 先頭の番地を除いた通り名
///
/// 住所の最初のカンマまでを通りとみなす。
pub fn street_name(address: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref HOUSE_NUMBER_RE: Regex = Regex::new(r"^\d+\s*").unwrap();
    }
    let street = address.split(',').next().unwrap_or_default().trim();
    let name = HOUSE_NUMBER_RE.replace(street, "");
    if name.is_empty() {
        None
    } else {
        Some(name.into_owned())
    }
}

/// 5桁の郵便番号（最初に現れたもの）
pub fn zip_code(address: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref ZIP_RE: Regex = Regex::new(r"\b\d{5}\b").unwrap();
    }
    ZIP_RE.find(address).map(|m| m.as_str().to_string())
}

/// 詳細表示の見出し用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressParts {
    pub full: String,
    pub street: String,
    pub zip: String,
}

impl AddressParts {
    pub fn parse(address: Option<&str>) -> Self {
        let full = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ADDRESS_NOT_AVAILABLE);
        Self {
            full: full.to_string(),
            street: street_name(full).unwrap_or_else(|| STREET_NOT_AVAILABLE.to_string()),
            zip: zip_code(full).unwrap_or_else(|| ZIP_NOT_AVAILABLE.to_string()),
        }
    }

    /// `"{通り名}, {郵便番号}"`
    pub fn headline(&self) -> String {
        format!("{}, {}", self.street, self.zip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_name() {
        assert_eq!(
            street_name("1234 5th Ave N, Birmingham, AL 35203").as_deref(),
            Some("5th Ave N")
        );
        assert_eq!(street_name("Linn Park, Birmingham").as_deref(), Some("Linn Park"));
        assert_eq!(street_name("1234, Birmingham"), None);
    }

    #[test]
    fn test_zip_code() {
        assert_eq!(zip_code("1234 5th Ave N, Birmingham, AL 35203").as_deref(), Some("35203"));
        assert_eq!(zip_code("AL 35203-1234").as_deref(), Some("35203"));
        assert_eq!(zip_code("123456 Long Rd"), None);
        assert_eq!(zip_code("Birmingham"), None);
    }

    #[test]
    fn test_address_parts_fallbacks() {
        let parts = AddressParts::parse(None);
        assert_eq!(parts.full, ADDRESS_NOT_AVAILABLE);
        assert_eq!(parts.street, ADDRESS_NOT_AVAILABLE);
        assert_eq!(parts.zip, ZIP_NOT_AVAILABLE);

        let parts = AddressParts::parse(Some("2000 Morris Ave, Birmingham, AL 35203"));
        assert_eq!(parts.headline(), "Morris Ave, 35203");
    }
}
