//! 요청 본문 역직렬화를 위한 공통 헬퍼 함수.
//!
//! 클라이언트마다 날짜 형식과 "값 지우기" 표현이 달라 이를 한곳에서 처리합니다.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// 마감일 문자열 파싱.
///
/// `YYYY-MM-DD` 또는 RFC 3339 타임스탬프를 받아 날짜 부분만 남깁니다.
/// 빈 문자열은 "마감일 없음"으로 취급합니다.
pub fn parse_due_date(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// `Option<NaiveDate>` 마감일 역직렬화 (`null`과 빈 문자열은 `None`).
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Input {
///     #[serde(default, deserialize_with = "deserialize_due_date")]
///     due_date: Option<NaiveDate>,
/// }
/// ```
pub fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_due_date(&raw).map_err(D::Error::custom),
        None => Ok(None),
    }
}

/// 부분 수정용 마감일 역직렬화.
///
/// 필드가 없으면 `#[serde(default)]`에 의해 `None`(변경 없음),
/// `null`/빈 문자열이면 `Some(None)`(지우기), 날짜면 `Some(Some(date))`.
pub fn deserialize_patch_due_date<'de, D>(
    deserializer: D,
) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_due_date(deserializer).map(Some)
}

/// 부분 수정용 nullable 필드 역직렬화.
///
/// 필드 없음 → `None`, `null` → `Some(None)`, 값 → `Some(Some(v))`.
pub fn deserialize_nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Create {
        #[serde(default, deserialize_with = "deserialize_due_date")]
        due: Option<NaiveDate>,
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_patch_due_date")]
        due: Option<Option<NaiveDate>>,
        #[serde(default, deserialize_with = "deserialize_nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_parse_due_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15);
        assert_eq!(parse_due_date("2026-03-15").unwrap(), expected);
        assert_eq!(parse_due_date("2026-03-15T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_due_date("").unwrap(), None);
        assert!(parse_due_date("15/03/2026").is_err());
    }

    #[test]
    fn test_create_due_date() {
        let c: Create = serde_json::from_str(r#"{"due":"2026-01-02"}"#).unwrap();
        assert_eq!(c.due, NaiveDate::from_ymd_opt(2026, 1, 2));

        let c: Create = serde_json::from_str(r#"{}"#).unwrap();
        assert!(c.due.is_none());

        let c: Create = serde_json::from_str(r#"{"due":null}"#).unwrap();
        assert!(c.due.is_none());

        assert!(serde_json::from_str::<Create>(r#"{"due":"tomorrow"}"#).is_err());
    }

    #[test]
    fn test_patch_tristate() {
        let p: Patch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.due, None);
        assert_eq!(p.note, None);

        let p: Patch = serde_json::from_str(r#"{"due":null,"note":null}"#).unwrap();
        assert_eq!(p.due, Some(None));
        assert_eq!(p.note, Some(None));

        let p: Patch = serde_json::from_str(r#"{"due":"2026-05-05","note":"hi"}"#).unwrap();
        assert_eq!(p.due, Some(NaiveDate::from_ymd_opt(2026, 5, 5)));
        assert_eq!(p.note, Some(Some("hi".to_string())));
    }
}
