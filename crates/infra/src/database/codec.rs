//! Column encoding shared by the repositories

use rusqlite::types::Type;
use uuid::Uuid;
use wiss_domain::{Frequency, PageRef};

pub(crate) fn parse_uuid(idx: usize, raw: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn frequency_from_code(idx: usize, code: i64) -> rusqlite::Result<Frequency> {
    Frequency::from_code(code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("unknown frequency code {code}").into(),
        )
    })
}

pub(crate) fn interval_from_sql(idx: usize, raw: i64) -> rusqlite::Result<u32> {
    u32::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}

/// Page columns `(id, title, url)` as a reference, present when the id is.
pub(crate) fn page_ref(id: Option<i64>, title: Option<String>, url: Option<String>) -> Option<PageRef> {
    id.map(|id| PageRef { id, title: title.unwrap_or_default(), url: url.unwrap_or_default() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_frequency_code_is_a_conversion_error() {
        assert_eq!(frequency_from_code(4, 1).unwrap(), Frequency::Monthly);
        assert!(matches!(
            frequency_from_code(4, 9),
            Err(rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, _))
        ));
    }

    #[test]
    fn malformed_uuid_is_a_conversion_error() {
        assert!(parse_uuid(0, "not-a-uuid").is_err());
        let key = Uuid::new_v4();
        assert_eq!(parse_uuid(0, &key.to_string()).unwrap(), key);
    }

    #[test]
    fn page_ref_requires_an_id() {
        assert_eq!(page_ref(None, Some("Home".into()), None), None);
        assert_eq!(
            page_ref(Some(3), Some("Home".into()), None),
            Some(PageRef { id: 3, title: "Home".into(), url: String::new() })
        );
    }
}
