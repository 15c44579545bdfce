//! Fixture builders for events, taxonomy and locales

use chrono::NaiveDate;
use uuid::Uuid;
use wiss_domain::{
    AreaId, CategoryId, EventArea, EventDateDraft, EventDraft, EventsCategory, Frequency, Label,
    Locale, LocaleId,
};

pub const EN: LocaleId = 1;
pub const CY: LocaleId = 2;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn english() -> Locale {
    Locale { id: EN, language_code: "en".into() }
}

pub fn welsh() -> Locale {
    Locale { id: CY, language_code: "cy".into() }
}

pub fn category(id: CategoryId, name: &str, locale_id: LocaleId) -> EventsCategory {
    EventsCategory { id, name: Some(name.into()), translation_key: Uuid::new_v4(), locale_id }
}

pub fn area(id: AreaId, name: &str, translation_key: Uuid, locale_id: LocaleId) -> EventArea {
    EventArea { id, name: name.into(), description: None, translation_key, locale_id }
}

pub fn label(id: i64, key: &str, value: &str, locale_id: LocaleId) -> Label {
    Label { id, key: key.into(), value: value.into(), locale_id }
}

/// Draft with a single one-off date.
pub fn draft_on(title: &str, locale_id: LocaleId, on: NaiveDate) -> EventDraft {
    EventDraft { dates: vec![EventDateDraft::single(on)], ..EventDraft::new(title, locale_id) }
}

/// Draft recurring daily between two dates.
pub fn draft_daily(title: &str, locale_id: LocaleId, from: NaiveDate, to: NaiveDate) -> EventDraft {
    EventDraft {
        dates: vec![EventDateDraft::recurring(from, to, Frequency::Daily, 1)],
        ..EventDraft::new(title, locale_id)
    }
}
