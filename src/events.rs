//! Recurring Islamic calendar events.
//!
//! The catalog is a fixed table of `(month, day)` anchors. Dates are derived
//! through the tabular Hijri calendar, so they may differ by a day from
//! moon-sighting announcements.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use chrono::{Datelike, Days, Month, NaiveDate};
use log::debug;
use serde::Serialize;

use crate::error::{Result, SalahError};
use crate::hijri::HijriDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Eid,
    HolyNight,
    BlessedDay,
    FastingDay,
    MonthStart,
    Historical,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eid => "EID",
            Self::HolyNight => "HOLY_NIGHT",
            Self::BlessedDay => "BLESSED_DAY",
            Self::FastingDay => "FASTING_DAY",
            Self::MonthStart => "MONTH_START",
            Self::Historical => "HISTORICAL",
        };
        f.write_str(s)
    }
}

struct EventDef {
    key: &'static str,
    name: &'static str,
    name_arabic: &'static str,
    description: &'static str,
    month: u32,
    day: u32,
    kind: EventType,
    fasting_recommended: bool,
    fasting_prohibited: bool,
    public_holiday: bool,
}

const fn def(
    key: &'static str,
    name: &'static str,
    name_arabic: &'static str,
    description: &'static str,
    (month, day): (u32, u32),
    kind: EventType,
    (fasting_recommended, fasting_prohibited, public_holiday): (bool, bool, bool),
) -> EventDef {
    EventDef {
        key,
        name,
        name_arabic,
        description,
        month,
        day,
        kind,
        fasting_recommended,
        fasting_prohibited,
        public_holiday,
    }
}

use EventType::*;

// flags: (fasting recommended, fasting prohibited, public holiday)
#[rustfmt::skip]
const CATALOG: [EventDef; 33] = [
    // Muharram
    def("islamic_new_year", "Islamic New Year", "رأس السنة الهجرية",
        "First day of the Islamic calendar year", (1, 1), MonthStart, (false, false, true)),
    def("tasua", "Tasu'a", "تاسوعاء",
        "9th of Muharram, recommended to fast with Ashura", (1, 9), FastingDay, (true, false, false)),
    def("ashura", "Day of Ashura", "يوم عاشوراء",
        "10th of Muharram, commemorates Moses and the Exodus; martyrdom of Husayn ibn Ali",
        (1, 10), BlessedDay, (true, false, false)),
    // Safar
    def("start_of_safar", "Start of Safar", "بداية شهر صفر",
        "Beginning of the month of Safar", (2, 1), MonthStart, (false, false, false)),
    // Rabi' al-Awwal
    def("start_of_rabi_al_awwal", "Start of Rabi' al-Awwal", "بداية شهر ربيع الأول",
        "Beginning of Rabi' al-Awwal, the month of the Prophet's birth", (3, 1), MonthStart,
        (false, false, false)),
    def("mawlid", "Mawlid al-Nabi", "المولد النبوي الشريف",
        "Birth of Prophet Muhammad ﷺ (12th Rabi' al-Awwal according to majority)", (3, 12),
        BlessedDay, (false, false, true)),
    // Rabi' al-Thani, Jumada al-Awwal, Jumada al-Thani
    def("start_of_rabi_al_thani", "Start of Rabi' al-Thani", "بداية شهر ربيع الثاني",
        "Beginning of Rabi' al-Thani", (4, 1), MonthStart, (false, false, false)),
    def("start_of_jumada_al_awwal", "Start of Jumada al-Awwal", "بداية شهر جمادى الأولى",
        "Beginning of Jumada al-Awwal", (5, 1), MonthStart, (false, false, false)),
    def("start_of_jumada_al_thani", "Start of Jumada al-Thani", "بداية شهر جمادى الآخرة",
        "Beginning of Jumada al-Thani", (6, 1), MonthStart, (false, false, false)),
    // Rajab
    def("start_of_rajab", "Start of Rajab", "بداية شهر رجب",
        "Beginning of Rajab, one of the four sacred months", (7, 1), MonthStart, (false, false, false)),
    def("isra_miraj", "Isra and Mi'raj", "الإسراء والمعراج",
        "Night Journey and Ascension of Prophet Muhammad ﷺ", (7, 27), HolyNight, (false, false, false)),
    // Sha'ban
    def("start_of_shaban", "Start of Sha'ban", "بداية شهر شعبان",
        "Beginning of Sha'ban", (8, 1), MonthStart, (false, false, false)),
    def("laylat_al_baraat", "Laylat al-Bara'at", "ليلة البراءة",
        "Night of Forgiveness (15th Sha'ban)", (8, 15), HolyNight, (true, false, false)),
    // Ramadan
    def("ramadan_start", "First day of Ramadan", "أول يوم رمضان",
        "Beginning of the month of fasting", (9, 1), MonthStart, (true, false, true)),
    def("laylat_al_qadr_21", "Laylat al-Qadr (21st night)", "ليلة القدر",
        "Night of Power - possible date", (9, 21), HolyNight, (true, false, false)),
    def("laylat_al_qadr_23", "Laylat al-Qadr (23rd night)", "ليلة القدر",
        "Night of Power - possible date", (9, 23), HolyNight, (true, false, false)),
    def("laylat_al_qadr_25", "Laylat al-Qadr (25th night)", "ليلة القدر",
        "Night of Power - possible date", (9, 25), HolyNight, (true, false, false)),
    def("laylat_al_qadr_27", "Laylat al-Qadr (27th night)", "ليلة القدر",
        "Night of Power - most commonly observed date", (9, 27), HolyNight, (true, false, false)),
    def("laylat_al_qadr_29", "Laylat al-Qadr (29th night)", "ليلة القدر",
        "Night of Power - possible date", (9, 29), HolyNight, (true, false, false)),
    // Shawwal
    def("start_of_shawwal", "Start of Shawwal", "بداية شهر شوال",
        "Beginning of Shawwal", (10, 1), MonthStart, (false, false, false)),
    def("eid_al_fitr", "Eid al-Fitr", "عيد الفطر",
        "Festival of Breaking the Fast", (10, 1), Eid, (false, true, true)),
    def("eid_al_fitr_2", "Eid al-Fitr (Day 2)", "عيد الفطر - اليوم الثاني",
        "Second day of Eid al-Fitr", (10, 2), Eid, (false, false, true)),
    def("eid_al_fitr_3", "Eid al-Fitr (Day 3)", "عيد الفطر - اليوم الثالث",
        "Third day of Eid al-Fitr", (10, 3), Eid, (false, false, true)),
    def("six_days_of_shawwal", "Six Days of Shawwal Begin", "صيام ستة أيام من شوال",
        "Recommended to fast 6 days in Shawwal after Eid", (10, 2), FastingDay, (true, false, false)),
    // Dhu al-Qi'dah
    def("start_of_dhul_qidah", "Start of Dhu al-Qi'dah", "بداية شهر ذو القعدة",
        "Beginning of Dhu al-Qi'dah, one of the sacred months", (11, 1), MonthStart,
        (false, false, false)),
    // Dhu al-Hijjah
    def("start_of_dhul_hijjah", "Start of Dhu al-Hijjah", "بداية شهر ذو الحجة",
        "Beginning of the month of Hajj, one of the sacred months", (12, 1), MonthStart,
        (true, false, false)),
    def("first_ten_days_dhul_hijjah", "First 10 Days of Dhu al-Hijjah", "العشر الأوائل من ذي الحجة",
        "Most blessed days of the year - recommended to fast (except Eid)", (12, 1), BlessedDay,
        (true, false, false)),
    def("tarwiyah", "Day of Tarwiyah", "يوم التروية",
        "8th of Dhu al-Hijjah - pilgrims go to Mina", (12, 8), BlessedDay, (true, false, false)),
    def("arafah", "Day of Arafah", "يوم عرفة",
        "9th of Dhu al-Hijjah - most important day of Hajj", (12, 9), BlessedDay, (true, false, false)),
    def("eid_al_adha", "Eid al-Adha", "عيد الأضحى",
        "Festival of Sacrifice", (12, 10), Eid, (false, true, true)),
    def("tashreeq_1", "Days of Tashreeq (Day 1)", "أيام التشريق - اليوم الأول",
        "11th of Dhu al-Hijjah - fasting prohibited", (12, 11), Eid, (false, true, true)),
    def("tashreeq_2", "Days of Tashreeq (Day 2)", "أيام التشريق - اليوم الثاني",
        "12th of Dhu al-Hijjah - fasting prohibited", (12, 12), Eid, (false, true, true)),
    def("tashreeq_3", "Days of Tashreeq (Day 3)", "أيام التشريق - اليوم الثالث",
        "13th of Dhu al-Hijjah - fasting prohibited", (12, 13), Eid, (false, true, true)),
];

/// Keys shown by [`major_events_for_year`] in addition to public holidays.
const MAJOR_KEYS: [&str; 5] = ["ashura", "mawlid", "isra_miraj", "arafah", "laylat_al_qadr_27"];

/// One occurrence of a catalog event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IslamicEvent {
    /// Stable identity, unique within a Hijri year.
    pub key: &'static str,
    /// Names by locale (`en`, `ar`).
    pub names: BTreeMap<&'static str, &'static str>,
    pub description: &'static str,
    pub hijri_date: HijriDate,
    pub gregorian_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub fasting_recommended: bool,
    pub fasting_prohibited: bool,
    pub public_holiday: bool,
}

impl IslamicEvent {
    fn from_def(def: &EventDef, hijri_year: i32) -> Result<Self> {
        let hijri_date = HijriDate::new(hijri_year, def.month, def.day)?;
        Ok(Self {
            key: def.key,
            names: BTreeMap::from([("en", def.name), ("ar", def.name_arabic)]),
            description: def.description,
            hijri_date,
            gregorian_date: hijri_date.to_gregorian()?,
            kind: def.kind,
            fasting_recommended: def.fasting_recommended,
            fasting_prohibited: def.fasting_prohibited,
            public_holiday: def.public_holiday,
        })
    }

    /// English name.
    pub fn name(&self) -> &'static str {
        self.names.get("en").copied().unwrap_or(self.key)
    }

    /// Name in `locale`, falling back to English.
    pub fn name_in(&self, locale: &str) -> &'static str {
        self.names.get(locale).copied().unwrap_or_else(|| self.name())
    }

    pub fn is_major(&self) -> bool {
        self.public_holiday || MAJOR_KEYS.contains(&self.key)
    }

    /// Multi-line description block.
    pub fn to_detailed_string(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "{:<25} {}", "Event:", self.name());
        let _ = writeln!(s, "{:<25} {}", "Arabic:", self.name_in("ar"));
        let _ = writeln!(s, "{:<25} {}", "Gregorian Date:", self.gregorian_date);
        let _ = writeln!(s, "{:<25} {}", "Hijri Date:", self.hijri_date);
        let _ = writeln!(s, "{:<25} {}", "Type:", self.kind);
        if !self.description.is_empty() {
            let _ = writeln!(s, "{:<25} {}", "Description:", self.description);
        }
        if self.fasting_recommended {
            let _ = writeln!(s, "{:<25} Recommended", "Fasting:");
        }
        if self.fasting_prohibited {
            let _ = writeln!(s, "{:<25} Prohibited", "Fasting:");
        }
        if self.public_holiday {
            let _ = writeln!(s, "{:<25} Yes (in most Muslim countries)", "Public Holiday:");
        }
        s
    }
}

impl fmt::Display for IslamicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.gregorian_date, self.name(), self.hijri_date)
    }
}

/// Every catalog event of one Hijri year, in catalog order.
pub fn events_for_hijri_year(hijri_year: i32) -> Result<Vec<IslamicEvent>> {
    CATALOG
        .iter()
        .map(|def| IslamicEvent::from_def(def, hijri_year))
        .collect()
}

/// Events whose Gregorian date falls in `year`, ordered by date. Events on
/// the same day keep catalog order.
pub fn events_for_gregorian_year(year: i32) -> Result<Vec<IslamicEvent>> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(SalahError::DateOutOfRange)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(SalahError::DateOutOfRange)?;
    let end = HijriDate::from_gregorian(last)?.year();
    // 622 starts before 1 Muharram 1 AH but still holds the first year's events
    let start = match HijriDate::from_gregorian(first) {
        Ok(h) => h.year(),
        Err(SalahError::DateOutOfRange) => 1,
        Err(e) => return Err(e),
    };

    let mut events = Vec::new();
    for hijri_year in start..=end {
        events.extend(
            events_for_hijri_year(hijri_year)?
                .into_iter()
                .filter(|e| e.gregorian_date.year() == year),
        );
    }
    events.sort_by_key(|e| e.gregorian_date);

    debug!(
        "[events_for_gregorian_year] {year}: {} events from AH {start}..={end}",
        events.len()
    );
    Ok(events)
}

/// The next `count` events on or after `from`, drawn from `from`'s year and
/// the following one.
pub fn upcoming_events(from: NaiveDate, count: usize) -> Result<Vec<IslamicEvent>> {
    let mut events = events_for_gregorian_year(from.year())?;
    events.extend(events_for_gregorian_year(from.year() + 1)?);
    events.retain(|e| e.gregorian_date >= from);
    events.sort_by_key(|e| e.gregorian_date);
    events.truncate(count);
    Ok(events)
}

/// Public holidays plus Ashura, Mawlid, Isra and Mi'raj, Arafah and the
/// 27th night of Ramadan.
pub fn major_events_for_year(year: i32) -> Result<Vec<IslamicEvent>> {
    let mut events = events_for_gregorian_year(year)?;
    events.retain(IslamicEvent::is_major);
    Ok(events)
}

/// Events in Gregorian `month` (1..=12) of `year`.
pub fn events_for_month(year: i32, month: u32) -> Result<Vec<IslamicEvent>> {
    if !(1..=12).contains(&month) {
        return Err(SalahError::InvalidInput("month must be 1..=12"));
    }
    let mut events = events_for_gregorian_year(year)?;
    events.retain(|e| e.gregorian_date.month() == month);
    Ok(events)
}

pub fn events_on(date: NaiveDate) -> Result<Vec<IslamicEvent>> {
    let mut events = events_for_gregorian_year(date.year())?;
    events.retain(|e| e.gregorian_date == date);
    Ok(events)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RamadanDates {
    pub ramadan_start: Option<NaiveDate>,
    pub ramadan_end: Option<NaiveDate>,
    pub eid_al_fitr: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HajjDates {
    pub day_of_tarwiyah: Option<NaiveDate>,
    pub day_of_arafah: Option<NaiveDate>,
    pub eid_al_adha: Option<NaiveDate>,
}

fn first_date_of(events: &[IslamicEvent], key: &str) -> Option<NaiveDate> {
    events.iter().find(|e| e.key == key).map(|e| e.gregorian_date)
}

/// Ramadan in Gregorian `year`. When Ramadan begins twice in one year the
/// earlier occurrence is reported.
pub fn ramadan_dates(year: i32) -> Result<RamadanDates> {
    let events = events_for_gregorian_year(year)?;
    let start = first_date_of(&events, "ramadan_start");
    Ok(RamadanDates {
        ramadan_start: start,
        // Ramadan is an odd month, 30 days in the tabular calendar
        ramadan_end: start.and_then(|d| d.checked_add_days(Days::new(29))),
        eid_al_fitr: first_date_of(&events, "eid_al_fitr"),
    })
}

pub fn hajj_dates(year: i32) -> Result<HajjDates> {
    let events = events_for_gregorian_year(year)?;
    Ok(HajjDates {
        day_of_tarwiyah: first_date_of(&events, "tarwiyah"),
        day_of_arafah: first_date_of(&events, "arafah"),
        eid_al_adha: first_date_of(&events, "eid_al_adha"),
    })
}

/// Plain-text calendar grouped under Gregorian month headers.
pub fn format_calendar(events: &[IslamicEvent]) -> String {
    let mut out = String::new();
    let mut current: Option<u32> = None;

    for event in events {
        let month = event.gregorian_date.month();
        if current != Some(month) {
            if current.is_some() {
                out.push('\n');
            }
            let name = u8::try_from(month)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map_or("?", |m| m.name());
            let _ = writeln!(out, "═══ {} ═══", name.to_uppercase());
            current = Some(month);
        }
        let _ = writeln!(
            out,
            "  {:2} - {:<30} ({})",
            event.gregorian_date.day(),
            event.name(),
            event.hijri_date.to_numeric_string()
        );
    }
    out
}
