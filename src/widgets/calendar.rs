//! Calendar: month grid navigation and per-date events

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::document::{Document, WidgetId};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Colors of the per-event markers drawn on day cells
const MARKER_COLORS: [[u8; 3]; 7] = [
    [0xe7, 0x4c, 0x3c],
    [0x4f, 0x8c, 0xff],
    [0x22, 0xc5, 0x5e],
    [0xf5, 0x9e, 0x42],
    [0xa8, 0x55, 0xf7],
    [0xf4, 0x3f, 0x5e],
    [0x14, 0xb8, 0xa6],
];

pub fn marker_color(index: usize) -> [u8; 3] {
    MARKER_COLORS[index % MARKER_COLORS.len()]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("event text is empty")]
    EmptyText,
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("no event {index} on {date}")]
    NotFound { date: NaiveDate, index: usize },
}

/// A single entry on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub text: String,
    /// `HH:MM`, or empty for an all-day entry
    #[serde(default)]
    pub time: String,
}

/// All events of one calendar widget, keyed by ISO date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventBook(BTreeMap<String, Vec<CalendarEvent>>);

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn validate(text: &str, time: &str) -> Result<CalendarEvent, CalendarError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CalendarError::EmptyText);
    }
    let time = match time.trim() {
        "" => String::new(),
        // Stored zero-padded so plain string order is time order
        time => NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map(|parsed| parsed.format(TIME_FORMAT).to_string())
            .map_err(|_| CalendarError::InvalidTime(time.to_string()))?,
    };
    Ok(CalendarEvent {
        text: text.to_string(),
        time,
    })
}

impl EventBook {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, date: NaiveDate, text: &str, time: &str) -> Result<(), CalendarError> {
        let event = validate(text, time)?;
        self.0.entry(date_key(date)).or_default().push(event);
        Ok(())
    }

    /// Replace the event at its stored (unsorted) index
    pub fn update(
        &mut self,
        date: NaiveDate,
        index: usize,
        text: &str,
        time: &str,
    ) -> Result<(), CalendarError> {
        let event = validate(text, time)?;
        let slot = self
            .0
            .get_mut(&date_key(date))
            .and_then(|events| events.get_mut(index))
            .ok_or(CalendarError::NotFound { date, index })?;
        *slot = event;
        Ok(())
    }

    pub fn delete(&mut self, date: NaiveDate, index: usize) -> Result<CalendarEvent, CalendarError> {
        let key = date_key(date);
        let events = self
            .0
            .get_mut(&key)
            .filter(|events| index < events.len())
            .ok_or(CalendarError::NotFound { date, index })?;
        let removed = events.remove(index);
        if events.is_empty() {
            self.0.remove(&key);
        }
        Ok(removed)
    }

    /// Events on a date ordered by time, untimed first, with their stored index
    pub fn on(&self, date: NaiveDate) -> Vec<(usize, &CalendarEvent)> {
        let mut events: Vec<_> = self
            .0
            .get(&date_key(date))
            .map(|events| events.iter().enumerate().collect())
            .unwrap_or_default();
        events.sort_by(|(_, a), (_, b)| a.time.cmp(&b.time));
        events
    }

    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.0.get(&date_key(date)).map_or(0, Vec::len)
    }

    /// The next `limit` events on or after `from`
    pub fn upcoming(&self, from: NaiveDate, limit: usize) -> Vec<(NaiveDate, &CalendarEvent)> {
        let mut out = Vec::new();
        for (key, _) in self.0.range(date_key(from)..) {
            let Ok(date) = NaiveDate::parse_from_str(key, DATE_FORMAT) else {
                continue;
            };
            for (_, event) in self.on(date) {
                if out.len() == limit {
                    return out;
                }
                out.push((date, event));
            }
        }
        out
    }
}

impl Document {
    pub fn events(&self, id: &WidgetId) -> Option<&EventBook> {
        self.calendar_events.get(id)
    }

    pub(crate) fn events_mut(&mut self, id: &WidgetId) -> &mut EventBook {
        self.calendar_events.entry(id.clone()).or_default()
    }
}

/// The month a calendar widget is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl MonthView {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn days_in_month(self) -> u32 {
        self.first_day()
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .and_then(|next| next.pred_opt())
            .map_or(0, |last| last.day())
    }

    /// "March 2024"
    pub fn title(self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }

    /// Grid cells in reading order, weeks starting on Monday; `None` pads the
    /// days before the 1st
    pub fn cells(self) -> Vec<Option<NaiveDate>> {
        let Some(first) = self.first_day() else {
            return Vec::new();
        };
        let lead = first.weekday().num_days_from_monday() as usize;
        let mut cells = vec![None; lead];
        cells.extend(
            (1..=self.days_in_month()).filter_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day).map(Some)),
        );
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_events_sorted_by_time_untimed_first() {
        let mut book = EventBook::default();
        let day = date(2024, 3, 5);
        book.add(day, "standup", "09:30").unwrap();
        book.add(day, "all day", "").unwrap();
        book.add(day, "lunch", "12:00").unwrap();
        book.add(day, "early", "08:00").unwrap();

        let listed: Vec<_> = book.on(day).into_iter().map(|(i, e)| (i, e.text.as_str())).collect();
        assert_eq!(
            listed,
            vec![(1, "all day"), (3, "early"), (0, "standup"), (2, "lunch")]
        );
    }

    #[test]
    fn test_unpadded_time_sorts_before_later_hours() {
        let mut book = EventBook::default();
        let day = date(2024, 6, 10);
        book.add(day, "ten", "10:00").unwrap();
        book.add(day, "nine thirty", "9:30").unwrap();

        let listed: Vec<_> = book.on(day).into_iter().map(|(_, e)| e.time.as_str()).collect();
        assert_eq!(listed, vec!["09:30", "10:00"]);

        let upcoming: Vec<_> = book
            .upcoming(day, 3)
            .into_iter()
            .map(|(_, e)| e.text.as_str())
            .collect();
        assert_eq!(upcoming, vec!["nine thirty", "ten"]);

        book.update(day, 0, "ten", " 7:05 ").unwrap();
        assert_eq!(book.on(day)[0].1.time, "07:05");
    }

    #[test]
    fn test_update_and_delete_by_stored_index() {
        let mut book = EventBook::default();
        let day = date(2024, 3, 5);
        book.add(day, "a", "10:00").unwrap();
        book.add(day, "b", "").unwrap();

        book.update(day, 0, "a2", "07:15").unwrap();
        assert_eq!(book.on(day)[0].1.text, "b");
        assert_eq!(book.on(day)[1].1.time, "07:15");

        assert_eq!(book.delete(day, 1).unwrap().text, "b");
        assert_eq!(book.delete(day, 0).unwrap().text, "a2");
        assert!(book.is_empty());
        assert_eq!(
            book.delete(day, 0),
            Err(CalendarError::NotFound { date: day, index: 0 })
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut book = EventBook::default();
        let day = date(2024, 1, 1);
        assert_eq!(book.add(day, "  ", ""), Err(CalendarError::EmptyText));
        assert_eq!(
            book.add(day, "x", "25:99"),
            Err(CalendarError::InvalidTime("25:99".to_string()))
        );
        assert_eq!(book.count_on(day), 0);
    }

    #[test]
    fn test_upcoming_skips_past_dates() {
        let mut book = EventBook::default();
        book.add(date(2024, 1, 1), "past", "").unwrap();
        book.add(date(2024, 2, 1), "b", "10:00").unwrap();
        book.add(date(2024, 2, 1), "a", "09:00").unwrap();
        book.add(date(2024, 3, 1), "c", "").unwrap();
        book.add(date(2024, 4, 1), "d", "").unwrap();

        let upcoming: Vec<_> = book
            .upcoming(date(2024, 1, 15), 3)
            .into_iter()
            .map(|(_, e)| e.text.as_str())
            .collect();
        assert_eq!(upcoming, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let view = MonthView { year: 2024, month: 1 };
        assert_eq!(view.prev(), MonthView { year: 2023, month: 12 });
        assert_eq!(view.prev().next(), view);
        assert_eq!(MonthView { year: 2024, month: 12 }.next(), MonthView { year: 2025, month: 1 });
        assert_eq!(view.title(), "January 2024");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(MonthView { year: 2024, month: 2 }.days_in_month(), 29);
        assert_eq!(MonthView { year: 2023, month: 2 }.days_in_month(), 28);
        assert_eq!(MonthView { year: 2024, month: 12 }.days_in_month(), 31);
        assert_eq!(MonthView { year: 2024, month: 4 }.days_in_month(), 30);
    }

    #[test]
    fn test_grid_starts_on_monday() {
        // 1 September 2024 is a Sunday
        let cells = MonthView { year: 2024, month: 9 }.cells();
        assert_eq!(cells.iter().take_while(|c| c.is_none()).count(), 6);
        assert_eq!(cells[6], Some(date(2024, 9, 1)));
        assert_eq!(cells.len(), 6 + 30);

        // 1 January 2024 is a Monday
        let cells = MonthView { year: 2024, month: 1 }.cells();
        assert_eq!(cells[0], Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_date_key_format() {
        assert_eq!(date_key(date(2024, 3, 5)), "2024-03-05");
    }
}
