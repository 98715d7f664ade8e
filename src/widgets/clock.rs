//! Clock: derived from the system time, nothing persisted

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

/// How often a visible clock asks for a repaint
pub const TICK: Duration = Duration::from_secs(1);

/// Formatted time and date for one clock frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    pub time: String,
    pub date: String,
}

impl ClockFace {
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    pub fn at<Tz: TimeZone>(moment: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: moment.format("%H:%M:%S").to_string(),
            date: moment.format("%A, %B %-d, %Y").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_face_formatting() {
        let moment = Utc.with_ymd_and_hms(2024, 3, 5, 7, 4, 9).unwrap();
        let face = ClockFace::at(&moment);
        assert_eq!(face.time, "07:04:09");
        assert_eq!(face.date, "Tuesday, March 5, 2024");
    }
}
