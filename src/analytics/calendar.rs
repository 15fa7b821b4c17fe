/// Month-level views: the calendar map, attack-day count and daily frequency
///
/// `YearMonth` is the bucket key used here and by the monthly trend, so two
/// Decembers in different years never share a bucket.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{AttackLog, DateKey, DomainError, Severity};

/// A calendar month in a specific year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1 = January
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Zero-based month count, for month arithmetic
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// The month `n` months earlier
    pub fn months_before(&self, n: u32) -> Self {
        Self::from_ordinal(self.ordinal() - n as i64)
    }

    pub fn next(&self) -> Self {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of days in the month
    pub fn days(&self) -> u32 {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .map(|next| (next - first).num_days() as u32)
            .unwrap_or(31)
    }

    /// Every day of the month, in order
    pub fn day_keys(&self) -> impl Iterator<Item = DateKey> {
        let first = self.first_day();
        first.iter_days().take(self.days() as usize).map(DateKey::new)
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        timestamp.year() == self.year && timestamp.month() == self.month
    }

    /// Short label such as "Dec 2025"
    pub fn short_label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    /// Long label such as "December 2025"
    pub fn long_label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = DomainError;

    /// Accepts `YYYY-MM`, or any date whose prefix is one
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || DomainError::InvalidDate(trimmed.to_string());

        let (year, month) = trimmed.get(..7).and_then(|p| p.split_once('-')).ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Day → severity for every day of the month that has a log
///
/// Logs are applied in collection order, so a later log on the same day
/// overwrites an earlier one.
pub fn calendar_map(logs: &[AttackLog], month: YearMonth) -> BTreeMap<DateKey, Option<Severity>> {
    let mut map = BTreeMap::new();

    for log in logs.iter().filter(|log| month.contains(&log.start_time)) {
        map.insert(log.day(), log.severity);
    }

    map
}

/// Number of distinct days in the month with at least one log
pub fn attack_days_in_month(logs: &[AttackLog], month: YearMonth) -> usize {
    logs.iter()
        .filter(|log| month.contains(&log.start_time))
        .map(|log| log.day())
        .collect::<HashSet<_>>()
        .len()
}

/// Logs started on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: DateKey,
    pub count: usize,
}

/// One entry per day of the month, counting every log that started on it
pub fn daily_frequency(logs: &[AttackLog], month: YearMonth) -> Vec<DayCount> {
    let mut counts: Vec<DayCount> = month
        .day_keys()
        .map(|day| DayCount { day, count: 0 })
        .collect();

    for log in logs.iter().filter(|log| month.contains(&log.start_time)) {
        let index = log.start_time.day0() as usize;
        if let Some(entry) = counts.get_mut(index) {
            entry.count += 1;
        }
    }

    counts
}

/// A marked day on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: DateKey,
    pub severity: Option<Severity>,
}

/// Everything the month calendar shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub month: YearMonth,
    pub label: String,
    pub attack_days: usize,
    pub marked_days: Vec<CalendarDay>,
    pub frequency: Vec<DayCount>,
}

pub fn calendar_month(logs: &[AttackLog], month: YearMonth) -> CalendarMonth {
    let marked_days = calendar_map(logs, month)
        .into_iter()
        .map(|(day, severity)| CalendarDay { day, severity })
        .collect();

    CalendarMonth {
        month,
        label: month.long_label(),
        attack_days: attack_days_in_month(logs, month),
        marked_days,
        frequency: daily_frequency(logs, month),
    }
}
