/// Pain-free streak calculation
///
/// The current streak counts whole days between the most recent attack and
/// the reference date. The longest run looks back over the whole history.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{AttackLog, DateKey};

/// Days since the most recent attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PainFreeStreak {
    /// Nothing has been logged yet
    NoData,
    PainFree { days: u32, last_attack: DateKey },
}

impl PainFreeStreak {
    pub fn days(&self) -> Option<u32> {
        match self {
            PainFreeStreak::NoData => None,
            PainFreeStreak::PainFree { days, .. } => Some(*days),
        }
    }

    /// The streak as a dashboard number, "-" when there is no data
    pub fn display_days(&self) -> String {
        self.days().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    }

    /// "Last attack: ..." line under the streak
    pub fn last_attack_line(&self, today: NaiveDate) -> String {
        match self {
            PainFreeStreak::NoData => "No migraine attacks recorded yet".to_string(),
            PainFreeStreak::PainFree { last_attack, .. } => {
                format!("Last attack: {}", last_attack_label(*last_attack, today))
            }
        }
    }
}

/// "Today" for an attack on the reference date, otherwise e.g. "9 December"
pub fn last_attack_label(last_attack: DateKey, today: NaiveDate) -> String {
    if last_attack.date() == today {
        "Today".to_string()
    } else {
        last_attack.date().format("%-d %B").to_string()
    }
}

/// Whole days from the latest attack to `today`, clamped at zero
///
/// Future-dated logs therefore give a streak of 0 rather than a negative one.
pub fn pain_free_streak(logs: &[AttackLog], today: NaiveDate) -> PainFreeStreak {
    let latest = match logs.iter().max_by_key(|log| log.start_time) {
        Some(log) => log,
        None => return PainFreeStreak::NoData,
    };

    let last_attack = latest.day();
    let days = (today - last_attack.date()).num_days().max(0) as u32;

    PainFreeStreak::PainFree { days, last_attack }
}

/// Longest run of attack-free days between the first logged day and `today`
///
/// The gap before the first log is not counted since there is no history for
/// it. Days after `today` are ignored.
pub fn longest_pain_free_run(logs: &[AttackLog], today: NaiveDate) -> u32 {
    let attack_days: BTreeSet<NaiveDate> = logs
        .iter()
        .map(|log| log.date())
        .filter(|date| *date <= today)
        .collect();

    let mut longest = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in &attack_days {
        if let Some(prev) = previous {
            let gap = (*day - prev).num_days() - 1;
            longest = longest.max(gap);
        }
        previous = Some(*day);
    }

    // The open run from the latest attack up to today
    if let Some(last) = previous {
        longest = longest.max((today - last).num_days());
    }

    longest.max(0) as u32
}
