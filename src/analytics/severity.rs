/// Severity tallies, distribution and averages
///
/// A log without a recognised severity still counts towards totals but never
/// towards a severity bucket.

use serde::Serialize;

use crate::analytics::calendar::{attack_days_in_month, YearMonth};
use crate::domain::{AttackLog, Severity, SeverityTally};

/// Severity counts for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlySeverityCounts {
    pub month: YearMonth,
    pub mild: usize,
    pub moderate: usize,
    pub severe: usize,
    /// Every log in the month, with or without a severity
    pub total: usize,
    /// Days in the month without any log
    pub pain_free_days: u32,
}

impl MonthlySeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Mild => self.mild,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }

    /// Logs in the month that carried a severity
    pub fn classified(&self) -> usize {
        self.mild + self.moderate + self.severe
    }
}

pub fn monthly_severity_counts(logs: &[AttackLog], month: YearMonth) -> MonthlySeverityCounts {
    let mut tally = SeverityTally::default();
    let mut total = 0;

    for log in logs.iter().filter(|log| month.contains(&log.start_time)) {
        if let Some(severity) = log.severity {
            tally.add(severity);
        }
        total += 1;
    }

    let attack_days = attack_days_in_month(logs, month) as u32;

    MonthlySeverityCounts {
        month,
        mild: tally.get(Severity::Mild),
        moderate: tally.get(Severity::Moderate),
        severe: tally.get(Severity::Severe),
        total,
        pain_free_days: month.days().saturating_sub(attack_days),
    }
}

/// One slice of the severity breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeveritySlice {
    pub severity: Severity,
    pub count: usize,
    /// Whole percent of all logs in the subset
    pub percent: u32,
}

/// Mild/Moderate/Severe breakdown of a subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityDistribution {
    pub total: usize,
    pub slices: Vec<SeveritySlice>,
}

impl SeverityDistribution {
    pub fn count(&self, severity: Severity) -> usize {
        self.slices
            .iter()
            .find(|slice| slice.severity == severity)
            .map(|slice| slice.count)
            .unwrap_or(0)
    }
}

fn tally(logs: &[AttackLog]) -> SeverityTally {
    let mut tally = SeverityTally::default();
    for severity in logs.iter().filter_map(|log| log.severity) {
        tally.add(severity);
    }
    tally
}

pub fn severity_distribution(logs: &[AttackLog]) -> SeverityDistribution {
    let counts = tally(logs);
    let total = logs.len();

    let slices = Severity::ALL
        .into_iter()
        .map(|severity| {
            let count = counts.get(severity);
            let percent = if total == 0 {
                0
            } else {
                (count as f64 * 100.0 / total as f64).round() as u32
            };
            SeveritySlice { severity, count, percent }
        })
        .collect();

    SeverityDistribution { total, slices }
}

/// Most frequent severity; ties go to the more severe level
pub fn common_severity(logs: &[AttackLog]) -> Option<Severity> {
    let counts = tally(logs);

    Severity::ALL
        .into_iter()
        .filter(|severity| counts.get(*severity) > 0)
        .max_by_key(|severity| (counts.get(*severity), *severity))
}

/// Mean duration in hours, rounded to a whole hour
///
/// Missing durations count as zero. An empty subset averages to zero.
pub fn average_duration_hours(logs: &[AttackLog]) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }

    let sum: f64 = logs.iter().map(|log| log.duration_hours()).sum();
    (sum / logs.len() as f64).round()
}
