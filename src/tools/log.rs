/// Tools for recording attacks: attack_log, attack_edit, attack_clear, attack_get
///
/// These are the only tools that mutate the Log Store.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{
    local_timestamp, AttackLog, DateKey, DomainError, DurationUnit, LogInput, Medication, Severity,
    Symptom, Trigger,
};
use crate::storage::SlotStorage;
use crate::store::{DayPolicy, LogStore};
use crate::tools::{describe_log, parse_day, ToolError};

/// Fields describing one attack
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct AttackParams {
    /// When the attack started: YYYY-MM-DDTHH:MM, or YYYY-MM-DD for a quick
    /// entry (09:00 to 13:00 unless an end time or duration is given)
    pub start_time: Option<String>,
    /// When the attack ended, YYYY-MM-DDTHH:MM (optional)
    pub end_time: Option<String>,
    /// Mild, Moderate or Severe (optional for medication-only entries)
    pub severity: Option<String>,
    /// How long the attack lasted (optional)
    pub duration_value: Option<f64>,
    /// minutes, hours or days (default: hours)
    pub duration_unit: Option<String>,
    /// Suspected triggers, e.g. Stress, Light, Poor sleep, or free text
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Symptoms, e.g. Nausea, Aura, or free text
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Medications taken, e.g. Triptans, NSAIDs, or free text
    #[serde(default)]
    pub medications: Vec<String>,
    /// Free-text notes (optional)
    pub notes: Option<String>,
}

fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN))
}

/// A start value with no time part
fn is_bare_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok()
}

impl AttackParams {
    /// Turn the raw arguments into a store input
    ///
    /// A missing start time is passed through so the store can reject it.
    pub fn into_input(self) -> Result<LogInput, DomainError> {
        let severity = self
            .severity
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Severity>)
            .transpose()?;
        let duration_unit = self
            .duration_unit
            .as_deref()
            .map(str::parse::<DurationUnit>)
            .transpose()?
            .unwrap_or_default();
        let end_time = self
            .end_time
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(local_timestamp::parse)
            .transpose()?;

        let mut input = match self.start_time.as_deref() {
            // Severity is filled in below
            Some(start) if is_bare_date(start) && end_time.is_none() && self.duration_value.is_none() => {
                LogInput::quick(DateKey::parse(start)?, Severity::Mild)
            }
            Some(start) if is_bare_date(start) => {
                let day = DateKey::parse(start)?;
                LogInput::starting_at(at_hour(day.date(), 9))
            }
            Some(start) => LogInput::starting_at(local_timestamp::parse(start)?),
            None => LogInput::default(),
        };

        if let Some(end) = end_time {
            input.end_time = Some(end);
        }
        if let Some(value) = self.duration_value {
            input.duration_value = Some(value);
            input.duration_unit = duration_unit;
        }
        input.severity = severity;
        input.triggers = self.triggers.iter().map(|t| Trigger::parse(t)).collect();
        input.symptoms = self.symptoms.iter().map(|s| Symptom::parse(s)).collect();
        input.medications = self.medications.iter().map(|m| Medication::parse(m)).collect();
        input.notes = self.notes.filter(|n| !n.trim().is_empty());

        Ok(input)
    }
}

/// Response from logging or editing an attack
#[derive(Debug, Serialize)]
pub struct LogAttackResponse {
    pub success: bool,
    pub message: String,
    pub log: AttackLog,
    /// Earlier logs on the same day that were replaced
    pub replaced: usize,
}

/// Record a new attack, honouring the store's day policy
pub fn log_attack<S: SlotStorage>(
    store: &mut LogStore<S>,
    params: AttackParams,
) -> Result<LogAttackResponse, ToolError> {
    let input = params.into_input()?;

    let replaced = match (input.start_time, store.config().day_policy) {
        (Some(start), DayPolicy::ReplaceExisting) => store.logs_on(DateKey::of(&start)).len(),
        _ => 0,
    };

    let log = store.add(input)?;

    let mut message = format!("Logged attack: {}", describe_log(&log));
    if replaced > 0 {
        message.push_str(&format!(
            "\nReplaced {} earlier log{} for {}",
            replaced,
            if replaced == 1 { "" } else { "s" },
            log.day()
        ));
    }
    if store.persist_failed() {
        message.push_str("\nWarning: the log could not be saved and will be lost on restart");
    }

    Ok(LogAttackResponse {
        success: true,
        message,
        log,
        replaced,
    })
}

/// Parameters for replacing a day's log
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EditAttackParams {
    /// Day whose log is replaced (YYYY-MM-DD, "today" or "yesterday")
    pub day: String,
    /// The new log; start_time defaults to a quick entry on `day`
    #[serde(flatten)]
    pub attack: AttackParams,
}

/// Replace whatever is logged on a day with a new log
pub fn edit_attack<S: SlotStorage>(
    store: &mut LogStore<S>,
    params: EditAttackParams,
    today: NaiveDate,
) -> Result<LogAttackResponse, ToolError> {
    let day = parse_day(Some(&params.day), today)?;
    let mut attack = params.attack;
    attack.start_time.get_or_insert_with(|| day.to_string());

    let replaced = store.logs_on(day).len();
    let log = store.replace_day(day, attack.into_input()?)?;

    let mut message = if replaced == 0 {
        format!("Nothing was logged on {}; added: {}", day, describe_log(&log))
    } else {
        format!("Updated {}: {}", day, describe_log(&log))
    };
    if store.persist_failed() {
        message.push_str("\nWarning: the change could not be saved and will be lost on restart");
    }

    Ok(LogAttackResponse {
        success: true,
        message,
        log,
        replaced,
    })
}

/// Parameters naming a single day
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DayParams {
    /// Day to look at (YYYY-MM-DD, "today" or "yesterday"; default: today)
    pub day: Option<String>,
}

/// Response from clearing a day
#[derive(Debug, Serialize)]
pub struct ClearDayResponse {
    pub success: bool,
    pub message: String,
    pub removed: Vec<AttackLog>,
}

/// Remove every log on a day; clearing an empty day is not an error
pub fn clear_day<S: SlotStorage>(
    store: &mut LogStore<S>,
    params: DayParams,
    today: NaiveDate,
) -> Result<ClearDayResponse, ToolError> {
    let day = parse_day(params.day.as_deref(), today)?;
    let removed = store.delete_by_day(day);

    let message = match removed.len() {
        0 => format!("No attack logged on {}; nothing to remove", day),
        1 => format!("Removed the attack logged on {}", day),
        n => format!("Removed {} attacks logged on {}", n, day),
    };

    Ok(ClearDayResponse {
        success: true,
        message,
        removed,
    })
}

/// Response from looking up a day
#[derive(Debug, Serialize)]
pub struct GetDayResponse {
    pub day: DateKey,
    pub log: Option<AttackLog>,
    /// How many logs the day has in total
    pub count: usize,
    pub message: String,
}

/// The day's log, or an explicit "nothing logged"
pub fn get_day<S: SlotStorage>(
    store: &LogStore<S>,
    params: DayParams,
    today: NaiveDate,
) -> Result<GetDayResponse, ToolError> {
    let day = parse_day(params.day.as_deref(), today)?;
    let log = store.find_by_day(day).cloned();
    let count = store.logs_on(day).len();

    let message = match &log {
        None => format!("No attack logged on {}", day),
        Some(found) => {
            let mut text = describe_log(found);
            if let Some(notes) = found.notes.as_deref().filter(|_| found.has_notes()) {
                text.push_str(&format!("\nNotes: {}", notes));
            }
            if count > 1 {
                text.push_str(&format!("\n({} logs on this day; showing the first)", count));
            }
            text
        }
    };

    Ok(GetDayResponse {
        day,
        log,
        count,
        message,
    })
}
