/// Trigger frequency ranking

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{AttackLog, Trigger};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerCount {
    pub trigger: Trigger,
    pub count: usize,
}

/// Count trigger occurrences and keep the `top_n` most frequent
///
/// Equal counts keep the order in which the triggers were first seen.
pub fn trigger_frequency(logs: &[AttackLog], top_n: usize) -> Vec<TriggerCount> {
    let mut counts: Vec<TriggerCount> = Vec::new();
    let mut index: HashMap<&Trigger, usize> = HashMap::new();

    for trigger in logs.iter().flat_map(|log| log.triggers.iter()) {
        match index.get(trigger) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(trigger, counts.len());
                counts.push(TriggerCount {
                    trigger: trigger.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}
