//! Who replies to whom.

use std::collections::HashMap;

use chatlens_parser::ChatLog;
use serde::Serialize;

/// A directed reply edge: `to` spoke right after `from`, `count` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionEdge {
    pub from: String,
    pub to: String,
    pub count: usize,
}

/// Count sender changes between consecutive messages.
///
/// Service notices are ignored entirely, so a notice between two messages
/// does not break the pair. Consecutive messages from the same sender are
/// not an interaction.
pub fn interaction_edges(log: &ChatLog) -> Vec<InteractionEdge> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut previous: Option<&str> = None;
    for record in log.iter().filter(|r| !r.is_system()) {
        let sender = record.sender.as_str();
        if let Some(prev) = previous {
            if prev != sender {
                *counts.entry((prev, sender)).or_insert(0) += 1;
            }
        }
        previous = Some(sender);
    }

    let mut edges: Vec<InteractionEdge> = counts
        .into_iter()
        .map(|((from, to), count)| InteractionEdge {
            from: from.to_string(),
            to: to.to_string(),
            count,
        })
        .collect();
    edges.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
    edges
}
