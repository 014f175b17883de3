use crate::core::fixture::{FixtureKind, Node};
use crate::core::household::Household;
use indexmap::IndexMap;

/// Pattern name for a hydraulic node label, e.g. node `F1C` holds pattern
/// `F1CP` in the solver's pattern namespace.
pub fn pattern_key(node_label: &str) -> String {
    format!("{node_label}P")
}

/// Pattern name of the household's synthetic supply node.
pub fn source_pattern_key(household: &Household) -> String {
    pattern_key(&household.source().node_labels()[0])
}

/// Compile a simulated household's event list into per-node flow-multiplier
/// arrays over `horizon` timesteps.
///
/// Every fixture node gets a zero-initialized array; each non-source event
/// assigns its cold/hot rate across its (horizon-clamped) window as a
/// fixed-rate plateau, a later event's value winning at overlapping steps.
/// The source node is then derived as the column sum of every other node,
/// so supply always equals aggregate demand at each step.
pub fn build_pattern_map(household: &Household, horizon: usize) -> IndexMap<String, Vec<f64>> {
    let mut patterns: IndexMap<String, Vec<f64>> = IndexMap::new();
    for fixture in household.fixtures() {
        for node_label in fixture.node_labels() {
            patterns.insert(pattern_key(node_label), vec![0.; horizon]);
        }
    }

    for fixture in household.fixtures() {
        if fixture.kind() == FixtureKind::Source {
            continue;
        }
        for event in fixture.schedule() {
            if event.window.start >= horizon {
                continue;
            }
            let start = event.window.start;
            let end = event.window.end.min(horizon - 1);
            for (rate, node) in [(event.cold_rate, Node::Cold), (event.hot_rate, Node::Hot)] {
                if rate == 0. {
                    continue;
                }
                let Some(node_label) = fixture.node_label(node) else {
                    continue;
                };
                let pattern = patterns
                    .get_mut(&pattern_key(node_label))
                    .expect("all fixture nodes were initialized above");
                for value in &mut pattern[start..=end] {
                    *value = rate;
                }
            }
        }
    }

    sum_into_source(&mut patterns, &source_pattern_key(household));
    patterns
}

/// Recompute the source pattern as the column sum of all other patterns.
pub fn sum_into_source(patterns: &mut IndexMap<String, Vec<f64>>, source_key: &str) {
    let horizon = patterns
        .values()
        .map(Vec::len)
        .next()
        .unwrap_or_default();
    let mut source = vec![0.; horizon];
    for (key, pattern) in patterns.iter() {
        if key == source_key {
            continue;
        }
        for (total, value) in source.iter_mut().zip(pattern) {
            *total += value;
        }
    }
    patterns.insert(source_key.to_string(), source);
}
