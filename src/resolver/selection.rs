//! Service selection and mandatory dependency injection

use std::collections::HashSet;

use crate::config::{DeployConfig, Selector};

/// Services selected by the `enable`/`disable` selectors
///
/// With nothing enabled the full declared list is selected in declaration
/// order, duplicates included (they are rejected later by the plan).
/// Otherwise the selection is the union of enabled group members (groups in
/// selector order, members in group order) followed by explicitly enabled
/// services, deduplicated in first-seen order.
///
/// Disabled services and members of disabled groups are then removed.
pub fn select_services(config: &DeployConfig) -> Vec<String> {
    let selected = if config.enable.is_empty() {
        config.services.clone()
    } else {
        union_first_seen(config, &config.enable)
    };

    if config.disable.is_empty() {
        return selected;
    }

    let disabled: HashSet<&str> = expand(config, &config.disable).collect();
    selected
        .into_iter()
        .filter(|name| !disabled.contains(name.as_str()))
        .collect()
}

/// Prepend every mandatory dependency that is not already selected
///
/// Prepended entries keep `must_deps` order; already selected entries stay
/// where they are.
pub fn inject_mandatory(config: &DeployConfig, selected: Vec<String>) -> Vec<String> {
    let mut combined: Vec<String> = config
        .must_deps
        .iter()
        .filter(|dep| !selected.contains(dep))
        .cloned()
        .collect();
    combined.extend(selected);
    combined
}

fn union_first_seen(config: &DeployConfig, selector: &Selector) -> Vec<String> {
    let mut seen = HashSet::new();
    expand(config, selector)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

fn expand<'a>(config: &'a DeployConfig, selector: &'a Selector) -> impl Iterator<Item = &'a str> {
    selector
        .service_group
        .iter()
        .flat_map(|group| config.group_members(group))
        .chain(selector.service.iter())
        .map(String::as_str)
}
