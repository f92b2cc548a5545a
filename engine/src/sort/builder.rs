//! Sort spec mutators
//!
//! Each returns a new normalized spec; the argument is left untouched.

use rustc_hash::FxHashSet;

use super::types::{SortDirection, SortEntry, SortSpec};

/// Stable-sort by priority, drop repeated field ids (first wins) and
/// renumber priorities `0..n-1`
pub fn normalize(spec: &SortSpec) -> SortSpec {
    let mut seen = FxHashSet::default();
    let entries = spec
        .ordered()
        .into_iter()
        .filter(|entry| seen.insert(entry.field_id.as_str()))
        .cloned()
        .collect();
    renumbered(entries, spec.version)
}

/// Append `field_id` as the lowest-priority key. An existing entry for the
/// field is replaced.
pub fn add_entry(spec: &SortSpec, field_id: &str, direction: SortDirection) -> SortSpec {
    let mut entries = without(spec, field_id);
    entries.push(SortEntry::new(field_id, direction, 0));
    renumbered(entries, spec.version)
}

pub fn remove_entry(spec: &SortSpec, field_id: &str) -> SortSpec {
    renumbered(without(spec, field_id), spec.version)
}

pub fn update_direction(spec: &SortSpec, field_id: &str, direction: SortDirection) -> SortSpec {
    let mut next = normalize(spec);
    for entry in next.entries.iter_mut().filter(|e| e.field_id == field_id) {
        entry.direction = direction;
    }
    next
}

/// Move `field_id` to `new_priority` (clamped), shifting the others
pub fn move_entry(spec: &SortSpec, field_id: &str, new_priority: u32) -> SortSpec {
    let mut entries = normalize(spec).entries;
    let Some(from) = entries.iter().position(|e| e.field_id == field_id) else {
        return normalize(spec);
    };
    let entry = entries.remove(from);
    let to = (new_priority as usize).min(entries.len());
    entries.insert(to, entry);
    renumbered(entries, spec.version)
}

fn without(spec: &SortSpec, field_id: &str) -> Vec<SortEntry> {
    normalize(spec)
        .entries
        .into_iter()
        .filter(|entry| entry.field_id != field_id)
        .collect()
}

fn renumbered(mut entries: Vec<SortEntry>, version: u32) -> SortSpec {
    for (priority, entry) in entries.iter_mut().enumerate() {
        entry.priority = priority as u32;
    }
    SortSpec { entries, version }
}
