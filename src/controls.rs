//! Per-tag control registry.
//!
//! Every tag present in the dataset owns one [`TagControls`] entry holding a
//! control for each panel that lists tags. Panels render straight from the
//! registry in its display order, so keeping the registry reconciled with the
//! tag counts is all that is needed to keep the four tag clouds consistent.

use hashbrown::HashMap;
use log::debug;

/// The panel a control belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Positive,
    Negative,
    Removal,
    Edit,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Positive, Role::Negative, Role::Removal, Role::Edit];

    fn index(self) -> usize {
        match self {
            Role::Positive => 0,
            Role::Negative => 1,
            Role::Removal => 2,
            Role::Edit => 3,
        }
    }

    /// The edit panel lists bare tags; the filter panels show the count too.
    fn shows_count(self) -> bool {
        !matches!(self, Role::Edit)
    }
}

/// Opaque identity of one control, stable for the lifetime of its tag entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlHandle(u64);

impl ControlHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagControl {
    pub role: Role,
    pub handle: ControlHandle,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct TagControls {
    tag: String,
    count: usize,
    controls: [TagControl; 4],
}

impl TagControls {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn control(&self, role: Role) -> &TagControl {
        &self.controls[role.index()]
    }

    fn relabel(&mut self, count: usize) {
        self.count = count;
        for control in &mut self.controls {
            control.label = label_for(&self.tag, count, control.role);
        }
    }
}

fn label_for(tag: &str, count: usize, role: Role) -> String {
    if role.shows_count() {
        format!("{} ({})", tag, count)
    } else {
        tag.to_string()
    }
}

/// What a reconciliation pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub relabelled: Vec<String>,
    pub destroyed: Vec<String>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.relabelled.is_empty() && self.destroyed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ControlRegistry {
    entries: HashMap<String, TagControls>,
    order: Vec<String>,
    next_handle: u64,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&TagControls> {
        self.entries.get(tag)
    }

    /// Tags in display order: descending count, then ascending name.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &TagControls> + '_ {
        self.order.iter().filter_map(|tag| self.entries.get(tag))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Brings the entries for `changed` in line with `counts`, then re-sorts
    /// the display order once. Tags missing from `counts` count as zero.
    pub fn reconcile<'a, I>(&mut self, changed: I, counts: &HashMap<String, usize>) -> ReconcileReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = ReconcileReport::default();

        for tag in changed {
            let count = counts.get(tag).copied().unwrap_or(0);
            if count == 0 {
                if self.entries.remove(tag).is_some() {
                    report.destroyed.push(tag.to_string());
                }
            } else if let Some(entry) = self.entries.get_mut(tag) {
                if entry.count != count {
                    entry.relabel(count);
                    report.relabelled.push(tag.to_string());
                }
            } else {
                let entry = self.create(tag, count);
                self.entries.insert(tag.to_string(), entry);
                report.created.push(tag.to_string());
            }
        }

        if !report.created.is_empty() || !report.destroyed.is_empty() {
            self.order = self.entries.keys().cloned().collect();
        }
        self.sort();

        debug!(
            "Reconciled tag controls: {} created, {} relabelled, {} destroyed",
            report.created.len(),
            report.relabelled.len(),
            report.destroyed.len()
        );
        report
    }

    fn create(&mut self, tag: &str, count: usize) -> TagControls {
        let controls = Role::ALL.map(|role| {
            self.next_handle += 1;
            TagControl {
                role,
                handle: ControlHandle(self.next_handle),
                label: label_for(tag, count, role),
            }
        });
        TagControls {
            tag: tag.to_string(),
            count,
            controls,
        }
    }

    fn sort(&mut self) {
        let entries = &self.entries;
        self.order.sort_by(|a, b| {
            let count_a = entries.get(a).map_or(0, |e| e.count);
            let count_b = entries.get(b).map_or(0, |e| e.count);
            count_b.cmp(&count_a).then_with(|| a.cmp(b))
        });
    }
}
