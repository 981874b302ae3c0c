//! Gallery visibility and per-panel tag text filters.

use std::collections::BTreeSet;

use crate::controls::Role;
use crate::sidecar::TagSet;

#[derive(Debug, Default, Clone)]
pub struct FilterState {
    pub positive_text: String,
    pub negative_text: String,
    pub removal_text: String,
    positive_tags: BTreeSet<String>,
    negative_tags: BTreeSet<String>,
    removal_tags: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// An image is shown when it carries at least one positive tag (if any
    /// are chosen) and none of the negative tags.
    pub fn is_visible(&self, tags: &TagSet) -> bool {
        let positive_ok =
            self.positive_tags.is_empty() || self.positive_tags.iter().any(|t| tags.contains(t));
        let negative_ok = !self.negative_tags.iter().any(|t| tags.contains(t));
        positive_ok && negative_ok
    }

    /// Whether the control for `tag` passes the text filter of its panel.
    pub fn shows_control(&self, role: Role, tag: &str) -> bool {
        match role {
            Role::Positive => tag.contains(self.positive_text.as_str()),
            Role::Negative => tag.contains(self.negative_text.as_str()),
            Role::Removal => tag.contains(self.removal_text.as_str()),
            Role::Edit => true,
        }
    }

    /// Whether the control for `tag` is checked in its panel. Edit controls
    /// depend on the editor draft and are answered there.
    pub fn is_checked(&self, role: Role, tag: &str) -> bool {
        match role {
            Role::Positive => self.positive_tags.contains(tag),
            Role::Negative => self.negative_tags.contains(tag),
            Role::Removal => self.removal_tags.contains(tag),
            Role::Edit => false,
        }
    }

    pub fn toggle(&mut self, role: Role, tag: &str) {
        let set = match role {
            Role::Positive => &mut self.positive_tags,
            Role::Negative => &mut self.negative_tags,
            Role::Removal => &mut self.removal_tags,
            Role::Edit => return,
        };
        if !set.remove(tag) {
            set.insert(tag.to_string());
        }
    }

    pub fn positive_tags(&self) -> &BTreeSet<String> {
        &self.positive_tags
    }

    pub fn negative_tags(&self) -> &BTreeSet<String> {
        &self.negative_tags
    }

    pub fn removal_tags(&self) -> &BTreeSet<String> {
        &self.removal_tags
    }

    /// Clears the positive and negative tag choices.
    pub fn clear_tag_selection(&mut self) {
        self.positive_tags.clear();
        self.negative_tags.clear();
    }

    pub fn clear_removal_selection(&mut self) {
        self.removal_tags.clear();
    }

    /// Drops chosen tags that no longer exist in the dataset.
    pub fn forget<'a, I>(&mut self, vanished: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in vanished {
            self.positive_tags.remove(tag);
            self.negative_tags.remove(tag);
            self.removal_tags.remove(tag);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
