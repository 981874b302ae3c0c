//! Draft text for the single-image tag editor.

use crate::sidecar::{self, TagSet};

#[derive(Debug, Default, Clone)]
pub struct TagEditor {
    pub draft: String,
    /// Copy the tags of a newly clicked image into the draft.
    pub auto_copy: bool,
    /// Apply the draft to the previous image before the active image changes.
    pub auto_save: bool,
}

impl TagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, tags: &TagSet) {
        self.draft = sidecar::format_tags(tags);
    }

    pub fn draft_tags(&self) -> TagSet {
        sidecar::parse_tags(&self.draft)
    }

    /// Whether applying the draft to an image holding `tags` would change it.
    pub fn differs_from(&self, tags: &TagSet) -> bool {
        self.draft_tags() != *tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.draft_tags().contains(tag)
    }

    pub fn append(&mut self, tag: &str) {
        if self.draft.trim().is_empty() {
            self.draft = tag.to_string();
        } else {
            self.draft.push_str(", ");
            self.draft.push_str(tag);
        }
    }

    /// Adds `tag` if the draft lacks it, removes it otherwise.
    pub fn toggle(&mut self, tag: &str) {
        let mut tags = self.draft_tags();
        if tags.remove(tag) {
            self.load(&tags);
        } else {
            self.append(tag);
        }
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }
}
