use std::collections::BTreeSet;

/// Border drawn around a gallery thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    Normal,
    Selected,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    selected: BTreeSet<String>,
    active: Option<String>,
    pub single_mode: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a click on a thumbnail: the image becomes active and its
    /// selection toggles. In single selection mode every other image is
    /// deselected first.
    pub fn click(&mut self, image: &str) {
        self.active = Some(image.to_string());
        if self.single_mode {
            self.selected.retain(|other| other == image);
        }
        if !self.selected.remove(image) {
            self.selected.insert(image.to_string());
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, image: &str) -> bool {
        self.selected.contains(image)
    }

    pub fn select_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.selected.extend(visible.into_iter().map(str::to_string));
    }

    pub fn deselect<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for image in visible {
            self.selected.remove(image);
        }
    }

    pub fn frame_style(&self, image: &str) -> FrameStyle {
        if self.is_selected(image) {
            FrameStyle::Selected
        } else {
            FrameStyle::Normal
        }
    }

    /// Forgets everything except the mode, for a folder switch.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
    }
}
