//! In-memory tag index for one image folder.
//!
//! The index is the only writer of the per-image tag sets, the tag counts and
//! the control registry. Every mutation goes through [`TagIndex::set_tags`]
//! semantics: compute the per-image delta, adjust counts, remember the pending
//! write, then reconcile the controls of exactly the tags that changed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hashbrown::{HashMap, HashSet};
use log::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::controls::{ControlRegistry, ReconcileReport};
use crate::error::{Result, TaggerError};
use crate::filter::FilterState;
use crate::sidecar::{self, TagSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// File name, used as the key everywhere.
    pub name: String,
    pub path: PathBuf,
    pub sidecar: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub images: usize,
    pub created_sidecars: usize,
    /// Images dropped because an earlier image already owns their sidecar.
    pub skipped_images: usize,
}

#[derive(Debug, Default)]
pub struct FlushReport {
    pub written: Vec<String>,
    pub failed: Vec<(String, TaggerError)>,
}

impl FlushReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TagIndex {
    folder: Option<PathBuf>,
    images: Vec<ImageRecord>,
    positions: HashMap<String, usize>,
    tags: HashMap<String, TagSet>,
    /// Tags as last read from or written to each sidecar.
    on_disk: HashMap<String, TagSet>,
    pending: HashMap<String, TagSet>,
    counts: HashMap<String, usize>,
    controls: ControlRegistry,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `folder` (not recursively) for images and reads their sidecars,
    /// creating empty ones where missing. On error the previous state is kept.
    pub fn load_folder(&mut self, folder: &Path) -> Result<LoadReport> {
        if !folder.exists() {
            return Err(TaggerError::FolderNotFound(folder.to_path_buf()));
        }
        if !folder.is_dir() {
            return Err(TaggerError::NotADirectory(folder.to_path_buf()));
        }

        let mut images = Vec::new();
        let mut tags = HashMap::new();
        let mut created_sidecars = 0;
        let mut skipped_images = 0;
        let mut claimed = HashSet::new();

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !sidecar::is_image(path) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let sidecar_path = sidecar::sidecar_path(path);
            if !claimed.insert(sidecar_path.clone()) {
                warn!(
                    "Skipping {}: {} is already used by another image",
                    name,
                    sidecar_path.display()
                );
                skipped_images += 1;
                continue;
            }
            if sidecar::ensure_exists(&sidecar_path)? {
                debug!("Created empty sidecar {}", sidecar_path.display());
                created_sidecars += 1;
            }
            let image_tags = sidecar::read_tags(&sidecar_path)?.unwrap_or_default();

            tags.insert(name.clone(), image_tags);
            images.push(ImageRecord {
                name,
                path: path.to_path_buf(),
                sidecar: sidecar_path,
            });
        }

        self.positions = images
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name.clone(), i))
            .collect();
        self.images = images;
        self.on_disk = tags.clone();
        self.tags = tags;
        self.pending.clear();
        self.counts = count_tags(self.tags.values());
        self.folder = Some(folder.to_path_buf());

        self.controls.clear();
        let all: Vec<String> = self.counts.keys().cloned().collect();
        self.controls
            .reconcile(all.iter().map(String::as_str), &self.counts);

        info!(
            "Loaded {} images with {} distinct tags from {}",
            self.images.len(),
            self.counts.len(),
            folder.display()
        );

        Ok(LoadReport {
            images: self.images.len(),
            created_sidecars,
            skipped_images,
        })
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn image(&self, name: &str) -> Option<&ImageRecord> {
        self.positions.get(name).map(|&i| &self.images[i])
    }

    /// In-memory tags of a loaded image.
    pub fn tags_for(&self, name: &str) -> Option<&TagSet> {
        self.tags.get(name)
    }

    pub fn count(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    pub fn visible_images<'a>(
        &'a self,
        filter: &'a FilterState,
    ) -> impl Iterator<Item = &'a ImageRecord> + 'a {
        self.images.iter().filter(move |record| {
            self.tags
                .get(&record.name)
                .map_or(true, |tags| filter.is_visible(tags))
        })
    }

    /// Replaces the tags of one image. Returns `None` when nothing changed.
    pub fn set_tags<I, S>(&mut self, name: &str, tags: I) -> Result<Option<ReconcileReport>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.tags.contains_key(name) {
            return Err(TaggerError::UnknownImage(name.to_string()));
        }
        let mut changed = BTreeSet::new();
        self.apply(name, sidecar::sanitize(tags), &mut changed);
        Ok(self.reconcile(&changed))
    }

    /// Removes `remove` from every image in one reconciliation pass.
    pub fn remove_tags_globally<I, S>(&mut self, remove: I) -> Option<ReconcileReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let remove = sidecar::sanitize(remove);
        if remove.is_empty() {
            return None;
        }

        let mut changed = BTreeSet::new();
        let mut touched = 0;
        for name in self.names() {
            let Some(old) = self.tags.get(&name) else {
                continue;
            };
            let new: TagSet = old.difference(&remove).cloned().collect();
            if self.apply(&name, new, &mut changed) {
                touched += 1;
            }
        }

        info!("Removed {} tag(s) from {} image(s)", remove.len(), touched);
        self.reconcile(&changed)
    }

    /// For every eligible image, drops the tags of `target` that are not in
    /// `replacement` and adds the tags of `replacement` it lacks. With
    /// `visible_only`, images hidden by `filter` are left untouched.
    pub fn mass_edit<T, R, S1, S2>(
        &mut self,
        target: T,
        replacement: R,
        visible_only: bool,
        filter: &FilterState,
    ) -> Option<ReconcileReport>
    where
        T: IntoIterator<Item = S1>,
        R: IntoIterator<Item = S2>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let target = sidecar::sanitize(target);
        let replacement = sidecar::sanitize(replacement);

        let mut changed = BTreeSet::new();
        let mut touched = 0;
        for name in self.names() {
            let Some(old) = self.tags.get(&name) else {
                continue;
            };
            if visible_only && !filter.is_visible(old) {
                continue;
            }
            let mut new: TagSet = old
                .iter()
                .filter(|tag| !target.contains(*tag) || replacement.contains(*tag))
                .cloned()
                .collect();
            new.extend(replacement.iter().cloned());
            if self.apply(&name, new, &mut changed) {
                touched += 1;
            }
        }

        info!("Mass edit changed {} image(s)", touched);
        self.reconcile(&changed)
    }

    /// Writes every pending edit to its sidecar. Failed writes stay pending.
    pub fn flush(&mut self) -> FlushReport {
        let mut report = FlushReport::default();
        let mut names: Vec<String> = self.pending.keys().cloned().collect();
        names.sort();

        for name in names {
            let Some(record) = self.image(&name) else {
                continue;
            };
            let path = record.sidecar.clone();
            let Some(tags) = self.pending.get(&name) else {
                continue;
            };

            match sidecar::write_tags(&path, tags) {
                Ok(()) => {
                    if let Some(tags) = self.pending.remove(&name) {
                        self.on_disk.insert(name.clone(), tags);
                    }
                    report.written.push(name);
                }
                Err(err) => {
                    error!("Failed to save tags for {}: {}", name, err);
                    report.failed.push((name, err));
                }
            }
        }

        info!(
            "Saved {} sidecar(s), {} failed",
            report.written.len(),
            report.failed.len()
        );
        report
    }

    /// Pending tags if any, otherwise the sidecar as it is on disk now.
    pub fn current_tags_for(&self, name: &str) -> Result<TagSet> {
        if let Some(tags) = self.pending.get(name) {
            return Ok(tags.clone());
        }
        let record = self
            .image(name)
            .ok_or_else(|| TaggerError::UnknownImage(name.to_string()))?;
        Ok(sidecar::read_tags(&record.sidecar)?.unwrap_or_default())
    }

    /// Discards the pending edit of `name` and reloads its sidecar.
    pub fn revert(&mut self, name: &str) -> Result<Option<ReconcileReport>> {
        let record = self
            .image(name)
            .ok_or_else(|| TaggerError::UnknownImage(name.to_string()))?;
        let fresh = sidecar::read_tags(&record.sidecar)?.unwrap_or_default();

        self.on_disk.insert(name.to_string(), fresh.clone());
        self.pending.remove(name);
        self.set_tags(name, fresh)
    }

    fn names(&self) -> Vec<String> {
        self.images.iter().map(|record| record.name.clone()).collect()
    }

    /// Swaps in `new` for `name`, keeping counts and pending edits in step.
    /// Changed tags are collected into `changed`.
    fn apply(&mut self, name: &str, new: TagSet, changed: &mut BTreeSet<String>) -> bool {
        let Some(old) = self.tags.get(name) else {
            return false;
        };
        if *old == new {
            return false;
        }

        for tag in old.difference(&new) {
            decrement(&mut self.counts, tag);
            changed.insert(tag.clone());
        }
        for tag in new.difference(old) {
            *self.counts.entry(tag.clone()).or_insert(0) += 1;
            changed.insert(tag.clone());
        }

        if self.on_disk.get(name) == Some(&new) {
            self.pending.remove(name);
        } else {
            self.pending.insert(name.to_string(), new.clone());
        }
        self.tags.insert(name.to_string(), new);
        true
    }

    fn reconcile(&mut self, changed: &BTreeSet<String>) -> Option<ReconcileReport> {
        if changed.is_empty() {
            return None;
        }
        Some(
            self.controls
                .reconcile(changed.iter().map(String::as_str), &self.counts),
        )
    }
}

fn decrement(counts: &mut HashMap<String, usize>, tag: &str) {
    if let Some(count) = counts.get_mut(tag) {
        *count -= 1;
        if *count == 0 {
            counts.remove(tag);
        }
    }
}

fn count_tags<'a, I>(sets: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a TagSet>,
{
    let mut counts = HashMap::new();
    for tags in sets {
        for tag in tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Role;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn dataset(files: &[(&str, Option<&str>)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (image, tags) in files {
            fs::write(dir.path().join(image), b"").unwrap();
            if let Some(tags) = tags {
                fs::write(sidecar::sidecar_path(&dir.path().join(image)), tags).unwrap();
            }
        }
        dir
    }

    fn loaded(files: &[(&str, Option<&str>)]) -> (TempDir, TagIndex) {
        let dir = dataset(files);
        let mut index = TagIndex::new();
        index.load_folder(dir.path()).unwrap();
        (dir, index)
    }

    fn set(tags: &[&str]) -> TagSet {
        sidecar::sanitize(tags)
    }

    fn assert_consistent(index: &TagIndex) {
        let expected = count_tags(index.tags.values());
        assert_eq!(index.counts, expected);
        assert!(index.counts.values().all(|&c| c > 0));
        assert_eq!(index.controls.len(), index.counts.len());
        for (tag, count) in &index.counts {
            assert_eq!(index.controls.get(tag).unwrap().count(), *count);
        }
    }

    #[test]
    fn missing_folder_is_not_found() {
        let dir = tempdir().unwrap();
        let mut index = TagIndex::new();
        let err = index.load_folder(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, TaggerError::FolderNotFound(_)));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = dataset(&[("a.png", None)]);
        let mut index = TagIndex::new();
        let err = index.load_folder(&dir.path().join("a.png")).unwrap_err();
        assert!(matches!(err, TaggerError::NotADirectory(_)));
    }

    #[test]
    fn load_reads_sidecars_and_creates_missing_ones() {
        let dir = dataset(&[
            ("a.png", Some("cat, outdoor,, cat")),
            ("B.JPG", None),
            ("notes.md", None),
        ]);
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.png"), b"").unwrap();

        let mut index = TagIndex::new();
        let report = index.load_folder(dir.path()).unwrap();

        assert_eq!(report, LoadReport { images: 2, created_sidecars: 1, skipped_images: 0 });
        assert!(dir.path().join("B.txt").exists());
        assert!(!dir.path().join("nested").join("c.txt").exists());
        assert_eq!(index.tags_for("a.png"), Some(&set(&["cat", "outdoor"])));
        assert_eq!(index.tags_for("B.JPG"), Some(&TagSet::new()));
        assert_eq!(index.pending_count(), 0);
        assert_consistent(&index);
    }

    #[test]
    fn undecodable_sidecar_loads_with_replacement_characters() {
        let dir = dataset(&[("a.png", Some("cat, dog")), ("b.png", None)]);
        fs::write(dir.path().join("b.txt"), b"caf\xe9, outdoor").unwrap();

        let mut index = TagIndex::new();
        let report = index.load_folder(dir.path()).unwrap();

        assert_eq!(report.images, 2);
        assert_eq!(index.tags_for("a.png"), Some(&set(&["cat", "dog"])));
        let b = index.tags_for("b.png").unwrap();
        assert!(b.contains("outdoor"));
        assert!(b.contains("caf\u{FFFD}"));
        assert_consistent(&index);
    }

    #[test]
    fn images_sharing_a_sidecar_keep_only_the_first() {
        let dir = dataset(&[("a.jpg", None), ("a.png", None)]);
        fs::write(dir.path().join("a.txt"), "cat").unwrap();

        let mut index = TagIndex::new();
        let report = index.load_folder(dir.path()).unwrap();

        assert_eq!(report.images, 1);
        assert_eq!(report.skipped_images, 1);
        assert!(index.image("a.jpg").is_some());
        assert!(index.image("a.png").is_none());
        assert_eq!(index.count("cat"), 1);

        index.set_tags("a.jpg", ["dog"]).unwrap();
        assert!(index.flush().is_clean());
        assert_eq!(index.tags_for("a.jpg"), Some(&set(&["dog"])));
        assert_eq!(index.current_tags_for("a.jpg").unwrap(), set(&["dog"]));
        assert_consistent(&index);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let (dir, mut index) = loaded(&[("a.png", Some("cat, dog")), ("b.png", Some("cat"))]);
        index.set_tags("b.png", ["cat", "sky"]).unwrap();
        let images = index.images().to_vec();
        let counts = index.counts().clone();
        let order = index.controls().order().to_vec();

        let missing = index.load_folder(&dir.path().join("gone"));
        let not_dir = index.load_folder(&dir.path().join("a.png"));

        assert!(matches!(missing, Err(TaggerError::FolderNotFound(_))));
        assert!(matches!(not_dir, Err(TaggerError::NotADirectory(_))));
        assert_eq!(index.folder(), Some(dir.path()));
        assert_eq!(index.images(), images.as_slice());
        assert_eq!(index.counts(), &counts);
        assert_eq!(index.controls().order(), order.as_slice());
        assert!(index.is_pending("b.png"));
        assert_eq!(index.pending_count(), 1);
        assert_eq!(index.tags_for("b.png"), Some(&set(&["cat", "sky"])));
        assert_consistent(&index);
    }

    #[test]
    fn reload_replaces_previous_folder() {
        let (_first, mut index) = loaded(&[("a.png", Some("cat"))]);
        let second = dataset(&[("z.png", Some("dog"))]);

        index.load_folder(second.path()).unwrap();

        assert!(index.image("a.png").is_none());
        assert_eq!(index.count("cat"), 0);
        assert!(index.controls().get("cat").is_none());
        assert!(index.controls().get("dog").is_some());
    }

    #[test]
    fn set_tags_then_current_tags_round_trips() {
        let (_dir, mut index) = loaded(&[("a.png", Some("cat")), ("b.png", Some("cat, dog"))]);

        let report = index
            .set_tags("a.png", ["dog", " sky ", ""])
            .unwrap()
            .unwrap();

        assert_eq!(report.created, vec!["sky"]);
        assert_eq!(report.relabelled, vec!["cat", "dog"]);
        assert_eq!(index.current_tags_for("a.png").unwrap(), set(&["dog", "sky"]));
        assert!(index.is_pending("a.png"));
        assert_consistent(&index);
    }

    #[test]
    fn unchanged_set_is_a_noop() {
        let (_dir, mut index) = loaded(&[("a.png", Some("cat"))]);

        assert!(index.set_tags("a.png", ["cat", "dog"]).unwrap().is_some());
        assert!(index.set_tags("a.png", ["cat", "dog"]).unwrap().is_none());
        assert!(index.set_tags("a.png", ["dog", "cat", "dog"]).unwrap().is_none());
    }

    #[test]
    fn setting_tags_back_to_disk_value_drops_pending_edit() {
        let (_dir, mut index) = loaded(&[("a.png", Some("cat"))]);

        index.set_tags("a.png", ["dog"]).unwrap();
        assert!(index.is_pending("a.png"));
        index.set_tags("a.png", ["cat"]).unwrap();
        assert!(!index.is_pending("a.png"));
    }

    #[test]
    fn unknown_image_is_rejected() {
        let (_dir, mut index) = loaded(&[("a.png", None)]);
        let err = index.set_tags("ghost.png", ["x"]).unwrap_err();
        assert!(matches!(err, TaggerError::UnknownImage(_)));
    }

    #[test]
    fn last_occurrence_destroys_controls() {
        let (_dir, mut index) = loaded(&[("a.png", Some("cat, rare")), ("b.png", Some("cat"))]);

        let report = index.set_tags("a.png", ["cat"]).unwrap().unwrap();

        assert_eq!(report.destroyed, vec!["rare"]);
        assert!(index.controls().get("rare").is_none());
        assert_consistent(&index);
    }

    #[test]
    fn global_removal_strips_every_image() {
        let (_dir, mut index) = loaded(&[
            ("a.png", Some("cat, blurry")),
            ("b.png", Some("dog, blurry, jpeg artifacts")),
            ("c.png", Some("dog")),
        ]);

        let report = index
            .remove_tags_globally(["blurry", "jpeg artifacts", "missing"])
            .unwrap();

        assert_eq!(report.destroyed, vec!["blurry", "jpeg artifacts"]);
        assert_eq!(index.tags_for("a.png"), Some(&set(&["cat"])));
        assert_eq!(index.tags_for("b.png"), Some(&set(&["dog"])));
        assert!(!index.is_pending("c.png"));
        assert_eq!(index.pending_count(), 2);
        assert_consistent(&index);
    }

    #[test]
    fn removing_absent_tags_changes_nothing() {
        let (_dir, mut index) = loaded(&[("a.png", Some("cat"))]);
        assert!(index.remove_tags_globally(["dog"]).is_none());
        assert!(index.remove_tags_globally(Vec::<String>::new()).is_none());
    }

    #[test]
    fn mass_edit_replaces_target_tags() {
        let (_dir, mut index) = loaded(&[
            ("a.png", Some("cat, kitten, indoor")),
            ("b.png", Some("cat")),
        ]);
        let filter = FilterState::new();

        index
            .mass_edit(["kitten", "", "cat"], ["cat", "  ", "feline"], false, &filter)
            .unwrap();

        assert_eq!(index.tags_for("a.png"), Some(&set(&["cat", "feline", "indoor"])));
        assert_eq!(index.tags_for("b.png"), Some(&set(&["cat", "feline"])));
        assert_eq!(index.count(""), 0);
        assert!(index.controls().get("").is_none());
        assert_consistent(&index);

        assert!(index.mass_edit([" "], [""], false, &filter).is_none());
    }

    #[test]
    fn visible_only_mass_edit_skips_filtered_out_images() {
        let (_dir, mut index) = loaded(&[
            ("a.png", Some("cat, outdoor")),
            ("b.png", Some("cat, indoor")),
            ("c.png", Some("dog")),
        ]);
        let mut filter = FilterState::new();
        filter.toggle(Role::Positive, "cat");
        filter.toggle(Role::Negative, "outdoor");

        index.mass_edit(["cat"], ["tabby"], true, &filter).unwrap();

        assert_eq!(index.tags_for("a.png"), Some(&set(&["cat", "outdoor"])));
        assert_eq!(index.tags_for("b.png"), Some(&set(&["indoor", "tabby"])));
        assert_eq!(index.tags_for("c.png"), Some(&set(&["dog"])));
        assert!(!index.is_pending("a.png"));
        assert!(!index.is_pending("c.png"));
        assert_consistent(&index);
    }

    #[test]
    fn flush_writes_pending_and_clears_them() {
        let (dir, mut index) = loaded(&[("a.png", Some("cat")), ("b.png", Some("dog"))]);
        index.set_tags("a.png", ["cat", "sitting"]).unwrap();
        index.remove_tags_globally(["dog"]);
        let before_a = index.current_tags_for("a.png").unwrap();
        let before_b = index.current_tags_for("b.png").unwrap();

        let report = index.flush();

        assert!(report.is_clean());
        assert_eq!(report.written, vec!["a.png", "b.png"]);
        assert_eq!(index.pending_count(), 0);
        assert_eq!(index.current_tags_for("a.png").unwrap(), before_a);
        assert_eq!(index.current_tags_for("b.png").unwrap(), before_b);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "cat, sitting");
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "");
    }

    #[test]
    fn failed_write_stays_pending_and_others_proceed() {
        let (dir, mut index) = loaded(&[("a.png", Some("cat")), ("b.png", Some("dog"))]);
        index.set_tags("a.png", ["lion"]).unwrap();
        index.set_tags("b.png", ["wolf"]).unwrap();
        let blocked = dir.path().join("a.txt");
        fs::remove_file(&blocked).unwrap();
        fs::create_dir(&blocked).unwrap();

        let report = index.flush();

        assert_eq!(report.written, vec!["b.png"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "a.png");
        assert!(index.is_pending("a.png"));
        assert!(!index.is_pending("b.png"));
        assert_eq!(index.current_tags_for("a.png").unwrap(), set(&["lion"]));
    }

    #[test]
    fn revert_restores_sidecar_tags() {
        let (_dir, mut index) = loaded(&[("a.png", Some("cat")), ("b.png", Some("cat"))]);
        index.set_tags("a.png", ["dog"]).unwrap();

        let report = index.revert("a.png").unwrap().unwrap();

        assert_eq!(report.destroyed, vec!["dog"]);
        assert_eq!(index.tags_for("a.png"), Some(&set(&["cat"])));
        assert!(!index.is_pending("a.png"));
        assert_consistent(&index);
    }

    #[test]
    fn visible_images_follow_filter() {
        let (_dir, index) = loaded(&[
            ("a.png", Some("cat, outdoor")),
            ("b.png", Some("cat")),
            ("c.png", Some("dog")),
        ]);
        let mut filter = FilterState::new();
        filter.toggle(Role::Positive, "cat");
        filter.toggle(Role::Negative, "outdoor");

        let visible: Vec<_> = index
            .visible_images(&filter)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(visible, vec!["b.png"]);
    }
}
