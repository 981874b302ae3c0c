use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{vec2, Color32, Rect, Sense, Stroke};
use log::{error, info, warn};
use rfd::FileDialog;

use crate::config::Config;
use crate::controls::{ControlRegistry, ReconcileReport, Role};
use crate::debounce::Debouncer;
use crate::editor::TagEditor;
use crate::filter::FilterState;
use crate::flow::{self, FlowLayout};
use crate::index::TagIndex;
use crate::selection::{FrameStyle, SelectionState};
use crate::sidecar::{self, TagSet};
use crate::thumbnails::ThumbnailCache;

const FEEDBACK_DURATION: Duration = Duration::from_secs(5);
const FRAME_PADDING: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    TagCloud,
    MassEdit,
    TagEdit,
    TagRemoval,
}

struct Feedback {
    message: String,
    is_error: bool,
    shown_at: Instant,
}

pub struct DatasetTagger {
    config: Config,
    index: TagIndex,
    filter: FilterState,
    selection: SelectionState,
    editor: TagEditor,
    thumbnails: ThumbnailCache,
    thumbnail_size: u32,
    decoded_size: u32,
    resize: Debouncer,
    tag_layout: FlowLayout,
    gallery_layout: FlowLayout,
    tab: Tab,
    new_tags: String,
    mass_edit_visible_only: bool,
    feedback: Option<Feedback>,
}

impl DatasetTagger {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self {
            thumbnail_size: config.thumbnail_size,
            decoded_size: config.thumbnail_size,
            resize: Debouncer::new(Duration::from_millis(config.resize_debounce_ms)),
            tag_layout: FlowLayout::new(config.tag_spacing, config.tag_margin),
            gallery_layout: FlowLayout::new(config.gallery_spacing, config.gallery_spacing),
            config,
            index: TagIndex::new(),
            filter: FilterState::new(),
            selection: SelectionState::new(),
            editor: TagEditor::new(),
            thumbnails: ThumbnailCache::new(),
            tab: Tab::TagCloud,
            new_tags: String::new(),
            mass_edit_visible_only: true,
            feedback: None,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.feedback = Some(Feedback {
            message: message.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.feedback = Some(Feedback {
            message: message.into(),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    fn open_folder(&mut self, path: &Path) {
        let dropped = self.index.pending_count();
        match self.index.load_folder(path) {
            Ok(report) => {
                if dropped > 0 {
                    warn!("Discarded {} unsaved edit(s) on folder switch", dropped);
                }
                self.selection.clear();
                self.filter.reset();
                self.editor.clear();
                self.thumbnails.reset();
                self.thumbnails.request(self.index.images(), self.thumbnail_size);
                self.decoded_size = self.thumbnail_size;
                if report.skipped_images > 0 {
                    self.notify_error(format!(
                        "Loaded {} images, skipped {} sharing a tag file",
                        report.images, report.skipped_images
                    ));
                } else {
                    self.notify(format!(
                        "Loaded {} images ({} new tag files)",
                        report.images, report.created_sidecars
                    ));
                }
            }
            Err(err) => {
                error!("Failed to open {}: {}", path.display(), err);
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title("Cannot open folder")
                    .set_description(err.to_string())
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
            }
        }
    }

    fn save_all(&mut self) {
        let report = self.index.flush();
        if report.is_clean() {
            self.notify(format!("Saved {} tag file(s)", report.written.len()));
        } else {
            let (name, err) = &report.failed[0];
            self.notify_error(format!(
                "Failed to save {} tag file(s), first: {}: {}",
                report.failed.len(),
                name,
                err
            ));
        }
    }

    fn after_reconcile(&mut self, report: Option<ReconcileReport>) {
        if let Some(report) = report {
            self.filter.forget(&report.destroyed);
        }
    }

    fn apply_tags(&mut self, image: &str, tags: TagSet) {
        match self.index.set_tags(image, tags) {
            Ok(report) => self.after_reconcile(report),
            Err(err) => {
                error!("Cannot apply tag edit: {}", err);
                self.notify_error(err.to_string());
            }
        }
    }

    fn click_image(&mut self, name: &str) {
        if self.editor.auto_save {
            let previous = self.selection.active().map(str::to_string);
            if let Some(previous) = previous {
                let changed = self
                    .index
                    .tags_for(&previous)
                    .map_or(false, |tags| self.editor.differs_from(tags));
                if changed {
                    let draft = self.editor.draft_tags();
                    self.apply_tags(&previous, draft);
                }
            }
        }

        self.selection.click(name);

        if self.editor.auto_copy {
            if let Some(tags) = self.index.tags_for(name) {
                self.editor.load(tags);
            }
        }
    }

    fn visible_names(&self) -> Vec<String> {
        self.index
            .visible_images(&self.filter)
            .map(|record| record.name.clone())
            .collect()
    }

    fn refresh_thumbnails(&mut self, now: Instant) {
        if self.resize.fire_if_due(now) && self.thumbnail_size != self.decoded_size {
            info!("Re-decoding thumbnails at {}px", self.thumbnail_size);
            self.thumbnails.request(self.index.images(), self.thumbnail_size);
            self.decoded_size = self.thumbnail_size;
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Select Folder").clicked() {
                if let Some(path) = FileDialog::new().set_title("Select Folder").pick_folder() {
                    self.open_folder(&path);
                }
            }
            let pending = self.index.pending_count();
            let label = if pending > 0 {
                format!("Save ({})", pending)
            } else {
                "Save".to_string()
            };
            if ui.button(label).clicked() {
                self.save_all();
            }

            if let Some(folder) = self.index.folder() {
                ui.separator();
                ui.label(format!(
                    "{} ({} images, {} selected)",
                    folder.display(),
                    self.index.images().len(),
                    self.selection.selected().len()
                ));
            }

            if let Some(feedback) = &self.feedback {
                ui.separator();
                let color = if feedback.is_error {
                    Color32::RED
                } else {
                    Color32::GREEN
                };
                ui.colored_label(color, &feedback.message);
            }
        });

        if let Some(progress) = self.thumbnails.progress() {
            ui.add(
                egui::ProgressBar::new(progress)
                    .show_percentage()
                    .desired_width(ui.available_width()),
            );
        }
    }

    fn gallery(&mut self, ui: &mut egui::Ui) {
        let names = self.visible_names();
        let cell = flow::square(self.thumbnail_size as f32 + FRAME_PADDING);
        let sizes = vec![cell; names.len()];
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_source("gallery")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let width = ui.available_width();
                let layout = self.gallery_layout.arrange(&sizes, width);
                let (area, _) = ui.allocate_exact_size(vec2(width, layout.height), Sense::hover());

                for (name, pos) in names.iter().zip(&layout.positions) {
                    let frame = Rect::from_min_size(area.min + pos.to_vec2(), cell);
                    if !ui.is_rect_visible(frame) {
                        continue;
                    }
                    let response = ui.interact(frame, ui.id().with(name), Sense::click());
                    if response.clicked() {
                        clicked = Some(name.clone());
                    }

                    let inner = frame.shrink(FRAME_PADDING / 2.0);
                    match self.thumbnails.get(name) {
                        Some(texture) => {
                            let size = texture.size_vec2();
                            let scale = (inner.width() / size.x).min(inner.height() / size.y);
                            let fitted = Rect::from_center_size(inner.center(), size * scale);
                            egui::Image::new(texture).paint_at(ui, fitted);
                        }
                        None => {
                            ui.painter().text(
                                inner.center(),
                                egui::Align2::CENTER_CENTER,
                                name,
                                egui::FontId::proportional(12.0),
                                ui.visuals().weak_text_color(),
                            );
                        }
                    }

                    let stroke = match self.selection.frame_style(name) {
                        FrameStyle::Selected => Stroke::new(6.0, Color32::GRAY),
                        FrameStyle::Normal => {
                            Stroke::new(2.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
                        }
                    };
                    ui.painter().rect_stroke(frame, 0.0, stroke);
                    if self.index.is_pending(name) {
                        ui.painter().circle_filled(
                            frame.right_top() + vec2(-8.0, 8.0),
                            4.0,
                            Color32::from_rgb(230, 160, 0),
                        );
                    }
                }
            });

        if let Some(name) = clicked {
            self.click_image(&name);
        }
    }

    fn tag_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, Tab::TagCloud, "Tag Cloud");
            ui.selectable_value(&mut self.tab, Tab::MassEdit, "Mass Edit");
            ui.selectable_value(&mut self.tab, Tab::TagEdit, "Tag Edit");
            ui.selectable_value(&mut self.tab, Tab::TagRemoval, "Tag Removal");
        });
        ui.separator();

        match self.tab {
            Tab::TagCloud => self.tag_cloud_tab(ui),
            Tab::MassEdit => self.mass_edit_tab(ui),
            Tab::TagEdit => self.tag_edit_tab(ui),
            Tab::TagRemoval => self.tag_removal_tab(ui),
        }
    }

    fn tag_cloud_tab(&mut self, ui: &mut egui::Ui) {
        let half = (ui.available_height() - 80.0).max(120.0) / 2.0;
        let draft = TagSet::new();

        for (role, title) in [(Role::Positive, "Positive Tags"), (Role::Negative, "Negative Tags")] {
            ui.group(|ui| {
                ui.label(title);
                let text = match role {
                    Role::Positive => &mut self.filter.positive_text,
                    _ => &mut self.filter.negative_text,
                };
                ui.add(egui::TextEdit::singleline(text).hint_text("Filter tags..."));
                let clicked = egui::ScrollArea::vertical()
                    .id_source(title)
                    .max_height(half)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        tag_cloud(ui, self.index.controls(), role, &self.filter, &draft, &self.tag_layout)
                    })
                    .inner;
                if let Some(tag) = clicked {
                    self.filter.toggle(role, &tag);
                }
            });
        }

        ui.horizontal(|ui| {
            if ui.button("Remove Tag Selection").clicked() {
                self.filter.clear_tag_selection();
            }
            if ui.button("Select All Visible Images").clicked() {
                let names = self.visible_names();
                self.selection.select_all(names.iter().map(String::as_str));
            }
            if ui.button("Deselect Visible Images").clicked() {
                let names = self.visible_names();
                self.selection.deselect(names.iter().map(String::as_str));
            }
        });
    }

    fn mass_edit_tab(&mut self, ui: &mut egui::Ui) {
        let target: TagSet = self.filter.positive_tags().clone();

        ui.label("Selected Tags:");
        let mut shown = sidecar::format_tags(&target);
        ui.add(
            egui::TextEdit::multiline(&mut shown)
                .interactive(false)
                .desired_width(f32::INFINITY),
        );

        ui.label("New Tags:");
        ui.add(egui::TextEdit::multiline(&mut self.new_tags).desired_width(f32::INFINITY));
        ui.checkbox(&mut self.mass_edit_visible_only, "Visible images only");

        if ui.button("Apply Mass Edit").clicked() {
            let replacement = sidecar::parse_tags(&self.new_tags);
            let report = self.index.mass_edit(
                &target,
                &replacement,
                self.mass_edit_visible_only,
                &self.filter,
            );
            self.after_reconcile(report);
            self.notify("Mass edit applied");
        }
    }

    fn tag_edit_tab(&mut self, ui: &mut egui::Ui) {
        let active = self.selection.active().map(str::to_string);
        let draft = self.editor.draft_tags();

        ui.columns(2, |columns| {
            let clicked = egui::ScrollArea::vertical()
                .id_source("edit_cloud")
                .auto_shrink([false, false])
                .show(&mut columns[0], |ui| {
                    tag_cloud(ui, self.index.controls(), Role::Edit, &self.filter, &draft, &self.tag_layout)
                })
                .inner;
            if let Some(tag) = clicked {
                self.editor.toggle(&tag);
            }

            let ui = &mut columns[1];
            let current = match active.as_deref().map(|name| self.index.current_tags_for(name)) {
                Some(Ok(tags)) => sidecar::format_tags(&tags),
                Some(Err(err)) => err.to_string(),
                None => String::new(),
            };
            ui.label(active.as_deref().unwrap_or("No image selected"));
            let mut shown = current;
            ui.add(
                egui::TextEdit::multiline(&mut shown)
                    .interactive(false)
                    .desired_width(f32::INFINITY),
            );
            ui.add(egui::TextEdit::multiline(&mut self.editor.draft).desired_width(f32::INFINITY));

            ui.checkbox(&mut self.selection.single_mode, "Single Selection Mode");
            ui.checkbox(&mut self.editor.auto_copy, "Auto Copy");
            ui.checkbox(&mut self.editor.auto_save, "Auto-Save Tags on Selection Change");

            ui.horizontal_wrapped(|ui| {
                if ui.button("Copy from Existing").clicked() {
                    if let Some(tags) = active.as_deref().and_then(|name| self.index.tags_for(name)) {
                        self.editor.load(tags);
                    }
                }
                if ui.button("Apply Tag Edit").clicked() {
                    match active.as_deref() {
                        Some(name) => {
                            let tags = self.editor.draft_tags();
                            self.apply_tags(name, tags);
                        }
                        None => self.notify_error("No image selected. Cannot apply tag edit."),
                    }
                }
                if ui.button("Revert to Original Tags").clicked() {
                    if let Some(name) = active.as_deref() {
                        match self.index.revert(name) {
                            Ok(report) => {
                                self.after_reconcile(report);
                                if let Some(tags) = self.index.tags_for(name) {
                                    self.editor.load(tags);
                                }
                            }
                            Err(err) => {
                                error!("Cannot revert {}: {}", name, err);
                                self.notify_error(err.to_string());
                            }
                        }
                    }
                }
            });
        });
    }

    fn tag_removal_tab(&mut self, ui: &mut egui::Ui) {
        let draft = TagSet::new();
        ui.add(egui::TextEdit::singleline(&mut self.filter.removal_text).hint_text("Filter tags..."));

        let clicked = egui::ScrollArea::vertical()
            .id_source("removal_cloud")
            .max_height((ui.available_height() - 40.0).max(80.0))
            .auto_shrink([false, true])
            .show(ui, |ui| {
                tag_cloud(ui, self.index.controls(), Role::Removal, &self.filter, &draft, &self.tag_layout)
            })
            .inner;
        if let Some(tag) = clicked {
            self.filter.toggle(Role::Removal, &tag);
        }

        if ui.button("Remove Selected Tags").clicked() {
            let remove = self.filter.removal_tags().clone();
            if !remove.is_empty() {
                let report = self.index.remove_tags_globally(&remove);
                self.after_reconcile(report);
                self.filter.clear_removal_selection();
                self.notify(format!("Removed {} tag(s) from the dataset", remove.len()));
            }
        }
    }
}

/// Lays out the controls of one panel with the flow layout and returns the
/// tag whose control was clicked.
fn tag_cloud(
    ui: &mut egui::Ui,
    controls: &ControlRegistry,
    role: Role,
    filter: &FilterState,
    draft: &TagSet,
    layout: &FlowLayout,
) -> Option<String> {
    let font_id = egui::TextStyle::Button.resolve(ui.style());
    let padding = ui.spacing().button_padding;
    let min_height = ui.spacing().interact_size.y;

    let shown: Vec<_> = controls
        .iter()
        .filter(|entry| filter.shows_control(role, entry.tag()))
        .collect();
    let sizes: Vec<_> = shown
        .iter()
        .map(|entry| {
            let galley = ui.painter().layout_no_wrap(
                entry.control(role).label.clone(),
                font_id.clone(),
                Color32::PLACEHOLDER,
            );
            let size = galley.size() + 2.0 * padding;
            vec2(size.x, size.y.max(min_height))
        })
        .collect();

    let width = ui.available_width();
    let placed = layout.arrange(&sizes, width);
    let (area, _) = ui.allocate_exact_size(vec2(width, placed.height), Sense::hover());

    let mut clicked = None;
    for ((entry, pos), size) in shown.iter().zip(&placed.positions).zip(&sizes) {
        let control = entry.control(role);
        let checked = match role {
            Role::Edit => draft.contains(entry.tag()),
            _ => filter.is_checked(role, entry.tag()),
        };
        let rect = Rect::from_min_size(area.min + pos.to_vec2(), *size);
        let response = ui
            .push_id(control.handle.raw(), |ui| {
                ui.put(rect, egui::Button::new(control.label.as_str()).selected(checked))
            })
            .inner;
        if response.clicked() {
            clicked = Some(entry.tag().to_string());
        }
    }
    clicked
}

impl eframe::App for DatasetTagger {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.thumbnails.poll(ctx);
        self.refresh_thumbnails(now);

        let expired = self
            .feedback
            .as_ref()
            .is_some_and(|feedback| now.duration_since(feedback.shown_at) > FEEDBACK_DURATION);
        if expired {
            self.feedback = None;
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| self.top_bar(ui));

        egui::TopBottomPanel::bottom("thumbnail_size").show(ctx, |ui| {
            let range = self.config.min_thumbnail_size..=self.config.max_thumbnail_size;
            let response = ui.add(
                egui::Slider::new(&mut self.thumbnail_size, range).text("Thumbnail size"),
            );
            if response.changed() {
                self.resize.arm(Instant::now());
            }
        });

        egui::SidePanel::right("tag_panel")
            .resizable(true)
            .default_width(520.0)
            .min_width(300.0)
            .show(ctx, |ui| self.tag_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.index.images().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No images loaded. Please select a folder.");
                });
            } else {
                self.gallery(ui);
            }
        });

        if let Some(remaining) = self.resize.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
        if self.thumbnails.progress().is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        if self.feedback.is_some() {
            ctx.request_repaint_after(FEEDBACK_DURATION);
        }
    }
}
