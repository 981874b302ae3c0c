//! Background thumbnail decoding for the gallery.
//!
//! Decoding happens on a worker thread fanned out with rayon; the UI thread
//! drains finished thumbnails every frame and turns them into textures. Each
//! request bumps a generation counter so work for a previous folder or size is
//! dropped instead of overwriting newer thumbnails.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam::channel::{self, Receiver};
use hashbrown::HashMap;
use image::ImageReader;
use log::{debug, warn};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::index::ImageRecord;

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Open error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

enum CacheMessage {
    Decoded {
        generation: u64,
        name: String,
        image: DecodedImage,
    },
    Error {
        generation: u64,
        name: String,
        error: ThumbnailError,
    },
}

#[derive(Debug, Default)]
struct Progress {
    generation: u64,
    finished: usize,
}

/// Decodes `path` and scales it to fit a `size`×`size` box, keeping aspect.
pub fn decode_thumbnail(path: &Path, size: u32) -> Result<DecodedImage, ThumbnailError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let resized = img.thumbnail(size, size).to_rgba8();
    Ok(DecodedImage {
        width: resized.width(),
        height: resized.height(),
        pixels: resized.into_raw(),
    })
}

#[derive(Default)]
pub struct ThumbnailCache {
    textures: HashMap<String, egui::TextureHandle>,
    receiver: Option<Receiver<CacheMessage>>,
    progress: Arc<Mutex<Progress>>,
    generation: u64,
    total: usize,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every texture and abandons in-flight work.
    pub fn reset(&mut self) {
        self.textures.clear();
        self.start_generation(0);
        self.receiver = None;
    }

    /// Starts decoding `images` at `size`. Existing textures stay visible
    /// until their replacements arrive.
    pub fn request(&mut self, images: &[ImageRecord], size: u32) {
        let generation = self.start_generation(images.len());
        if images.is_empty() {
            self.receiver = None;
            return;
        }

        let (tx, rx) = channel::unbounded();
        self.receiver = Some(rx);

        let jobs: Vec<(String, PathBuf)> = images
            .iter()
            .map(|record| (record.name.clone(), record.path.clone()))
            .collect();
        let progress = Arc::clone(&self.progress);

        debug!("Decoding {} thumbnails at {}px", jobs.len(), size);
        thread::spawn(move || {
            jobs.into_par_iter().for_each_with(tx, |tx, (name, path)| {
                if progress.lock().generation != generation {
                    return;
                }

                let start = Instant::now();
                let message = match decode_thumbnail(&path, size) {
                    Ok(image) => {
                        debug!("Decoded in {:?}: {}", start.elapsed(), path.display());
                        CacheMessage::Decoded {
                            generation,
                            name,
                            image,
                        }
                    }
                    Err(error) => CacheMessage::Error {
                        generation,
                        name,
                        error,
                    },
                };

                let mut progress = progress.lock();
                if progress.generation == generation && tx.send(message).is_ok() {
                    progress.finished += 1;
                }
            });
        });
    }

    /// Uploads every finished thumbnail. Returns how many arrived.
    pub fn poll(&mut self, ctx: &egui::Context) -> usize {
        let Some(rx) = &self.receiver else {
            return 0;
        };

        // Read before draining so nothing sent after the count is lost.
        let finished = self.finished();
        let mut arrived = 0;
        for message in rx.try_iter() {
            match message {
                CacheMessage::Decoded {
                    generation,
                    name,
                    image,
                } if generation == self.generation => {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width as _, image.height as _],
                        &image.pixels,
                    );
                    let texture = ctx.load_texture(
                        format!("thumb_{}", name),
                        color_image,
                        egui::TextureOptions::default(),
                    );
                    self.textures.insert(name, texture);
                    arrived += 1;
                }
                CacheMessage::Error {
                    generation,
                    name,
                    error,
                } if generation == self.generation => {
                    warn!("Error caching thumbnail {}: {}", name, error);
                }
                _ => {}
            }
        }

        if finished >= self.total {
            self.receiver = None;
        }
        arrived
    }

    pub fn get(&self, name: &str) -> Option<&egui::TextureHandle> {
        self.textures.get(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Fraction of the current request that is done, while one is running.
    pub fn progress(&self) -> Option<f32> {
        if self.receiver.is_none() || self.total == 0 {
            return None;
        }
        Some(self.finished() as f32 / self.total as f32)
    }

    fn finished(&self) -> usize {
        self.progress.lock().finished
    }

    fn start_generation(&mut self, total: usize) -> u64 {
        self.generation += 1;
        self.total = total;
        let mut progress = self.progress.lock();
        progress.generation = self.generation;
        progress.finished = 0;
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn thumbnail_keeps_aspect_ratio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 40, 20);

        let thumb = decode_thumbnail(&path, 10).unwrap();

        assert_eq!((thumb.width, thumb.height), (10, 5));
        assert_eq!(thumb.pixels.len(), 10 * 5 * 4);
    }

    #[test]
    fn missing_or_garbage_files_fail() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            decode_thumbnail(&dir.path().join("none.png"), 10),
            Err(ThumbnailError::Io(_))
        ));

        let garbage = dir.path().join("garbage.png");
        std::fs::write(&garbage, b"not an image").unwrap();
        assert!(decode_thumbnail(&garbage, 10).is_err());
    }

    #[test]
    fn cache_collects_textures_for_current_generation() {
        let dir = tempdir().unwrap();
        let mut images = Vec::new();
        for name in ["a.png", "b.png"] {
            let path = dir.path().join(name);
            write_png(&path, 8, 8);
            images.push(ImageRecord {
                name: name.to_string(),
                sidecar: path.with_extension("txt"),
                path,
            });
        }
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::new();

        cache.request(&images, 4);
        let deadline = Instant::now() + Duration::from_secs(10);
        while cache.len() < 2 && Instant::now() < deadline {
            cache.poll(&ctx);
            thread::sleep(Duration::from_millis(10));
        }

        assert!(cache.get("a.png").is_some());
        assert!(cache.get("b.png").is_some());

        cache.reset();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.progress(), None);
    }
}
