//! Reading and writing the `.txt` tag file that sits next to each image.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Result, TaggerError};

/// Tags of one image. Sorted so that written sidecars are deterministic.
pub type TagSet = BTreeSet<String>;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

const SEPARATOR: &str = ", ";

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Splits a tag line on commas. Surrounding whitespace is trimmed, empty
/// tokens are dropped and duplicates collapse.
pub fn parse_tags(content: &str) -> TagSet {
    content
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same rules as [`parse_tags`], applied to an already split collection.
pub fn sanitize<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

pub fn format_tags(tags: &TagSet) -> String {
    tags.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Returns `Ok(None)` when the sidecar does not exist. Bytes that are not
/// UTF-8 are replaced rather than failing the read.
pub fn read_tags(sidecar: &Path) -> Result<Option<TagSet>> {
    if !sidecar.exists() {
        return Ok(None);
    }
    let bytes = fs::read(sidecar).map_err(|e| TaggerError::io(sidecar, e))?;
    Ok(Some(parse_tags(&String::from_utf8_lossy(&bytes))))
}

/// Overwrites the sidecar in place.
pub fn write_tags(sidecar: &Path, tags: &TagSet) -> Result<()> {
    fs::write(sidecar, format_tags(tags)).map_err(|e| TaggerError::io(sidecar, e))
}

/// Creates an empty sidecar if none exists. Returns whether one was created.
pub fn ensure_exists(sidecar: &Path) -> Result<bool> {
    if sidecar.exists() {
        return Ok(false);
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(sidecar)
        .map_err(|e| TaggerError::io(sidecar, e))?;
    Ok(true)
}
