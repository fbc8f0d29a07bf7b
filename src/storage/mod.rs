//! Persisting output images.
//!
//! Every sink writes as images arrive; nothing accumulates in memory.

mod npy;

pub use npy::NpyArchiveWriter;

use crate::error::MelgramResult;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

/// Destination for rendered images.
pub trait ImageSink {
    /// Persist one image under `name`.
    fn persist(&mut self, name: &str, image: &RgbImage) -> MelgramResult<()>;
}

/// Writes each image as `<root>/<name>.png`.
#[derive(Clone, Debug)]
pub struct PngDirectorySink {
    root: PathBuf,
}

impl PngDirectorySink {
    /// Create the sink, creating `root` if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> MelgramResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.png"))
    }
}

impl ImageSink for PngDirectorySink {
    fn persist(&mut self, name: &str, image: &RgbImage) -> MelgramResult<()> {
        let path = self.path_for(name);
        image.save_with_format(&path, ImageFormat::Png)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
