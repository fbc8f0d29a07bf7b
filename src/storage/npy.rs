//! Streaming NumPy `.npy` archive of equally sized RGB images.
//!
//! Layout: v1.0 header describing a `|u1` array of shape `(N, H, W, 3)`,
//! followed by the raw pixels of each image in order. The header has a fixed
//! length so `N` can be patched in once the last image is written.

use super::ImageSink;
use crate::error::{MelgramError, MelgramResult};
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Total header size including magic, version and length prefix.
const HEADER_LEN: usize = 128;

fn header(count: u64, height: u32, width: u32) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '|u1', 'fortran_order': False, 'shape': ({count}, {height}, {width}, 3), }}"
    );
    let mut out = Vec::with_capacity(HEADER_LEN);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&((HEADER_LEN - 10) as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.resize(HEADER_LEN - 1, b' ');
    out.push(b'\n');
    out
}

/// Appends images to a `.npy` file as they are produced.
pub struct NpyArchiveWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    width: u32,
    height: u32,
    count: u64,
}

impl NpyArchiveWriter {
    /// Create (or truncate) `path` for images of `width` x `height`.
    pub fn create(path: impl AsRef<Path>, width: u32, height: u32) -> MelgramResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(&header(0, height, width))?;
        Ok(Self {
            path,
            writer,
            width,
            height,
            count: 0,
        })
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, image: &RgbImage) -> MelgramResult<()> {
        let (w, h) = image.dimensions();
        if (w, h) != (self.width, self.height) {
            return Err(MelgramError::ShapeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: w,
                actual_height: h,
            });
        }
        self.writer.write_all(image.as_raw())?;
        self.count += 1;
        Ok(())
    }

    /// Patch the final image count into the header and close the file.
    pub fn finish(mut self) -> MelgramResult<u64> {
        self.writer.flush()?;
        let file = self.writer.get_mut();
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&header(self.count, self.height, self.width))?;
        file.flush()?;
        log::debug!("{}: {} images", self.path.display(), self.count);
        Ok(self.count)
    }
}

impl ImageSink for NpyArchiveWriter {
    fn persist(&mut self, _name: &str, image: &RgbImage) -> MelgramResult<()> {
        self.append(image)
    }
}
