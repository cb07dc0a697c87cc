//! Reader for the IDX binary format used by MNIST and its derivatives
//! (Fashion-MNIST, EMNIST, …).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```
use std::path::Path;

use log::debug;

use crate::data::dataset::{normalize_pixels, Dataset};
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

fn read_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]]) as usize
}

/// Validates the 4-byte magic: two reserved zero bytes, uint8 dtype, and the
/// expected dimension count.
fn check_magic(bytes: &[u8], kind: &str, dims: u8, header_len: usize) -> Result<()> {
    if bytes.len() < header_len {
        return Err(Error::Idx(format!(
            "{} file too short: expected at least {} header bytes, got {}",
            kind, header_len, bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(Error::Idx(format!(
            "{} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(Error::Idx(format!(
            "{} file: dtype byte must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(Error::Idx(format!(
            "{} file: expected {} dimensions, got {}",
            kind, dims, bytes[3]
        )));
    }
    Ok(())
}

/// Parses an IDX3 image buffer and an IDX1 label buffer into a `Dataset`.
/// Pixels are normalized into [0, 1).
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], num_classes: usize) -> Result<Dataset> {
    check_magic(image_bytes, "image", 0x03, IMAGE_HEADER_LEN)?;
    check_magic(label_bytes, "label", 0x01, LABEL_HEADER_LEN)?;

    let n_items = read_u32(image_bytes, 4);
    let rows = read_u32(image_bytes, 8);
    let cols = read_u32(image_bytes, 12);
    let n_pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| Error::Idx(format!("rows * cols overflows (rows={}, cols={})", rows, cols)))?;
    let image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(IMAGE_HEADER_LEN))
        .ok_or_else(|| Error::Idx("image data length overflows".to_owned()))?;
    if image_bytes.len() < image_len {
        return Err(Error::Idx(format!(
            "image file truncated: header declares {} images of {}x{} but file is {} bytes",
            n_items, rows, cols, image_bytes.len()
        )));
    }

    let label_count = read_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(Error::Idx(format!(
            "image file declares {} items but label file declares {}",
            n_items, label_count
        )));
    }
    if label_bytes.len() < LABEL_HEADER_LEN + n_items {
        return Err(Error::Idx(format!(
            "label file truncated: header declares {} labels but file is {} bytes",
            n_items, label_bytes.len()
        )));
    }

    let pixels = normalize_pixels(&image_bytes[IMAGE_HEADER_LEN..image_len]);
    let labels: Vec<usize> = label_bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_items]
        .iter()
        .map(|&l| l as usize)
        .collect();

    debug!("parsed IDX pair: {} samples of {}x{} pixels", n_items, rows, cols);
    Dataset::new(Matrix::from_vec(n_items, n_pixels, pixels), labels, num_classes)
}

/// Reads and parses an IDX image/label file pair from disk.
pub fn load_idx_pair(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    num_classes: usize,
) -> Result<Dataset> {
    let image_bytes = std::fs::read(image_path)?;
    let label_bytes = std::fs::read(label_path)?;
    parse_idx_pair(&image_bytes, &label_bytes, num_classes)
}
