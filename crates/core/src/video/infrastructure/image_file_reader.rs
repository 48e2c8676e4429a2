use std::path::Path;

use crate::shared::frame::Frame;

/// Loads still images into RGB [`Frame`]s using the `image` crate.
///
/// Any format the crate can decode is accepted; alpha and grayscale inputs
/// are converted to three-channel RGB.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to read image {}: {e}", path.display()))?
            .to_rgb8();
        let (width, height) = img.dimensions();
        Ok(Frame::new(img.into_raw(), width, height, 3, index))
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_png_as_rgb_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let img = image::RgbImage::from_fn(4, 3, |x, _| {
            if x == 0 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let frame = ImageFileReader::new().read(&path, 9).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 9);
        let arr = frame.as_ndarray();
        assert_eq!(arr[[2, 0, 0]], 255);
        assert_eq!(arr[[2, 1, 2]], 255);
    }

    #[test]
    fn test_grayscale_converted_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(2, 2, image::Luma([128])).save(&path).unwrap();

        let frame = ImageFileReader::new().read(&path, 0).unwrap();
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert!(arr.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageFileReader::new().read(&dir.path().join("absent.png"), 0);
        assert!(result.is_err());
    }
}
