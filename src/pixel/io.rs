//! Hand-off of pixel buffers to the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::pixel::{PixelBuffer, PixelFormat};
use crate::util::{MlHelpersError, MlHelpersResult};
use std::path::Path;

fn dims_u32(buffer: &PixelBuffer) -> MlHelpersResult<(u32, u32)> {
    let too_large = || MlHelpersError::ImageIo {
        reason: format!(
            "{}x{} exceeds the image crate's u32 dimensions",
            buffer.width(),
            buffer.height()
        ),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| too_large())?;
    let height = u32::try_from(buffer.height()).map_err(|_| too_large())?;
    Ok((width, height))
}

impl PixelBuffer {
    /// Converts the buffer into an `image::DynamicImage` without re-encoding.
    pub fn to_dynamic_image(&self) -> MlHelpersResult<image::DynamicImage> {
        let (width, height) = dims_u32(self)?;
        let size_err = || MlHelpersError::ImageIo {
            reason: "pixel data does not match image dimensions".to_string(),
        };
        let img = match self.format() {
            PixelFormat::Rgba8 => image::DynamicImage::ImageRgba8(
                image::RgbaImage::from_raw(width, height, self.data().to_vec())
                    .ok_or_else(size_err)?,
            ),
            PixelFormat::Gray8 => image::DynamicImage::ImageLuma8(
                image::GrayImage::from_raw(width, height, self.data().to_vec())
                    .ok_or_else(size_err)?,
            ),
        };
        Ok(img)
    }

    /// Encodes the buffer to disk; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MlHelpersResult<()> {
        let (width, height) = dims_u32(self)?;
        let color = match self.format() {
            PixelFormat::Rgba8 => image::ExtendedColorType::Rgba8,
            PixelFormat::Gray8 => image::ExtendedColorType::L8,
        };
        image::save_buffer(path, self.data(), width, height, color).map_err(|err| {
            MlHelpersError::ImageIo {
                reason: err.to_string(),
            }
        })
    }
}
