//! Conversion of array views into 8-bit pixel buffers.
//!
//! Every element is mapped as `clamp((value + offset) * scale, 0, 255)` and
//! truncated to `u8`. For data in `[0, 1)` use `offset = 0, scale = 255`; for
//! data in `[-1, 1]` use `offset = 1, scale = 127.5`.
//!
//! Output buffers are row-major, top-to-bottom and left-to-right: four bytes
//! per pixel (R, G, B, A) for color, one byte per pixel for grayscale.

use crate::array::{ArrayView, Element, OwnedArray};
use crate::trace::{trace_event, trace_span};
use crate::util::{MlHelpersError, MlHelpersResult};

#[cfg(feature = "image-io")]
pub mod io;
#[cfg(feature = "simd")]
pub(crate) mod simd;

/// Byte layout of a pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Four bytes per pixel, alpha always 255.
    Rgba8,
    /// One byte per pixel.
    Gray8,
}

impl PixelFormat {
    /// Returns the number of bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Owned contiguous 8-bit pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl PixelBuffer {
    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the byte layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns the raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// Converts a `[3, height, width]` view into RGBA bytes.
    pub fn to_rgba_bytes(&self, offset: T, scale: T) -> MlHelpersResult<PixelBuffer> {
        if self.rank() != 3 {
            return Err(MlHelpersError::RankMismatch {
                expected: 3,
                got: self.rank(),
            });
        }
        if self.shape[0] != 3 {
            return Err(MlHelpersError::ChannelCountMismatch {
                expected: 3,
                got: self.shape[0],
            });
        }

        let (height, width) = (self.shape[1], self.shape[2]);
        let _span = trace_span!("to_rgba_bytes", height = height, width = width).entered();

        let row_bytes = width * 4;
        let mut data = vec![255u8; height * row_bytes];
        for y in 0..height {
            let row = &mut data[y * row_bytes..(y + 1) * row_bytes];
            for channel in 0..3 {
                let start = channel * self.strides[0] + y * self.strides[1];
                self.convert_line(start, self.strides[2], width, offset, scale, &mut row[channel..], 4);
            }
        }

        trace_event!("pixels_converted", count = height * width);
        Ok(PixelBuffer {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
        })
    }

    /// Converts a `[height, width]` view into grayscale bytes.
    pub fn to_gray_bytes(&self, offset: T, scale: T) -> MlHelpersResult<PixelBuffer> {
        if self.rank() != 2 {
            return Err(MlHelpersError::RankMismatch {
                expected: 2,
                got: self.rank(),
            });
        }

        let (height, width) = (self.shape[0], self.shape[1]);
        let _span = trace_span!("to_gray_bytes", height = height, width = width).entered();

        let mut data = vec![0u8; height * width];
        for y in 0..height {
            let row = &mut data[y * width..(y + 1) * width];
            self.convert_line(y * self.strides[0], self.strides[1], width, offset, scale, row, 1);
        }

        trace_event!("pixels_converted", count = height * width);
        Ok(PixelBuffer {
            data,
            width,
            height,
            format: PixelFormat::Gray8,
        })
    }

    /// Converts a rank-3 view to RGBA or a rank-2 view to grayscale.
    pub fn to_pixels(&self, offset: T, scale: T) -> MlHelpersResult<PixelBuffer> {
        match self.rank() {
            3 => self.to_rgba_bytes(offset, scale),
            2 => self.to_gray_bytes(offset, scale),
            got => Err(MlHelpersError::RankMismatch { expected: 3, got }),
        }
    }

    /// Copies one channel of a `[channels, height, width]` view into a new
    /// `[height, width]` array that does not alias this view.
    pub fn extract_channel(&self, channel: usize) -> MlHelpersResult<OwnedArray<T>> {
        if self.rank() != 3 {
            return Err(MlHelpersError::RankMismatch {
                expected: 3,
                got: self.rank(),
            });
        }
        let channels = self.shape[0];
        if channel >= channels {
            return Err(MlHelpersError::InvalidChannel { channel, channels });
        }

        let _span = trace_span!("extract_channel", channel = channel).entered();
        let plane = ArrayView {
            data: self.data,
            shape: self.shape[1..].to_vec(),
            strides: self.strides[1..].to_vec(),
        };
        let base = channel * self.strides[0];
        let data = plane
            .offsets()
            .map(|offset| self.data[base + offset].get())
            .collect();
        Ok(OwnedArray::from_parts(data, plane.shape))
    }

    /// Converts one channel of a `[channels, height, width]` view into
    /// grayscale bytes.
    pub fn channel_to_gray_bytes(
        &self,
        channel: usize,
        offset: T,
        scale: T,
    ) -> MlHelpersResult<PixelBuffer> {
        let mut plane = self.extract_channel(channel)?;
        let view = plane.view();
        view.to_gray_bytes(offset, scale)
    }

    /// Converts `count` elements starting at storage offset `start`, spaced
    /// `step` apart, into `dst` bytes spaced `dst_step` apart.
    #[allow(clippy::too_many_arguments)]
    fn convert_line(
        &self,
        start: usize,
        step: usize,
        count: usize,
        offset: T,
        scale: T,
        dst: &mut [u8],
        dst_step: usize,
    ) {
        if count == 0 {
            return;
        }
        if step == 1 {
            T::convert_run(&self.data[start..start + count], offset, scale, dst, dst_step);
            return;
        }
        for i in 0..count {
            dst[i * dst_step] = self.data[start + i * step].get().to_byte(offset, scale);
        }
    }
}
