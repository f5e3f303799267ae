use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::constants::RGB_CHANNELS;

/// One decoded video frame: tightly-packed RGB24 bytes in row-major order,
/// tagged with its zero-based position in the stream.
///
/// The frame owns its pixel buffer. Callers that only need to look at pixels
/// take a borrowed [`ArrayView3`] via [`Frame::as_ndarray`]; the view never
/// outlives the frame and never transfers ownership.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS,
            "pixel buffer must hold width * height RGB24 pixels"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Zero-based position of this frame in its stream.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Borrowed `(height, width, channel)` view of the pixels.
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("pixel buffer length must match frame dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("pixel buffer length must match frame dimensions")
    }

    /// Average of the RGB channels at `(row, col)`, or `None` out of bounds.
    pub fn luma_at(&self, row: i64, col: i64) -> Option<f64> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        let offset = (row as usize * self.width as usize + col as usize) * RGB_CHANNELS;
        let px = &self.data[offset..offset + RGB_CHANNELS];
        Some(px.iter().map(|&c| c as f64).sum::<f64>() / RGB_CHANNELS as f64)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, RGB_CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_construction_and_accessors() {
        let frame = Frame::new(vec![7u8; 12], 2, 2, 3);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 3);
        assert_eq!(frame.data().len(), 12);
    }

    #[test]
    #[should_panic(expected = "pixel buffer must hold width * height RGB24 pixels")]
    fn test_wrong_buffer_length_panics_in_debug() {
        Frame::new(vec![0u8; 11], 2, 2, 0);
    }

    #[test]
    fn test_as_ndarray_shape_and_access() {
        // 2x2 RGB, pixel (row=1, col=0) red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_as_ndarray_mut_modifies_buffer() {
        let mut frame = Frame::new(vec![0u8; 12], 2, 2, 0);
        frame.as_ndarray_mut()[[0, 1, 2]] = 9;
        assert_eq!(frame.as_ndarray()[[0, 1, 2]], 9);
    }

    #[test]
    fn test_luma_at_averages_channels() {
        let mut data = vec![0u8; 12];
        // pixel (0, 1) = (30, 60, 90)
        data[3] = 30;
        data[4] = 60;
        data[5] = 90;
        let frame = Frame::new(data, 2, 2, 0);
        assert_relative_eq!(frame.luma_at(0, 1).unwrap(), 60.0);
    }

    #[test]
    fn test_luma_at_out_of_bounds_is_none() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, 0);
        assert!(frame.luma_at(-1, 0).is_none());
        assert!(frame.luma_at(0, 2).is_none());
        assert!(frame.luma_at(2, 0).is_none());
    }
}
