use std::fmt;

/// Pixel layout reported by the camera for a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar/semi-planar 4:2:0 with one luma and two chroma planes
    Yuv420_888,
    /// Semi-planar 4:2:0, luma followed by interleaved V/U
    Nv21,
    /// Planar 4:2:2 with one luma and two chroma planes
    Yuv422_888,
    /// Packed 8-bit RGBA
    Rgba8888,
    /// Any format code this crate does not know about
    Other(i32),
}

impl PixelFormat {
    /// Map an Android `ImageFormat` / `PixelFormat` constant
    pub fn from_android_code(code: i32) -> Self {
        match code {
            0x23 => PixelFormat::Yuv420_888,
            0x11 => PixelFormat::Nv21,
            0x27 => PixelFormat::Yuv422_888,
            0x01 => PixelFormat::Rgba8888,
            other => PixelFormat::Other(other),
        }
    }

    /// Bits used to store one pixel, `None` for unknown formats
    pub fn bits_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Yuv420_888 | PixelFormat::Nv21 => Some(12),
            PixelFormat::Yuv422_888 => Some(16),
            PixelFormat::Rgba8888 => Some(32),
            PixelFormat::Other(_) => None,
        }
    }
}

/// Region of interest inside a frame, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRect {
    /// Left edge in pixels
    pub left: usize,
    /// Top edge in pixels
    pub top: usize,
    /// Right edge (exclusive)
    pub right: usize,
    /// Bottom edge (exclusive)
    pub bottom: usize,
}

impl CropRect {
    /// Create a crop rectangle from its edges
    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Crop covering a whole `width` x `height` frame
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// The same region in a 2x2 subsampled chroma plane
    pub fn halved(&self) -> Self {
        Self::new(self.left / 2, self.top / 2, self.right / 2, self.bottom / 2)
    }

    /// Whether both dimensions are even, as 4:2:0 subsampling expects
    pub fn is_even(&self) -> bool {
        self.width() % 2 == 0 && self.height() % 2 == 0
    }
}

/// One colour component of a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    row_stride: usize,
    pixel_stride: usize,
}

impl Plane {
    /// Wrap a plane buffer with its strides
    pub fn new(data: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// Raw plane bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes between the starts of consecutive rows
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Bytes between consecutive samples in a row
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Total bytes in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes that can still be read from `position`
    pub fn remaining(&self, position: usize) -> usize {
        self.data.len().saturating_sub(position)
    }

    /// Up to `len` bytes starting at `position`; shorter (possibly empty)
    /// when the buffer ends first
    pub fn read(&self, position: usize, len: usize) -> &[u8] {
        let start = position.min(self.data.len());
        let end = start + len.min(self.remaining(start));
        &self.data[start..end]
    }
}

type ReleaseHook = Box<dyn FnOnce() + Send + 'static>;

/// One captured camera frame.
///
/// The frame is owned by whoever holds it and is released when dropped,
/// which runs the release hook (if any) exactly once. Frames replaced in the
/// analysis mailbox or rejected by the reformatter are released the same way.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    crop: CropRect,
    planes: Vec<Plane>,
    timestamp_ns: u64,
    release: Option<ReleaseHook>,
}

impl FrameBuffer {
    /// Create a frame whose crop covers the whole image
    pub fn new(width: usize, height: usize, format: PixelFormat, planes: Vec<Plane>) -> Self {
        Self {
            width,
            height,
            format,
            crop: CropRect::full(width, height),
            planes,
            timestamp_ns: 0,
            release: None,
        }
    }

    /// Restrict the frame to a sub-region
    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = crop;
        self
    }

    /// Attach the capture timestamp
    pub fn with_timestamp(mut self, timestamp_ns: u64) -> Self {
        self.timestamp_ns = timestamp_ns;
        self
    }

    /// Run `hook` when the frame is released back to the camera
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.release = Some(Box::new(hook));
        self
    }

    /// Full image width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Full image height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel format reported by the camera
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Region of interest
    pub fn crop(&self) -> CropRect {
        self.crop
    }

    /// Planes in order (Y, U, V for 4:2:0)
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Capture timestamp in nanoseconds
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    /// Release the frame now
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        if let Some(hook) = self.release.take() {
            hook();
        }
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("crop", &self.crop)
            .field("planes", &self.planes.len())
            .field("timestamp_ns", &self.timestamp_ns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_crop_halved() {
        let crop = CropRect::new(2, 4, 10, 12);
        assert_eq!(crop.width(), 8);
        assert_eq!(crop.height(), 8);
        assert_eq!(crop.halved(), CropRect::new(1, 2, 5, 6));
        assert!(crop.is_even());
        assert!(!CropRect::full(5, 4).is_even());
    }

    #[test]
    fn test_plane_read_is_bounded() {
        let plane = Plane::new(vec![1, 2, 3, 4, 5], 4, 1);
        assert_eq!(plane.read(0, 4), &[1, 2, 3, 4]);
        assert_eq!(plane.read(4, 4), &[5]);
        assert!(plane.read(9, 4).is_empty());
        assert_eq!(plane.remaining(3), 2);
        assert_eq!(plane.remaining(8), 0);
    }

    #[test]
    fn test_android_format_codes() {
        assert_eq!(PixelFormat::from_android_code(35), PixelFormat::Yuv420_888);
        assert_eq!(PixelFormat::from_android_code(17), PixelFormat::Nv21);
        assert_eq!(PixelFormat::from_android_code(99), PixelFormat::Other(99));
        assert_eq!(PixelFormat::Yuv420_888.bits_per_pixel(), Some(12));
        assert_eq!(PixelFormat::Other(99).bits_per_pixel(), None);
    }

    #[test]
    fn test_release_runs_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&released);
        let frame = FrameBuffer::new(2, 2, PixelFormat::Yuv420_888, Vec::new())
            .on_release(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        assert_eq!(released.load(Ordering::SeqCst), 0);
        frame.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
