/// Bits per pixel of the NV21 layout (8 luma + 4 chroma)
pub const NV21_BITS_PER_PIXEL: usize = 12;

/// An NV21 image: full-resolution luma followed by interleaved V/U chroma
/// at half resolution in both dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nv21Image {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Nv21Image {
    /// Size in bytes of a `width` x `height` NV21 buffer
    pub fn byte_len(width: usize, height: usize) -> usize {
        width * height * NV21_BITS_PER_PIXEL / 8
    }

    /// Allocate an all-zero image
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; Self::byte_len(width, height)],
        }
    }

    /// Wrap an existing buffer, `None` when its length does not match
    pub fn from_bytes(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == Self::byte_len(width, height)).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of luma samples
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Whole buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return its buffer
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Luma plane, one byte per pixel
    pub fn luma(&self) -> &[u8] {
        &self.data[..self.pixel_count()]
    }

    /// Interleaved V/U region
    pub fn chroma(&self) -> &[u8] {
        &self.data[self.pixel_count()..]
    }

    /// `(v, u)` for the chroma sample covering pixel block (`cx`, `cy`)
    pub fn chroma_at(&self, cx: usize, cy: usize) -> (u8, u8) {
        let idx = self.pixel_count() + cy * self.width + cx * 2;
        (self.data[idx], self.data[idx + 1])
    }

    /// Whether every byte is zero (e.g. a degraded conversion)
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}
