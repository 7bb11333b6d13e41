/// A single RGBA8 video frame or overlay layer as a raw pixel buffer.
///
/// Pixels are stored row-major, straight (non-premultiplied) alpha,
/// 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        Self {
            data: vec![0u8; size],
            width,
            height,
        }
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &crate::Color) -> Self {
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap an existing RGBA8 byte buffer. Returns `None` if the length does
    /// not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        (data.len() == expected).then_some(Self {
            data,
            width,
            height,
        })
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_PIXEL
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ])
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let o = self.offset(x, y);
        self.data[o..o + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Blend a single straight-alpha pixel over the existing one.
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let o = self.offset(x, y);
        blend_over(&rgba, &mut self.data[o..o + BYTES_PER_PIXEL]);
    }

    /// Fill a rectangle with rounded corners, blending over existing content.
    /// Coordinates are clipped to the buffer.
    pub fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: &crate::Color,
    ) {
        let rgba = color.to_rgba8();
        let r = radius.min(width / 2).min(height / 2) as i32;
        let (w, h) = (width as i32, height as i32);

        for ry in 0..h {
            let py = y + ry;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for rx in 0..w {
                let px = x + rx;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }
                // Distance from the nearest corner centre, only inside corner squares.
                let cx = if rx < r { r - rx } else if rx >= w - r { rx - (w - r - 1) } else { 0 };
                let cy = if ry < r { r - ry } else if ry >= h - r { ry - (h - r - 1) } else { 0 };
                if cx > 0 && cy > 0 && cx * cx + cy * cy > r * r {
                    continue;
                }
                self.blend_pixel(px as u32, py as u32, rgba);
            }
        }
    }

    /// Alpha-composite `src` on top of `self` at position (dx, dy).
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        let dst_width = self.width as i32;
        let dst_height = self.height as i32;

        let mut start_y = 0;
        let mut end_y = src.height as i32;
        let mut start_x = 0;
        let mut end_x = src.width as i32;

        if dy < 0 {
            start_y = -dy;
        }
        if dy + end_y > dst_height {
            end_y = dst_height - dy;
        }
        if dx < 0 {
            start_x = -dx;
        }
        if dx + end_x > dst_width {
            end_x = dst_width - dx;
        }

        if start_x >= end_x || start_y >= end_y {
            return;
        }

        let src_stride = src.width as usize * BYTES_PER_PIXEL;
        let dst_stride = self.width as usize * BYTES_PER_PIXEL;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * BYTES_PER_PIXEL);
            let dst_row_start =
                (dst_y as usize * dst_stride) + ((dx + start_x) as usize * BYTES_PER_PIXEL);
            let len = (end_x - start_x) as usize * BYTES_PER_PIXEL;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice
                .chunks_exact(BYTES_PER_PIXEL)
                .zip(dst_slice.chunks_exact_mut(BYTES_PER_PIXEL))
            {
                blend_over(s, d);
            }
        }
    }
}

/// Scale-then-centre-crop geometry that makes a source fill a target frame
/// exactly, preserving aspect ratio and never padding.
///
/// A source wider than the target loses equal strips left and right; a
/// narrower one loses equal strips top and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverCrop {
    /// Source size after uniform scaling.
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Top-left corner of the crop window inside the scaled source.
    pub x: u32,
    pub y: u32,
    /// Target size.
    pub width: u32,
    pub height: u32,
}

impl CoverCrop {
    pub fn compute(src_width: u32, src_height: u32, width: u32, height: u32) -> Self {
        let src_w = src_width.max(1) as f64;
        let src_h = src_height.max(1) as f64;
        let scale = (width as f64 / src_w).max(height as f64 / src_h);
        let scaled_width = ((src_w * scale).round() as u32).max(width);
        let scaled_height = ((src_h * scale).round() as u32).max(height);
        Self {
            scaled_width,
            scaled_height,
            x: (scaled_width - width) / 2,
            y: (scaled_height - height) / 2,
            width,
            height,
        }
    }
}

/// Source-over blend of one straight-alpha pixel into another.
fn blend_over(s: &[u8], d: &mut [u8]) {
    let sa = s[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        d.copy_from_slice(&s[..4]);
        return;
    }

    let da = d[3] as u32;
    let inv_sa = 255 - sa;
    let out_a = sa + ((da * inv_sa) / 255);
    if out_a == 0 {
        return;
    }

    for c in 0..3 {
        let v = (s[c] as u32 * sa * 255 + d[c] as u32 * da * inv_sa) / (out_a * 255);
        d[c] = v.min(255) as u8;
    }
    d[3] = out_a as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_frame_buffer_new() {
        let fb = FrameBuffer::new(1080, 1920);
        assert_eq!(fb.width, 1080);
        assert_eq!(fb.height, 1920);
        assert_eq!(fb.byte_size(), 1080 * 1920 * 4);
        assert_eq!(fb.get_pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_frame_buffer_out_of_bounds() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.set_pixel(10, 0, [1, 2, 3, 4]);
        assert_eq!(fb.get_pixel(10, 0), None);
        assert_eq!(fb.get_pixel(0, 10), None);
    }

    #[test]
    fn test_composite_over_opaque() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::BLACK);
        let src = FrameBuffer::solid(2, 2, &Color::WHITE);
        dst.composite_over(&src, 1, 1);
        assert_eq!(dst.get_pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(dst.get_pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(dst.get_pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_composite_over_transparent_leaves_destination() {
        let mut dst = FrameBuffer::solid(4, 4, &Color::WHITE);
        let src = FrameBuffer::new(4, 4);
        dst.composite_over(&src, 0, 0);
        assert_eq!(dst, FrameBuffer::solid(4, 4, &Color::WHITE));
    }

    #[test]
    fn test_composite_over_semi_transparent() {
        let mut dst = FrameBuffer::solid(2, 2, &Color::WHITE);
        let mut src = FrameBuffer::new(1, 1);
        src.set_pixel(0, 0, [0, 0, 0, 128]);
        dst.composite_over(&src, 0, 0);

        let pixel = dst.get_pixel(0, 0).unwrap();
        assert!(pixel[0] > 100 && pixel[0] < 160);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_composite_over_clips_negative_offset() {
        let mut dst = FrameBuffer::solid(3, 3, &Color::BLACK);
        let src = FrameBuffer::solid(3, 3, &Color::WHITE);
        dst.composite_over(&src, -2, -2);
        assert_eq!(dst.get_pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(dst.get_pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_fill_rounded_rect_skips_corners() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.fill_rounded_rect(0, 0, 20, 20, 8, &Color::WHITE);
        assert_eq!(fb.get_pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(fb.get_pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(fb.get_pixel(10, 0), Some([255, 255, 255, 255]));
        assert_eq!(fb.get_pixel(19, 19), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_cover_crop_wide_source_crops_sides() {
        let crop = CoverCrop::compute(1920, 1080, 1080, 1920);
        assert_eq!(crop.scaled_height, 1920);
        assert_eq!(crop.scaled_width, 3413);
        assert_eq!(crop.y, 0);
        assert_eq!(crop.x, (3413 - 1080) / 2);
    }

    #[test]
    fn test_cover_crop_tall_source_crops_top_and_bottom() {
        let crop = CoverCrop::compute(1000, 4000, 1080, 1920);
        assert_eq!(crop.scaled_width, 1080);
        assert_eq!(crop.scaled_height, 4320);
        assert_eq!(crop.x, 0);
        assert_eq!(crop.y, (4320 - 1920) / 2);
    }

    #[test]
    fn test_cover_crop_same_aspect_is_pure_scale() {
        let crop = CoverCrop::compute(540, 960, 1080, 1920);
        assert_eq!((crop.scaled_width, crop.scaled_height), (1080, 1920));
        assert_eq!((crop.x, crop.y), (0, 0));
    }
}
