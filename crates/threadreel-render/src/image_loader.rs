//! Image loading module.
//! Decodes PNG, JPEG, WebP, and other formats into FrameBuffers and fits
//! them to the output frame.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use threadreel_core::frame::{CoverCrop, FrameBuffer};
use threadreel_core::{ReelError, ReelResult};

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> ReelResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        ReelError::asset(
            format!("failed to load image '{}': {}", path.display(), e),
            path,
        )
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameBuffer::from_raw(width, height, rgba.into_raw())
        .ok_or_else(|| ReelError::asset("decoded image has inconsistent size", path))
}

fn to_image(fb: &FrameBuffer) -> Option<RgbaImage> {
    RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
}

fn from_image(img: RgbaImage) -> FrameBuffer {
    let (width, height) = img.dimensions();
    FrameBuffer {
        data: img.into_raw(),
        width,
        height,
    }
}

/// Scale `fb` so it covers `width`x`height` and centre-crop to exactly that
/// size. Aspect ratio is preserved; nothing is ever padded.
pub fn fit_to_frame(fb: &FrameBuffer, width: u32, height: u32) -> FrameBuffer {
    if fb.width == width && fb.height == height {
        return fb.clone();
    }
    let Some(img) = to_image(fb) else {
        return FrameBuffer::new(width, height);
    };

    let crop = CoverCrop::compute(fb.width, fb.height, width, height);
    let scaled = imageops::resize(&img, crop.scaled_width, crop.scaled_height, FilterType::Lanczos3);
    let cropped = imageops::crop_imm(&scaled, crop.x, crop.y, crop.width, crop.height).to_image();
    from_image(cropped)
}

/// Gaussian blur with the given sigma. A sigma of zero returns the input.
pub fn blur(fb: &FrameBuffer, sigma: f32) -> FrameBuffer {
    if sigma <= 0.0 {
        return fb.clone();
    }
    match to_image(fb) {
        Some(img) => from_image(imageops::blur(&img, sigma)),
        None => fb.clone(),
    }
}
