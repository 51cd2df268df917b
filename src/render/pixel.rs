use std::path::Path;

use kurbo::Rect;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{ScenetteError, ScenetteResult};
use crate::graphics::brush::Brush;
use crate::render::surface::Surface;

/// CPU raster surface: tightly packed premultiplied RGBA8, row-major.
///
/// Always available; used for offscreen mask/back surfaces and as the default
/// target in tests and demos. Hosts with a platform context implement
/// [`Surface`] themselves.
pub struct PixelSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    scale: f64,
    saved: Vec<f64>,
}

impl PixelSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            scale: 1.0,
            saved: Vec::new(),
        }
    }

    /// Resize, clearing all pixels and resetting the state stack.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data = vec![0; (width as usize) * (height as usize) * 4];
        self.scale = 1.0;
        self.saved.clear();
    }

    /// Overwrite every pixel with `color`, ignoring the current scale.
    pub fn clear(&mut self, color: Rgba8Premul) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = color.a;
        }
    }

    /// Read one pixel. Out-of-bounds reads return transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        if x >= self.width || y >= self.height {
            return Rgba8Premul::transparent();
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    /// The raw premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encode the surface as PNG.
    ///
    /// Pixel values are written as-is (premultiplied); callers that need
    /// straight alpha unpremultiply first.
    pub fn write_png(&self, path: impl AsRef<Path>) -> ScenetteResult<()> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ScenetteError::render("pixel buffer size mismatch"))?;
        img.save(path.as_ref())
            .map_err(|e| ScenetteError::render(format!("png encode failed: {e}")))
    }
}

impl Surface for PixelSurface {
    fn save(&mut self) {
        self.saved.push(self.scale);
    }

    fn restore(&mut self) {
        if let Some(scale) = self.saved.pop() {
            self.scale = scale;
        }
    }

    fn scale(&mut self, factor: f64) {
        self.scale *= factor;
    }

    fn fill_rect(&mut self, rect: Rect, brush: &Brush) {
        let c = brush.color();
        if c.a == 0 {
            return;
        }
        let src = [c.r, c.g, c.b, c.a];

        // user space -> device space
        let x0 = (rect.min_x() * self.scale).floor().max(0.0) as u32;
        let y0 = (rect.min_y() * self.scale).floor().max(0.0) as u32;
        let x1 = ((rect.max_x() * self.scale).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((rect.max_y() * self.scale).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            let row = (y as usize) * (self.width as usize) * 4;
            for x in x0..x1 {
                let i = row + (x as usize) * 4;
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                let out = over(dst, src);
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Source-over for premultiplied RGBA8.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixel.rs"]
mod tests;
