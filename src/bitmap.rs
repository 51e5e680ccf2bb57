use anyhow::{bail, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub fn new(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// An owned, contiguous, row-major buffer of interleaved RGB pixels.
pub struct Bitmap {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl Bitmap {
    pub fn new(size: ImageSize) -> Result<Bitmap> {
        ensure_non_empty(size)?;
        Ok(Bitmap {
            pixels: vec![Pixel { r: 0, g: 0, b: 0 }; size.pixel_count()],
            width: size.width,
            height: size.height,
        })
    }

    /// Builds a bitmap from a plane-separated buffer: all red values, then all
    /// green values, then all blue values, each plane stored column-major
    /// (`index = column * height + row`). The buffer must hold exactly
    /// `3 * width * height` bytes.
    pub fn from_planes(planes: &[u8], size: ImageSize) -> Result<Bitmap> {
        let plane_len = size.pixel_count();
        if planes.len() != 3 * plane_len {
            bail!(
                "Plane buffer has {} bytes, expected {} for a {}x{} image",
                planes.len(),
                3 * plane_len,
                size.width,
                size.height
            );
        }

        let mut bitmap = Bitmap::new(size)?;
        for row in 0..size.height {
            for column in 0..size.width {
                let idx = column * size.height + row;
                let pixel = Pixel {
                    r: planes[idx],
                    g: planes[idx + plane_len],
                    b: planes[idx + 2 * plane_len],
                };
                bitmap.set_pixel(column, row, pixel);
            }
        }
        Ok(bitmap)
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> &Pixel {
        &self.pixels[self.coords_to_idx(x, y)]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) {
        let idx = self.coords_to_idx(x, y);
        self.pixels[idx] = pixel;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    fn coords_to_idx(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "Pixel ({}, {}) is outside a {}x{} bitmap",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }
}

fn ensure_non_empty(size: ImageSize) -> Result<()> {
    if size.width == 0 || size.height == 0 {
        bail!("Image dimensions must be positive, got {}x{}", size.width, size.height);
    }
    Ok(())
}
