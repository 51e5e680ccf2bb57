use crate::bitmap::{Bitmap, ImageSize};
use anyhow::{Context, Result};
use log::debug;
use png::{BitDepth, ColorType, Encoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn bitmap_to_png(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(bitmap, &mut buf)?;
    Ok(buf)
}

/// Writes the bitmap to `path` as an 8-bit RGB PNG, creating or truncating the
/// file. The file is truncated before encoding starts, so a failed encode can
/// leave a truncated file behind. Concurrent writes to the same path are
/// resolved by the filesystem (last writer wins).
pub fn save_png_to_file<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<()> {
    let path = path.as_ref();
    debug!(
        "Writing a {}x{} PNG to {}",
        bitmap.width(),
        bitmap.height(),
        path.display()
    );
    let file = File::create(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_png(bitmap, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Saves a plane-separated render buffer (see [`Bitmap::from_planes`] for the
/// exact layout) to `path` as a PNG.
pub fn save_render<P: AsRef<Path>>(path: P, planes: &[u8], size: ImageSize) -> Result<()> {
    let bitmap = Bitmap::from_planes(planes, size)?;
    save_png_to_file(&bitmap, path)
}

fn write_png<W: Write>(bitmap: &Bitmap, out: W) -> Result<()> {
    let mut png_encoder = Encoder::new(out, bitmap.width() as u32, bitmap.height() as u32);
    png_encoder.set_color(ColorType::Rgb);
    png_encoder.set_depth(BitDepth::Eight);
    let mut png_writer = png_encoder.write_header().context("Failed to write PNG header")?;

    let mut image_bytes = Vec::with_capacity(3 * bitmap.pixels().len());
    for pixel in bitmap.pixels() {
        image_bytes.extend([pixel.r, pixel.g, pixel.b].iter());
    }

    png_writer
        .write_image_data(image_bytes.as_slice())
        .context("Failed to write PNG data")?;
    png_writer.finish().context("Failed to finish the PNG stream")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Pixel;

    fn decode(data: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(data);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_bitmap_to_png_attributes() {
        let mut bitmap = Bitmap::new(ImageSize::new(3, 2)).unwrap();
        bitmap.set_pixel(2, 1, Pixel { r: 255, g: 128, b: 7 });
        let (info, bytes) = decode(&bitmap_to_png(&bitmap).unwrap());

        assert_eq!(info.width, 3);
        assert_eq!(info.height, 2);
        assert_eq!(info.color_type, ColorType::Rgb);
        assert_eq!(info.bit_depth, BitDepth::Eight);
        assert_eq!(bytes.len(), 3 * 3 * 2);
        assert_eq!(&bytes[bytes.len() - 3..], &[255, 128, 7]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let planes: Vec<u8> = (0..3 * 4 * 4).map(|v| (v * 17) as u8).collect();
        let bitmap = Bitmap::from_planes(&planes, ImageSize::new(4, 4)).unwrap();
        assert_eq!(bitmap_to_png(&bitmap).unwrap(), bitmap_to_png(&bitmap).unwrap());
    }
}
