pub mod bitmap;
pub mod png_writer;
