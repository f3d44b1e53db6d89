//! I/O module: the gzip-aware line source

mod line_reader;

pub use line_reader::LineReader;
pub(crate) use line_reader::is_gzip_path;
