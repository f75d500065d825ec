//! Content extraction: PDF text layers and handwriting images.

pub mod image;
pub mod pdf;

pub use self::image::{ImageError, decode_data_uri, prepare_handwriting_image, to_jpeg};
pub use self::pdf::{extract_pdf_text, extract_pdf_text_blocking};
