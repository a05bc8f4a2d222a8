//! Rendering of ordered page regions to hOCR markup.

mod hocr;
pub mod markup;

pub use hocr::{serialize_page, HocrRenderer, OCR_CAPABILITIES, OCR_SYSTEM, XHTML_NAMESPACE};
pub use markup::{Element, Node};
