pub mod document;
pub mod page_extractor;

pub use document::PageDocument;
pub use page_extractor::{PageExtractor, PageFacts};
