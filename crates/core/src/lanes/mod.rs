pub mod extractor;
pub mod geometry;
