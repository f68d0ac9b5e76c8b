pub mod header;
pub mod title;

pub use title::{compose, TitleParts};
