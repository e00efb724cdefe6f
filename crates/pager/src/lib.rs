//! Page extraction and navigation for the study surface.

pub mod store;

pub use store::{jump, navigate, Direction, PageContent, PageStore};
