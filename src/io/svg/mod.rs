//! SVG format writing operations.

mod document;
mod proj;
mod writer;

pub(crate) use document::*;
pub(crate) use proj::*;
pub(crate) use writer::*;
