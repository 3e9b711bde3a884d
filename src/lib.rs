// src/lib.rs
//! Convert raw floppy sector dumps into ImageDisk containers.
//!
//! A [`geometry::Geometry`] is resolved once from presets, a probed
//! descriptor and explicit values; [`materialize::convert`] then checks the
//! source size and streams one [`track::TrackRecord`] per cylinder and head
//! into a [`materialize::TrackSink`] such as [`formats::imd::ImdWriter`].

pub mod capacity;
pub mod core;
pub mod descriptor;
pub mod disk_formats;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod materialize;
pub mod mode;
pub mod side;
pub mod skew;
pub mod track;

pub use error::{ConvertError, Result};

#[cfg(test)]
mod tests;
