//! Shared utilities.

pub mod hash;
pub mod html;
pub mod mime;
pub mod path;
