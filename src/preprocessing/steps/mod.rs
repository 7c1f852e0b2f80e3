//! Individual page filters

pub mod crop;
pub mod deskew;
pub mod lines;
pub mod resize;
pub mod threshold;
