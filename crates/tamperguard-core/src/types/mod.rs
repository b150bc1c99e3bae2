mod check;
mod image;
mod reference;
mod report;

pub use check::*;
pub use image::*;
pub use reference::*;
pub use report::*;
