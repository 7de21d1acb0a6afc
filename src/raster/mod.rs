pub mod canvas;
pub mod decode;
pub mod encode;

pub use canvas::Canvas;
pub use decode::{SourceFormat, decode};
pub use encode::{OutputFormat, encode};
