#![forbid(unsafe_code)]

pub mod chapter_label;
pub mod checkpoint;
pub mod error;
pub mod mode;
pub mod model;
pub mod progress;
pub mod time;

pub use error::Error;
pub use time::Clock;
