pub mod episode;
pub mod link;
pub mod meta;
pub mod platform;
pub mod title;

pub use meta::{extract, VideoMeta, DEFAULT_TITLE};
pub use platform::PlatformDatabase;
