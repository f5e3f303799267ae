pub mod error;
pub mod lanes;
pub mod playback;
pub mod shared;
pub mod video;
