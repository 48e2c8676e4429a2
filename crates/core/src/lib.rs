pub mod shared;
pub mod tracking;
pub mod video;
