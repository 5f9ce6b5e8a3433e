pub mod playback;
pub mod session;
