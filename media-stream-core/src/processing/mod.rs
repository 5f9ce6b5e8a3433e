pub mod frame_buffer;
pub mod jpeg;
pub mod pcm;
