pub mod constants;
pub mod debug_level;
pub mod stream_info;
