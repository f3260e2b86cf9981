pub mod compositor;
pub mod frame;
pub mod output;
pub mod pipeline;
pub mod video_decoder;
