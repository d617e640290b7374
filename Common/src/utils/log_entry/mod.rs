pub mod gstreamer;
pub mod io;
pub mod system;
pub mod video;
