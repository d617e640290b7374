use glib::error::Error as GError;
use gstreamer::{FlowError, StateChangeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GStreamerEntry {
    #[error("GStreamer initialization failed: {0}")]
    InitializeError(GError),
    #[error("Failed to create GStreamer pipeline: {0}")]
    CreatePipelineError(GError),
    #[error("Failed to get GStreamer bus")]
    GetBusError,
    #[error("Failed to get pipeline element {0}")]
    GetElementError(&'static str),
    #[error("Failed to set pipeline status: {0}")]
    PipelineSetStateError(StateChangeError),
    #[error("Failed to push frame {0} into pipeline: {1}")]
    PushBufferError(u64, FlowError),
    #[error("Failed to signal end of stream: {0}")]
    EndOfStreamError(FlowError),
    #[error("GStreamer internal error from {0}: {1}")]
    InternalError(String, GError),
}

impl From<GStreamerEntry> for String {
    #[inline(always)]
    fn from(value: GStreamerEntry) -> Self {
        value.to_string()
    }
}
