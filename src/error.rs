// One crate-wide error type. Every variant states *where* things went wrong.
// Duplicate captures are deliberately NOT here: rejecting a color that is
// already in the history is a normal outcome, not a failure (see history.rs).
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),          // Creating the window failed
    WindowUpdate(String),        // Updating the window buffer failed
    CameraInit(String),          // Opening/starting the camera failed
    CameraFrame(String),         // Grabbing/decoding a frame failed
    Cancelled,                   // Camera start aborted by a cancel token
    InvalidGeometry,             // Display rect (or buffer) has a zero dimension
    BufferUnavailable,           // No readable frame yet, or read out of bounds
    InvalidChannelValue(String), // Malformed channel data (bad hex, bad blob)
    HistoryLoad(String),         // Durable store could not be read
    HistorySave(String),         // Durable store could not be written
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::CameraInit(s) => write!(f, "Camera init error: {s}"),
            Error::CameraFrame(s) => write!(f, "Camera frame error: {s}"),
            Error::Cancelled => write!(f, "Camera start cancelled"),
            Error::InvalidGeometry => write!(f, "Display rect has a zero dimension"),
            Error::BufferUnavailable => write!(f, "Frame buffer not readable yet"),
            Error::InvalidChannelValue(s) => write!(f, "Invalid channel value: {s}"),
            Error::HistoryLoad(s) => write!(f, "History load error: {s}"),
            Error::HistorySave(s) => write!(f, "History save error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
