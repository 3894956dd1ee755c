// Opens the camera and turns its frames into RGBA `FrameBuffer`s for the
// sampler. The device negotiation can take a while on some backends, so the
// open path checks a cancel token between steps; a user closing the window
// during startup aborts cleanly instead of racing teardown.

use crate::error::Error;
use crate::session::CancelToken;
use crate::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start
    /// streaming. The device may pick a close-but-different format; the
    /// actual resolution is what `resolution()` reports afterwards.
    pub fn open(index: u32, width: u32, height: u32, token: &CancelToken) -> Result<Self, Error> {
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        // Creation alone can block for a while; re-check before streaming.
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        log::info!(
            "camera {index} streaming at {}x{} (requested {width}x{height})",
            actual.width(),
            actual.height()
        );

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab and decode one frame. Blocks until the camera has one ready.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let mut rgba = Vec::with_capacity((w as usize) * (h as usize) * 4);
        for px in rgb_img.as_raw().chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }

        Ok(FrameBuffer::new(w, h, rgba))
    }

    /// The resolution the camera is actually delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Release the capture device. Safe to call on the way out even if a
    /// frame grab just failed.
    pub fn stop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            log::warn!("stopping camera stream: {e}");
        }
    }
}
