//! Camera access through `getUserMedia`

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack, MediaStreamTrackState,
};

use crate::config::CameraConfig;
use crate::error::AcquisitionError;
use crate::session::CameraStream;

/// A `MediaStream` owned by the session, shown on `video`
pub struct BrowserStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl BrowserStream {
    /// Handle for `video.srcObject`; the session keeps ownership
    pub fn media_stream(&self) -> MediaStream {
        self.stream.clone()
    }

    /// Clear `video.srcObject` if it still shows this stream
    fn detach(&self) {
        let ours: &JsValue = self.stream.as_ref();
        let showing = self
            .video
            .src_object()
            .is_some_and(|current| JsValue::from(current) == *ours);
        if showing {
            self.video.set_src_object(None);
        }
    }

    fn tracks(&self) -> Vec<MediaStreamTrack> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
            .collect()
    }
}

impl CameraStream for BrowserStream {
    fn stop_tracks(&mut self) {
        for track in self.tracks() {
            track.stop();
        }
        self.detach();
    }

    fn live_tracks(&self) -> usize {
        self.tracks()
            .iter()
            .filter(|track| track.ready_state() == MediaStreamTrackState::Live)
            .count()
    }
}

fn video_constraints(config: &CameraConfig) -> Result<JsValue, AcquisitionError> {
    let json = serde_json::json!({
        "width": { "ideal": config.ideal_width },
        "height": { "ideal": config.ideal_height },
        "frameRate": { "max": config.max_frame_rate },
        "facingMode": config.facing_mode,
    });
    js_sys::JSON::parse(&json.to_string())
        .map_err(|_| AcquisitionError::DeviceUnavailable("invalid camera constraints".into()))
}

fn classify(err: JsValue) -> AcquisitionError {
    match err.dyn_into::<web_sys::DomException>() {
        Ok(dom) => AcquisitionError::from_dom_exception(&dom.name(), &dom.message()),
        Err(other) => AcquisitionError::DeviceUnavailable(
            other.as_string().unwrap_or_else(|| "getUserMedia failed".into()),
        ),
    }
}

/// Ask for the camera (video only) on behalf of `video`; the caller sets
/// `srcObject` once the pipeline is accepted
pub async fn open_camera(
    config: &CameraConfig,
    video: &HtmlVideoElement,
) -> Result<BrowserStream, AcquisitionError> {
    let window = web_sys::window()
        .ok_or_else(|| AcquisitionError::DeviceUnavailable("no window".into()))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| AcquisitionError::DeviceUnavailable("mediaDevices not available".into()))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints(config)?);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(classify)?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(classify)?
        .dyn_into::<MediaStream>()
        .map_err(|_| AcquisitionError::DeviceUnavailable("not a MediaStream".into()))?;

    log::info!("camera opened ({} track(s))", stream.get_tracks().length());
    Ok(BrowserStream { stream, video: video.clone() })
}
