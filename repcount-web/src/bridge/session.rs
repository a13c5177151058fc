//! `WorkoutSession` - the object the page drives
//!
//! Runs the animation-frame loop, performs the async work the controller
//! asks for (camera, model, estimation) and relays reps to JS callbacks.
//! JS callbacks are only invoked after every internal borrow is released,
//! so they may call back into the session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlVideoElement;

use super::camera::{open_camera, BrowserStream};
use super::estimator::Estimator;
use crate::config::{CameraConfig, SessionConfig};
use crate::detectors::ExerciseKind;
use crate::error::{AcquisitionError, Error, SinkError};
use crate::pose::Pose;
use crate::renderer::{build_vertices, overlay_text, GpuOverlay};
use crate::session::{
    AcquireTicket, CameraStream, FrameOutcome, FrameTicket, Pipeline, ProgressLog,
    ProgressRecord, ProgressSink, SessionController, SessionStatus,
};

// ============================================================================
// DEFERRED OUTPUT
// ============================================================================

/// Collects what the controller emits during a frame
#[derive(Default)]
struct Outbox {
    log: ProgressLog,
    records: Vec<ProgressRecord>,
    reps: Vec<(String, u32)>,
}

impl ProgressSink for Outbox {
    fn submit(&mut self, record: ProgressRecord) -> Result<(), SinkError> {
        self.log.record(record.clone());
        self.records.push(record);
        Ok(())
    }
}

#[derive(Default, Clone)]
struct Callbacks {
    progress: Option<Function>,
    rep: Option<Function>,
}

// ============================================================================
// SHARED STATE
// ============================================================================

struct Driver {
    controller: SessionController,
    video: HtmlVideoElement,
    factory: Function,
    /// Set while the controller holds a pipeline
    estimator: Option<Estimator>,
    overlay: Option<GpuOverlay>,
    last_pose: Option<Pose>,
}

struct Shared {
    driver: RefCell<Driver>,
    outbox: Rc<RefCell<Outbox>>,
    callbacks: RefCell<Callbacks>,
    running: Cell<bool>,
    frame_id: Cell<Option<i32>>,
    frame_closure: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

impl Shared {
    /// One animation frame
    fn tick(self: &Rc<Self>) {
        self.frame_id.set(None);
        if !self.running.get() {
            return;
        }
        let now = now_ms();

        let (acquire, estimate) = {
            let mut driver = self.driver.borrow_mut();
            if !driver.controller.has_pipeline() {
                driver.estimator = None;
            }

            let acquire = driver.controller.poll_acquisition(now);

            let video_ready = driver.video.ready_state() >= 2;
            let estimate = match driver.estimator.clone() {
                Some(estimator) if video_ready && !estimator.is_disposed() => driver
                    .controller
                    .begin_frame(now)
                    .map(|ticket| (ticket, estimator)),
                _ => None,
            };

            driver.draw_overlay();
            (acquire, estimate)
        };

        if let Some(ticket) = acquire {
            spawn_local(Rc::clone(self).acquire(ticket));
        }
        if let Some((ticket, estimator)) = estimate {
            spawn_local(Rc::clone(self).estimate(ticket, estimator));
        }

        if let Err(err) = self.request_frame() {
            log::error!("requestAnimationFrame failed: {err:?}");
        }
    }

    async fn acquire(self: Rc<Self>, ticket: AcquireTicket) {
        let (camera_config, factory, video) = {
            let driver = self.driver.borrow();
            (
                driver.controller.config().camera.clone(),
                driver.factory.clone(),
                driver.video.clone(),
            )
        };

        let result = open_pipeline(&camera_config, &factory, &video).await;

        let mut driver = self.driver.borrow_mut();
        match result {
            Ok((camera, estimator)) => {
                let stream = camera.media_stream();
                let pipeline = Pipeline::new(Box::new(camera), Box::new(estimator.clone()));
                if driver.controller.acquisition_succeeded(ticket, pipeline) {
                    driver.video.set_src_object(Some(&stream));
                    if let Err(err) = driver.video.play() {
                        log::warn!("video.play() failed: {err:?}");
                    }
                    driver.estimator = Some(estimator);
                }
            }
            Err(err) => driver.controller.acquisition_failed(ticket, err, now_ms()),
        }
    }

    async fn estimate(self: Rc<Self>, ticket: FrameTicket, estimator: Estimator) {
        let video = self.driver.borrow().video.clone();
        let result = estimator.estimate(&video).await;

        {
            let mut driver = self.driver.borrow_mut();
            match result {
                Ok(poses) => match driver.controller.complete_frame(ticket, poses) {
                    FrameOutcome::Tracked { pose, .. } => driver.last_pose = Some(pose),
                    FrameOutcome::TrackingLost { .. } | FrameOutcome::Reinitializing => {
                        driver.last_pose = None
                    }
                    FrameOutcome::Stale => {}
                },
                Err(err) => driver.controller.frame_failed(ticket, err, now_ms()),
            }
            if !driver.controller.has_pipeline() {
                driver.estimator = None;
            }
        }

        self.flush();
    }

    /// Deliver queued reps and progress records to JS
    fn flush(&self) {
        let (records, reps) = {
            let mut outbox = self.outbox.borrow_mut();
            (
                std::mem::take(&mut outbox.records),
                std::mem::take(&mut outbox.reps),
            )
        };
        if records.is_empty() && reps.is_empty() {
            return;
        }
        let callbacks = self.callbacks.borrow().clone();

        if let Some(on_rep) = &callbacks.rep {
            for (name, count) in &reps {
                let args = (JsValue::from_str(name), JsValue::from(*count));
                if let Err(err) = on_rep.call2(&JsValue::NULL, &args.0, &args.1) {
                    log::warn!("rep callback threw: {err:?}");
                }
            }
        }

        if let Some(on_progress) = &callbacks.progress {
            for record in records {
                submit_progress(on_progress, &record);
            }
        }
    }

    fn request_frame(&self) -> Result<(), JsValue> {
        if !self.running.get() || self.frame_id.get().is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = self.frame_closure.borrow();
        if let Some(closure) = closure.as_ref() {
            let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
            self.frame_id.set(Some(id));
        }
        Ok(())
    }

    fn cancel_frame(&self) {
        if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
    }
}

/// Camera first, then the model; a model failure releases the camera
async fn open_pipeline(
    camera_config: &CameraConfig,
    factory: &Function,
    video: &HtmlVideoElement,
) -> Result<(BrowserStream, Estimator), AcquisitionError> {
    let mut camera = open_camera(camera_config, video).await?;
    match Estimator::create(factory).await {
        Ok(estimator) => Ok((camera, estimator)),
        Err(err) => {
            camera.stop_tracks();
            Err(err)
        }
    }
}

/// Fire-and-forget: a rejected promise is logged, never retried
fn submit_progress(callback: &Function, record: &ProgressRecord) {
    let payload = match record.to_json().map(|json| js_sys::JSON::parse(&json)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            log::warn!("progress record not convertible: {err:?}");
            return;
        }
        Err(err) => {
            log::warn!("{err}");
            return;
        }
    };

    match callback.call1(&JsValue::NULL, &payload) {
        Ok(returned) if returned.is_instance_of::<Promise>() => {
            let promise = Promise::from(returned);
            spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    log::warn!("progress sink rejected: {err:?}");
                }
            });
        }
        Ok(_) => {}
        Err(err) => log::warn!("progress callback threw: {err:?}"),
    }
}

impl Driver {
    fn draw_overlay(&self) {
        let Some(gpu) = self.overlay.as_ref() else {
            return;
        };
        let size = (self.video.video_width() as f32, self.video.video_height() as f32);
        let vertices = match &self.last_pose {
            Some(pose) => build_vertices(
                pose,
                &self.controller.state(),
                size,
                &self.controller.config().overlay,
            ),
            None => Vec::new(),
        };
        gpu.draw(&vertices);
    }
}

// ============================================================================
// JS API
// ============================================================================

#[wasm_bindgen]
pub struct WorkoutSession {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WorkoutSession {
    /// `config_json` may be omitted for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(
        video: HtmlVideoElement,
        exercise: &str,
        estimator_factory: Function,
        config_json: Option<String>,
    ) -> Result<WorkoutSession, JsValue> {
        let config = match config_json {
            Some(json) => SessionConfig::from_json(&json).map_err(Error::from)?,
            None => SessionConfig::default(),
        };
        let kind: ExerciseKind = exercise.parse()?;

        let outbox = Rc::new(RefCell::new(Outbox::default()));
        let mut controller = SessionController::new(config, kind, Box::new(Rc::clone(&outbox)));
        let rep_outbox = Rc::clone(&outbox);
        controller.set_rep_callback(Box::new(move |name, reps| {
            rep_outbox.borrow_mut().reps.push((name.to_string(), reps));
        }));

        let shared = Rc::new(Shared {
            driver: RefCell::new(Driver {
                controller,
                video,
                factory: estimator_factory,
                estimator: None,
                overlay: None,
                last_pose: None,
            }),
            outbox,
            callbacks: RefCell::new(Callbacks::default()),
            running: Cell::new(false),
            frame_id: Cell::new(None),
            frame_closure: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let closure = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.tick();
            }
        });
        *shared.frame_closure.borrow_mut() = Some(closure);

        log::info!("workout session created for {kind}");
        Ok(WorkoutSession { shared })
    }

    /// Draw the skeleton with WebGPU on the configured canvas
    ///
    /// Returns a promise; until it resolves only the text readout is live.
    #[wasm_bindgen(js_name = initOverlay)]
    pub fn init_overlay(&self) -> Promise {
        let shared = Rc::clone(&self.shared);
        wasm_bindgen_futures::future_to_promise(async move {
            let (canvas_id, width, height) = {
                let driver = shared.driver.borrow();
                let config = driver.controller.config();
                let (video_w, video_h) = (driver.video.video_width(), driver.video.video_height());
                // Video size is unknown before the first frame arrives
                let (width, height) = if video_w == 0 || video_h == 0 {
                    (config.camera.ideal_width, config.camera.ideal_height)
                } else {
                    (video_w, video_h)
                };
                (config.overlay.canvas_id.clone(), width, height)
            };

            let gpu = GpuOverlay::new(&canvas_id, width, height)
                .await
                .map_err(Error::from)?;
            shared.driver.borrow_mut().overlay = Some(gpu);
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Match the overlay canvas to the video once its size is known
    #[wasm_bindgen(js_name = resizeOverlay)]
    pub fn resize_overlay(&self, width: u32, height: u32) {
        if let Some(gpu) = self.shared.driver.borrow_mut().overlay.as_mut() {
            gpu.resize(width, height);
        }
    }

    /// `(record) => void | Promise`; record is `{exerciseType, reps, confidence, timestamp}`
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().progress = Some(callback);
    }

    /// `(exerciseName, cumulativeReps) => void`
    #[wasm_bindgen(js_name = setRepCallback)]
    pub fn set_rep_callback(&self, callback: Function) {
        self.shared.callbacks.borrow_mut().rep = Some(callback);
    }

    /// Activate (or retry after failure) and start the frame loop
    pub fn start(&self) -> Result<(), JsValue> {
        self.shared.driver.borrow_mut().controller.activate();
        self.shared.running.set(true);
        self.shared.request_frame()
    }

    /// Stop the loop and release camera and model. Safe to call repeatedly.
    ///
    /// Releasing the camera also clears `video.srcObject`.
    pub fn stop(&self) {
        self.shared.running.set(false);
        self.shared.cancel_frame();
        let mut driver = self.shared.driver.borrow_mut();
        driver.controller.deactivate();
        driver.estimator = None;
        driver.last_pose = None;
        if let Some(gpu) = driver.overlay.as_ref() {
            gpu.draw(&[]);
        }
    }

    #[wasm_bindgen(js_name = selectExercise)]
    pub fn select_exercise(&self, exercise: &str) -> Result<(), JsValue> {
        let kind: ExerciseKind = exercise.parse()?;
        let mut driver = self.shared.driver.borrow_mut();
        if driver.controller.select_exercise(kind) {
            driver.estimator = None;
            driver.last_pose = None;
        }
        Ok(())
    }

    pub fn exercise(&self) -> String {
        self.shared.driver.borrow().controller.exercise().id().to_string()
    }

    #[wasm_bindgen(js_name = repCount)]
    pub fn rep_count(&self) -> u32 {
        self.shared.driver.borrow().controller.state().rep_count
    }

    pub fn phase(&self) -> String {
        self.shared.driver.borrow().controller.state().phase.to_string()
    }

    /// "idle", "starting", "retrying", "running" or "failed"
    pub fn status(&self) -> String {
        self.shared.driver.borrow().controller.status().label().to_string()
    }

    /// Why the session failed, once retries are exhausted
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        match self.shared.driver.borrow().controller.status() {
            SessionStatus::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Text readout for the HTML overlay
    #[wasm_bindgen(js_name = overlayText)]
    pub fn overlay_text(&self) -> String {
        let driver = self.shared.driver.borrow();
        overlay_text(
            &driver.controller.state(),
            driver.last_pose.as_ref(),
            now_ms(),
            &driver.controller.config().overlay,
        )
    }

    /// Every rep recorded in this session, as JSON
    #[wasm_bindgen(js_name = progressJson)]
    pub fn progress_json(&self) -> Result<String, JsValue> {
        let json = self.shared.outbox.borrow().log.to_json().map_err(Error::from)?;
        Ok(json)
    }

    /// Reps of `exercise` after `since_ms` above `min_confidence`
    #[wasm_bindgen(js_name = repsSince)]
    pub fn reps_since(&self, exercise: &str, since_ms: f64, min_confidence: f32) -> Result<u32, JsValue> {
        let kind: ExerciseKind = exercise.parse()?;
        let count = self.shared.outbox.borrow().log.reps_since(kind, since_ms, min_confidence);
        Ok(count as u32)
    }
}

impl Drop for WorkoutSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `[{"id": "squat", "name": "Squats"}, ...]`
#[wasm_bindgen(js_name = exerciseCatalog)]
pub fn exercise_catalog() -> String {
    let entries: Vec<_> = ExerciseKind::ALL
        .iter()
        .map(|kind| serde_json::json!({ "id": kind.id(), "name": kind.display_name() }))
        .collect();
    serde_json::Value::Array(entries).to_string()
}
