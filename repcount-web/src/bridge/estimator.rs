//! Pose estimator handed over from JavaScript
//!
//! The page passes a factory `() => Promise<Estimator>` where the
//! estimator has `estimatePoses(video) => Promise<Pose[]>` and `dispose()`.

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::error::AcquisitionError;
use crate::pose::{poses_from_json, Pose};
use crate::session::PoseModel;

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn method(target: &JsValue, name: &str) -> Result<Function, String> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| describe(&e))?
        .dyn_into::<Function>()
        .map_err(|_| format!("estimator has no {name}()"))
}

/// Shared handle: the session owns disposal, the frame loop estimates
#[derive(Clone)]
pub struct Estimator {
    inner: JsValue,
    disposed: Rc<Cell<bool>>,
}

impl Estimator {
    /// Call the page's factory and wait for the model to load
    pub async fn create(factory: &Function) -> Result<Self, AcquisitionError> {
        let created = factory
            .call0(&JsValue::NULL)
            .map_err(|e| AcquisitionError::ModelInit(describe(&e)))?;
        let inner = JsFuture::from(Promise::resolve(&created))
            .await
            .map_err(|e| AcquisitionError::ModelInit(describe(&e)))?;

        method(&inner, "estimatePoses").map_err(AcquisitionError::ModelInit)?;
        log::info!("pose model loaded");
        Ok(Self {
            inner,
            disposed: Rc::new(Cell::new(false)),
        })
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Poses for the current video frame
    pub async fn estimate(&self, video: &HtmlVideoElement) -> Result<Vec<Pose>, AcquisitionError> {
        let estimate = method(&self.inner, "estimatePoses").map_err(AcquisitionError::Estimation)?;
        let pending = estimate
            .call1(&self.inner, video)
            .map_err(|e| AcquisitionError::Estimation(describe(&e)))?;
        let result = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(|e| AcquisitionError::Estimation(describe(&e)))?;

        // Keypoints are plain objects; JSON is the simplest way across
        let json: String = js_sys::JSON::stringify(&result)
            .map_err(|e| AcquisitionError::Estimation(describe(&e)))?
            .into();
        poses_from_json(&json).map_err(|e| AcquisitionError::Estimation(e.to_string()))
    }
}

impl PoseModel for Estimator {
    fn dispose(&mut self) {
        if self.disposed.replace(true) {
            return;
        }
        match method(&self.inner, "dispose") {
            Ok(dispose) => {
                if let Err(err) = dispose.call0(&self.inner) {
                    log::warn!("estimator dispose failed: {}", describe(&err));
                }
            }
            Err(reason) => log::debug!("{reason}"),
        }
    }
}
