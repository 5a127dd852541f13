//! onnxruntime-web, reached through the global `ort` object that index.html loads.

use gloo_net::http::Request;
use js_sys::{Array, Float32Array, Object, Promise, Reflect, Uint8Array};
use shared::{
    InferenceRuntime, InferenceSession, ModelConfig, PipelineError, PixelSurface, RuntimeError,
    Tensor, TensorMap, UploadedImage,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ort, js_name = InferenceSession)]
    type OrtInferenceSession;

    #[wasm_bindgen(
        static_method_of = OrtInferenceSession,
        js_namespace = ort,
        js_class = "InferenceSession",
        js_name = create,
        catch
    )]
    fn create(model: &Uint8Array) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_class = "InferenceSession")]
    fn run(this: &OrtInferenceSession, feeds: &Object) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, getter, js_class = "InferenceSession", js_name = outputNames)]
    fn output_names(this: &OrtInferenceSession) -> Array;

    #[wasm_bindgen(js_namespace = ort, js_name = Tensor)]
    type OrtTensor;

    #[wasm_bindgen(constructor, js_namespace = ort, js_class = "Tensor", catch)]
    fn new(dtype: &str, data: &Float32Array, dims: &Array) -> Result<OrtTensor, JsValue>;

    #[wasm_bindgen(method, getter, js_class = "Tensor")]
    fn data(this: &OrtTensor) -> JsValue;

    #[wasm_bindgen(method, getter, js_class = "Tensor")]
    fn dims(this: &OrtTensor) -> Array;
}

fn js_error_message(err: JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

fn runtime_error(err: JsValue) -> RuntimeError {
    RuntimeError::new(js_error_message(err))
}

fn decode_error(err: JsValue) -> PipelineError {
    PipelineError::Decode(js_error_message(err))
}

/// Loads the preview data URL into an `<img>` and draws it stretched onto a
/// `width` x `height` canvas, so any format the browser renders can be classified.
async fn draw_to_canvas(
    data_url: &str,
    width: u32,
    height: u32,
) -> Result<PixelSurface, PipelineError> {
    let image = HtmlImageElement::new().map_err(decode_error)?;
    image.set_src(data_url);
    JsFuture::from(image.decode()).await.map_err(decode_error)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| PipelineError::Decode("Canvas element is not available".into()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(decode_error)?
        .unchecked_into();
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(decode_error)?
        .ok_or_else(|| PipelineError::Decode("2d context is not available".into()))?
        .unchecked_into();
    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(decode_error)?;
    let pixels = context
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(decode_error)?;

    PixelSurface::from_rgba(width, height, pixels.data().0)
}

#[derive(Clone, Copy, Default)]
pub struct OrtRuntime;

pub struct OrtSession {
    inner: OrtInferenceSession,
}

impl InferenceRuntime for OrtRuntime {
    type Session = OrtSession;

    async fn create_session(&self, model_path: &str) -> Result<OrtSession, RuntimeError> {
        let response = Request::get(model_path)
            .send()
            .await
            .map_err(|e| RuntimeError::new(format!("Network error: {}", e)))?;
        if !response.ok() {
            return Err(RuntimeError::new(format!(
                "{} returned {} {}",
                model_path,
                response.status(),
                response.status_text()
            )));
        }
        let bytes = response
            .binary()
            .await
            .map_err(|e| RuntimeError::new(format!("Failed to read model bytes: {}", e)))?;
        log::debug!("Fetched {} ({} bytes)", model_path, bytes.len());

        let model = Uint8Array::from(bytes.as_slice());
        let session = JsFuture::from(OrtInferenceSession::create(&model).map_err(runtime_error)?)
            .await
            .map_err(runtime_error)?;

        Ok(OrtSession {
            inner: session.unchecked_into(),
        })
    }

    async fn rasterize(
        &self,
        image: &UploadedImage,
        config: &ModelConfig,
    ) -> Result<PixelSurface, PipelineError> {
        draw_to_canvas(&image.data_url(), config.input_width, config.input_height).await
    }
}

impl InferenceSession for OrtSession {
    async fn run(&self, inputs: TensorMap) -> Result<TensorMap, RuntimeError> {
        let feeds = Object::new();
        for (name, tensor) in &inputs {
            let dims: Array = tensor.dims().iter().map(|&d| JsValue::from(d as u32)).collect();
            let data = Float32Array::from(tensor.data());
            let ort_tensor = OrtTensor::new("float32", &data, &dims).map_err(runtime_error)?;
            Reflect::set(&feeds, &JsValue::from_str(name), &ort_tensor).map_err(runtime_error)?;
        }

        let results = JsFuture::from(self.inner.run(&feeds).map_err(runtime_error)?)
            .await
            .map_err(runtime_error)?;
        let results: Object = results.unchecked_into();

        let mut outputs = TensorMap::new();
        for key in Object::keys(&results).iter() {
            let Some(name) = key.as_string() else { continue };
            let value: OrtTensor = Reflect::get(&results, &key)
                .map_err(runtime_error)?
                .unchecked_into();
            let data = Float32Array::new(&value.data()).to_vec();
            let dims = value
                .dims()
                .iter()
                .filter_map(|d| d.as_f64())
                .map(|d| d as usize)
                .collect();
            let tensor = Tensor::new(data, dims)
                .map_err(|e| RuntimeError::new(format!("output '{}': {}", name, e)))?;
            outputs.insert(name, tensor);
        }
        Ok(outputs)
    }

    fn output_names(&self) -> Vec<String> {
        self.inner
            .output_names()
            .iter()
            .filter_map(|name| name.as_string())
            .collect()
    }
}
