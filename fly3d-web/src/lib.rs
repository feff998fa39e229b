/// fly3d Web - WASM bindings for the camera and entity math
///
/// Matrices cross the boundary as 16-element column-major `Float32Array`s,
/// ready for `uniformMatrix4fv` with `transpose = false`.
use fly3d_core::{Camera, CameraConfig, LookMode, Mat4, MathError, Transformable};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlUniformLocation};

fn to_js(error: MathError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_matrices(view: &[f32], projection: &[f32]) -> fly3d_core::Result<(Mat4, Mat4)> {
    Ok((Mat4::from_slice(view)?, Mat4::from_slice(projection)?))
}

#[wasm_bindgen]
pub struct WebCamera {
    inner: Camera,
}

#[wasm_bindgen]
impl WebCamera {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebCamera {
        WebCamera {
            inner: Camera::new(),
        }
    }

    /// A camera whose pitch steers both looking and moving
    #[wasm_bindgen(js_name = freeFly)]
    pub fn free_fly() -> Result<WebCamera, JsValue> {
        let config = CameraConfig {
            look_mode: LookMode::FreeFly,
            ..CameraConfig::default()
        };
        let inner = Camera::from_config(&config).map_err(to_js)?;
        Ok(WebCamera { inner })
    }

    #[wasm_bindgen(js_name = moveForward)]
    pub fn move_forward(&mut self, distance: f32) {
        self.inner.move_forward(distance);
    }

    #[wasm_bindgen(js_name = moveBackwards)]
    pub fn move_backwards(&mut self, distance: f32) {
        self.inner.move_backwards(distance);
    }

    #[wasm_bindgen(js_name = moveUp)]
    pub fn move_up(&mut self, delta: f32) {
        self.inner.move_up(delta);
    }

    #[wasm_bindgen(js_name = moveDown)]
    pub fn move_down(&mut self, delta: f32) {
        self.inner.move_down(delta);
    }

    #[wasm_bindgen(js_name = rotateYaw)]
    pub fn rotate_yaw(&mut self, degrees: f32) {
        self.inner.rotate_yaw(degrees);
    }

    #[wasm_bindgen(js_name = rotatePitch)]
    pub fn rotate_pitch(&mut self, degrees: f32) {
        self.inner.rotate_pitch(degrees);
    }

    #[wasm_bindgen(js_name = updateViewMatrix)]
    pub fn update_view_matrix(&mut self) {
        self.inner.update_view_matrix();
    }

    /// Rejects a zero-height canvas; the previous projection is kept.
    #[wasm_bindgen(js_name = updateProjectionMatrix)]
    pub fn update_projection_matrix(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner.update_projection_matrix(width, height).map_err(to_js)
    }

    #[wasm_bindgen(getter, js_name = viewMatrix)]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.inner.view_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen(getter, js_name = projectionMatrix)]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.inner.projection_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn yaw(&self) -> f32 {
        self.inner.yaw()
    }

    #[wasm_bindgen(getter)]
    pub fn position(&self) -> Vec<f32> {
        self.inner.position().to_array().to_vec()
    }
}

impl Default for WebCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
pub struct WebEntity {
    inner: Transformable,
}

#[wasm_bindgen]
impl WebEntity {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f32, y: f32, z: f32) -> WebEntity {
        WebEntity {
            inner: Transformable::new(x, y, z),
        }
    }

    pub fn update(&mut self, angle_increment: f32) {
        self.inner.update(angle_increment);
    }

    /// Compose the MVP from raw view and projection arrays.
    #[wasm_bindgen(js_name = composeMvp)]
    pub fn compose_mvp(&mut self, view: &[f32], projection: &[f32]) -> Result<Vec<f32>, JsValue> {
        let (view, projection) = parse_matrices(view, projection).map_err(to_js)?;
        Ok(self.inner.compose_mvp(&view, &projection).as_slice().to_vec())
    }

    /// Compose the MVP straight from a camera's cached matrices.
    #[wasm_bindgen(js_name = composeMvpWithCamera)]
    pub fn compose_mvp_with_camera(&mut self, camera: &WebCamera) -> Vec<f32> {
        let camera = &camera.inner;
        self.inner
            .compose_mvp(camera.view_matrix(), camera.projection_matrix())
            .as_slice()
            .to_vec()
    }

    #[wasm_bindgen(getter, js_name = mvpMatrix)]
    pub fn mvp_matrix(&self) -> Vec<f32> {
        self.inner.mvp_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn theta(&self) -> f32 {
        self.inner.theta()
    }

    /// Hand the last composed MVP to a `mat4` uniform.
    #[wasm_bindgen(js_name = uploadMvp)]
    pub fn upload_mvp(&self, gl: &WebGl2RenderingContext, location: &WebGlUniformLocation) {
        gl.uniform_matrix4fv_with_f32_array(Some(location), false, self.inner.mvp_matrix().as_slice());
    }
}
