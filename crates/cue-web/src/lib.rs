//! WASM bridge for the billiards room.
//!
//! JS drives the room through free functions: `room_init` once, then pointer
//! events as they happen and `room_tick` on every animation frame. Ball instances
//! are read straight out of wasm memory via `get_instances_ptr`.

pub mod runner;

pub use runner::RoomRunner;

use std::cell::RefCell;

use cue_engine::InputEvent;
use glam::Vec3;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<RoomRunner>> = RefCell::new(None);
}

/// Run `f` against the room. Before `room_init` this logs and returns `None`.
fn with_runner<R>(f: impl FnOnce(&mut RoomRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("room not initialized; call room_init() first");
                None
            }
        }
    })
}

fn not_initialized() -> JsValue {
    JsValue::from_str("room not initialized")
}

fn to_js(err: cue_engine::ConfigError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Build the room from an optional JSON config. The table collider is live
/// immediately; balls appear after `room_table_loaded`/`room_table_failed`.
#[wasm_bindgen]
pub fn room_init(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"cue-web: logger already installed".into());
    }

    let runner = RoomRunner::from_json(config_json.as_deref()).map_err(to_js)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("cue-web: initialized");
    Ok(())
}

/// `time_ms` is the `requestAnimationFrame` timestamp.
#[wasm_bindgen]
pub fn room_tick(time_ms: f64) -> u32 {
    with_runner(|r| r.tick(time_ms)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn room_table_loaded() -> Result<(), JsValue> {
    with_runner(|r| r.table_loaded())
        .ok_or_else(not_initialized)?
        .map_err(to_js)
}

#[wasm_bindgen]
pub fn room_table_failed(reason: &str) -> Result<(), JsValue> {
    with_runner(|r| r.table_load_failed(reason))
        .ok_or_else(not_initialized)?
        .map_err(to_js)
}

// ---- Input ----

#[wasm_bindgen]
pub fn room_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn room_primary_click(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PrimaryClick { x, y }));
}

#[wasm_bindgen]
pub fn room_secondary_click(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::SecondaryClick { x, y }));
}

#[wasm_bindgen]
pub fn room_enable_cue() {
    with_runner(|r| r.room_mut().enable_cue());
}

#[wasm_bindgen]
pub fn room_disable_cue() {
    with_runner(|r| r.room_mut().disable_cue());
}

// ---- Viewpoint ----

#[wasm_bindgen]
pub fn room_set_camera(eye_x: f32, eye_y: f32, eye_z: f32, target_x: f32, target_y: f32, target_z: f32) {
    with_runner(|r| {
        r.room_mut()
            .set_camera(Vec3::new(eye_x, eye_y, eye_z), Vec3::new(target_x, target_y, target_z))
    });
}

#[wasm_bindgen]
pub fn room_resize(width: f32, height: f32) {
    with_runner(|r| r.room_mut().resize(width, height));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_outcomes_ptr() -> *const f32 {
    with_runner(|r| r.outcomes_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_outcome_count() -> u32 {
    with_runner(|r| r.outcome_count()).unwrap_or(0)
}

/// `[visible, startX, startY, startZ, endX, endY, endZ, yaw]`.
#[wasm_bindgen]
pub fn get_arrow() -> js_sys::Float32Array {
    let arrow = with_runner(|r| r.arrow()).unwrap_or_default();
    js_sys::Float32Array::from(&arrow[..])
}

/// Top of the play surface, for placing the table model and overlays.
#[wasm_bindgen]
pub fn get_play_height() -> f32 {
    with_runner(|r| r.room().table().play_height()).unwrap_or(0.0)
}
