//! Browser host for the quadrant engine (wasm32 only).
//!
//! Wraps DOM elements as [`Surface`]s, wires the scroll/wheel listeners,
//! owns the settle timeout and the animation-frame wheel flush, and exports
//! the [`QuadView`] struct to JavaScript. Event handlers share the engine
//! through `Rc<RefCell<..>>`; timer closures hold a `Weak` so a dropped
//! view cannot be revived by a late timeout.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, HtmlElement, WheelEvent};

use crate::config::GridConfig;
use crate::layout::GridLayout;
use crate::quadrant::Quadrant;
use crate::surface::{Surface, SurfaceRole};
use crate::sync::{QuadrantSync, SettleOutcome};

/// Current time in ms from the Performance clock, falling back to `Date`.
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

fn element_f64(element: &HtmlElement, key: &str, fallback: f64) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(fallback)
}

fn set_element_f64(element: &HtmlElement, key: &str, value: f64) {
    let _ = Reflect::set(
        element.as_ref(),
        &JsValue::from_str(key),
        &JsValue::from_f64(value),
    );
}

fn set_px(element: &HtmlElement, property: &str, px: f64) {
    let _ = element.style().set_property(property, &format!("{px}px"));
}

/// A DOM element viewed as an engine surface.
///
/// Fractional scroll offsets are read and written through `Reflect` because
/// the typed `scroll_left`/`scroll_top` accessors truncate to integers.
pub struct DomSurface {
    element: HtmlElement,
}

impl DomSurface {
    /// Wrap a mounted element.
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl Surface for DomSurface {
    fn client_width(&self) -> f64 {
        f64::from(self.element.client_width())
    }

    fn client_height(&self) -> f64 {
        f64::from(self.element.client_height())
    }

    fn offset_width(&self) -> f64 {
        f64::from(self.element.offset_width())
    }

    fn offset_height(&self) -> f64 {
        f64::from(self.element.offset_height())
    }

    fn scroll_width(&self) -> f64 {
        f64::from(self.element.scroll_width())
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.element.scroll_height())
    }

    fn scroll_left(&self) -> f64 {
        element_f64(&self.element, "scrollLeft", 0.0)
    }

    fn scroll_top(&self) -> f64 {
        element_f64(&self.element, "scrollTop", 0.0)
    }

    fn set_scroll_left(&self, value: f64) {
        set_element_f64(&self.element, "scrollLeft", value);
    }

    fn set_scroll_top(&self, value: f64) {
        set_element_f64(&self.element, "scrollTop", value);
    }

    fn set_width(&self, px: f64) {
        set_px(&self.element, "width", px);
    }

    fn set_height(&self, px: f64) {
        set_px(&self.element, "height", px);
    }

    fn clear_width(&self) {
        let _ = self.element.style().set_property("width", "auto");
    }

    fn set_right_inset(&self, px: f64) {
        set_px(&self.element, "right", px);
    }

    fn set_bottom_inset(&self, px: f64) {
        set_px(&self.element, "bottom", px);
    }
}

/// Engine plus the host-owned timer state shared with event closures.
struct DomHost {
    engine: QuadrantSync<GridLayout>,
    settle_timer: Option<i32>,
    settle_closure: Option<Closure<dyn FnMut()>>,
    flush_pending: bool,
    flush_closure: Option<Closure<dyn FnMut(f64)>>,
}

type SharedHost = Rc<RefCell<DomHost>>;

fn timeout_ms(delay: f64) -> i32 {
    if delay <= 0.0 {
        0
    } else if delay >= f64::from(i32::MAX) {
        i32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation)]
        {
            delay as i32
        }
    }
}

/// The quadrant view exported to JavaScript.
#[wasm_bindgen]
pub struct QuadView {
    shared: SharedHost,
    #[allow(dead_code)] // Kept to maintain listener registrations
    wheel_closures: Vec<Closure<dyn FnMut(WheelEvent)>>,
    #[allow(dead_code)]
    scroll_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl QuadView {
    /// Create a view over a uniform grid.
    ///
    /// `config` is a plain object with camelCase `GridConfig` fields; any
    /// omitted field takes its default.
    #[wasm_bindgen(js_name = "newUniform")]
    pub fn new_uniform(
        config: JsValue,
        num_rows: u32,
        num_cols: u32,
        row_height: f64,
        col_width: f64,
    ) -> Result<QuadView, JsValue> {
        let layout = GridLayout::uniform(
            num_rows as usize,
            num_cols as usize,
            row_height,
            col_width,
        );
        Self::with_layout(config, layout)
    }

    /// Create a view with explicit per-track sizes.
    #[wasm_bindgen(js_name = "newWithTrackSizes")]
    pub fn new_with_track_sizes(
        config: JsValue,
        row_heights: Vec<f64>,
        col_widths: Vec<f64>,
    ) -> Result<QuadView, JsValue> {
        let col_map: HashMap<usize, f64> = col_widths.iter().copied().enumerate().collect();
        let row_map: HashMap<usize, f64> = row_heights.iter().copied().enumerate().collect();
        let layout = GridLayout::new(
            row_heights.len(),
            col_widths.len(),
            &col_map,
            &row_map,
            &std::collections::HashSet::new(),
            &std::collections::HashSet::new(),
        );
        Self::with_layout(config, layout)
    }

    fn with_layout(config: JsValue, layout: GridLayout) -> Result<QuadView, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let engine = QuadrantSync::new(layout, config)?;
        let shared = Rc::new(RefCell::new(DomHost {
            engine,
            settle_timer: None,
            settle_closure: None,
            flush_pending: false,
            flush_closure: None,
        }));

        Ok(QuadView {
            shared,
            wheel_closures: Vec::new(),
            scroll_closure: None,
        })
    }

    /// Register one quadrant's elements and wire its listeners.
    ///
    /// `quadrant` is `"main"`, `"top"`, `"left"`, or `"top-left"`. Header
    /// and menu elements are optional. MAIN's scroll surface additionally
    /// gets the native scroll listener; every container gets a
    /// non-passive wheel listener so the default scroll can be cancelled
    /// synchronously.
    #[wasm_bindgen(js_name = "registerQuadrant")]
    pub fn register_quadrant(
        &mut self,
        quadrant: &str,
        container: HtmlElement,
        scroll_surface: HtmlElement,
        row_header: Option<HtmlElement>,
        column_header: Option<HtmlElement>,
        menu: Option<HtmlElement>,
    ) -> Result<(), JsValue> {
        let quadrant = Quadrant::from_str(quadrant)?;

        {
            let mut host = self.shared.borrow_mut();
            host.engine.set_surface(
                quadrant,
                SurfaceRole::Container,
                Rc::new(DomSurface::new(container.clone())),
            );
            host.engine.set_surface(
                quadrant,
                SurfaceRole::ScrollSurface,
                Rc::new(DomSurface::new(scroll_surface.clone())),
            );
            if let Some(element) = row_header {
                host.engine.set_surface(
                    quadrant,
                    SurfaceRole::RowHeader,
                    Rc::new(DomSurface::new(element)),
                );
            }
            if let Some(element) = column_header {
                host.engine.set_surface(
                    quadrant,
                    SurfaceRole::ColumnHeader,
                    Rc::new(DomSurface::new(element)),
                );
            }
            if let Some(element) = menu {
                host.engine
                    .set_surface(quadrant, SurfaceRole::Menu, Rc::new(DomSurface::new(element)));
            }
        }

        self.attach_wheel_listener(&container);
        if quadrant == Quadrant::Main {
            self.attach_scroll_listener(&scroll_surface);
        }
        Ok(())
    }

    /// Run the mount-time resync once all quadrants are registered.
    pub fn mount(&self) {
        self.shared.borrow_mut().engine.did_mount();
    }

    /// Programmatic scroll; geometry is consistent when this returns.
    #[wasm_bindgen(js_name = "scrollToPosition")]
    pub fn scroll_to_position(&self, scroll_left: f64, scroll_top: f64) -> Result<(), JsValue> {
        self.shared
            .borrow_mut()
            .engine
            .scroll_to_position(scroll_left, scroll_top)?;
        Ok(())
    }

    /// Install the scroll observer, called before offsets propagate.
    #[wasm_bindgen(js_name = "onScroll")]
    pub fn on_scroll(&self, callback: js_sys::Function) {
        self.shared.borrow_mut().engine.set_on_scroll(move || {
            let _ = callback.call0(&JsValue::NULL);
        });
    }

    /// Install the adjusted column-resize-guide consumer.
    #[wasm_bindgen(js_name = "onColumnResizeGuide")]
    pub fn on_column_resize_guide(&self, callback: js_sys::Function) {
        self.shared
            .borrow_mut()
            .engine
            .set_on_column_resize_guide(guide_forwarder(callback));
    }

    /// Install the adjusted row-resize-guide consumer.
    #[wasm_bindgen(js_name = "onRowResizeGuide")]
    pub fn on_row_resize_guide(&self, callback: js_sys::Function) {
        self.shared
            .borrow_mut()
            .engine
            .set_on_row_resize_guide(guide_forwarder(callback));
    }

    /// Install the column-reordering guide consumer.
    #[wasm_bindgen(js_name = "onColumnsReordering")]
    pub fn on_columns_reordering(&self, callback: js_sys::Function) {
        self.shared
            .borrow_mut()
            .engine
            .set_on_columns_reordering(guide_forwarder(callback));
    }

    /// Install the row-reordering guide consumer.
    #[wasm_bindgen(js_name = "onRowsReordering")]
    pub fn on_rows_reordering(&self, callback: js_sys::Function) {
        self.shared
            .borrow_mut()
            .engine
            .set_on_rows_reordering(guide_forwarder(callback));
    }

    /// Column resize gesture frame from a header collaborator.
    #[wasm_bindgen(js_name = "columnResizeGuide")]
    pub fn column_resize_guide(
        &self,
        quadrant: &str,
        guides: Option<Vec<f64>>,
    ) -> Result<(), JsValue> {
        let quadrant = Quadrant::from_str(quadrant)?;
        self.shared
            .borrow_mut()
            .engine
            .handle_column_resize_guide(quadrant, guides.as_deref());
        Ok(())
    }

    /// Row resize gesture frame from a header collaborator.
    #[wasm_bindgen(js_name = "rowResizeGuide")]
    pub fn row_resize_guide(
        &self,
        quadrant: &str,
        guides: Option<Vec<f64>>,
    ) -> Result<(), JsValue> {
        let quadrant = Quadrant::from_str(quadrant)?;
        self.shared
            .borrow_mut()
            .engine
            .handle_row_resize_guide(quadrant, guides.as_deref());
        Ok(())
    }

    /// Column drag-reorder frame from a header collaborator.
    #[wasm_bindgen(js_name = "columnsReordering")]
    pub fn columns_reordering(&self, old_index: u32, new_index: u32, length: u32) {
        self.shared.borrow_mut().engine.handle_columns_reordering(
            old_index as usize,
            new_index as usize,
            length as usize,
        );
    }

    /// Row drag-reorder frame from a header collaborator.
    #[wasm_bindgen(js_name = "rowsReordering")]
    pub fn rows_reordering(&self, old_index: u32, new_index: u32, length: u32) {
        self.shared.borrow_mut().engine.handle_rows_reordering(
            old_index as usize,
            new_index as usize,
            length as usize,
        );
    }

    /// Last resync pass as JSON, for debugging.
    #[wasm_bindgen(js_name = "reportJson")]
    pub fn report_json(&self) -> Result<String, JsValue> {
        Ok(self.shared.borrow().engine.report_json()?)
    }

    fn attach_scroll_listener(&mut self, element: &HtmlElement) {
        let weak = Rc::downgrade(&self.shared);
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.borrow_mut().engine.handle_main_scroll(now_ms());
            schedule_flush(&shared);
            schedule_settle(&shared);
        }) as Box<dyn FnMut(web_sys::Event)>);
        element
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .ok();
        self.scroll_closure = Some(closure);
    }

    fn attach_wheel_listener(&mut self, element: &HtmlElement) {
        let weak = Rc::downgrade(&self.shared);
        let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
            // Default-action suppression must be synchronous per raw event;
            // it cannot wait for the throttled path.
            event.prevent_default();
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared
                .borrow_mut()
                .engine
                .handle_wheel(event.delta_x(), event.delta_y(), now_ms());
            schedule_flush(&shared);
            schedule_settle(&shared);
        }) as Box<dyn FnMut(WheelEvent)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        element
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .ok();
        self.wheel_closures.push(closure);
    }
}

fn guide_forwarder(callback: js_sys::Function) -> impl FnMut(Option<&[f64]>) {
    move |guides: Option<&[f64]>| {
        let arg = match guides {
            Some(values) => JsValue::from(js_sys::Float64Array::from(values)),
            None => JsValue::NULL,
        };
        let _ = callback.call1(&JsValue::NULL, &arg);
    }
}

/// Replay gate-deferred work (wheel deltas, trailing scroll events) on the
/// next animation frame.
fn schedule_flush(shared: &SharedHost) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut host = shared.borrow_mut();
    if host.flush_pending {
        return;
    }
    if host.flush_closure.is_none() {
        let weak = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            if let Some(shared) = weak.upgrade() {
                let mut host = shared.borrow_mut();
                host.flush_pending = false;
                let now = now_ms();
                host.engine.flush_wheel(now);
                host.engine.flush_scroll(now);
                drop(host);
                schedule_settle(&shared);
            }
        }) as Box<dyn FnMut(f64)>);
        host.flush_closure = Some(closure);
    }
    let Some(callback) = host.flush_closure.as_ref() else {
        return;
    };
    if window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .is_ok()
    {
        host.flush_pending = true;
    }
}

/// Arm (or re-arm) the settle timeout, cancelling any pending one.
fn schedule_settle(shared: &SharedHost) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut host = shared.borrow_mut();
    if let Some(timer_id) = host.settle_timer.take() {
        window.clear_timeout_with_handle(timer_id);
    }
    let delay = host.engine.config().resync_delay_ms;
    if host.settle_closure.is_none() {
        let weak = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let outcome = {
                let mut host = shared.borrow_mut();
                host.settle_timer = None;
                host.engine.handle_settle_timer(now_ms())
            };
            if let SettleOutcome::Reschedule(remaining) = outcome {
                rearm_settle(&shared, remaining);
            }
        }) as Box<dyn FnMut()>);
        host.settle_closure = Some(closure);
    }
    let Some(callback) = host.settle_closure.as_ref() else {
        return;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        timeout_ms(delay),
    ) {
        Ok(id) => host.settle_timer = Some(id),
        Err(_) => host.settle_timer = None,
    }
}

fn rearm_settle(shared: &SharedHost, remaining_ms: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut host = shared.borrow_mut();
    let Some(callback) = host.settle_closure.as_ref() else {
        return;
    };
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        timeout_ms(remaining_ms),
    ) {
        Ok(id) => host.settle_timer = Some(id),
        Err(_) => host.settle_timer = None,
    }
}

impl Drop for QuadView {
    fn drop(&mut self) {
        // No resync may run after teardown.
        let mut host = self.shared.borrow_mut();
        host.engine.cancel_pending_resync();
        if let Some(timer_id) = host.settle_timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(timer_id);
            }
        }
    }
}
