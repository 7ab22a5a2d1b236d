//! Shoreline entry point
//!
//! In the browser this binds the page controller to the DOM and runs the
//! frame loop. Natively it runs a headless tide over some sample text.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CustomEvent, CustomEventInit, HtmlCanvasElement, HtmlTextAreaElement};

    use shoreline::renderer::canvas::WebCanvas;
    use shoreline::renderer::{MonospaceMeasurer, TextMeasurer};
    use shoreline::sim::{CssBox, SurfaceMetrics, WaveEvent, WaveSubscription};
    use shoreline::{Page, Settings};

    const WAVE_CANVAS_ID: &str = "wave-canvas";
    const OVERLAY_CANVAS_ID: &str = "overlay-canvas";
    const INPUT_SELECTOR: &str = ".textarea-clean";
    const WAVE_PASS_EVENT: &str = "wave-pass";

    /// Used when the overlay canvas is missing
    const FALLBACK_MEASURER: MonospaceMeasurer = MonospaceMeasurer { advance: 9.6 };

    /// Page instance holding DOM handles and the controller
    struct App {
        page: Page,
        wave_canvas: Option<WebCanvas>,
        overlay_canvas: Option<WebCanvas>,
        input: Option<HtmlTextAreaElement>,
        /// Re-broadcasts wave events as DOM events
        rebroadcast: WaveSubscription,
        running: bool,
    }

    impl App {
        fn measurer(overlay: &Option<WebCanvas>) -> &dyn TextMeasurer {
            match overlay {
                Some(canvas) => canvas,
                None => &FALLBACK_MEASURER,
            }
        }

        /// Run one frame and draw it
        fn frame(&mut self, now: f64) {
            let measurer = Self::measurer(&self.overlay_canvas);
            let report = self.page.frame(now, measurer);

            if report.text_changed {
                if let Some(input) = &self.input {
                    input.set_value(self.page.text());
                }
            }
            for event in self.rebroadcast.drain() {
                dispatch_wave_pass(&event);
            }

            if let Some(canvas) = self.wave_canvas.as_mut() {
                self.page.render_wave(canvas);
            }
            if let Some(canvas) = self.overlay_canvas.as_mut() {
                self.page.render_overlay(canvas);
            }
        }

        /// Text typed into the textarea
        fn on_input(&mut self) {
            let Some(input) = &self.input else {
                return;
            };
            let value = input.value();
            let measurer = Self::measurer(&self.overlay_canvas);
            self.page.set_text(&value, measurer);
        }

        /// Re-measure canvases and the host surface
        fn on_resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let settings = self.page.settings().clone();

            if let Some(canvas) = self.wave_canvas.as_mut() {
                let width = viewport_width(&window);
                canvas.resize(width, settings.wave.canvas_height, dpr);
                let origin = page_origin(&window, canvas.element());
                self.page.resize_viewport(width, origin);
            }

            let metrics = self.input.as_ref().and_then(|input| measure_surface(&window, input));
            if let (Some(canvas), Some(m)) = (self.overlay_canvas.as_mut(), metrics.as_ref()) {
                canvas.resize(m.width, m.height, dpr);
                canvas.set_font(&m.font);
            }
            let measurer = Self::measurer(&self.overlay_canvas);
            self.page.set_metrics(metrics, measurer);
        }

        fn teardown(&mut self) {
            self.running = false;
            self.page.teardown();
        }
    }

    fn viewport_width(window: &web_sys::Window) -> f32 {
        window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0) as f32
    }

    /// Top-left of an element in page coordinates
    fn page_origin(window: &web_sys::Window, el: &web_sys::Element) -> Vec2 {
        let rect = el.get_bounding_client_rect();
        let scroll_x = window.scroll_x().unwrap_or(0.0);
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        Vec2::new((rect.left() + scroll_x) as f32, (rect.top() + scroll_y) as f32)
    }

    /// Read the textarea's computed style into layout metrics
    fn measure_surface(
        window: &web_sys::Window,
        input: &HtmlTextAreaElement,
    ) -> Option<SurfaceMetrics> {
        let style = window.get_computed_style(input).ok().flatten()?;
        let prop = |name: &str| style.get_property_value(name).unwrap_or_default();
        let (font_size, font_family) = (prop("font-size"), prop("font-family"));
        let (padding_left, padding_top) = (prop("padding-left"), prop("padding-top"));
        let (padding_right, line_height) = (prop("padding-right"), prop("line-height"));
        let css = CssBox {
            font_size: &font_size,
            font_family: &font_family,
            padding_left: &padding_left,
            padding_top: &padding_top,
            padding_right: &padding_right,
            line_height: &line_height,
        };
        Some(SurfaceMetrics::from_css(
            &css,
            input.client_width() as f32,
            input.client_height() as f32,
            page_origin(window, input),
        ))
    }

    /// Broadcast a wave event on `window` for any other listeners
    fn dispatch_wave_pass(event: &WaveEvent) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(json) = serde_json::to_string(event) else {
            return;
        };
        let Ok(detail) = js_sys::JSON::parse(&json) else {
            return;
        };
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        match CustomEvent::new_with_event_init_dict(WAVE_PASS_EVENT, &init) {
            Ok(ev) => {
                let _ = window.dispatch_event(&ev);
            }
            Err(_) => log::warn!("Failed to create {} event", WAVE_PASS_EVENT),
        }
    }

    fn canvas_by_id(document: &web_sys::Document, id: &str) -> Option<WebCanvas> {
        let canvas: HtmlCanvasElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        let canvas = WebCanvas::from_canvas(canvas);
        if canvas.is_none() {
            log::warn!("#{} has no 2D context", id);
        }
        canvas
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Shoreline starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let wave_canvas = canvas_by_id(&document, WAVE_CANVAS_ID);
        let overlay_canvas = canvas_by_id(&document, OVERLAY_CANVAS_ID);
        let input: Option<HtmlTextAreaElement> = document
            .query_selector(INPUT_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into().ok());
        if input.is_none() {
            log::warn!("No {} found; text erosion disabled", INPUT_SELECTOR);
        }

        let settings = Settings::load();
        // Persist the sanitized copy
        settings.save();
        let seed = js_sys::Date::now() as u64;
        let width = viewport_width(&window);
        let origin = wave_canvas
            .as_ref()
            .map(|c| page_origin(&window, c.element()))
            .unwrap_or(Vec2::ZERO);

        let mut page = Page::new(
            settings,
            width,
            origin,
            None,
            App::measurer(&overlay_canvas),
            seed,
        );
        let rebroadcast = page.subscribe();

        let app = Rc::new(RefCell::new(App {
            page,
            wave_canvas,
            overlay_canvas,
            input,
            rebroadcast,
            running: true,
        }));

        {
            let mut a = app.borrow_mut();
            a.on_resize();
            a.on_input();
        }

        setup_input_handler(app.clone());
        setup_resize_handler(app.clone());
        setup_teardown(app.clone());

        request_animation_frame(app);

        log::info!("Shoreline running (seed {})", seed);
    }

    fn setup_input_handler(app: Rc<RefCell<App>>) {
        let Some(input) = app.borrow().input.clone() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().on_input();
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().on_resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().teardown();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if !a.running {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_page::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shoreline (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to see the page");

    let mut args = std::env::args().skip(1);
    let preset = args
        .next()
        .and_then(|s| shoreline::TidePreset::from_str(&s))
        .unwrap_or_default();
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(20.0);

    headless_tide(preset, seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run the page without a browser and print what the sea leaves behind
#[cfg(not(target_arch = "wasm32"))]
fn headless_tide(preset: shoreline::TidePreset, seconds: f64) {
    use glam::Vec2;
    use shoreline::consts::FRAME_MS;
    use shoreline::renderer::{MonospaceMeasurer, RecordingCanvas};
    use shoreline::sim::SurfaceMetrics;
    use shoreline::{Page, Settings};

    let measurer = MonospaceMeasurer::default();
    let settings = Settings::from_preset(preset);
    let metrics = SurfaceMetrics {
        origin: Vec2::new(0.0, 220.0),
        ..Default::default()
    };
    let mut page = Page::new(settings, 800.0, Vec2::ZERO, Some(metrics), &measurer, 20_240_601);
    page.set_text(
        "Footprints in the sand\nlast until the tide comes back\nand then the shore is new again",
        &measurer,
    );

    let mut wave_canvas = RecordingCanvas::new();
    let mut overlay_canvas = RecordingCanvas::new();
    let mut draw_calls = 0;
    let mut now = 0.0;
    while now < seconds * 1000.0 {
        now += FRAME_MS;
        let report = page.frame(now, &measurer);
        if let Some(event) = &report.wave_event {
            println!(
                "[{:>6.0} ms] wave (intensity {:.2}, {} samples)",
                now,
                event.intensity,
                event.wave.samples.len()
            );
        }
        if report.text_changed {
            println!("[{:>6.0} ms] {:?}", now, page.text());
        }
        page.render_wave(&mut wave_canvas);
        page.render_overlay(&mut overlay_canvas);
        draw_calls += wave_canvas.reset() + overlay_canvas.reset();
    }

    page.teardown();
    println!(
        "Tide out after {:.0}s: {} characters left, {} draw calls",
        seconds,
        page.store().char_len(),
        draw_calls
    );
}
