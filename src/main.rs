//! Tri Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use tri_invaders::app::{Game, Key};
    use tri_invaders::assets::{Assets, RawAssets};
    use tri_invaders::consts::*;
    use tri_invaders::renderer::{ImageSizes, RenderState, TextRenderer, request_adapter};
    use tri_invaders::{HighScores, Settings, Tuning};

    /// Browser-side state around the platform-agnostic `Game`
    struct WebGame {
        game: Game,
        render_state: RenderState,
        text: TextRenderer,
        images: ImageSizes,
        canvas: HtmlCanvasElement,
        last_time: f64,
        title: String,
        fullscreen: bool,
    }

    impl WebGame {
        /// Render the current frame
        fn render(&mut self) {
            let frame = self.game.build_frame(&self.images, Some(&mut self.text));
            match self.render_state.render(&frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn sync_title(&mut self) {
            let title = self.game.title();
            if title != self.title {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    document.set_title(&title);
                }
                self.title = title;
            }
        }

        fn sync_fullscreen(&mut self) {
            let wanted = self.game.fullscreen_requested();
            if wanted == self.fullscreen {
                return;
            }
            self.fullscreen = wanted;
            if wanted {
                if let Err(e) = self.canvas.request_fullscreen() {
                    log::warn!("Fullscreen request refused: {:?}", e);
                }
            } else if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document.exit_fullscreen();
            }
        }

        /// Match the canvas backing store to its CSS size
        fn fit_canvas(&mut self) {
            let (width, height) = canvas_pixel_size(&self.canvas);
            if (width, height) != self.render_state.size {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.render_state.resize(width, height);
                self.game.resize(width, height);
            }
        }
    }

    fn device_pixel_ratio() -> f64 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
    }

    fn canvas_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    /// Mouse position in canvas pixels
    fn pointer_pos(event: &MouseEvent) -> Vec2 {
        let dpr = device_pixel_ratio() as f32;
        Vec2::new(event.offset_x() as f32 * dpr, event.offset_y() as f32 * dpr)
    }

    fn map_key(key: &str) -> Option<Key> {
        match key {
            " " => Some(Key::Space),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "f" | "F" => Some(Key::F),
            "h" | "H" => Some(Key::H),
            _ => None,
        }
    }

    /// Put a startup failure where the player can see it
    fn show_error(message: &str) {
        log::error!("{}", message);
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            el.set_text_content(Some(message));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Tri Invaders starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            show_error("No <canvas id=\"canvas\"> in the page");
            return;
        };

        let settings = Settings::load();

        let assets = match RawAssets::fetch_all(&settings)
            .await
            .and_then(|raw| Assets::decode(&raw))
        {
            Ok(assets) => assets,
            Err(e) => {
                show_error(&format!("Failed to load assets: {}", e));
                return;
            }
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let (width, height) = canvas_pixel_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                show_error(&format!("Failed to create surface: {}", e));
                return;
            }
        };

        let render_state = match request_adapter(&instance, &surface).await {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                RenderState::new(surface, &adapter, width, height).await
            }
            Err(e) => Err(e),
        };
        let mut render_state = match render_state {
            Ok(rs) => rs,
            Err(e) => {
                show_error(&e.to_string());
                return;
            }
        };
        render_state.upload_assets(&assets);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let sizes = assets.sprite_sizes();
        let images = ImageSizes::from_assets(&assets);
        let mut game = Game::new(seed, settings, Tuning::load(), HighScores::load(), sizes);
        game.resize(width, height);
        game.load_sounds(&assets);
        log::info!("Game initialized with seed: {}", seed);

        let web_game = Rc::new(RefCell::new(WebGame {
            game,
            render_state,
            text: TextRenderer::new(assets.font),
            images,
            canvas: canvas.clone(),
            last_time: 0.0,
            title: String::new(),
            fullscreen: false,
        }));

        setup_input_handlers(&canvas, web_game.clone());

        // Start game loop
        request_animation_frame(web_game);

        log::info!("Tri Invaders running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().game.pointer_down(pointer_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().game.pointer_move(pointer_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up (on the window so releases outside the canvas end drags)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().game.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = map_key(event.key().as_str()) {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.game.key_down(key);
                    g.sync_fullscreen();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = map_key(event.key().as_str()) {
                    game.borrow_mut().game.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.fit_canvas();
            g.game.update(dt, time);
            g.sync_title();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use std::sync::Arc;
    use std::time::Instant;

    use glam::Vec2;
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::{ElementState, MouseButton, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

    use tri_invaders::app::{Game, Key};
    use tri_invaders::assets::{AssetError, Assets, RawAssets};
    use tri_invaders::platform;
    use tri_invaders::renderer::{
        ImageSizes, RenderError, RenderState, TextRenderer, request_adapter,
    };
    use tri_invaders::{HighScores, Settings, Tuning};

    struct App {
        game: Game,
        assets: Assets,
        images: ImageSizes,
        text: TextRenderer,
        window: Option<Arc<Window>>,
        render_state: Option<RenderState>,
        start: Instant,
        last_frame: Instant,
        cursor: Vec2,
        title: String,
        fullscreen: bool,
    }

    fn map_key(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Space => Some(Key::Space),
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::KeyF => Some(Key::F),
            KeyCode::KeyH => Some(Key::H),
            _ => None,
        }
    }

    fn fullscreen_mode(on: bool) -> Option<Fullscreen> {
        on.then_some(Fullscreen::Borderless(None))
    }

    impl App {
        fn new(settings: Settings, assets: Assets) -> Self {
            let seed = settings
                .seed
                .unwrap_or_else(|| platform::now_ms() as u64);
            log::info!("Game initialized with seed: {}", seed);

            let fullscreen = settings.fullscreen;
            let mut game = Game::new(
                seed,
                settings,
                Tuning::load(),
                HighScores::load(),
                assets.sprite_sizes(),
            );
            game.load_sounds(&assets);

            Self {
                images: ImageSizes::from_assets(&assets),
                text: TextRenderer::new(assets.font.clone()),
                game,
                assets,
                window: None,
                render_state: None,
                start: Instant::now(),
                last_frame: Instant::now(),
                cursor: Vec2::ZERO,
                title: String::new(),
                fullscreen,
            }
        }

        fn init_gpu(&mut self, window: Arc<Window>) -> Result<RenderState, RenderError> {
            let size = window.inner_size();
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::PRIMARY,
                ..Default::default()
            });
            let surface = instance
                .create_surface(window)
                .map_err(|e| RenderError::Surface(e.to_string()))?;
            let adapter = pollster::block_on(request_adapter(&instance, &surface))?;
            log::info!("GPU adapter: {:?}", adapter.get_info().name);

            let mut render_state = pollster::block_on(RenderState::new(
                surface,
                &adapter,
                size.width,
                size.height,
            ))?;
            render_state.upload_assets(&self.assets);
            Ok(render_state)
        }

        fn redraw(&mut self) {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;
            let now_ms = now.duration_since(self.start).as_secs_f64() * 1000.0;

            self.game.update(dt, now_ms);

            let Some(window) = &self.window else {
                return;
            };

            let title = self.game.title();
            if title != self.title {
                window.set_title(&title);
                self.title = title;
            }

            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let frame = self.game.build_frame(&self.images, Some(&mut self.text));
            match render_state.render(&frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn sync_fullscreen(&mut self) {
            let wanted = self.game.fullscreen_requested();
            if wanted != self.fullscreen {
                self.fullscreen = wanted;
                if let Some(window) = &self.window {
                    window.set_fullscreen(fullscreen_mode(wanted));
                }
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let settings = &self.game.settings;
            let attributes = WindowAttributes::default()
                .with_title("Tri Invaders")
                .with_inner_size(LogicalSize::new(
                    settings.window_width as f64,
                    settings.window_height as f64,
                ))
                .with_fullscreen(fullscreen_mode(self.fullscreen));

            let window = match event_loop.create_window(attributes) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };
            let size = window.inner_size();
            log::info!("Window created: {}x{}", size.width, size.height);

            match self.init_gpu(window.clone()) {
                Ok(render_state) => self.render_state = Some(render_state),
                Err(e) => {
                    log::error!("{}", e);
                    event_loop.exit();
                    return;
                }
            }
            self.game.resize(size.width, size.height);
            self.window = Some(window);
            self.last_frame = Instant::now();
        }

        fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        fn window_event(
            &mut self,
            event_loop: &ActiveEventLoop,
            _window_id: WindowId,
            event: WindowEvent,
        ) {
            match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested, exiting.");
                    event_loop.exit();
                }

                WindowEvent::Resized(physical_size) => {
                    let (w, h) = (physical_size.width, physical_size.height);
                    if let Some(render_state) = self.render_state.as_mut() {
                        render_state.resize(w, h);
                    }
                    self.game.resize(w, h);
                }

                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        if code == KeyCode::Escape {
                            event_loop.exit();
                            return;
                        }
                        if let Some(key) = map_key(code) {
                            match event.state {
                                ElementState::Pressed => self.game.key_down(key),
                                ElementState::Released => self.game.key_up(key),
                            }
                            self.sync_fullscreen();
                        }
                    }
                }

                WindowEvent::CursorMoved { position, .. } => {
                    self.cursor = Vec2::new(position.x as f32, position.y as f32);
                    self.game.pointer_move(self.cursor);
                }

                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => self.game.pointer_down(self.cursor),
                    ElementState::Released => self.game.pointer_up(),
                },

                WindowEvent::RedrawRequested => self.redraw(),

                _ => {}
            }
        }
    }

    fn load_assets(settings: &Settings) -> Result<Assets, AssetError> {
        let raw = RawAssets::read_from_disk(settings)?;
        Assets::decode(&raw)
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        log::info!("Tri Invaders (native) starting...");

        let settings = Settings::load();
        let assets = match load_assets(&settings) {
            Ok(assets) => assets,
            Err(e) => {
                log::error!("Failed to load assets: {}", e);
                std::process::exit(1);
            }
        };

        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                log::error!("Failed to create event loop: {}", e);
                std::process::exit(1);
            }
        };
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(settings, assets);
        if let Err(e) = event_loop.run_app(&mut app) {
            log::error!("Event loop error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
