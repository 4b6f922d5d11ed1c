use crate::hud;
use anyhow::{Context, Result};
use egui::Context as EguiContext;
use spincube_render_wgpu::{GpuContext, WgpuRenderer};
use spincube_scene::{HeldKeys, Key, Scene, SceneConfig};
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

fn scene_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        _ => None,
    }
}

struct Hud {
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    visible: bool,
}

/// Application state: config, the live scene and the GPU side, all created
/// on first resume.
pub struct GpuApp {
    config: SceneConfig,
    scene: Option<Scene>,
    keys: HeldKeys,
    last_frame: Instant,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    hud: Option<Hud>,
    startup_error: Option<anyhow::Error>,
}

impl GpuApp {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            scene: None,
            keys: HeldKeys::default(),
            last_frame: Instant::now(),
            window: None,
            gpu: None,
            renderer: None,
            hud: None,
            startup_error: None,
        }
    }

    /// The fatal error that stopped startup, if any.
    pub fn take_startup_error(&mut self) -> Option<anyhow::Error> {
        self.startup_error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = (self.config.width, self.config.height);
        let attrs = Window::default_attributes()
            .with_title("Spinning Cube")
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("window creation failed")?,
        );

        let gpu = GpuContext::new(window.clone(), width, height).context("device init failed")?;
        let scene = Scene::setup(&self.config).context("scene setup failed")?;
        let renderer = WgpuRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format(),
            width,
            height,
            scene.state(),
            scene.texture(),
        )
        .context("renderer setup failed")?;

        let ctx = EguiContext::default();
        let hud = Hud {
            winit: egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            ),
            renderer: egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format(), None, 1, false),
            ctx,
            visible: true,
        };

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.scene = Some(scene);
        self.renderer = Some(renderer);
        self.hud = Some(hud);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, pressed: bool) {
        if let Some(key) = scene_key(code) {
            self.keys.set(key, pressed);
            return;
        }
        if !pressed {
            return;
        }
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::F1 => {
                if let Some(hud) = &mut self.hud {
                    hud.visible = !hud.visible;
                }
            }
            _ => {}
        }
    }

    /// Losing focus releases every held arrow; some platforms send no
    /// key-up events for keys still down when focus leaves.
    fn focus_changed(&mut self, focused: bool) {
        if !focused {
            self.keys = HeldKeys::default();
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let (Some(gpu), Some(renderer), Some(scene)) = (&self.gpu, &self.renderer, &mut self.scene)
        else {
            return;
        };
        if !renderer.is_ready() {
            return;
        }

        scene.update(self.keys, dt);
        let plan = scene.frame();

        let Some(output) = gpu.acquire() else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(&gpu.device, &gpu.queue, &view, &plan);

        if let (Some(hud), Some(window)) = (&mut self.hud, &self.window) {
            if hud.visible {
                draw_hud(hud, window, gpu, &view, scene);
            }
        }

        output.present();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Release GPU and scene resources. Safe to call repeatedly.
    fn cleanup(&mut self) {
        if let Some(renderer) = &mut self.renderer {
            renderer.release();
        }
        if let Some(scene) = &mut self.scene {
            scene.release();
        }
        self.hud = None;
    }
}

fn draw_hud(
    hud: &mut Hud,
    window: &Window,
    gpu: &GpuContext,
    view: &wgpu::TextureView,
    scene: &Scene,
) {
    let raw_input = hud.winit.take_egui_input(window);
    let full_output = hud.ctx.run(raw_input, |ctx| hud::draw(ctx, scene, &gpu.adapter_info));
    hud.winit
        .handle_platform_output(window, full_output.platform_output);

    let paint_jobs = hud
        .ctx
        .tessellate(full_output.shapes, full_output.pixels_per_point);
    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [gpu.config.width, gpu.config.height],
        pixels_per_point: full_output.pixels_per_point,
    };

    for (id, image_delta) in &full_output.textures_delta.set {
        hud.renderer
            .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
    }
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hud_encoder"),
        });
    hud.renderer.update_buffers(
        &gpu.device,
        &gpu.queue,
        &mut encoder,
        &paint_jobs,
        &screen_descriptor,
    );
    {
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("hud_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        hud.renderer
            .render(&mut pass, &paint_jobs, &screen_descriptor);
    }
    gpu.queue.submit(std::iter::once(encoder.finish()));
    for id in &full_output.textures_delta.free {
        hud.renderer.free_texture(id);
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(hud), Some(window)) = (&mut self.hud, &self.window) {
            if hud.visible && hud.winit.on_window_event(window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, code, key_state == ElementState::Pressed);
            }
            WindowEvent::Focused(focused) => self.focus_changed(focused),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.cleanup();
        tracing::info!("spincube-desktop exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_map_to_scene_keys() {
        assert_eq!(scene_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(scene_key(KeyCode::ArrowRight), Some(Key::Right));
        assert_eq!(scene_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(scene_key(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(scene_key(KeyCode::KeyW), None);
    }

    #[test]
    fn losing_focus_releases_held_keys() {
        let mut app = GpuApp::new(SceneConfig::default());
        app.keys.set(Key::Left, true);
        app.keys.set(Key::Up, true);

        app.focus_changed(true);
        assert!(app.keys.is_held(Key::Left));

        app.focus_changed(false);
        assert!(!app.keys.any());
    }

    #[test]
    fn cleanup_before_startup_is_harmless() {
        let mut app = GpuApp::new(SceneConfig::default());
        app.cleanup();
        app.cleanup();
        assert!(app.take_startup_error().is_none());
    }
}
