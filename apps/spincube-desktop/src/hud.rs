use egui::Context as EguiContext;
use spincube_scene::{Light, Scene};

/// One-line description of the GPU the demo runs on.
pub fn adapter_label(info: &wgpu::AdapterInfo) -> String {
    format!("GPU: {} ({})", info.name, info.backend.to_str())
}

/// Side panel with camera and render state readouts.
pub fn draw(ctx: &EguiContext, scene: &Scene, adapter: &wgpu::AdapterInfo) {
    let camera = scene.camera();
    let eye = camera.eye();
    let state = scene.state();

    egui::SidePanel::left("hud")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Spinning Cube");
            ui.label(adapter_label(adapter));
            ui.separator();
            ui.label(format!("Angle: {:.2} rad", camera.angle));
            ui.label(format!("Height: {:.2}", camera.height));
            ui.label(format!("Eye: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z));
            ui.label(match scene.texture() {
                Some(t) => format!("Texture: {}x{}", t.width, t.height),
                None => "Texture: none".to_string(),
            });

            ui.separator();
            ui.heading("Lights");
            for slot in &state.lights {
                let c = slot.light.diffuse();
                let kind = match slot.light {
                    Light::Directional { .. } => "Directional",
                    Light::Point { .. } => "Point",
                };
                ui.label(format!(
                    "{kind} ({:.1}, {:.1}, {:.1}){}",
                    c.x,
                    c.y,
                    c.z,
                    if slot.enabled { "" } else { " off" }
                ));
            }

            ui.separator();
            ui.small("Arrows: orbit/raise | F1: HUD | Esc: quit");
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_label_names_backend() {
        let info = wgpu::AdapterInfo {
            name: "Test GPU".to_string(),
            vendor: 0,
            device: 0,
            device_type: wgpu::DeviceType::DiscreteGpu,
            driver: String::new(),
            driver_info: String::new(),
            backend: wgpu::Backend::Vulkan,
        };
        assert_eq!(
            adapter_label(&info),
            format!("GPU: Test GPU ({})", wgpu::Backend::Vulkan.to_str())
        );
    }
}
