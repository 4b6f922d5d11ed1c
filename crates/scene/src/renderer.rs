use crate::drawable::MeshKind;
use crate::lighting::Light;
use crate::render_state::FillMode;
use crate::scene::FramePlan;
use std::fmt::Write;

/// Backend-agnostic interface. Every renderer consumes a [`FramePlan`].
///
/// Renderers read the plan and produce output; they never mutate the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, plan: &FramePlan) -> Self::Output;
}

/// Text renderer for headless runs, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &FramePlan) -> String {
        let mut out = String::new();
        let e = plan.eye;
        let c = plan.clear_color;
        let _ = writeln!(out, "=== Frame ===");
        let _ = writeln!(out, "Eye: ({:.2}, {:.2}, {:.2}) -> origin", e.x, e.y, e.z);
        let _ = writeln!(
            out,
            "Clear: rgba({:.2}, {:.2}, {:.2}, {:.2}) depth={:.1}",
            c.x, c.y, c.z, c.w, plan.clear_depth
        );
        let _ = writeln!(
            out,
            "State: fill={} normalize_normals={} specular={} texture={}",
            match plan.state.fill_mode {
                FillMode::Solid => "solid",
                FillMode::Wireframe => "wireframe",
            },
            plan.state.normalize_normals,
            plan.state.specular_enabled,
            if plan.texture_bound { "bound" } else { "none" },
        );

        for (slot, l) in plan.state.lights.iter().enumerate() {
            let d = l.light.diffuse();
            let kind = match l.light {
                Light::Directional { direction: v, .. } => {
                    format!("directional dir=({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
                }
                Light::Point { position: v, .. } => {
                    format!("point pos=({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
                }
            };
            let _ = writeln!(
                out,
                "  light[{slot}] {kind} color=({:.2}, {:.2}, {:.2}) enabled={}",
                d.x, d.y, d.z, l.enabled
            );
        }

        let _ = writeln!(out, "Draws: {}", plan.draws.len());
        for item in plan.draws.items() {
            let t = item.world.w_axis;
            let mesh = match item.mesh {
                MeshKind::Cube => "cube",
                MeshKind::TexturedBox => "box",
            };
            let _ = writeln!(
                out,
                "  {mesh} at ({:.2}, {:.2}, {:.2}) textured={}",
                t.x,
                t.y,
                t.z,
                item.textured && plan.texture_bound
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneConfig};
    use std::path::PathBuf;

    fn untextured_scene() -> Scene {
        Scene::setup(&SceneConfig {
            texture_path: PathBuf::from("/nonexistent.png"),
            ..SceneConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn debug_renderer_default_frame() {
        let scene = untextured_scene();
        let output = DebugTextRenderer::new().render(&scene.frame());

        assert!(output.contains(", 2.00, -3.00) -> origin"));
        assert!(output.contains("texture=none"));
        assert!(output.contains("Draws: 2"));
        assert!(output.contains("box at (0.00, 0.00, 0.00) textured=false"));
        assert!(output.contains("cube at (6.00, 0.00, 0.00)"));
        assert!(output.contains("light[1] point pos=(1.00, 1.00, 1.00) color=(1.00, 0.00, 0.00)"));
    }

    #[test]
    fn debug_renderer_reports_state() {
        let output = DebugTextRenderer::new().render(&untextured_scene().frame());
        assert!(output.contains("fill=solid"));
        assert!(output.contains("normalize_normals=true"));
        assert!(output.contains("specular=false"));
        assert!(output.contains("depth=1.0"));
    }
}
