use crate::camera::OrbitCamera;
use crate::drawable::{DrawItem, DrawList, Drawable, MeshKind, TexturedBox};
use crate::geometry::CubeGeometry;
use crate::input::HeldKeys;
use crate::render_state::RenderState;
use crate::texture::TextureImage;
use glam::{Mat4, Vec3, Vec4};
use std::path::PathBuf;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_TEXTURE: &str = "TreasureChest.jpg";

/// Where the lit cube sits relative to the helper box at the origin. Far
/// enough along +X that the orbit never brings the eye within the near plane
/// of the cube.
pub const CUBE_OFFSET: Vec3 = Vec3::new(6.0, 0.0, 0.0);

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

/// Startup parameters for [`Scene::setup`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    pub texture_path: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            texture_path: PathBuf::from(DEFAULT_TEXTURE),
        }
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub clear_color: Vec4,
    pub clear_depth: f32,
    pub state: RenderState,
    pub texture_bound: bool,
    pub draws: DrawList,
}

impl FramePlan {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// The whole demo scene: geometry, fixed render state, texture, helper box
/// and the orbiting camera. Owned by the application, no globals.
pub struct Scene {
    geometry: CubeGeometry,
    state: RenderState,
    texture: Option<TextureImage>,
    secondary: Option<Box<dyn Drawable>>,
    camera: OrbitCamera,
}

impl Scene {
    /// One-time setup. A missing or unreadable texture is not an error.
    pub fn setup(config: &SceneConfig) -> Result<Self, SceneError> {
        if config.width == 0 || config.height == 0 {
            return Err(SceneError::InvalidViewport {
                width: config.width,
                height: config.height,
            });
        }

        let geometry = CubeGeometry::new();
        let state = RenderState::lit_scene(config.width, config.height);
        let texture = TextureImage::load_or_warn(&config.texture_path);

        tracing::info!(
            vertices = geometry.vertices().len(),
            indices = geometry.indices().len(),
            lights = state.lights.len(),
            textured = texture.is_some(),
            "scene setup complete"
        );

        Ok(Self {
            geometry,
            state,
            texture,
            secondary: Some(Box::new(TexturedBox::new())),
            camera: OrbitCamera::default(),
        })
    }

    pub fn geometry(&self) -> &CubeGeometry {
        &self.geometry
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn texture(&self) -> Option<&TextureImage> {
        self.texture.as_ref()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Advance the camera by one frame of input.
    pub fn update(&mut self, keys: HeldKeys, dt: f32) {
        self.camera.update(keys, dt);
    }

    /// Build the draw plan for the current camera: helper box at the origin,
    /// then the material-lit cube.
    pub fn frame(&self) -> FramePlan {
        let mut draws = DrawList::new();
        if let Some(secondary) = &self.secondary {
            secondary.draw(Mat4::IDENTITY, &mut draws);
        }
        draws.push(DrawItem {
            mesh: MeshKind::Cube,
            world: Mat4::from_translation(CUBE_OFFSET),
            textured: false,
        });

        let plan = FramePlan {
            view: self.camera.view_matrix(),
            projection: self.state.projection.matrix(),
            eye: self.camera.eye(),
            clear_color: self.state.clear_color,
            clear_depth: self.state.clear_depth,
            state: self.state.clone(),
            texture_bound: self.texture.is_some(),
            draws,
        };
        tracing::trace!(eye = ?plan.eye, draws = plan.draws.len(), "frame planned");
        plan
    }

    /// Release the texture and helper object. Safe to call more than once.
    pub fn release(&mut self) {
        if self.texture.take().is_some() {
            tracing::debug!("released texture");
        }
        if self.secondary.take().is_some() {
            tracing::debug!("released secondary object");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::WHITE;

    fn config_without_texture() -> SceneConfig {
        SceneConfig {
            texture_path: PathBuf::from("/nonexistent/TreasureChest.jpg"),
            ..SceneConfig::default()
        }
    }

    #[test]
    fn missing_texture_does_not_abort() {
        let scene = Scene::setup(&config_without_texture()).unwrap();
        assert!(scene.texture().is_none());
        let plan = scene.frame();
        assert!(!plan.texture_bound);
        assert_eq!(plan.draws.len(), 2);
    }

    #[test]
    fn zero_viewport_fails() {
        let config = SceneConfig {
            width: 0,
            ..config_without_texture()
        };
        assert!(matches!(
            Scene::setup(&config),
            Err(SceneError::InvalidViewport { width: 0, .. })
        ));
    }

    #[test]
    fn loads_texture_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("chest.png");
        image::RgbaImage::new(2, 2).save(&path).unwrap();
        let scene = Scene::setup(&SceneConfig {
            texture_path: path,
            ..SceneConfig::default()
        })
        .unwrap();
        assert!(scene.texture().is_some());
        assert!(scene.frame().texture_bound);
    }

    #[test]
    fn frame_draws_box_then_cube() {
        let scene = Scene::setup(&config_without_texture()).unwrap();
        let plan = scene.frame();
        let items = plan.draws.items();
        assert_eq!(items[0].mesh, MeshKind::TexturedBox);
        assert_eq!(items[0].world, Mat4::IDENTITY);
        assert_eq!(items[1].mesh, MeshKind::Cube);
        assert!(!items[1].textured);
        assert_eq!(plan.clear_color, WHITE);
        assert_eq!(plan.clear_depth, 1.0);
    }

    #[test]
    fn orbit_stays_clear_of_cube() {
        let mut scene = Scene::setup(&config_without_texture()).unwrap();
        let near = scene.state().projection.near;
        let right = HeldKeys {
            right: true,
            ..Default::default()
        };
        for _ in 0..64 {
            let eye = scene.camera().eye();
            // Distance from the eye to the nearest point of the unit cube.
            let gap = ((eye - CUBE_OFFSET).abs() - Vec3::ONE).max(Vec3::ZERO);
            assert!(gap.length() > near, "eye {eye} too close to cube");
            scene.update(right, 0.2);
        }
    }

    #[test]
    fn frame_follows_camera() {
        let mut scene = Scene::setup(&config_without_texture()).unwrap();
        let before = scene.frame();
        scene.update(
            HeldKeys {
                right: true,
                ..Default::default()
            },
            1.0,
        );
        let after = scene.frame();
        assert_ne!(before.view, after.view);
        assert_eq!(before.projection, after.projection);
        assert_eq!(after.eye, scene.camera().eye());
    }

    #[test]
    fn state_persists_across_frames() {
        let mut scene = Scene::setup(&config_without_texture()).unwrap();
        let up = HeldKeys {
            up: true,
            ..Default::default()
        };
        scene.update(up, 0.2);
        scene.update(up, 0.2);
        assert!((scene.camera().height - 4.0).abs() < 1e-6);
    }

    #[test]
    fn release_is_idempotent() {
        let mut scene = Scene::setup(&config_without_texture()).unwrap();
        scene.release();
        scene.release();
        let plan = scene.frame();
        assert!(!plan.texture_bound);
        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws.items()[0].mesh, MeshKind::Cube);
    }
}
