//! Fixed-function lights and materials.
//!
//! Lights follow the classic per-vertex model: each light carries ambient,
//! diffuse and specular terms derived from one base color, and point lights
//! carry a range plus constant/linear/quadratic attenuation.

use glam::{Vec3, Vec4};

pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
pub const YELLOW: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

const AMBIENT_SCALE: f32 = 0.4;
const SPECULAR_SCALE: f32 = 0.6;
const POINT_RANGE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel rays travelling along `direction`.
    Directional { direction: Vec3, color: Vec4 },
    /// Omnidirectional light emitted from `position`.
    Point { position: Vec3, color: Vec4 },
}

impl Light {
    pub fn color(&self) -> Vec4 {
        match *self {
            Light::Directional { color, .. } | Light::Point { color, .. } => color,
        }
    }

    pub fn ambient(&self) -> Vec4 {
        (self.color() * AMBIENT_SCALE).with_w(self.color().w)
    }

    pub fn diffuse(&self) -> Vec4 {
        self.color()
    }

    pub fn specular(&self) -> Vec4 {
        (self.color() * SPECULAR_SCALE).with_w(self.color().w)
    }

    /// Maximum distance a point light reaches. Directional lights are unbounded.
    pub fn range(&self) -> f32 {
        match self {
            Light::Directional { .. } => f32::INFINITY,
            Light::Point { .. } => POINT_RANGE,
        }
    }

    /// Constant, linear and quadratic attenuation coefficients.
    pub fn attenuation(&self) -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }
}

/// Surface reflectance shared by everything drawn in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    pub power: f32,
}

impl Material {
    pub fn new(ambient: Vec4, diffuse: Vec4, specular: Vec4, emissive: Vec4, power: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            emissive,
            power,
        }
    }

    pub fn yellow() -> Self {
        Self::new(YELLOW, YELLOW, YELLOW, BLACK, 2.0)
    }

    pub fn white() -> Self {
        Self::new(WHITE, WHITE, WHITE, BLACK, 2.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::white()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_light_terms() {
        let light = Light::Point {
            position: Vec3::ONE,
            color: RED,
        };
        assert_eq!(light.diffuse(), RED);
        assert!((light.ambient().x - 0.4).abs() < 1e-6);
        assert_eq!(light.ambient().w, 1.0);
        assert!((light.specular().x - 0.6).abs() < 1e-6);
        assert_eq!(light.range(), 1000.0);
    }

    #[test]
    fn directional_lights_are_unbounded() {
        let light = Light::Directional {
            direction: Vec3::X,
            color: WHITE,
        };
        assert_eq!(light.range(), f32::INFINITY);
        assert_eq!(light.attenuation(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn materials_share_power() {
        let yellow = Material::yellow();
        assert_eq!(yellow.diffuse, YELLOW);
        assert_eq!(yellow.emissive, BLACK);
        assert_eq!(yellow.power, Material::white().power);
        assert_eq!(Material::default(), Material::white());
    }
}
