use foundation::math::Vec3;

use super::material::Rgb;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Ambient { color: Rgb },
    Directional { color: Rgb, direction: Vec3 },
}

impl Light {
    pub fn ambient(color: Rgb) -> Self {
        Light::Ambient { color }
    }

    pub fn directional(color: Rgb, direction: Vec3) -> Self {
        Light::Directional { color, direction }
    }
}
