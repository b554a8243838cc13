use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::bounds::GeoBounds;
use foundation::math::{UtmZone, Vec2};
use layers::NetworkStyle;
use scene::camera::MapCamera;
use serde::Deserialize;

/// `gridview.toml`. Every field is optional; defaults describe the Novi Sad
/// distribution map the viewer was built for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub document: PathBuf,
    pub utm_zone: u8,
    pub bounds: BoundsConfig,
    pub basemap: BasemapConfig,
    pub style: StyleConfig,
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from("Geographic.xml"),
            utm_zone: formats::DEFAULT_UTM_ZONE,
            bounds: BoundsConfig::default(),
            basemap: BasemapConfig::default(),
            style: StyleConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundsConfig {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            min_lon: 19.793909,
            max_lon: 19.894459,
            min_lat: 45.2325,
            max_lat: 45.277031,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasemapConfig {
    pub source: String,
    /// Raster size in pixels; also the scene extent of the map plane.
    pub width: f64,
    pub height: f64,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            source: "Images/map.jpg".to_string(),
            width: 1600.0,
            height: 1000.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub cube_size: f64,
    pub line_width: f64,
    pub stack_epsilon: f64,
    pub line_elevation: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = NetworkStyle::default();
        Self {
            cube_size: style.cube_size,
            line_width: style.line_width,
            stack_epsilon: style.stack_epsilon,
            line_elevation: style.line_elevation,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
    pub height: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            height: 2000.0,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&payload)
    }

    /// Rejects values that parse but cannot produce a scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=60).contains(&self.utm_zone) {
            return Err(ConfigError::Invalid {
                field: "utm_zone",
                reason: format!("{} is not a UTM zone in 1..=60", self.utm_zone),
            });
        }
        let positive = [
            ("basemap.width", self.basemap.width),
            ("basemap.height", self.basemap.height),
            ("style.cube_size", self.style.cube_size),
            ("style.line_width", self.style.line_width),
            ("style.stack_epsilon", self.style.stack_epsilon),
            ("camera.near", self.camera.near),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} must be positive"),
                });
            }
        }
        let c = self.camera;
        if !(c.fov_deg > 0.0 && c.fov_deg < 180.0) {
            return Err(ConfigError::Invalid {
                field: "camera.fov_deg",
                reason: format!("{} must lie in (0, 180)", c.fov_deg),
            });
        }
        if c.far.is_nan() || c.far <= c.near {
            return Err(ConfigError::Invalid {
                field: "camera.far",
                reason: format!("{} must exceed near {}", c.far, c.near),
            });
        }
        Ok(())
    }

    pub fn geo_bounds(&self) -> GeoBounds {
        let b = self.bounds;
        GeoBounds::new(b.min_lon, b.max_lon, b.min_lat, b.max_lat)
    }

    pub fn zone(&self) -> UtmZone {
        UtmZone::north(self.utm_zone)
    }

    pub fn map_size(&self) -> Vec2 {
        Vec2::new(self.basemap.width, self.basemap.height)
    }

    pub fn network_style(&self) -> NetworkStyle {
        NetworkStyle {
            cube_size: self.style.cube_size,
            line_width: self.style.line_width,
            stack_epsilon: self.style.stack_epsilon,
            line_elevation: self.style.line_elevation,
            ..NetworkStyle::default()
        }
    }

    pub fn map_camera(&self) -> MapCamera {
        let c = self.camera;
        MapCamera::top_down(c.height, c.fov_deg, c.near, c.far)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(f, "read {path:?}: {source}"),
            ConfigError::Parse(e) => write!(f, "invalid config: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid config {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}
