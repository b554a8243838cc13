#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Surface appearance of a primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Material {
    Diffuse(Rgb),
    /// Diffuse lookup into an externally decoded raster.
    Texture { source: String },
}

impl Material {
    pub const fn diffuse(r: u8, g: u8, b: u8) -> Self {
        Material::Diffuse(Rgb::new(r, g, b))
    }

    pub fn texture(source: impl Into<String>) -> Self {
        Material::Texture {
            source: source.into(),
        }
    }

    pub fn color(&self) -> Option<Rgb> {
        match self {
            Material::Diffuse(c) => Some(*c),
            Material::Texture { .. } => None,
        }
    }
}
