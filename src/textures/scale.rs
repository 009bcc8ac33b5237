// std
use std::ops::{Add, Mul};
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::precision::Float;
use crate::core::texture::Texture;

/// Product of two textures, evaluated pointwise.
pub struct ScaleTexture<T> {
    pub tex1: Box<Texture<T>>,
    pub tex2: Box<Texture<T>>,
}

impl<T> ScaleTexture<T>
where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T> + Mul<Float, Output = T>,
{
    pub fn new(tex1: Box<Texture<T>>, tex2: Box<Texture<T>>) -> Self {
        ScaleTexture { tex1, tex2 }
    }
    pub fn evaluate(&self, si: &SurfaceInteraction) -> T {
        self.tex1.evaluate(si) * self.tex2.evaluate(si)
    }
}
