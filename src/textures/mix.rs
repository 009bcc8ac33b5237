// std
use std::ops::{Add, Mul};
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::precision::Float;
use crate::core::texture::Texture;

/// Blend of two textures steered by a scalar amount texture; amount 0
/// selects the first texture, amount 1 the second.
pub struct MixTexture<T> {
    pub tex1: Box<Texture<T>>,
    pub tex2: Box<Texture<T>>,
    pub amount: Box<Texture<Float>>,
}

impl<T> MixTexture<T>
where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T> + Mul<Float, Output = T>,
{
    pub fn new(tex1: Box<Texture<T>>, tex2: Box<Texture<T>>, amount: Box<Texture<Float>>) -> Self {
        MixTexture { tex1, tex2, amount }
    }
    pub fn evaluate(&self, si: &SurfaceInteraction) -> T {
        let t1: T = self.tex1.evaluate(si);
        let t2: T = self.tex2.evaluate(si);
        let amount: Float = self.amount.evaluate(si);
        t1 * (1.0 as Float - amount) + t2 * amount
    }
}
