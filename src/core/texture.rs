//! Texture dispatch. Textures are generic over their value type; the
//! renderer instantiates them for `Float` and `Spectrum`.

// std
use std::ops::{Add, Mul};
// crate
use crate::core::interaction::SurfaceInteraction;
use crate::core::precision::Float;
use crate::textures::constant::ConstantTexture;
use crate::textures::mix::MixTexture;
use crate::textures::scale::ScaleTexture;

pub enum Texture<T> {
    Constant(ConstantTexture<T>),
    Scale(ScaleTexture<T>),
    Mix(MixTexture<T>),
}

impl<T> Texture<T>
where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T> + Mul<Float, Output = T>,
{
    pub fn evaluate(&self, si: &SurfaceInteraction) -> T {
        match self {
            Texture::Constant(texture) => texture.evaluate(si),
            Texture::Scale(texture) => texture.evaluate(si),
            Texture::Mix(texture) => texture.evaluate(si),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Normal3f, Point2f, Point3f, Vector3f};
    use crate::core::spectrum::Spectrum;

    fn test_event() -> SurfaceInteraction {
        SurfaceInteraction::new(
            &Point3f::default(),
            &Vector3f::default(),
            Point2f { x: 0.5, y: 0.5 },
            &Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            &Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
            &Vector3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
            &Normal3f::default(),
            &Normal3f::default(),
            0.0,
        )
    }

    #[test]
    fn texture_tree_evaluates_composed_values() {
        let kd: Texture<Spectrum> = Texture::Mix(MixTexture::new(
            Box::new(Texture::Constant(ConstantTexture::new(Spectrum::new(0.0)))),
            Box::new(Texture::Constant(ConstantTexture::new(Spectrum::new(1.0)))),
            Box::new(Texture::Constant(ConstantTexture::new(0.25 as Float))),
        ));
        let si: SurfaceInteraction = test_event();
        let value: Spectrum = kd.evaluate(&si);
        assert!((value.c[0] - 0.25).abs() < 1e-6);
        let scaled: Texture<Spectrum> = Texture::Scale(ScaleTexture::new(
            Box::new(Texture::Constant(ConstantTexture::new(Spectrum::new(0.5)))),
            Box::new(Texture::Constant(ConstantTexture::new(Spectrum::new(0.5)))),
        ));
        assert!((scaled.evaluate(&si).c[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn float_textures_compose_like_spectra() {
        let roughness: Texture<Float> = Texture::Scale(ScaleTexture::new(
            Box::new(Texture::Constant(ConstantTexture::new(0.4 as Float))),
            Box::new(Texture::Constant(ConstantTexture::new(0.5 as Float))),
        ));
        let si: SurfaceInteraction = test_event();
        assert!((roughness.evaluate(&si) - 0.2).abs() < 1e-6);
    }
}
