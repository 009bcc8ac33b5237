// std
use std::f32::consts::PI;
use std::sync::RwLock;
// crate
use crate::core::geometry::{Bounds3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{LightFlags, VisibilityTester};
use crate::core::precision::Float;
use crate::core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};
use crate::core::spectrum::Spectrum;

/// Constant-radiance environment: every ray that escapes the scene
/// picks up the same background radiance. The scene bounds are not
/// known at construction time, so the enclosing sphere is filled in
/// by `preprocess`.
pub struct InfiniteLight {
    pub l: Spectrum,
    pub world_center: RwLock<Point3f>,
    pub world_radius: RwLock<Float>,
    // inherited light data
    pub flags: u8,
}

impl InfiniteLight {
    pub fn new(l: &Spectrum) -> Self {
        InfiniteLight {
            l: *l,
            world_center: RwLock::new(Point3f::default()),
            world_radius: RwLock::new(1.0 as Float),
            flags: LightFlags::Infinite as u8,
        }
    }
    pub fn preprocess(&self, world_bound: &Bounds3f) {
        let mut center = self.world_center.write().unwrap();
        let mut radius = self.world_radius.write().unwrap();
        world_bound.bounding_sphere(&mut center, &mut radius);
        if *radius <= 0.0 as Float {
            *radius = 1.0 as Float;
        }
    }
    // Light
    pub fn sample_li(
        &self,
        iref: &InteractionCommon,
        u: Point2f,
        wi: &mut Vector3f,
        pdf: &mut Float,
        vis: &mut VisibilityTester,
    ) -> Spectrum {
        *wi = uniform_sample_sphere(u);
        *pdf = uniform_sphere_pdf();
        let world_radius: Float = *self.world_radius.read().unwrap();
        vis.p0 = iref.clone();
        vis.p1 = InteractionCommon {
            p: iref.p + *wi * (2.0 as Float * world_radius),
            time: iref.time,
            ..InteractionCommon::default()
        };
        self.l
    }
    pub fn power(&self) -> Spectrum {
        let world_radius: Float = *self.world_radius.read().unwrap();
        self.l * (PI as Float * world_radius * world_radius)
    }
    pub fn le(&self, _ray: &Ray) -> Spectrum {
        self.l
    }
    pub fn pdf_li(&self, _iref: &InteractionCommon, _wi: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_escaping_ray_sees_the_background() {
        let light: InfiniteLight = InfiniteLight::new(&Spectrum::new(0.75));
        let ray: Ray = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 0.3,
                y: -0.6,
                z: 0.4,
            },
        );
        assert_eq!(light.le(&ray), Spectrum::new(0.75));
    }

    #[test]
    fn sampled_beam_reaches_past_the_scene() {
        let light: InfiniteLight = InfiniteLight::new(&Spectrum::new(1.0));
        light.preprocess(&Bounds3f::new(
            Point3f {
                x: -2.0,
                y: -2.0,
                z: -2.0,
            },
            Point3f {
                x: 2.0,
                y: 2.0,
                z: 2.0,
            },
        ));
        let iref: InteractionCommon = InteractionCommon::default();
        let mut wi: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0;
        let mut vis: VisibilityTester = VisibilityTester::default();
        let li: Spectrum = light.sample_li(
            &iref,
            Point2f { x: 0.4, y: 0.9 },
            &mut wi,
            &mut pdf,
            &mut vis,
        );
        assert_eq!(li, Spectrum::new(1.0));
        assert!((pdf - uniform_sphere_pdf()).abs() < 1e-6);
        assert!((vis.p1.p - iref.p).length() > 4.0);
    }
}
