// std
use std::f32::consts::PI;
// crate
use crate::core::geometry::{pnt3_distance_squaredf, Point2f, Point3f, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{LightFlags, VisibilityTester};
use crate::core::precision::Float;
use crate::core::spectrum::Spectrum;
use crate::core::transform::Transform;

/// Isotropic point emitter: a delta distribution over direction.
pub struct PointLight {
    pub p_light: Point3f,
    pub i: Spectrum,
    // inherited light data
    pub flags: u8,
    pub light_to_world: Transform,
    pub world_to_light: Transform,
}

impl PointLight {
    pub fn new(light_to_world: &Transform, i: &Spectrum) -> Self {
        PointLight {
            p_light: light_to_world.transform_point(&Point3f::default()),
            i: *i,
            flags: LightFlags::DeltaPosition as u8,
            light_to_world: *light_to_world,
            world_to_light: light_to_world.inverse(),
        }
    }
    // Light
    pub fn sample_li(
        &self,
        iref: &InteractionCommon,
        _u: Point2f,
        wi: &mut Vector3f,
        pdf: &mut Float,
        vis: &mut VisibilityTester,
    ) -> Spectrum {
        *wi = (self.p_light - iref.p).normalize();
        *pdf = 1.0 as Float;
        vis.p0 = iref.clone();
        vis.p1 = InteractionCommon {
            p: self.p_light,
            time: iref.time,
            ..InteractionCommon::default()
        };
        self.i / pnt3_distance_squaredf(&self.p_light, &iref.p)
    }
    pub fn power(&self) -> Spectrum {
        self.i * (4.0 as Float * PI as Float)
    }
    pub fn pdf_li(&self, _iref: &InteractionCommon, _wi: &Vector3f) -> Float {
        0.0 as Float
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radiance_falls_off_with_squared_distance() {
        let light: PointLight = PointLight::new(
            &Transform::translate(&Vector3f {
                x: 0.0,
                y: 2.0,
                z: 0.0,
            }),
            &Spectrum::new(8.0),
        );
        let iref: InteractionCommon = InteractionCommon::default();
        let mut wi: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0;
        let mut vis: VisibilityTester = VisibilityTester::default();
        let li: Spectrum = light.sample_li(&iref, Point2f::default(), &mut wi, &mut pdf, &mut vis);
        assert_eq!(pdf, 1.0);
        assert!((wi.y - 1.0).abs() < 1e-6);
        assert!((li.c[0] - 2.0).abs() < 1e-5);
        assert_eq!(vis.p1.p, light.p_light);
    }

    #[test]
    fn power_integrates_over_the_sphere() {
        let light: PointLight =
            PointLight::new(&Transform::default(), &Spectrum::new(1.0));
        assert!((light.power().c[0] - 4.0 * PI).abs() < 1e-4);
    }
}
