// std
use std::f32::consts::PI;
// crate
use crate::core::geometry::{pnt3_distance_squaredf, Point2f, Point3f, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{LightFlags, VisibilityTester};
use crate::core::math::{clamp_t, radians};
use crate::core::precision::Float;
use crate::core::spectrum::Spectrum;
use crate::core::transform::Transform;

/// Point emitter restricted to a cone, with a smooth quartic falloff
/// between the full-intensity inner cone and the zero outer cone.
pub struct SpotLight {
    pub p_light: Point3f,
    pub i: Spectrum,
    pub cos_total_width: Float,
    pub cos_falloff_start: Float,
    // inherited light data
    pub flags: u8,
    pub light_to_world: Transform,
    pub world_to_light: Transform,
}

impl SpotLight {
    /// Angles are in degrees; `total_width` is the outer half-angle,
    /// `falloff_start` the inner one.
    pub fn new(
        light_to_world: &Transform,
        i: &Spectrum,
        total_width: Float,
        falloff_start: Float,
    ) -> Self {
        SpotLight {
            p_light: light_to_world.transform_point(&Point3f::default()),
            i: *i,
            cos_total_width: radians(clamp_t(total_width, 0.0, 180.0)).cos(),
            cos_falloff_start: radians(clamp_t(falloff_start, 0.0, total_width)).cos(),
            flags: LightFlags::DeltaPosition as u8,
            light_to_world: *light_to_world,
            world_to_light: light_to_world.inverse(),
        }
    }
    /// Attenuation for a world-space direction leaving the light.
    pub fn falloff(&self, w: &Vector3f) -> Float {
        let wl: Vector3f = self.world_to_light.transform_vector(w).normalize();
        let cos_theta: Float = wl.z;
        if cos_theta < self.cos_total_width {
            return 0.0 as Float;
        }
        if cos_theta > self.cos_falloff_start {
            return 1.0 as Float;
        }
        let delta: Float =
            (cos_theta - self.cos_total_width) / (self.cos_falloff_start - self.cos_total_width);
        (delta * delta) * (delta * delta)
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
        self.i * (self.falloff(&-(*wi)) / pnt3_distance_squaredf(&self.p_light, &iref.p))
    }
    pub fn power(&self) -> Spectrum {
        self.i
            * (2.0 as Float
                * PI as Float
                * (1.0 as Float
                    - 0.5 as Float * (self.cos_falloff_start + self.cos_total_width)))
    }
    pub fn pdf_li(&self, _iref: &InteractionCommon, _wi: &Vector3f) -> Float {
        0.0 as Float
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_spot(total: Float, start: Float) -> SpotLight {
        // light at the origin, cone axis along +z in the light frame
        SpotLight::new(&Transform::default(), &Spectrum::new(10.0), total, start)
    }

    #[test]
    fn falloff_is_one_inside_and_zero_outside() {
        let light: SpotLight = axis_spot(40.0, 20.0);
        let axis: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        assert_eq!(light.falloff(&axis), 1.0);
        let outside: Vector3f = Vector3f {
            x: radians(60.0).sin(),
            y: 0.0,
            z: radians(60.0).cos(),
        };
        assert_eq!(light.falloff(&outside), 0.0);
        let between: Vector3f = Vector3f {
            x: radians(30.0).sin(),
            y: 0.0,
            z: radians(30.0).cos(),
        };
        let f: Float = light.falloff(&between);
        assert!(f > 0.0 && f < 1.0);
    }

    #[test]
    fn power_matches_cone_solid_angle() {
        let light: SpotLight = axis_spot(90.0, 90.0);
        // hemisphere cone: 2 pi (1 - 0.5 (0 + 0)) = 2 pi
        assert!((light.power().c[0] - 10.0 * 2.0 * PI).abs() < 1e-3);
    }

    #[test]
    fn illumination_respects_the_cone() {
        let light: SpotLight = axis_spot(45.0, 45.0);
        // a receiver on the cone axis
        let mut on_axis: InteractionCommon = InteractionCommon::default();
        on_axis.p = Point3f {
            x: 0.0,
            y: 0.0,
            z: 2.0,
        };
        let mut wi: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0;
        let mut vis: VisibilityTester = VisibilityTester::default();
        let li: Spectrum =
            light.sample_li(&on_axis, Point2f::default(), &mut wi, &mut pdf, &mut vis);
        assert!(li.c[0] > 0.0);
        // a receiver far off axis gets nothing
        let mut off_axis: InteractionCommon = InteractionCommon::default();
        off_axis.p = Point3f {
            x: 5.0,
            y: 0.0,
            z: -1.0,
        };
        let li_off: Spectrum =
            light.sample_li(&off_axis, Point2f::default(), &mut wi, &mut pdf, &mut vis);
        assert!(li_off.is_black());
    }
}
