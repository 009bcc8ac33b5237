// std
use std::f32::consts::PI;
use std::sync::Arc;
// crate
use crate::core::geometry::{nrm_dot_vec3f, Point2f, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{LightFlags, VisibilityTester};
use crate::core::precision::Float;
use crate::core::shape::Shape;
use crate::core::spectrum::Spectrum;

/// Area light with constant emitted radiance over its shape, on one
/// side or both.
pub struct DiffuseAreaLight {
    pub l_emit: Spectrum,
    pub shape: Arc<Shape>,
    pub two_sided: bool,
    pub area: Float,
    // inherited light data
    pub flags: u8,
}

impl DiffuseAreaLight {
    pub fn new(l_emit: &Spectrum, shape: Arc<Shape>, two_sided: bool) -> Self {
        let area: Float = shape.area();
        DiffuseAreaLight {
            l_emit: *l_emit,
            shape,
            two_sided,
            area,
            flags: LightFlags::Area as u8,
        }
    }
    /// Radiance leaving a point on the surface in direction *w*.
    pub fn l(&self, intr: &InteractionCommon, w: &Vector3f) -> Spectrum {
        if self.two_sided || nrm_dot_vec3f(&intr.n, w) > 0.0 as Float {
            self.l_emit
        } else {
            Spectrum::default()
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
        let p_shape: InteractionCommon = self.shape.sample_with_ref_point(iref, u, pdf);
        if *pdf == 0.0 as Float || (p_shape.p - iref.p).length_squared() == 0.0 as Float {
            *pdf = 0.0 as Float;
            return Spectrum::default();
        }
        *wi = (p_shape.p - iref.p).normalize();
        vis.p0 = iref.clone();
        vis.p1 = p_shape.clone();
        self.l(&p_shape, &-(*wi))
    }
    pub fn power(&self) -> Spectrum {
        let sides: Float = if self.two_sided { 2.0 } else { 1.0 };
        self.l_emit * (sides * self.area * PI as Float)
    }
    pub fn pdf_li(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        self.shape.pdf_with_ref_point(iref, wi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Normal3f, Point3f};
    use crate::core::transform::Transform;
    use crate::shapes::disk::Disk;

    fn unit_disk_light(two_sided: bool) -> DiffuseAreaLight {
        let disk: Disk = Disk::new(
            Transform::default(),
            Transform::default(),
            false,
            0.0,
            1.0,
            0.0,
            360.0,
        );
        DiffuseAreaLight::new(&Spectrum::new(3.0), Arc::new(Shape::Disk(disk)), two_sided)
    }

    #[test]
    fn emission_is_one_sided_by_default() {
        let light: DiffuseAreaLight = unit_disk_light(false);
        let mut intr: InteractionCommon = InteractionCommon::default();
        intr.n = Normal3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        let above: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        assert!(!light.l(&intr, &above).is_black());
        assert!(light.l(&intr, &-above).is_black());
        let both: DiffuseAreaLight = unit_disk_light(true);
        assert!(!both.l(&intr, &-above).is_black());
    }

    #[test]
    fn sampled_direction_points_at_the_shape() {
        let light: DiffuseAreaLight = unit_disk_light(false);
        let mut iref: InteractionCommon = InteractionCommon::default();
        iref.p = Point3f {
            x: 0.0,
            y: 0.0,
            z: 3.0,
        };
        iref.n = Normal3f {
            x: 0.0,
            y: 0.0,
            z: -1.0,
        };
        let mut wi: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0;
        let mut vis: VisibilityTester = VisibilityTester::default();
        let li: Spectrum = light.sample_li(
            &iref,
            Point2f { x: 0.3, y: 0.8 },
            &mut wi,
            &mut pdf,
            &mut vis,
        );
        assert!(pdf > 0.0);
        assert!(!li.is_black());
        assert!(wi.z < 0.0);
        // sampled point lies on the disk
        assert!(vis.p1.p.z.abs() < 1e-5);
        assert!(vis.p1.p.x * vis.p1.p.x + vis.p1.p.y * vis.p1.p.y <= 1.0 + 1e-4);
    }

    #[test]
    fn power_scales_with_area_and_sides() {
        let one: DiffuseAreaLight = unit_disk_light(false);
        let two: DiffuseAreaLight = unit_disk_light(true);
        assert!((one.power().c[0] - 3.0 * PI * PI).abs() < 1e-3);
        assert!((two.power().c[0] - 2.0 * 3.0 * PI * PI).abs() < 1e-3);
    }
}
