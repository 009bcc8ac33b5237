//! Pinhole / thin-lens perspective camera.

// std
use std::sync::Arc;
// crate
use crate::core::film::Sensor;
use crate::core::geometry::{
    Bounds2f, Point2f, Point3f, Ray, RayDifferential, Vector3f,
};
use crate::core::math::lerp;
use crate::core::precision::Float;
use crate::core::sampler::CameraSample;
use crate::core::sampling::concentric_sample_disk;
use crate::core::transform::{AnimatedTransform, Transform};

pub struct PerspectiveCamera {
    // camera data
    pub camera_to_world: AnimatedTransform,
    pub shutter_open: Float,
    pub shutter_close: Float,
    pub sensor: Arc<Sensor>,
    // projective camera data
    camera_to_screen: Transform,
    raster_to_camera: Transform,
    screen_to_raster: Transform,
    raster_to_screen: Transform,
    lens_radius: Float,
    focal_distance: Float,
    // camera-space displacement of a one-pixel shift
    dx_camera: Vector3f,
    dy_camera: Vector3f,
}

impl PerspectiveCamera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera_to_world: AnimatedTransform,
        screen_window: Bounds2f,
        shutter_open: Float,
        shutter_close: Float,
        lens_radius: Float,
        focal_distance: Float,
        fov: Float,
        sensor: Arc<Sensor>,
    ) -> Self {
        let camera_to_screen: Transform = Transform::perspective(fov, 1e-2, 1000.0);
        // raster space spans the resolution with y growing downward
        let screen_to_raster: Transform = Transform::scale(
            sensor.full_resolution.x as Float,
            sensor.full_resolution.y as Float,
            1.0,
        ) * Transform::scale(
            1.0 as Float / (screen_window.p_max.x - screen_window.p_min.x),
            1.0 as Float / (screen_window.p_min.y - screen_window.p_max.y),
            1.0,
        ) * Transform::translate(&Vector3f {
            x: -screen_window.p_min.x,
            y: -screen_window.p_max.y,
            z: 0.0,
        });
        let raster_to_screen: Transform = screen_to_raster.inverse();
        let raster_to_camera: Transform = camera_to_screen.inverse() * raster_to_screen;
        let dx_camera: Vector3f = raster_to_camera.transform_point(&Point3f {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        }) - raster_to_camera.transform_point(&Point3f::default());
        let dy_camera: Vector3f = raster_to_camera.transform_point(&Point3f {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        }) - raster_to_camera.transform_point(&Point3f::default());
        PerspectiveCamera {
            camera_to_world,
            shutter_open,
            shutter_close,
            sensor,
            camera_to_screen,
            raster_to_camera,
            screen_to_raster,
            raster_to_screen,
            lens_radius,
            focal_distance,
            dx_camera,
            dy_camera,
        }
    }
    /// Camera-space primary ray for the sample, before the world
    /// transform; shared by both generation paths.
    fn camera_space_ray(&self, sample: &CameraSample) -> (Ray, Point3f) {
        let p_raster: Point3f = Point3f {
            x: sample.sensor_point.x,
            y: sample.sensor_point.y,
            z: 0.0,
        };
        let p_camera: Point3f = self.raster_to_camera.transform_point(&p_raster);
        let mut ray: Ray = Ray::new(
            Point3f::default(),
            Vector3f::from(p_camera).normalize(),
        );
        if self.lens_radius > 0.0 as Float {
            // thin lens: sample the aperture and bend the ray through
            // the plane of focus
            let p_lens: Point2f =
                concentric_sample_disk(&sample.lens_point) * self.lens_radius;
            let ft: Float = self.focal_distance / ray.d.z;
            let p_focus: Point3f = ray.position(ft);
            ray.o = Point3f {
                x: p_lens.x,
                y: p_lens.y,
                z: 0.0,
            };
            ray.d = (p_focus - ray.o).normalize();
        }
        ray.time = lerp(sample.time, self.shutter_open, self.shutter_close);
        (ray, p_camera)
    }
    pub fn generate_ray(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let (camera_ray, _p_camera) = self.camera_space_ray(sample);
        *ray = self.camera_to_world.transform_ray(&camera_ray);
        1.0 as Float
    }
    pub fn generate_ray_differential(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let (mut camera_ray, p_camera) = self.camera_space_ray(sample);
        let differential: RayDifferential = if self.lens_radius > 0.0 as Float {
            // offset rays leave the same lens point toward the focus
            // points of the shifted pinhole directions
            let p_lens: Point3f = camera_ray.o;
            let dx: Vector3f = Vector3f::from(p_camera + self.dx_camera).normalize();
            let ft_x: Float = self.focal_distance / dx.z;
            let p_focus_x: Point3f = Point3f::default() + dx * ft_x;
            let dy: Vector3f = Vector3f::from(p_camera + self.dy_camera).normalize();
            let ft_y: Float = self.focal_distance / dy.z;
            let p_focus_y: Point3f = Point3f::default() + dy * ft_y;
            RayDifferential {
                rx_origin: p_lens,
                ry_origin: p_lens,
                rx_direction: (p_focus_x - p_lens).normalize(),
                ry_direction: (p_focus_y - p_lens).normalize(),
            }
        } else {
            RayDifferential {
                rx_origin: camera_ray.o,
                ry_origin: camera_ray.o,
                rx_direction: (Vector3f::from(p_camera) + self.dx_camera).normalize(),
                ry_direction: (Vector3f::from(p_camera) + self.dy_camera).normalize(),
            }
        };
        camera_ray.differential = Some(differential);
        *ray = self.camera_to_world.transform_ray(&camera_ray);
        1.0 as Float
    }
    pub fn raster_to_camera(&self) -> &Transform {
        &self.raster_to_camera
    }
    pub fn camera_to_raster(&self, p: &Point3f) -> Point3f {
        self.screen_to_raster
            .transform_point(&self.camera_to_screen.transform_point(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Filter;
    use crate::core::geometry::{pnt3_distancef, Point2i, Vector2f};
    use crate::filters::boxfilter::BoxFilter;

    fn test_camera(lens_radius: Float) -> PerspectiveCamera {
        let sensor: Arc<Sensor> = Arc::new(Sensor::new(
            Point2i { x: 64, y: 48 },
            Bounds2f {
                p_min: Point2f { x: 0.0, y: 0.0 },
                p_max: Point2f { x: 1.0, y: 1.0 },
            },
            Filter::Bx(BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })),
            0.035,
            String::from("camera_test.pfm"),
            1.0,
        ));
        let aspect: Float = 48.0 / 64.0;
        let screen_window: Bounds2f = Bounds2f {
            p_min: Point2f {
                x: -1.0,
                y: -aspect,
            },
            p_max: Point2f { x: 1.0, y: aspect },
        };
        PerspectiveCamera::new(
            AnimatedTransform::new(&Transform::default(), 0.0, &Transform::default(), 1.0),
            screen_window,
            0.0,
            1.0,
            lens_radius,
            5.0,
            45.0,
            sensor,
        )
    }

    #[test]
    fn center_ray_points_down_the_axis() {
        let camera: PerspectiveCamera = test_camera(0.0);
        let sample: CameraSample = CameraSample {
            sensor_point: Point2f { x: 32.0, y: 24.0 },
            lens_point: Point2f { x: 0.5, y: 0.5 },
            time: 0.0,
        };
        let mut ray: Ray = Ray::default();
        assert_eq!(camera.generate_ray(&sample, &mut ray), 1.0);
        assert_eq!(ray.o, Point3f::default());
        assert!(ray.d.x.abs() < 1e-5);
        assert!(ray.d.y.abs() < 1e-5);
        assert!(ray.d.z > 0.0);
    }

    #[test]
    fn raster_camera_round_trip() {
        let camera: PerspectiveCamera = test_camera(0.0);
        for &(x, y) in [(0.0, 0.0), (32.0, 24.0), (63.0, 12.0)].iter() {
            let p_raster: Point3f = Point3f { x, y, z: 0.0 };
            let p_camera: Point3f = camera.raster_to_camera().transform_point(&p_raster);
            let back: Point3f = camera.camera_to_raster(&p_camera);
            assert!(pnt3_distancef(&p_raster, &back) < 1e-4);
        }
    }

    #[test]
    fn lens_rays_converge_at_the_plane_of_focus() {
        let camera: PerspectiveCamera = test_camera(0.1);
        let sample_center: CameraSample = CameraSample {
            sensor_point: Point2f { x: 20.0, y: 30.0 },
            lens_point: Point2f { x: 0.5, y: 0.5 },
            time: 0.0,
        };
        let sample_edge: CameraSample = CameraSample {
            sensor_point: Point2f { x: 20.0, y: 30.0 },
            lens_point: Point2f { x: 0.9, y: 0.5 },
            time: 0.0,
        };
        let mut ray_a: Ray = Ray::default();
        let mut ray_b: Ray = Ray::default();
        camera.generate_ray(&sample_center, &mut ray_a);
        camera.generate_ray(&sample_edge, &mut ray_b);
        // both rays pass through the same point at the focal plane
        let ta: Float = 5.0 / ray_a.d.z;
        let tb: Float = 5.0 / ray_b.d.z;
        assert!(pnt3_distancef(&ray_a.position(ta), &ray_b.position(tb)) < 1e-3);
        // and differ elsewhere
        assert!(pnt3_distancef(&ray_a.position(0.1), &ray_b.position(0.1)) > 1e-4);
    }

    #[test]
    fn shutter_time_interpolates() {
        let camera: PerspectiveCamera = test_camera(0.0);
        let sample: CameraSample = CameraSample {
            sensor_point: Point2f { x: 1.0, y: 1.0 },
            lens_point: Point2f { x: 0.5, y: 0.5 },
            time: 0.25,
        };
        let mut ray: Ray = Ray::default();
        camera.generate_ray(&sample, &mut ray);
        assert!((ray.time - 0.25).abs() < 1e-6);
    }

    #[test]
    fn offset_rays_shift_by_one_pixel() {
        let camera: PerspectiveCamera = test_camera(0.0);
        let sample: CameraSample = CameraSample {
            sensor_point: Point2f { x: 10.0, y: 40.0 },
            lens_point: Point2f { x: 0.5, y: 0.5 },
            time: 0.0,
        };
        let shifted: CameraSample = CameraSample {
            sensor_point: Point2f { x: 11.0, y: 40.0 },
            lens_point: Point2f { x: 0.5, y: 0.5 },
            time: 0.0,
        };
        let mut ray: Ray = Ray::default();
        let mut ray_shifted: Ray = Ray::default();
        camera.generate_ray_differential(&sample, &mut ray);
        camera.generate_ray(&shifted, &mut ray_shifted);
        let diff: RayDifferential = ray.differential.unwrap();
        assert!((diff.rx_direction - ray_shifted.d).length() < 1e-5);
        assert_eq!(diff.rx_origin, ray_shifted.o);
    }
}
