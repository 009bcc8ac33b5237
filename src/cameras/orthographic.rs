//! Orthographic camera: parallel rays through the sensor plane,
//! optionally with a
//! thin lens for depth of field.

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

pub struct OrthographicCamera {
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
    dx_camera: Vector3f,
    dy_camera: Vector3f,
}

impl OrthographicCamera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera_to_world: AnimatedTransform,
        screen_window: Bounds2f,
        shutter_open: Float,
        shutter_close: Float,
        lens_radius: Float,
        focal_distance: Float,
        sensor: Arc<Sensor>,
    ) -> Self {
        let camera_to_screen: Transform = Transform::orthographic(0.0, 1.0);
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
        // a pixel shift moves the ray origin, not its direction
        let dx_camera: Vector3f = raster_to_camera.transform_vector(&Vector3f {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        });
        let dy_camera: Vector3f = raster_to_camera.transform_vector(&Vector3f {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        });
        OrthographicCamera {
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
    fn camera_space_ray(&self, sample: &CameraSample) -> Ray {
        let p_raster: Point3f = Point3f {
            x: sample.sensor_point.x,
            y: sample.sensor_point.y,
            z: 0.0,
        };
        let p_camera: Point3f = self.raster_to_camera.transform_point(&p_raster);
        let mut ray: Ray = Ray::new(
            p_camera,
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        if self.lens_radius > 0.0 as Float {
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
        ray
    }
    pub fn generate_ray(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let camera_ray: Ray = self.camera_space_ray(sample);
        *ray = self.camera_to_world.transform_ray(&camera_ray);
        1.0 as Float
    }
    pub fn generate_ray_differential(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let mut camera_ray: Ray = self.camera_space_ray(sample);
        let differential: RayDifferential = if self.lens_radius > 0.0 as Float {
            // shifted sensor points refocus through the same lens point
            let p_raster: Point3f = Point3f {
                x: sample.sensor_point.x,
                y: sample.sensor_point.y,
                z: 0.0,
            };
            let p_camera: Point3f = self.raster_to_camera.transform_point(&p_raster);
            let ft: Float = self.focal_distance;
            let p_focus_x: Point3f = p_camera
                + self.dx_camera
                + Vector3f {
                    x: 0.0,
                    y: 0.0,
                    z: ft,
                };
            let p_focus_y: Point3f = p_camera
                + self.dy_camera
                + Vector3f {
                    x: 0.0,
                    y: 0.0,
                    z: ft,
                };
            RayDifferential {
                rx_origin: camera_ray.o,
                ry_origin: camera_ray.o,
                rx_direction: (p_focus_x - camera_ray.o).normalize(),
                ry_direction: (p_focus_y - camera_ray.o).normalize(),
            }
        } else {
            RayDifferential {
                rx_origin: camera_ray.o + self.dx_camera,
                ry_origin: camera_ray.o + self.dy_camera,
                rx_direction: camera_ray.d,
                ry_direction: camera_ray.d,
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
    use crate::core::geometry::{Point2i, Vector2f};
    use crate::filters::boxfilter::BoxFilter;

    fn test_camera() -> OrthographicCamera {
        let sensor: Arc<Sensor> = Arc::new(Sensor::new(
            Point2i { x: 32, y: 32 },
            Bounds2f {
                p_min: Point2f { x: 0.0, y: 0.0 },
                p_max: Point2f { x: 1.0, y: 1.0 },
            },
            Filter::Bx(BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })),
            0.035,
            String::from("ortho_test.pfm"),
            1.0,
        ));
        OrthographicCamera::new(
            AnimatedTransform::new(&Transform::default(), 0.0, &Transform::default(), 1.0),
            Bounds2f {
                p_min: Point2f { x: -1.0, y: -1.0 },
                p_max: Point2f { x: 1.0, y: 1.0 },
            },
            0.0,
            1.0,
            0.0,
            1.0,
            sensor,
        )
    }

    #[test]
    fn rays_are_parallel() {
        let camera: OrthographicCamera = test_camera();
        let mut ray_a: Ray = Ray::default();
        let mut ray_b: Ray = Ray::default();
        camera.generate_ray(
            &CameraSample {
                sensor_point: Point2f { x: 2.0, y: 3.0 },
                lens_point: Point2f { x: 0.5, y: 0.5 },
                time: 0.0,
            },
            &mut ray_a,
        );
        camera.generate_ray(
            &CameraSample {
                sensor_point: Point2f { x: 30.0, y: 28.0 },
                lens_point: Point2f { x: 0.5, y: 0.5 },
                time: 0.0,
            },
            &mut ray_b,
        );
        assert_eq!(ray_a.d, ray_b.d);
        assert!(ray_a.o != ray_b.o);
    }

    #[test]
    fn offset_rays_share_direction_without_lens() {
        let camera: OrthographicCamera = test_camera();
        let mut ray: Ray = Ray::default();
        camera.generate_ray_differential(
            &CameraSample {
                sensor_point: Point2f { x: 16.0, y: 16.0 },
                lens_point: Point2f { x: 0.5, y: 0.5 },
                time: 0.0,
            },
            &mut ray,
        );
        let diff: RayDifferential = ray.differential.unwrap();
        assert_eq!(diff.rx_direction, ray.d);
        assert_eq!(diff.ry_direction, ray.d);
        assert!(diff.rx_origin != ray.o);
    }
}
