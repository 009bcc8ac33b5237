//! Camera dispatch. Both camera kinds are projective; they share the
//! raster / screen / camera transform chain and the thin-lens model.

// std
use std::sync::Arc;
// crate
use crate::core::film::Sensor;
use crate::core::geometry::Ray;
use crate::core::precision::Float;
use crate::core::sampler::CameraSample;
use crate::cameras::orthographic::OrthographicCamera;
use crate::cameras::perspective::PerspectiveCamera;

pub enum Camera {
    Orthographic(OrthographicCamera),
    Perspective(PerspectiveCamera),
}

impl Camera {
    /// Generate the primary ray for a camera sample; the return value
    /// weights the ray's contribution to the image.
    pub fn generate_ray(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        match self {
            Camera::Orthographic(camera) => camera.generate_ray(sample, ray),
            Camera::Perspective(camera) => camera.generate_ray(sample, ray),
        }
    }
    /// Like `generate_ray`, but also fills the one-pixel-offset rays
    /// in x and y used for texture footprint estimation.
    pub fn generate_ray_differential(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        match self {
            Camera::Orthographic(camera) => camera.generate_ray_differential(sample, ray),
            Camera::Perspective(camera) => camera.generate_ray_differential(sample, ray),
        }
    }
    pub fn get_sensor(&self) -> Arc<Sensor> {
        match self {
            Camera::Orthographic(camera) => camera.sensor.clone(),
            Camera::Perspective(camera) => camera.sensor.clone(),
        }
    }
}
