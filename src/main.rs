//! Renders the built-in demonstration scene: three spheres (plastic,
//! glass, mirror) over a matte ground disk, lit by a point light and
//! a dim constant environment. Scene-description parsing lives
//! outside this crate; the binary exists to exercise the full
//! pipeline end to end.

// std
use std::sync::Arc;
// others
use structopt::StructOpt;
// crate
use rs_impact::accelerators::bvh::{BoundingVolumeHierarchy, SplitMethod};
use rs_impact::cameras::perspective::PerspectiveCamera;
use rs_impact::core::camera::Camera;
use rs_impact::core::film::Sensor;
use rs_impact::core::filter::Filter;
use rs_impact::core::geometry::{Bounds2f, Point2f, Point2i, Point3f, Vector2f, Vector3f};
use rs_impact::core::integrator::{render, RenderOptions, SamplerIntegrator};
use rs_impact::core::light::Light;
use rs_impact::core::material::Material;
use rs_impact::core::model::{GeometricModel, Model};
use rs_impact::core::precision::Float;
use rs_impact::core::sampler::Sampler;
use rs_impact::core::scene::Scene;
use rs_impact::core::shape::Shape;
use rs_impact::core::spectrum::Spectrum;
use rs_impact::core::texture::Texture;
use rs_impact::core::transform::{AnimatedTransform, Transform};
use rs_impact::filters::gaussian::GaussianFilter;
use rs_impact::integrators::whitted::WhittedIntegrator;
use rs_impact::lights::infinite::InfiniteLight;
use rs_impact::lights::point::PointLight;
use rs_impact::materials::glass::GlassMaterial;
use rs_impact::materials::matte::MatteMaterial;
use rs_impact::materials::mirror::MirrorMaterial;
use rs_impact::materials::plastic::PlasticMaterial;
use rs_impact::samplers::stratified::StratifiedSampler;
use rs_impact::shapes::disk::Disk;
use rs_impact::shapes::sphere::Sphere;
use rs_impact::textures::constant::ConstantTexture;

#[derive(Debug, StructOpt)]
#[structopt(name = "rs_impact", about = "Physically based renderer (built-in demo scene).")]
struct Cli {
    /// Number of worker threads (0 selects the logical core count)
    #[structopt(long = "threads", default_value = "0")]
    threads: usize,
    /// Diagnostic output level (0 quiet, 1 configuration, 2 progress)
    #[structopt(long = "verbosity", default_value = "0")]
    verbosity: u32,
    /// Output image path (.pfm, or .png for an 8-bit companion)
    #[structopt(long = "output", default_value = "demo.pfm")]
    output: String,
    /// Samples per pixel along each axis (n gives n*n samples)
    #[structopt(long = "samples", default_value = "2")]
    samples: usize,
    /// Image width and height in pixels
    #[structopt(long = "resolution", default_value = "400")]
    resolution: i32,
}

fn spectrum_texture(rgb: [Float; 3]) -> Arc<Texture<Spectrum>> {
    Arc::new(Texture::Constant(ConstantTexture::new(Spectrum::from_rgb(
        &rgb,
    ))))
}

fn float_texture(v: Float) -> Arc<Texture<Float>> {
    Arc::new(Texture::Constant(ConstantTexture::new(v)))
}

fn sphere_model(center: Vector3f, radius: Float, material: Arc<Material>) -> Arc<Model> {
    let object_to_world: Transform = Transform::translate(&center);
    let world_to_object: Transform = object_to_world.inverse();
    Arc::new(Model::Geometric(GeometricModel::new(
        Arc::new(Shape::Sphere(Sphere::new(
            object_to_world,
            world_to_object,
            false,
            radius,
            -radius,
            radius,
            360.0,
        ))),
        Some(material),
        None,
    )))
}

fn build_scene() -> Scene {
    let ground: Arc<Material> = Arc::new(Material::Matte(MatteMaterial::new(
        spectrum_texture([0.45, 0.45, 0.45]),
        float_texture(20.0),
        None,
    )));
    let plastic: Arc<Material> = Arc::new(Material::Plastic(PlasticMaterial::new(
        spectrum_texture([0.2, 0.3, 0.7]),
        spectrum_texture([0.4, 0.4, 0.4]),
        float_texture(0.08),
        None,
        true,
    )));
    let glass: Arc<Material> = Arc::new(Material::Glass(GlassMaterial::new(
        spectrum_texture([1.0, 1.0, 1.0]),
        spectrum_texture([1.0, 1.0, 1.0]),
        float_texture(0.0),
        float_texture(0.0),
        float_texture(1.5),
        None,
        true,
    )));
    let mirror: Arc<Material> = Arc::new(Material::Mirror(MirrorMaterial::new(
        spectrum_texture([0.9, 0.9, 0.9]),
        None,
    )));
    // ground: a large disk rotated into the xz-plane at y = -1
    let ground_to_world: Transform = Transform::translate(&Vector3f {
        x: 0.0,
        y: -1.0,
        z: 0.0,
    }) * Transform::rotate_x(-90.0);
    let ground_model: Arc<Model> = Arc::new(Model::Geometric(GeometricModel::new(
        Arc::new(Shape::Disk(Disk::new(
            ground_to_world,
            ground_to_world.inverse(),
            false,
            0.0,
            30.0,
            0.0,
            360.0,
        ))),
        Some(ground),
        None,
    )));
    let models: Vec<Arc<Model>> = vec![
        ground_model,
        sphere_model(
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            1.0,
            plastic,
        ),
        sphere_model(
            Vector3f {
                x: -2.2,
                y: -0.3,
                z: 0.8,
            },
            0.7,
            glass,
        ),
        sphere_model(
            Vector3f {
                x: 2.2,
                y: -0.2,
                z: -0.4,
            },
            0.8,
            mirror,
        ),
    ];
    let aggregate: Arc<Model> = Arc::new(Model::BVH(Box::new(BoundingVolumeHierarchy::new(
        models,
        4,
        SplitMethod::SAH,
    ))));
    let lights: Vec<Arc<Light>> = vec![
        Arc::new(Light::Point(PointLight::new(
            &Transform::translate(&Vector3f {
                x: 6.0,
                y: 8.0,
                z: 6.0,
            }),
            &Spectrum::new(220.0),
        ))),
        Arc::new(Light::Infinite(InfiniteLight::new(&Spectrum::from_rgb(&[
            0.08, 0.09, 0.11,
        ])))),
    ];
    Scene::new(aggregate, lights)
}

fn main() {
    let args: Cli = Cli::from_args();
    let n_threads: usize = if args.threads == 0 {
        rs_impact::core::parallel::num_system_cores()
    } else {
        args.threads
    };
    let resolution: Point2i = Point2i {
        x: args.resolution,
        y: args.resolution,
    };
    let sensor: Arc<Sensor> = Arc::new(Sensor::new(
        resolution,
        Bounds2f {
            p_min: Point2f { x: 0.0, y: 0.0 },
            p_max: Point2f { x: 1.0, y: 1.0 },
        },
        Filter::Gaussian(GaussianFilter::new(Vector2f { x: 2.0, y: 2.0 }, 2.0)),
        0.035,
        args.output.clone(),
        1.0,
    ));
    let camera_to_world: Transform = Transform::look_at(
        &Point3f {
            x: 0.5,
            y: 1.8,
            z: 6.5,
        },
        &Point3f {
            x: 0.0,
            y: -0.2,
            z: 0.0,
        },
        &Vector3f {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        },
    );
    let aspect: Float = resolution.y as Float / resolution.x as Float;
    let camera: Camera = Camera::Perspective(PerspectiveCamera::new(
        AnimatedTransform::new(&camera_to_world, 0.0, &camera_to_world, 1.0),
        Bounds2f {
            p_min: Point2f {
                x: -1.0,
                y: -aspect,
            },
            p_max: Point2f { x: 1.0, y: aspect },
        },
        0.0,
        0.002,
        0.0,
        6.5,
        38.0,
        sensor.clone(),
    ));
    if args.verbosity >= 1 {
        let extent: Bounds2f = sensor.get_physical_extent();
        eprintln!(
            "sensor: {} x {} pixels, physical extent {:.4} x {:.4} m, output {}",
            resolution.x,
            resolution.y,
            extent.p_max.x - extent.p_min.x,
            extent.p_max.y - extent.p_min.y,
            args.output
        );
    }
    let scene: Scene = build_scene();
    let sampler: Sampler =
        Sampler::Stratified(StratifiedSampler::new(args.samples, args.samples, true, 8));
    let integrator: SamplerIntegrator = SamplerIntegrator::Whitted(WhittedIntegrator::new(5));
    let options: RenderOptions = RenderOptions {
        n_threads,
        verbosity: args.verbosity,
    };
    render(&scene, &camera, &sampler, &integrator, &options);
    if let Err(e) = sensor.write_image(1.0) {
        eprintln!("ERROR: failed to write {}: {}", args.output, e);
        std::process::exit(1);
    }
    if args.verbosity >= 1 {
        eprintln!("wrote {}", args.output);
    }
}
