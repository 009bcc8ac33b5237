//! The sensor accumulates filtered radiance samples into pixels.
//! Worker threads fill per-tile sensor regions privately and merge
//! them under the sensor mutex; splatted contributions bypass the
//! mutex through atomic floats. Writeout normalises by the filter
//! weights, folds in scaled splats, converts XYZ to RGB and emits a
//! PFM file (plus an 8-bit PNG companion for .png filenames).

// std
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::Mutex;
// others
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use strum::IntoEnumIterator;
// crate
use crate::core::filter::Filter;
use crate::core::geometry::{
    bnd2_intersect_bnd2i, pnt2_max_pnt2i, pnt2_min_pnt2i, Bounds2f, Bounds2i, Point2f, Point2i,
    Vector2f, Vector2i, XYZEnum,
};
use crate::core::parallel::AtomicFloat;
use crate::core::precision::Float;
use crate::core::spectrum::{xyz_to_rgb, Spectrum};

pub const FILTER_TABLE_WIDTH: usize = 16;

#[derive(Debug, Default, Clone)]
struct Pixel {
    xyz: [Float; 3],
    filter_weight_sum: Float,
}

/// One raw pixel of a sensor region: unweighted radiance accumulator
/// plus the sum of filter weights applied to it.
#[derive(Debug, Default, Clone)]
pub struct RawPixel {
    pub contrib_sum: Spectrum,
    pub filter_weight_sum: Float,
}

pub struct Sensor {
    pub full_resolution: Point2i,
    pub diagonal: Float,
    pub filter: Filter,
    pub filename: String,
    pub cropped_pixel_bounds: Bounds2i,
    scale: Float,
    filter_table: [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH],
    // XYZ and weight sums are only touched during mutex-guarded
    // region merges; splats go through the atomics instead.
    pixels: Mutex<Vec<Pixel>>,
    splats: Vec<[AtomicFloat; 3]>,
    nan_warning_count: std::sync::atomic::AtomicUsize,
}

impl Sensor {
    pub fn new(
        resolution: Point2i,
        crop_window: Bounds2f,
        filter: Filter,
        diagonal: Float,
        filename: String,
        scale: Float,
    ) -> Self {
        // crop window from NDC to raster space
        let cropped_pixel_bounds: Bounds2i = Bounds2i {
            p_min: Point2i {
                x: (resolution.x as Float * crop_window.p_min.x).ceil() as i32,
                y: (resolution.y as Float * crop_window.p_min.y).ceil() as i32,
            },
            p_max: Point2i {
                x: (resolution.x as Float * crop_window.p_max.x).ceil() as i32,
                y: (resolution.y as Float * crop_window.p_max.y).ceil() as i32,
            },
        };
        assert!(cropped_pixel_bounds.area() > 0, "degenerate crop window");
        let n_pixels: usize = cropped_pixel_bounds.area() as usize;
        // tabulate the filter over the positive quadrant; the filters
        // in use are symmetric per axis so |dx|, |dy| lookups suffice
        let mut filter_table: [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH] =
            [0.0 as Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH];
        let radius: Vector2f = filter.get_radius();
        let mut offset: usize = 0;
        for y in 0..FILTER_TABLE_WIDTH {
            for x in 0..FILTER_TABLE_WIDTH {
                let p: Point2f = Point2f {
                    x: (x as Float + 0.5) * radius.x / FILTER_TABLE_WIDTH as Float,
                    y: (y as Float + 0.5) * radius.y / FILTER_TABLE_WIDTH as Float,
                };
                filter_table[offset] = filter.evaluate(p);
                offset += 1;
            }
        }
        let mut splats: Vec<[AtomicFloat; 3]> = Vec::with_capacity(n_pixels);
        for _ in 0..n_pixels {
            splats.push([
                AtomicFloat::default(),
                AtomicFloat::default(),
                AtomicFloat::default(),
            ]);
        }
        Sensor {
            full_resolution: resolution,
            diagonal,
            filter,
            filename,
            cropped_pixel_bounds,
            scale,
            filter_table,
            pixels: Mutex::new(vec![Pixel::default(); n_pixels]),
            splats,
            nan_warning_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }
    /// The pixel region samplers must cover: the crop window expanded
    /// by the filter radius at both ends.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        let radius: Vector2f = self.filter.get_radius();
        let half_pixel: Vector2f = Vector2f { x: 0.5, y: 0.5 };
        Bounds2i {
            p_min: Point2i {
                x: (self.cropped_pixel_bounds.p_min.x as Float + 0.5 - radius.x).floor() as i32,
                y: (self.cropped_pixel_bounds.p_min.y as Float + 0.5 - radius.y).floor() as i32,
            },
            p_max: Point2i {
                x: (self.cropped_pixel_bounds.p_max.x as Float - half_pixel.x + radius.x).ceil()
                    as i32,
                y: (self.cropped_pixel_bounds.p_max.y as Float - half_pixel.y + radius.y).ceil()
                    as i32,
            },
        }
    }
    /// Zero-centered physical extent of the sensor in meters, derived
    /// from the diagonal and the aspect ratio.
    pub fn get_physical_extent(&self) -> Bounds2f {
        let aspect: Float = self.full_resolution.y as Float / self.full_resolution.x as Float;
        let x: Float = (self.diagonal * self.diagonal / (1.0 as Float + aspect * aspect)).sqrt();
        let y: Float = aspect * x;
        Bounds2f {
            p_min: Point2f {
                x: -x / 2.0 as Float,
                y: -y / 2.0 as Float,
            },
            p_max: Point2f {
                x: x / 2.0 as Float,
                y: y / 2.0 as Float,
            },
        }
    }
    /// Region covering the pixels any sample inside
    /// *sample_bounds* can contribute to, clipped to the crop window.
    pub fn get_sensor_region(&self, sample_bounds: Bounds2i) -> SensorRegion {
        let radius: Vector2f = self.filter.get_radius();
        let half_pixel: Vector2f = Vector2f { x: 0.5, y: 0.5 };
        let float_bounds: Bounds2f = Bounds2f {
            p_min: Point2f::from(sample_bounds.p_min),
            p_max: Point2f::from(sample_bounds.p_max),
        };
        let p0: Point2i = Point2i {
            x: (float_bounds.p_min.x - half_pixel.x - radius.x).ceil() as i32,
            y: (float_bounds.p_min.y - half_pixel.y - radius.y).ceil() as i32,
        };
        let p1: Point2i = Point2i {
            x: (float_bounds.p_max.x - half_pixel.x + radius.x).floor() as i32 + 1,
            y: (float_bounds.p_max.y - half_pixel.y + radius.y).floor() as i32 + 1,
        };
        let pixel_bounds: Bounds2i = bnd2_intersect_bnd2i(
            &Bounds2i {
                p_min: p0,
                p_max: p1,
            },
            &self.cropped_pixel_bounds,
        );
        SensorRegion {
            pixel_bounds,
            filter_radius: radius,
            inv_filter_radius: Vector2f {
                x: 1.0 as Float / radius.x,
                y: 1.0 as Float / radius.y,
            },
            filter_table: self.filter_table,
            pixels: vec![RawPixel::default(); pixel_bounds.area().max(0) as usize],
            nan_warning_emitted: false,
        }
    }
    fn pixel_offset(&self, p: Point2i) -> usize {
        let width: i32 = self.cropped_pixel_bounds.p_max.x - self.cropped_pixel_bounds.p_min.x;
        (width * (p.y - self.cropped_pixel_bounds.p_min.y)
            + (p.x - self.cropped_pixel_bounds.p_min.x)) as usize
    }
    /// Fold a finished region into the sensor. One lock covers the
    /// whole region so the cost is amortised over all its pixels.
    pub fn merge_sensor_region(&self, region: SensorRegion) {
        let mut pixels = self.pixels.lock().unwrap();
        for p in &region.pixel_bounds {
            let raw: &RawPixel = region.get_pixel(p);
            let xyz: [Float; 3] = raw.contrib_sum.to_xyz();
            let merge_pixel: &mut Pixel = &mut pixels[self.pixel_offset(p)];
            for channel in XYZEnum::iter() {
                merge_pixel.xyz[channel as usize] += xyz[channel as usize];
            }
            merge_pixel.filter_weight_sum += raw.filter_weight_sum;
        }
    }
    /// Deposit radiance at an arbitrary sensor position, bypassing
    /// the filter; used by integrators that scatter contributions.
    pub fn add_splat(&self, p: Point2f, radiance: &Spectrum) {
        if radiance.has_nans() {
            self.warn_nan(p);
            return;
        }
        let pi: Point2i = Point2i {
            x: p.x.floor() as i32,
            y: p.y.floor() as i32,
        };
        if !self.cropped_pixel_bounds.inside_exclusive(pi) {
            return;
        }
        let xyz: [Float; 3] = radiance.to_xyz();
        let splat: &[AtomicFloat; 3] = &self.splats[self.pixel_offset(pi)];
        for channel in XYZEnum::iter() {
            splat[channel as usize].add(xyz[channel as usize]);
        }
    }
    fn warn_nan(&self, p: Point2f) {
        let n: usize = self
            .nan_warning_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if n < 8 {
            eprintln!(
                "WARNING: NaN radiance near sensor position ({}, {}); contribution dropped",
                p.x, p.y
            );
        }
    }
    /// Final pixel values as RGB, normalised and with scaled splats
    /// added.
    pub fn pixels_to_rgb(&self, splat_scale: Float) -> Vec<Float> {
        let pixels = self.pixels.lock().unwrap();
        let n_pixels: usize = self.cropped_pixel_bounds.area() as usize;
        let mut rgb: Vec<Float> = vec![0.0 as Float; 3 * n_pixels];
        for (i, pixel) in pixels.iter().enumerate() {
            let mut pixel_rgb: [Float; 3] = [0.0 as Float; 3];
            xyz_to_rgb(&pixel.xyz, &mut pixel_rgb);
            if pixel.filter_weight_sum != 0.0 as Float {
                let inv_weight: Float = 1.0 as Float / pixel.filter_weight_sum;
                for c in pixel_rgb.iter_mut() {
                    *c = (0.0 as Float).max(*c * inv_weight);
                }
            }
            let splat_xyz: [Float; 3] = [
                self.splats[i][0].load(),
                self.splats[i][1].load(),
                self.splats[i][2].load(),
            ];
            let mut splat_rgb: [Float; 3] = [0.0 as Float; 3];
            xyz_to_rgb(&splat_xyz, &mut splat_rgb);
            for (c, s) in pixel_rgb.iter_mut().zip(splat_rgb.iter()) {
                *c = (0.0 as Float).max(*c + *s * splat_scale);
            }
            rgb[3 * i] = pixel_rgb[0];
            rgb[3 * i + 1] = pixel_rgb[1];
            rgb[3 * i + 2] = pixel_rgb[2];
        }
        rgb
    }
    /// Write the image. The radiometric output is always PFM; a
    /// `.png` filename additionally gets a gamma-encoded 8-bit copy.
    pub fn write_image(&self, splat_scale: Float) -> std::io::Result<()> {
        let rgb: Vec<Float> = self.pixels_to_rgb(splat_scale);
        let diagonal: Vector2i = self.cropped_pixel_bounds.diagonal();
        let width: usize = diagonal.x as usize;
        let height: usize = diagonal.y as usize;
        if self.filename.ends_with(".png") {
            let mut bytes: Vec<u8> = Vec::with_capacity(3 * width * height);
            for v in rgb.iter() {
                // sqrt as the gamma encoding for display output
                bytes.push((v.sqrt().min(1.0 as Float).max(0.0 as Float) * 255.0) as u8);
            }
            let pfm_name: String = format!("{}.pfm", self.filename.trim_end_matches(".png"));
            write_pfm(&pfm_name, &rgb, width, height, self.scale)?;
            image::save_buffer(
                &self.filename,
                &bytes,
                width as u32,
                height as u32,
                image::ColorType::Rgb8,
            )
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            Ok(())
        } else {
            write_pfm(&self.filename, &rgb, width, height, self.scale)
        }
    }
}

/// Tile-local raw pixel buffer; owned by one worker thread until it
/// is merged into the sensor.
pub struct SensorRegion {
    pixel_bounds: Bounds2i,
    filter_radius: Vector2f,
    inv_filter_radius: Vector2f,
    filter_table: [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH],
    pixels: Vec<RawPixel>,
    nan_warning_emitted: bool,
}

impl SensorRegion {
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }
    fn offset(&self, p: Point2i) -> usize {
        let width: i32 = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        (width * (p.y - self.pixel_bounds.p_min.y) + (p.x - self.pixel_bounds.p_min.x)) as usize
    }
    pub fn get_pixel(&self, p: Point2i) -> &RawPixel {
        &self.pixels[self.offset(p)]
    }
    /// Distribute one sample's radiance over the pixels inside the
    /// filter support around it.
    pub fn add_sample(&mut self, p_film: Point2f, radiance: &Spectrum, sample_weight: Float) {
        // NaNs must not poison the image; drop them with a diagnostic
        if radiance.has_nans() || sample_weight.is_nan() {
            if !self.nan_warning_emitted {
                eprintln!(
                    "WARNING: NaN radiance at sensor sample ({}, {}); contribution dropped",
                    p_film.x, p_film.y
                );
                self.nan_warning_emitted = true;
            }
            return;
        }
        // continuous to discrete pixel coordinates
        let p_film_discrete: Point2f = p_film - Vector2f { x: 0.5, y: 0.5 };
        let mut p0: Point2i = Point2i {
            x: (p_film_discrete.x - self.filter_radius.x).ceil() as i32,
            y: (p_film_discrete.y - self.filter_radius.y).ceil() as i32,
        };
        let mut p1: Point2i = Point2i {
            x: (p_film_discrete.x + self.filter_radius.x).floor() as i32 + 1,
            y: (p_film_discrete.y + self.filter_radius.y).floor() as i32 + 1,
        };
        p0 = pnt2_max_pnt2i(p0, self.pixel_bounds.p_min);
        p1 = pnt2_min_pnt2i(p1, self.pixel_bounds.p_max);
        // precompute the filter-table column for every covered x and y
        let mut ifx: Vec<usize> = Vec::with_capacity((p1.x - p0.x).max(0) as usize);
        for x in p0.x..p1.x {
            let fx: Float = ((x as Float - p_film_discrete.x)
                * self.inv_filter_radius.x
                * FILTER_TABLE_WIDTH as Float)
                .abs();
            ifx.push((fx.floor() as usize).min(FILTER_TABLE_WIDTH - 1));
        }
        let mut ify: Vec<usize> = Vec::with_capacity((p1.y - p0.y).max(0) as usize);
        for y in p0.y..p1.y {
            let fy: Float = ((y as Float - p_film_discrete.y)
                * self.inv_filter_radius.y
                * FILTER_TABLE_WIDTH as Float)
                .abs();
            ify.push((fy.floor() as usize).min(FILTER_TABLE_WIDTH - 1));
        }
        for y in p0.y..p1.y {
            for x in p0.x..p1.x {
                let table_offset: usize = FILTER_TABLE_WIDTH
                    * ify[(y - p0.y) as usize]
                    + ifx[(x - p0.x) as usize];
                let filter_weight: Float = self.filter_table[table_offset];
                let idx: usize = self.offset(Point2i { x, y });
                let pixel: &mut RawPixel = &mut self.pixels[idx];
                pixel.contrib_sum += *radiance * sample_weight * filter_weight;
                pixel.filter_weight_sum += filter_weight;
            }
        }
    }
}

/// Portable Float Map writer. Header `PF`, dimensions, then a scale
/// whose sign encodes the byte order (negative: little-endian),
/// followed by the raw 32-bit float triples in scanline order.
pub fn write_pfm(
    filename: &str,
    rgb: &[Float],
    width: usize,
    height: usize,
    scale: Float,
) -> std::io::Result<()> {
    assert_eq!(rgb.len(), 3 * width * height);
    let file: File = File::create(filename)?;
    let mut writer: BufWriter<File> = BufWriter::new(file);
    write!(writer, "PF\n{} {}\n{}\n", width, height, -scale.abs())?;
    for v in rgb.iter() {
        writer.write_f32::<LittleEndian>(*v as f32)?;
    }
    writer.flush()
}

/// Companion reader; used by the round-trip tests and output
/// verification.
pub fn read_pfm(filename: &str) -> std::io::Result<(Vec<Float>, usize, usize)> {
    let file: File = File::open(filename)?;
    let mut reader: BufReader<File> = BufReader::new(file);
    let mut header: Vec<u8> = Vec::new();
    // read the three newline-terminated header lines
    let mut lines_seen: usize = 0;
    let mut byte: [u8; 1] = [0_u8];
    while lines_seen < 3 {
        reader.read_exact(&mut byte)?;
        if byte[0] == b'\n' {
            lines_seen += 1;
        }
        header.push(byte[0]);
    }
    let header_str: String = String::from_utf8_lossy(&header).to_string();
    let mut tokens = header_str.split_whitespace();
    let magic: &str = tokens.next().unwrap_or("");
    if magic != "PF" {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "not a color PFM file",
        ));
    }
    let width: usize = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "bad PFM width"))?;
    let height: usize = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "bad PFM height"))?;
    let scale: f32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "bad PFM scale"))?;
    let n_values: usize = 3 * width * height;
    let mut values: Vec<Float> = Vec::with_capacity(n_values);
    for _ in 0..n_values {
        let v: f32 = if scale < 0.0 {
            reader.read_f32::<LittleEndian>()?
        } else {
            reader.read_f32::<byteorder::BigEndian>()?
        };
        values.push(v as Float);
    }
    // a non-unit magnitude is an overall scaling to apply on readback
    let magnitude: f32 = scale.abs();
    if (magnitude - 1.0).abs() > 1e-9 {
        for v in values.iter_mut() {
            *v *= magnitude as Float;
        }
    }
    Ok((values, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::boxfilter::BoxFilter;
    use crate::filters::gaussian::GaussianFilter;

    fn test_sensor(filter: Filter) -> Sensor {
        Sensor::new(
            Point2i { x: 8, y: 8 },
            Bounds2f {
                p_min: Point2f { x: 0.0, y: 0.0 },
                p_max: Point2f { x: 1.0, y: 1.0 },
            },
            filter,
            0.035,
            String::from("test.pfm"),
            1.0,
        )
    }

    #[test]
    fn sample_bounds_expand_by_filter_radius() {
        let sensor: Sensor = test_sensor(Filter::Gaussian(GaussianFilter::new(
            Vector2f { x: 2.0, y: 2.0 },
            2.0,
        )));
        let bounds: Bounds2i = sensor.get_sample_bounds();
        assert_eq!(bounds.p_min, Point2i { x: -2, y: -2 });
        assert_eq!(bounds.p_max, Point2i { x: 10, y: 10 });
    }

    #[test]
    fn box_filtered_unit_samples_normalise_to_one() {
        let sensor: Sensor = test_sensor(Filter::Bx(BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })));
        let mut region: SensorRegion = sensor.get_sensor_region(sensor.get_sample_bounds());
        for p in &sensor.get_sample_bounds() {
            region.add_sample(
                Point2f {
                    x: p.x as Float + 0.5,
                    y: p.y as Float + 0.5,
                },
                &Spectrum::new(1.0),
                1.0,
            );
        }
        sensor.merge_sensor_region(region);
        let rgb: Vec<Float> = sensor.pixels_to_rgb(1.0);
        for v in rgb.iter() {
            assert!((v - 1.0).abs() < 1e-4, "pixel value {}", v);
        }
    }

    #[test]
    fn nan_contributions_are_dropped() {
        let sensor: Sensor = test_sensor(Filter::Bx(BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })));
        let mut region: SensorRegion = sensor.get_sensor_region(sensor.get_sample_bounds());
        let nan: Float = std::f32::NAN as Float;
        region.add_sample(
            Point2f { x: 4.5, y: 4.5 },
            &Spectrum::from_rgb(&[nan, 1.0, 1.0]),
            1.0,
        );
        region.add_sample(Point2f { x: 4.5, y: 4.5 }, &Spectrum::new(2.0), 1.0);
        sensor.merge_sensor_region(region);
        let rgb: Vec<Float> = sensor.pixels_to_rgb(1.0);
        let idx: usize = 3 * (4 * 8 + 4);
        assert!((rgb[idx] - 2.0).abs() < 1e-3);
        assert!(rgb.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn splats_accumulate_atomically() {
        let sensor: Sensor = test_sensor(Filter::Bx(BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })));
        crate::core::parallel::parallel_for_1d(
            |_| {
                sensor.add_splat(Point2f { x: 2.5, y: 3.5 }, &Spectrum::new(0.25));
            },
            64,
            4,
            4,
        );
        let rgb: Vec<Float> = sensor.pixels_to_rgb(1.0);
        let idx: usize = 3 * (3 * 8 + 2);
        assert!((rgb[idx] - 16.0).abs() < 1e-2);
    }

    #[test]
    fn pfm_round_trip_is_bit_exact() {
        let path: std::path::PathBuf = std::env::temp_dir().join("rs_impact_pfm_roundtrip.pfm");
        let path_str: &str = path.to_str().unwrap();
        let rgb: Vec<Float> = (0..3 * 4 * 2)
            .map(|i| (i as Float) * 0.37 + 0.001)
            .collect();
        write_pfm(path_str, &rgb, 4, 2, 1.0).unwrap();
        let (back, width, height) = read_pfm(path_str).unwrap();
        assert_eq!(width, 4);
        assert_eq!(height, 2);
        assert_eq!(rgb.len(), back.len());
        for (a, b) in rgb.iter().zip(back.iter()) {
            assert_eq!((*a as f32).to_bits(), (*b as f32).to_bits());
        }
        let _ = std::fs::remove_file(path);
    }
}
