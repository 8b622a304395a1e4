// Renders the scattering lobes of a couple of hair fibers as latitude/longitude maps.
// Every pixel is an incoming direction in the fiber-local frame, the fiber runs from the top to
// the bottom of the image. Run with `RUST_LOG=info` to see white furnace estimates.
use std::{error::Error, f64::consts};

use fiber_bsdf::{
    hair::{Absorption, HairBsdf, HairParameters},
    RgbD, RgbF, SampleIncomingResponse, Vec3d, Vec4d, BSDF,
};
use log::info;
use rayon::prelude::*;

const WIDTH: usize = 720;
const HEIGHT: usize = 360;

fn save_image(
    path: &std::path::Path,
    buffer: &[u8],
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(&mut writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_source_gamma(png::ScaledFloat::new(1.0 / 2.2));

    let source_chromaticities = png::SourceChromaticities::new(
        // Using unscaled instantiation here
        (0.31270, 0.32900),
        (0.64000, 0.33000),
        (0.30000, 0.60000),
        (0.15000, 0.06000),
    );

    encoder.set_source_chromaticities(source_chromaticities);
    let mut writer = encoder.write_header()?;

    writer.write_image_data(buffer)?;
    Ok(())
}

/// Direction of the center of a pixel. Rows go from `sin theta = 1` to `sin theta = -1`.
fn pixel_direction(x: usize, y: usize) -> Vec3d {
    let theta = consts::FRAC_PI_2 - (y as f64 + 0.5) / HEIGHT as f64 * consts::PI;
    let phi = (x as f64 + 0.5) / WIDTH as f64 * 2.0 * consts::PI - consts::PI;
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3d::new(sin_theta, cos_theta * sin_phi, cos_theta * cos_phi)
}

fn render(material: &HairBsdf, omega_o: Vec3d, exposure: f64) -> Vec<u8> {
    let mut image = vec![0; 3 * WIDTH * HEIGHT];
    image
        .par_chunks_mut(3 * WIDTH)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..WIDTH {
                let color = material.evaluate(omega_o, pixel_direction(x, y)) * exposure;
                // reinhard keeps the sharp highlights of shiny fibers from clipping
                let color = color / (RgbD::ONE + color);

                row[x * 3] = (color.x * 255.0).clamp(0.0, 255.0).floor() as u8;
                row[x * 3 + 1] = (color.y * 255.0).clamp(0.0, 255.0).floor() as u8;
                row[x * 3 + 2] = (color.z * 255.0).clamp(0.0, 255.0).floor() as u8;
            }
        });
    image
}

/// Mean of `bsdf / pdf` over importance samples. Equals one for fibers that do not absorb.
fn furnace(material: &HairBsdf, omega_o: Vec3d, num_samples: usize) -> RgbD {
    let mut rd = fastrand::Rng::with_seed(0);
    let mut sum = RgbD::ZERO;
    for _ in 0..num_samples {
        let rdf = Vec4d::new(rd.f64(), rd.f64(), rd.f64(), rd.f64());
        let SampleIncomingResponse { bsdf, pdf, .. } = material.sample_incoming(omega_o, rdf);
        if pdf > 0.0 {
            sum += bsdf / pdf;
        }
    }
    sum / num_samples as f64
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let presets = [
        (
            "blonde",
            HairParameters {
                absorption: Absorption::Melanin {
                    eumelanin: 0.05,
                    pheomelanin: 0.0,
                },
                longitudinal_roughness: 0.1,
                azimuthal_roughness: 0.2,
                ..Default::default()
            },
        ),
        ("brown", HairParameters::default()),
        (
            "red",
            HairParameters {
                absorption: Absorption::Melanin {
                    eumelanin: 0.3,
                    pheomelanin: 2.0,
                },
                ..Default::default()
            },
        ),
        (
            "dyed",
            HairParameters {
                absorption: Absorption::Color(RgbF::new(0.2, 0.5, 0.8)),
                longitudinal_roughness: 0.5,
                azimuthal_roughness: 0.6,
                ..Default::default()
            },
        ),
    ];

    // looking at the fiber from slightly above, off its center line
    let omega_o = Vec3d::new(0.6, 0.3, 0.5).normalize();

    for (name, parameters) in presets {
        let material = HairBsdf::from(parameters);
        let image = render(&material, omega_o, 2.0);
        let path = format!("fiber_lobes_{name}.png");
        save_image(std::path::Path::new(&path), &image, WIDTH as u32, HEIGHT as u32)?;
        info!(
            "{name}: albedo {}, base color {}, written to {path}",
            furnace(&material, omega_o, 100_000),
            material.base_color(omega_o)
        );
    }

    for roughness in [0.05, 0.3, 0.8] {
        let material = HairBsdf::new(&HairParameters {
            absorption: Absorption::Coefficient(RgbF::ZERO),
            longitudinal_roughness: roughness,
            azimuthal_roughness: roughness,
            ..Default::default()
        });
        info!(
            "white furnace with roughness {roughness}: {}",
            furnace(&material, omega_o, 100_000)
        );
    }
    Ok(())
}
