pub trait ApproxEqual: Copy {
    fn equals_approx(self, other: Self, eps: Self, eps_rel: Self) -> bool;
    fn equals_approx_abs(self, other: Self, eps: Self) -> bool;
    fn equals_approx_rel(self, other: Self, eps: Self) -> bool;
}

macro_rules! assert_eq_approx {
    ($lhs:expr, $rhs:expr, $eps_abs:expr, $eps_rel:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx($lhs, $rhs, $eps_abs, $eps_rel),
            r#"assert_eq_abs failed:
    {}: {:?}
    {}: {:?}
    {} (maximum absolute error): {:?}
    {} (maximum relative error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_abs),
            $eps_abs,
            stringify!($eps_rel),
            $eps_rel,
        );
    };

    ($lhs:expr, $rhs:expr, $eps_abs: expr, $eps_rel:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx($lhs, $rhs, $eps_abs, $eps_rel), $($arg)*);
    }
}

macro_rules! assert_eq_approx_abs {
    ($lhs:expr, $rhs:expr, $eps_abs:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx_abs($lhs, $rhs, $eps_abs),
            r#"assert_eq_abs failed:
    {}: {:?}
    {}: {:?}
    {} (maximum absolute error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_abs),
            $eps_abs,
        )
    };

    ($lhs:expr, $rhs:expr, $eps_abs:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx_abs($lhs, $rhs, $eps_abs),
        $($arg)*);
    };
}

macro_rules! assert_eq_approx_rel {
    ($lhs:expr, $rhs:expr, $eps_rel:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx_rel($lhs, $rhs, $eps_rel),
            r#"assert_eq_rel failed:
    {}: {:?}
    {}: {:?}
    {} (maximum relative error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_rel),
            $eps_rel,
        )
    };

    ($lhs:expr, $rhs:expr, $eps_rel:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx_rel($lhs, $rhs, $eps_rel),
        $($arg)*);
    };
}

macro_rules! assert_in_range {
    ($value:expr, $lower:expr, $upper:expr) => {
        assert!(
            $lower <= $value && $value <= $upper,
            r#"assert_in_range failed:
    {} (value): {:?}
    {} (lower bound): {:?}
    {} (upper bound): {:?}"#,
            stringify!($value),
            $value,
            stringify!($lower),
            $lower,
            stringify!($upper),
            $upper
        )
    };
}

macro_rules! impl_approx_equal {
    ($scalar:ty, $vector:ty) => {
        impl ApproxEqual for $scalar {
            fn equals_approx(self, other: Self, eps: Self, eps_rel: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other || (self - other).abs() <= eps {
                    true
                } else {
                    let diff = (self - other).abs();
                    let max = self.abs().max(other.abs());
                    diff <= max * eps_rel
                }
            }

            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other {
                    true
                } else {
                    (self - other).abs() <= eps
                }
            }

            fn equals_approx_rel(self, other: Self, eps: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other {
                    return true;
                }
                let diff = (self - other).abs();
                let max = self.abs().max(other.abs());
                diff <= max * eps
            }
        }

        impl ApproxEqual for $vector {
            fn equals_approx_rel(self, other: Self, eps: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx_rel(self.x, other.x, eps.x)
                    && $crate::test_utils::ApproxEqual::equals_approx_rel(self.y, other.y, eps.y)
                    && $crate::test_utils::ApproxEqual::equals_approx_rel(self.z, other.z, eps.z)
            }
            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx_abs(self.x, other.x, eps.x)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.y, other.y, eps.y)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.z, other.z, eps.z)
            }
            fn equals_approx(self, other: Self, eps_abs: Self, eps_rel: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx(
                    self.x, other.x, eps_abs.x, eps_rel.x,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.y, other.y, eps_abs.y, eps_rel.y,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.z, other.z, eps_abs.z, eps_rel.z,
                )
            }
        }
    };
}

impl_approx_equal!(f64, Vec3d);

use std::f64::consts;

pub(crate) use assert_eq_approx;
pub(crate) use assert_eq_approx_abs;
pub(crate) use assert_eq_approx_rel;
pub(crate) use assert_in_range;

use rayon::prelude::*;

use crate::{
    utils::{FloatExt, VecExt},
    RgbD, SampleIncomingResponse, Vec3d, Vec4d, BSDF,
};

pub trait SamplerExt {
    fn vec4d(&mut self) -> Vec4d;
}

impl SamplerExt for fastrand::Rng {
    fn vec4d(&mut self) -> Vec4d {
        Vec4d::new(self.f64(), self.f64(), self.f64(), self.f64())
    }
}

/** sample a direction with density 1 / 4pi */
pub fn spherical_sample(rd: &mut fastrand::Rng) -> Vec3d {
    let u = rd.f64();
    let v = rd.f64();
    spherical_sample_uv(u, v)
}

pub fn spherical_sample_uv(u: f64, v: f64) -> Vec3d {
    #[allow(clippy::suboptimal_flops)]
    let cos_theta = 2.0 * u - 1.0;
    #[allow(clippy::suboptimal_flops)]
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = v * 2.0 * consts::PI;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3d::new(sin_theta * sin_phi, sin_theta * cos_phi, cos_theta)
}

/// Integrates `integrand` over the unit sphere with the midpoint rule on an equal area grid.
/// The grid is uniform in `x` and in the angle around the x-axis, so every cell covers the same
/// solid angle. The x-axis is the fiber tangent, therefore the cells follow the longitudinal
/// lobes of fiber BSDFs.
pub fn integrate_sphere<T, F>(resolution_x: usize, resolution_phi: usize, integrand: F) -> T
where
    T: Copy + Default + Send + std::ops::Add<Output = T> + std::ops::Mul<f64, Output = T>,
    F: Fn(Vec3d) -> T + Sync,
{
    let cell = 4.0 * consts::PI / (resolution_x * resolution_phi) as f64;
    (0..resolution_x)
        .into_par_iter()
        .map(|ix| {
            let x = (ix as f64 + 0.5) / resolution_x as f64 * 2.0 - 1.0;
            let r = (1.0 - x.sq()).max(0.0).sqrt();
            let mut row = T::default();
            for iphi in 0..resolution_phi {
                let phi = (iphi as f64 + 0.5) / resolution_phi as f64 * 2.0 * consts::PI;
                let (sin_phi, cos_phi) = phi.sin_cos();
                row = row + integrand(Vec3d::new(x, r * sin_phi, r * cos_phi));
            }
            row
        })
        .reduce(T::default, |a, b| a + b)
        * cell
}

pub fn test_bsdf_sample_eval<T: BSDF>(material: &T) {
    let mut rd = fastrand::Rng::new();
    // rd.seed(0);
    let runs = 10000;
    for _ in 0..runs {
        let omega_o = spherical_sample(&mut rd);
        let SampleIncomingResponse {
            omega_i,
            bsdf,
            pdf,
        } = material.sample_incoming(omega_o, rd.vec4d());
        let c_bsdf = material.evaluate(omega_o, omega_i);
        let c_pdf = material.sample_incoming_pdf(omega_o, omega_i);
        assert!(
            omega_i.is_normalized(),
            "sampled directions must be normalized, omega_i: {omega_i:?}"
        );
        assert!(
            (c_pdf > 0.0 && pdf > 0.0) || bsdf.luminance() == 0.0,
            r#"
    PDFs must be greater than 0.
    pdf: {pdf},
    c_pdf: {c_pdf},
    bsdf: {bsdf:?},
    omega_o: {omega_o:?},
    omega_i: {omega_i:?}"#
        );
        assert_eq_approx!(
            pdf,
            c_pdf,
            1e-9,
            1e-9,
            r#"
    PDFs must be equal for sample_incoming and sample_incoming_pdf,
    pdf: {pdf},
    c_pdf: {c_pdf},
    omega_o: {omega_o:?},
    omega_i: {omega_i:?}"#
        );
        assert_eq_approx!(bsdf, c_bsdf, RgbD::splat(1e-9), RgbD::splat(1e-9));

        assert!(pdf.is_finite() && pdf >= 0.0);
        assert!(bsdf.is_finite());
        assert!(bsdf.x >= 0.0);
        assert!(bsdf.y >= 0.0);
        assert!(bsdf.z >= 0.0);
    }
}

/// Checks that the density of the directions produced by [`BSDF::sample_incoming`] is the density
/// reported by [`BSDF::sample_incoming_pdf`]. Directions are drawn from a 50/50 mixture of the
/// BSDF sampling routine and uniform sphere sampling. If both densities agree, the expectation
/// of `1 / pdf_mixture` is the area of the sphere.
pub fn test_integrate_inverse_pdf<T: BSDF + Sync>(material: &T) {
    const DOMAIN: f64 = 4.0 * std::f64::consts::PI;

    let runs = 20;
    let num_samples = 200_000;
    (0..runs).into_par_iter().for_each(|i| {
        let mut rd = fastrand::Rng::with_seed(0x5eed + i as u64);
        let omega_o: Vec3d = spherical_sample(&mut rd);
        let mut sum = 0.0;
        let mut sum_of_squared = 0.0;
        for _ in 0..num_samples {
            let spheric_pdf = 1.0 / 4.0 / std::f64::consts::PI;
            let pdf = if rd.f32() > 0.5 {
                let SampleIncomingResponse {
                    omega_i: _,
                    bsdf: _,
                    pdf: pdf_bsdf,
                } = material.sample_incoming(omega_o, rd.vec4d());
                #[allow(clippy::suboptimal_flops)]
                {
                    0.5 * spheric_pdf + 0.5 * pdf_bsdf
                }
            } else {
                let omega_i = spherical_sample(&mut rd);
                let pdf_bsdf = material.sample_incoming_pdf(omega_o, omega_i);
                #[allow(clippy::suboptimal_flops)]
                {
                    0.5 * spheric_pdf + 0.5 * pdf_bsdf
                }
            };
            let value = 1.0 / pdf;
            sum += value;
            sum_of_squared += value.sq();
        }
        sum /= DOMAIN * num_samples as f64;
        sum_of_squared /= DOMAIN.sq() * (num_samples) as f64;
        let variance_unscaled = sum_of_squared - sum.sq();

        let sample_standard_deviation =
            ((num_samples as f64) / (num_samples - 1) as f64 * variance_unscaled).sqrt();
        let standard_error = sample_standard_deviation / (num_samples as f64).sqrt();

        let confidence_thres = 4.0 * standard_error;
        assert_eq_approx_abs!(
            sum,
            1.0,
            confidence_thres,
            r#"
    expected the monte carlo test to approach 1.
    But it approached {sum} after {num_samples} Samples with a standard error of {standard_error}.
    Required Confidence is {}.
    Difference is {}.
    omega_o: {omega_o:?}
    i: {i}"#,
            confidence_thres,
            (sum - 1.0).abs()
        );

        assert!(
            standard_error < 0.005,
            "standard_error: {standard_error} is not below threshold."
        );
    });
}

/// Integrates the pdf over the sphere for a couple of outgoing directions. The result must be 1.
pub fn test_pdf_integral<T: BSDF + Sync>(material: &T, tolerance: f64) {
    let mut rd = fastrand::Rng::with_seed(17);
    for _ in 0..8 {
        let omega_o = spherical_sample(&mut rd);
        let integral = integrate_sphere(1200, 1600, |omega_i| {
            material.sample_incoming_pdf(omega_o, omega_i)
        });
        assert_eq_approx_abs!(
            integral,
            1.0,
            tolerance,
            "the pdf must integrate to 1, got {integral} for omega_o: {omega_o:?}"
        );
    }
}

/// Estimates the albedo for random outgoing directions with importance sampling. Fiber BSDFs
/// are densities over the full sphere, no cosine term is involved.
pub fn test_energy_conservation<T: BSDF + Sync>(material: &T, allowed_energy_loss: f64) {
    let runs = 40;
    let num_samples = 100_000;
    (0..runs).into_par_iter().for_each(|i| {
        let mut rd = fastrand::Rng::with_seed(0xfeed + i as u64);
        let omega_o = spherical_sample(&mut rd);
        let mut sum = RgbD::ZERO;
        let mut sum2 = RgbD::ZERO;
        for _ in 0..num_samples {
            let SampleIncomingResponse { bsdf, pdf, .. } =
                material.sample_incoming(omega_o, rd.vec4d());

            if pdf > 0.0 {
                let contrib = bsdf / pdf;
                sum += contrib;
                sum2 += contrib.sq();
            }
        }
        sum /= num_samples as f64;
        sum2 /= num_samples as f64;

        let variance =
            (sum2 - sum.sq()).luminance() * num_samples as f64 / (num_samples - 1) as f64;

        let std_error = (variance.abs() / num_samples as f64).sqrt();
        let confidence = (4.0 * std_error).max(1e-3);

        assert_in_range!(
            sum.x,
            1.0 - confidence - allowed_energy_loss,
            1.0 + confidence
        );
        assert_in_range!(
            sum.y,
            1.0 - confidence - allowed_energy_loss,
            1.0 + confidence
        );
        assert_in_range!(
            sum.z,
            1.0 - confidence - allowed_energy_loss,
            1.0 + confidence
        );
    });
}
