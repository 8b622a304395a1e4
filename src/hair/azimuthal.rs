//! Azimuthal scattering function `Np`, a trimmed logistic distribution around the azimuthal
//! deviation every lobe receives from refraction.

use std::f64::consts;

use super::P_MAX;
use crate::utils::FloatExt;

/// Azimuthal deviation of lobe `p` for a ray that leaves the cross-section at `gamma_o` and
/// travels inside the fiber at `gamma_t`
#[must_use]
pub fn phi(p: usize, gamma_o: f64, gamma_t: f64) -> f64 {
    let p = p as f64;
    #[allow(clippy::suboptimal_flops)]
    {
        2.0 * p * gamma_t - 2.0 * gamma_o + p * consts::PI
    }
}

#[must_use]
pub fn logistic(x: f64, scale: f64) -> f64 {
    let e = (-x.abs() / scale).exp();
    e / (scale * (1.0 + e).sq())
}

#[must_use]
pub fn logistic_cdf(x: f64, scale: f64) -> f64 {
    1.0 / (1.0 + (-x / scale).exp())
}

/// Logistic distribution restricted to `[a, b]` and normalized over that interval
#[must_use]
pub fn trimmed_logistic(x: f64, scale: f64, a: f64, b: f64) -> f64 {
    logistic(x, scale) / (logistic_cdf(b, scale) - logistic_cdf(a, scale))
}

/// Inverts the cdf of [`trimmed_logistic`]
#[must_use]
pub fn sample_trimmed_logistic(u: f64, scale: f64, a: f64, b: f64) -> f64 {
    let cdf_a = logistic_cdf(a, scale);
    let k = logistic_cdf(b, scale) - cdf_a;
    #[allow(clippy::suboptimal_flops)]
    let x = -scale * (1.0 / (u * k + cdf_a) - 1.0).ln();
    x.clamp(a, b)
}

/// Maps an angle into `[-pi, pi]`
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + consts::PI).rem_euclid(2.0 * consts::PI) - consts::PI
}

/// Evaluates `Np` of an explicit lobe `p < P_MAX` for the azimuthal difference `phi` between the
/// incoming and the outgoing direction
#[must_use]
pub fn np(phi: f64, p: usize, scale: f64, gamma_o: f64, gamma_t: f64) -> f64 {
    debug_assert!(p < P_MAX, "TRT+ is distributed uniformly");
    let dphi = wrap_angle(phi - self::phi(p, gamma_o, gamma_t));
    trimmed_logistic(dphi, scale, -consts::PI, consts::PI)
}

/// Samples the azimuthal difference between the incoming and the outgoing direction for lobe `p`.
/// TRT+ is sampled uniformly.
#[must_use]
pub fn sample_np(u: f64, p: usize, scale: f64, gamma_o: f64, gamma_t: f64) -> f64 {
    if p < P_MAX {
        phi(p, gamma_o, gamma_t) + sample_trimmed_logistic(u, scale, -consts::PI, consts::PI)
    } else {
        2.0 * consts::PI * u
    }
}
