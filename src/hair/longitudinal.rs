//! Longitudinal scattering function `Mp`.
//!
//! `Mp` is a normalized density over the longitudinal angle of the incoming direction: for any
//! outgoing angle `theta_o`, `integral Mp(theta_i, theta_o) cos(theta_i) dtheta_i = 1`. It is
//! built on the modified Bessel function of the first kind `I0`, which overflows long before
//! realistic shiny hair reaches its smallest variance. Small variances are therefore evaluated in
//! log space.
//!
//! # Mathematical background
//! * [An Energy-Conserving Hair Reflectance Model](https://eugenedeon.com/project/an-energy-conserving-hair-reflectance-model/)
//! * [A Practical and Controllable Hair and Fur Model for Production Path Tracing](https://benedikt-bitterli.me/pchfm/)

use std::f64::consts;

use crate::utils::{self, FloatExt};

/// Variances up to this value are evaluated in log space
const LOG_DOMAIN_VARIANCE: f64 = 0.1;

/// Number of terms of the power series of `I0`. Enough for every argument that is not handled by
/// the asymptotic expansion.
const I0_TERMS: u32 = 16;

/// Arguments above this value use the asymptotic expansion of `log(I0)`
const I0_ASYMPTOTIC_ARGUMENT: f64 = 12.0;

/// Modified Bessel function of the first kind, order zero
#[must_use]
pub fn i0(x: f64) -> f64 {
    let y = 0.25 * x * x;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..I0_TERMS {
        term *= y / f64::from(k * k);
        sum += term;
    }
    sum
}

/// `log(I0(x))` that does not overflow for large arguments
#[must_use]
pub fn log_i0(x: f64) -> f64 {
    if x > I0_ASYMPTOTIC_ARGUMENT {
        #[allow(clippy::suboptimal_flops)]
        {
            x + 0.5 * ((1.0 / (2.0 * consts::PI * x)).ln() + 1.0 / (8.0 * x))
        }
    } else {
        i0(x).ln()
    }
}

/// Evaluates `Mp` for the variance `v`
#[must_use]
pub fn mp(cos_theta_i: f64, cos_theta_o: f64, sin_theta_i: f64, sin_theta_o: f64, v: f64) -> f64 {
    let a = cos_theta_i * cos_theta_o / v;
    let b = sin_theta_i * sin_theta_o / v;
    if v <= LOG_DOMAIN_VARIANCE {
        (log_i0(a) - b - 1.0 / v + consts::LN_2 + (1.0 / (2.0 * v)).ln()).exp()
    } else {
        (-b).exp() * i0(a) / ((1.0 / v).sinh() * 2.0 * v)
    }
}

/// Samples the longitudinal angle of an incoming direction proportional to `Mp` for the given
/// outgoing angle.
///
/// # Arguments
/// * `u1`, `u2` - canonical random numbers
///
/// # Return
/// sine and cosine of the incoming longitudinal angle
#[must_use]
pub fn sample_mp(u1: f64, u2: f64, v: f64, sin_theta_o: f64, cos_theta_o: f64) -> (f64, f64) {
    // keeps log() away from zero. exp(-2 / v) underflows for small variances
    let u1 = u1.max(1e-5);
    #[allow(clippy::suboptimal_flops)]
    let cos_theta = 1.0 + v * (u1 + (1.0 - u1) * (-2.0 / v).exp()).ln();
    let sin_theta = utils::safe_sqrt(1.0 - cos_theta.sq());
    let cos_phi = (2.0 * consts::PI * u2).cos();

    #[allow(clippy::suboptimal_flops)]
    let sin_theta_i = -cos_theta * sin_theta_o + sin_theta * cos_phi * cos_theta_o;
    let cos_theta_i = utils::safe_sqrt(1.0 - sin_theta_i.sq());
    (sin_theta_i, cos_theta_i)
}
