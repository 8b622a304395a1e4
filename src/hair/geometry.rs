//! Decomposition of fiber-local directions into the angles the fiber BSDF is defined in.
//!
//! The x-axis of the fiber-local frame is the tangent of the fiber. The longitudinal angle `theta`
//! is measured from the plane perpendicular to the tangent, so `sin(theta)` is simply the x
//! component. The azimuthal angle `phi` runs around the tangent, starting at the z-axis.

use super::P_MAX;
use crate::{
    utils::{self, FloatExt},
    RgbD, Vec3d,
};

/// Longitudinal and azimuthal angles of a direction in the fiber-local frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiberAngles {
    pub sin_theta: f64,
    /// Never negative
    pub cos_theta: f64,
    pub phi: f64,
}

impl FiberAngles {
    #[must_use]
    pub fn from_direction(omega: Vec3d) -> Self {
        let sin_theta = omega.x.clamp(-1.0, 1.0);
        Self {
            sin_theta,
            cos_theta: utils::safe_sqrt(1.0 - sin_theta.sq()),
            phi: omega.y.atan2(omega.z),
        }
    }

    #[must_use]
    pub fn to_direction(self) -> Vec3d {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vec3d {
            x: self.sin_theta,
            y: self.cos_theta * sin_phi,
            z: self.cos_theta * cos_phi,
        }
    }
}

/// Where the outgoing ray leaves the circular cross-section of the fiber and how the refracted
/// ray travels through it.
///
/// The offset across the fiber is taken from the y component of the outgoing direction, which is
/// the normal of the ribbon the fiber is rendered as.
#[derive(Clone, Copy, Debug)]
pub struct CrossSection {
    /// cosine of the exit angle `gamma_o` at the cross-section. In `[0, 1]`
    pub cos_gamma_o: f64,
    pub gamma_o: f64,
    /// angle of the refracted ray inside the cross-section
    pub gamma_t: f64,
    pub cos_gamma_t: f64,
    /// longitudinal cosine of the refracted ray
    pub cos_theta_t: f64,
}

impl CrossSection {
    #[must_use]
    pub fn new(omega_o: Vec3d, outgoing: FiberAngles, eta: f64, eta_sq: f64) -> Self {
        let sin_theta_t = outgoing.sin_theta / eta;
        let cos_theta_t = utils::safe_sqrt(1.0 - sin_theta_t.sq());

        // Modified index of refraction for the projection of the ray onto the normal plane.
        // 'Light Scattering from Human Hair Fibers'
        // http://www.graphics.stanford.edu/papers/hair/hair-sg03final.pdf
        let eta_p = if outgoing.cos_theta > 0.0 {
            utils::safe_sqrt(eta_sq - outgoing.sin_theta.sq()) / outgoing.cos_theta
        } else {
            f64::INFINITY
        };

        let cos_gamma_o = omega_o.y.abs().min(1.0);
        let sin_gamma_o = utils::safe_sqrt(1.0 - cos_gamma_o.sq());
        let gamma_o = utils::safe_asin(sin_gamma_o);

        let sin_gamma_t = sin_gamma_o / eta_p;
        let cos_gamma_t = utils::safe_sqrt(1.0 - sin_gamma_t.sq());
        let gamma_t = utils::safe_asin(sin_gamma_t);

        Self {
            cos_gamma_o,
            gamma_o,
            gamma_t,
            cos_gamma_t,
            cos_theta_t,
        }
    }

    /// Beer-Lambert transmittance of a single pass through the fiber
    #[must_use]
    pub fn transmittance(&self, absorption: RgbD) -> RgbD {
        use crate::utils::VecExt;

        let path_length = 2.0 * self.cos_gamma_t / self.cos_theta_t.max(f64::MIN_POSITIVE);
        (-absorption * path_length).exp()
    }
}

/// Rotations of the longitudinal angle that model the scales on the cuticle of a fiber.
///
/// The scales tilt every lobe by a multiple of the tilt angle `alpha`. The table stores
/// `sin(2^k alpha)` and `cos(2^k alpha)` for `k < P_MAX`, built with double angle formulas.
#[derive(Clone, Copy, Debug)]
pub struct CuticleTilt {
    sin_2k_alpha: [f64; P_MAX],
    cos_2k_alpha: [f64; P_MAX],
}

impl CuticleTilt {
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        let mut sin_2k_alpha = [0.0; P_MAX];
        let mut cos_2k_alpha = [0.0; P_MAX];
        sin_2k_alpha[0] = alpha.sin();
        cos_2k_alpha[0] = utils::safe_sqrt(1.0 - sin_2k_alpha[0].sq());
        for i in 1..P_MAX {
            sin_2k_alpha[i] = 2.0 * cos_2k_alpha[i - 1] * sin_2k_alpha[i - 1];
            cos_2k_alpha[i] = cos_2k_alpha[i - 1].sq() - sin_2k_alpha[i - 1].sq();
        }
        Self {
            sin_2k_alpha,
            cos_2k_alpha,
        }
    }

    /// sine and cosine of the signed shift of lobe `p`.
    /// R is shifted by `2 alpha`, TT by `-alpha` and TRT by `-4 alpha`. TRT+ is not shifted.
    fn shift(&self, p: usize) -> (f64, f64) {
        match p {
            0 => (self.sin_2k_alpha[1], self.cos_2k_alpha[1]),
            1 => (-self.sin_2k_alpha[0], self.cos_2k_alpha[0]),
            2 => (-self.sin_2k_alpha[2], self.cos_2k_alpha[2]),
            _ => (0.0, 1.0),
        }
    }

    /// Rotates the longitudinal angle given by `sin_theta` and `cos_theta` by the shift of lobe
    /// `p`. Returns the rotated sine and cosine.
    #[must_use]
    pub fn rotate(&self, p: usize, sin_theta: f64, cos_theta: f64) -> (f64, f64) {
        let (sin_shift, cos_shift) = self.shift(p);
        #[allow(clippy::suboptimal_flops)]
        (
            sin_theta * cos_shift + cos_theta * sin_shift,
            cos_theta * cos_shift - sin_theta * sin_shift,
        )
    }
}
