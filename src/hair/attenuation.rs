//! How the energy of the light leaving a fiber is split between the scattering lobes.

use super::P_MAX;
use crate::{
    utils::{self, FloatExt, VecExt},
    RgbD,
};

/// Spectral attenuation of every lobe and the discrete distribution used to pick a lobe while
/// sampling. Both depend on the outgoing direction only.
#[derive(Clone, Copy, Debug)]
pub struct LobeEnergy {
    /// Fraction of light carried by R, TT, TRT and the closed form of all longer paths
    pub ap: [RgbD; P_MAX + 1],

    /// Probability of sampling each lobe, proportional to the luminance of `ap`.
    /// Sums up to one, unless every lobe is black. Then all entries are zero.
    pub pdf: [f64; P_MAX + 1],
}

impl LobeEnergy {
    /// # Arguments
    /// * `cos_theta_o` - longitudinal cosine of the outgoing direction
    /// * `cos_gamma_o` - cosine of the exit angle at the cross-section
    /// * `eta` - relative index of refraction of the fiber
    /// * `transmittance` - transmittance of a single pass through the fiber
    #[must_use]
    pub fn new(cos_theta_o: f64, cos_gamma_o: f64, eta: f64, transmittance: RgbD) -> Self {
        let ap = attenuation(cos_theta_o, cos_gamma_o, eta, transmittance);

        let total: f64 = ap.iter().map(|a| a.luminance()).sum();
        let mut pdf = [0.0; P_MAX + 1];
        if total > 0.0 {
            for (pdf, a) in pdf.iter_mut().zip(ap.iter()) {
                *pdf = a.luminance() / total;
            }
        }
        Self { ap, pdf }
    }

    /// Picks a lobe with the canonical random number `u` by walking the cumulative distribution
    #[must_use]
    pub fn select_lobe(&self, u: f64) -> usize {
        let mut u = u;
        for p in 0..P_MAX {
            if u < self.pdf[p] {
                return p;
            }
            u -= self.pdf[p];
        }
        P_MAX
    }
}

/// Computes the attenuation of every lobe.
///
/// Light that is reflected at the surface leaves as R. Light that enters gets transmitted `p`
/// times through the fiber and reflected `p - 1` times inside of it. Every path with more internal
/// reflections than TRT is summed up as a geometric series in closed form.
fn attenuation(cos_theta_o: f64, cos_gamma_o: f64, eta: f64, transmittance: RgbD) -> [RgbD; P_MAX + 1] {
    let cos_theta = cos_theta_o * cos_gamma_o;
    let f = utils::fresnel(cos_theta, 1.0, eta);

    let mut ap = [RgbD::ZERO; P_MAX + 1];
    ap[0] = RgbD::splat(f);
    ap[1] = transmittance * (1.0 - f).sq();
    for p in 2..P_MAX {
        ap[p] = ap[p - 1] * transmittance * f;
    }

    // ratio of the series. It is only 1 at grazing angles with a lossless fiber, where
    // ap[P_MAX - 1] is already zero.
    let ratio = transmittance * f;
    let remaining = RgbD::ONE - ratio;
    let tail = RgbD::select(remaining.cmpgt(RgbD::ZERO), ratio / remaining, RgbD::ZERO);
    ap[P_MAX] = ap[P_MAX - 1] * tail;
    ap
}
