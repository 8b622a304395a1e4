//! [BSDF] for hair and fur fibers.
//!
//! Fibers are modelled as rough dielectric cylinders with an absorbing interior. Light that hits
//! a fiber is split into lobes by the number of times it travels through the interior: R is
//! reflected at the surface, TT is transmitted twice, TRT is reflected once inside and everything
//! with more internal reflections is summed up into a single lobe (TRT+). Each explicit lobe is a
//! product of a longitudinal function `Mp`, an energy split `Ap` and an azimuthal function `Np`.
//!
//! Directions live in a fiber-local frame: the x-axis is the tangent of the fiber and the
//! y-axis is the normal of the ribbon the fiber is rendered as. The offset across the fiber is
//! derived from the y component of the outgoing direction, so no offset has to be passed in.
//!
//! Unlike the surface [BSDF]s this crate is designed for, [`HairBsdf::evaluate`](BSDF::evaluate)
//! is a density over the full sphere of directions. It must **not** be multiplied with a cosine
//! term. The pdf is always the density of the full model, never the probability of the sampled
//! lobe.
//!
//! **NOTE: the `hair` feature must be enabled to use this code**
//!
//! # References
//! * Eugene d'Eon, Guillaume François, Martin Hill, Joe Letteri, and Jean-Marie Aubry. An
//!     Energy-Conserving Hair Reflectance Model. *Computer Graphics Forum 30(4)*, 2011.
//! * Benedikt Bitterli and Matt Pharr. A Practical and Controllable Hair and Fur Model for
//!     Production Path Tracing. *Computer Graphics Forum 35(2)*, 2016.
//! * Stephen R. Marschner, Henrik Wann Jensen, Mike Cammarano, Steve Worley, and Pat Hanrahan.
//!     Light Scattering from Human Hair Fibers. *ACM Transactions on Graphics 22(3)*, 2003.

use std::{
    f64::consts,
    ops::{Add, Mul},
};

use log::trace;

use crate::{utils::FloatExt, RgbD, SampleIncomingResponse, Vec3d, Vec4d, BSDF};

pub mod absorption;
pub mod attenuation;
pub mod azimuthal;
pub mod geometry;
pub mod longitudinal;

pub use absorption::Absorption;
pub use attenuation::LobeEnergy;

use geometry::{CrossSection, CuticleTilt, FiberAngles};

/// Number of explicitly modelled lobes. The lobe with this index is the sum of all remaining
/// paths.
pub const P_MAX: usize = 3;

/// Angle between the scales of the cuticle and the fiber axis
pub const CUTICLE_TILT_DEGREES: f64 = 2.0;

const SQRT_PI_OVER_8: f64 = 0.626_657_068_657_750_1;

/// Smallest longitudinal variance and azimuthal scale. Keeps perfectly smooth fibers finite.
const MIN_VARIANCE: f64 = 1e-7;
const MIN_AZIMUTHAL_SCALE: f64 = 1e-7;

/// Input parameters of [`HairBsdf`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HairParameters {
    /// How much light is absorbed inside the fiber. See [`Absorption`]
    pub absorption: Absorption,

    /// Roughness along the fiber. Should be in \[0,1\]. Small values concentrate every lobe
    /// around a cone of mirrored directions.
    pub longitudinal_roughness: f32,

    /// Roughness around the fiber. Should be in \[0,1\]
    pub azimuthal_roughness: f32,

    /// Index of refraction of the fiber interior. Human hair is around 1.55
    pub ior: f32,

    /// Multiplies the result of [`BSDF::evaluate`]
    pub weight: f32,

    /// Whether the fiber should be shaded from both sides. Not interpreted by the BSDF, the
    /// caller decides which side is hit.
    pub double_sided: bool,
}

impl Default for HairParameters {
    fn default() -> Self {
        Self {
            absorption: Absorption::default(),
            longitudinal_roughness: 0.3,
            azimuthal_roughness: 0.3,
            ior: 1.55,
            weight: 1.0,
            double_sided: false,
        }
    }
}

/// Fiber scattering [BSDF]. Everything that only depends on the parameters is computed on
/// construction.
///
/// **NOTE: the `hair` feature must be enabled to use this code**
#[derive(Clone, Copy, Debug)]
pub struct HairBsdf {
    /// `sigma_a`
    absorption: RgbD,
    eta: f64,
    eta_sq: f64,
    /// longitudinal variance of every lobe
    variance: [f64; P_MAX + 1],
    tilt: CuticleTilt,
    azimuthal_scale: f64,
    azimuthal_roughness: f64,
    weight: f64,
    double_sided: bool,
}

impl HairBsdf {
    #[must_use]
    pub fn new(parameters: &HairParameters) -> Self {
        let beta_m = f64::from(parameters.longitudinal_roughness);
        let beta_n = f64::from(parameters.azimuthal_roughness);
        let eta = f64::from(parameters.ior);

        #[allow(clippy::suboptimal_flops)]
        let v0 = (0.726 * beta_m + 0.812 * beta_m.sq() + 3.7 * beta_m.powi(20)).sq();
        let mut variance = [4.0 * v0; P_MAX + 1];
        variance[0] = v0;
        variance[1] = 0.25 * v0;
        let variance = variance.map(|v| v.max(MIN_VARIANCE));

        #[allow(clippy::suboptimal_flops)]
        let azimuthal_scale = (SQRT_PI_OVER_8
            * (0.265 * beta_n + 1.194 * beta_n.sq() + 5.372 * beta_n.powi(22)))
        .max(MIN_AZIMUTHAL_SCALE);

        let absorption = parameters.absorption.resolve(beta_n);
        trace!(
            "hair bsdf: variance {variance:?}, azimuthal scale {azimuthal_scale}, sigma_a {absorption}"
        );

        Self {
            absorption,
            eta,
            eta_sq: eta.sq(),
            variance,
            tilt: CuticleTilt::new(CUTICLE_TILT_DEGREES.to_radians()),
            azimuthal_scale,
            azimuthal_roughness: beta_n,
            weight: f64::from(parameters.weight),
            double_sided: parameters.double_sided,
        }
    }

    #[must_use]
    pub const fn double_sided(&self) -> bool {
        self.double_sided
    }

    /// Energy of every lobe and the probabilities of sampling them for the given outgoing
    /// direction
    #[must_use]
    pub fn lobe_energy(&self, omega_o: Vec3d) -> LobeEnergy {
        let outgoing = FiberAngles::from_direction(omega_o);
        let section = CrossSection::new(omega_o, outgoing, self.eta, self.eta_sq);
        self.lobe_energy_at(outgoing, &section)
    }

    fn lobe_energy_at(&self, outgoing: FiberAngles, section: &CrossSection) -> LobeEnergy {
        LobeEnergy::new(
            outgoing.cos_theta,
            section.cos_gamma_o,
            self.eta,
            section.transmittance(self.absorption),
        )
    }

    /// `Mp * Np` of every lobe, weighted by `weights`. Used with the spectral attenuation for
    /// evaluation and with the lobe probabilities for the pdf.
    fn sum_lobes<T>(
        &self,
        outgoing: FiberAngles,
        incoming: FiberAngles,
        section: &CrossSection,
        weights: &[T; P_MAX + 1],
    ) -> T
    where
        T: Copy + Add<Output = T> + Mul<f64, Output = T>,
    {
        let phi = incoming.phi - outgoing.phi;

        let m = longitudinal::mp(
            incoming.cos_theta,
            outgoing.cos_theta,
            incoming.sin_theta,
            outgoing.sin_theta,
            self.variance[P_MAX],
        );
        let mut sum = weights[P_MAX] * (m / (2.0 * consts::PI));

        for (p, &weight) in weights.iter().enumerate().take(P_MAX) {
            let (sin_theta_o, cos_theta_o) =
                self.tilt.rotate(p, outgoing.sin_theta, outgoing.cos_theta);
            let m = longitudinal::mp(
                incoming.cos_theta,
                cos_theta_o.abs(),
                incoming.sin_theta,
                sin_theta_o,
                self.variance[p],
            );
            let n = azimuthal::np(phi, p, self.azimuthal_scale, section.gamma_o, section.gamma_t);
            sum = sum + weight * (m * n);
        }
        sum
    }
}

impl From<HairParameters> for HairBsdf {
    fn from(parameters: HairParameters) -> Self {
        Self::new(&parameters)
    }
}

impl BSDF for HairBsdf {
    fn sample_incoming(&self, omega_o: Vec3d, rdf: Vec4d) -> SampleIncomingResponse {
        debug_assert!(omega_o.is_normalized());
        let outgoing = FiberAngles::from_direction(omega_o);
        let section = CrossSection::new(omega_o, outgoing, self.eta, self.eta_sq);
        let energy = self.lobe_energy_at(outgoing, &section);

        let p = energy.select_lobe(rdf.x);

        let (sin_theta_o, cos_theta_o) = if p < P_MAX {
            self.tilt.rotate(p, outgoing.sin_theta, outgoing.cos_theta)
        } else {
            (outgoing.sin_theta, outgoing.cos_theta)
        };
        let (sin_theta_i, cos_theta_i) = longitudinal::sample_mp(
            rdf.y,
            rdf.z,
            self.variance[p],
            sin_theta_o,
            cos_theta_o.abs(),
        );

        let dphi = azimuthal::sample_np(
            rdf.w,
            p,
            self.azimuthal_scale,
            section.gamma_o,
            section.gamma_t,
        );

        let omega_i = FiberAngles {
            sin_theta: sin_theta_i,
            cos_theta: cos_theta_i,
            phi: outgoing.phi + dphi,
        }
        .to_direction();

        SampleIncomingResponse {
            omega_i,
            bsdf: self.evaluate(omega_o, omega_i),
            pdf: self.sample_incoming_pdf(omega_o, omega_i),
        }
    }

    fn evaluate(&self, omega_o: Vec3d, omega_i: Vec3d) -> RgbD {
        debug_assert!(omega_o.is_normalized() && omega_i.is_normalized());
        let outgoing = FiberAngles::from_direction(omega_o);
        let incoming = FiberAngles::from_direction(omega_i);
        let section = CrossSection::new(omega_o, outgoing, self.eta, self.eta_sq);
        let energy = self.lobe_energy_at(outgoing, &section);

        let bsdf = self.sum_lobes(outgoing, incoming, &section, &energy.ap);
        bsdf.max(RgbD::ZERO) * self.weight
    }

    fn sample_incoming_pdf(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64 {
        debug_assert!(omega_o.is_normalized() && omega_i.is_normalized());
        let outgoing = FiberAngles::from_direction(omega_o);
        let incoming = FiberAngles::from_direction(omega_i);
        let section = CrossSection::new(omega_o, outgoing, self.eta, self.eta_sq);
        let energy = self.lobe_energy_at(outgoing, &section);

        self.sum_lobes(outgoing, incoming, &section, &energy.pdf).max(0.0)
    }

    fn base_color(&self, _omega_o: Vec3d) -> RgbD {
        absorption::reflectance(self.absorption, self.azimuthal_roughness)
    }
}
