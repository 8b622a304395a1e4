//! Ways to specify how strongly a fiber absorbs light.
//!
//! Every parameterization resolves into the absorption coefficient `sigma_a` of the fiber
//! interior, measured in units of the fiber radius.
//!
//! # References
//! * [A Practical and Controllable Hair and Fur Model for Production Path Tracing](https://benedikt-bitterli.me/pchfm/)
//! * [pbrt-v3, Hair scattering](https://pbr-book.org/3ed-2018/Light_Transport_II_Volume_Rendering/Hair)

use log::warn;

use crate::{
    utils::{SafeCast, VecExt},
    RgbD, RgbF,
};

const EUMELANIN_SIGMA_A: RgbD = RgbD::new(0.419, 0.697, 1.37);
const PHEOMELANIN_SIGMA_A: RgbD = RgbD::new(0.187, 0.4, 1.05);

/// Darkest color accepted by [`Absorption::Color`]. Black would need an infinite coefficient.
const MIN_COLOR: f32 = 1e-4;

/// How the absorption of the fiber interior is specified
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Absorption {
    /// `sigma_a` itself. All components should be non-negative.
    Coefficient(RgbF),

    /// Color of a fiber after many scattering events. Components are clamped to
    /// `[1e-4, 1]`.
    Color(RgbF),

    /// Concentrations of the two pigments of human hair. Around `0.05` is blonde, `1.3` brown
    /// and `8` black hair. Pheomelanin gives red hair its tint.
    Melanin { eumelanin: f32, pheomelanin: f32 },
}

impl Default for Absorption {
    fn default() -> Self {
        Self::Melanin {
            eumelanin: 1.3,
            pheomelanin: 0.0,
        }
    }
}

impl Absorption {
    /// Computes `sigma_a`. The azimuthal roughness is needed to invert the mapping from
    /// absorption to color.
    #[must_use]
    pub fn resolve(self, azimuthal_roughness: f64) -> RgbD {
        match self {
            Self::Coefficient(sigma_a) => sigma_a.safe_cast().max(RgbD::ZERO),
            Self::Color(color) => from_reflectance(color, azimuthal_roughness),
            Self::Melanin {
                eumelanin,
                pheomelanin,
            } => from_concentration(f64::from(eumelanin), f64::from(pheomelanin)),
        }
    }
}

/// `sigma_a` of a mix of eumelanin and pheomelanin
#[must_use]
pub fn from_concentration(eumelanin: f64, pheomelanin: f64) -> RgbD {
    EUMELANIN_SIGMA_A * eumelanin.max(0.0) + PHEOMELANIN_SIGMA_A * pheomelanin.max(0.0)
}

/// `sigma_a` that makes a fiber with the given azimuthal roughness appear in `color`
#[must_use]
pub fn from_reflectance(color: RgbF, azimuthal_roughness: f64) -> RgbD {
    let clamped = color.clamp(RgbF::splat(MIN_COLOR), RgbF::ONE);
    if clamped != color {
        warn!("hair color {color} is outside of [{MIN_COLOR}, 1] and was clamped to {clamped}");
    }
    let color: RgbD = clamped.safe_cast();
    let log_color = RgbD::new(color.x.ln(), color.y.ln(), color.z.ln());
    (log_color / color_falloff(azimuthal_roughness)).sq()
}

/// Inverse of [`from_reflectance`]. The color of a fiber after many scattering events.
#[must_use]
pub fn reflectance(sigma_a: RgbD, azimuthal_roughness: f64) -> RgbD {
    (-sigma_a.max(RgbD::ZERO).sqrt() * color_falloff(azimuthal_roughness)).exp()
}

/// Polynomial fit of how quickly the color of a fiber darkens with the square root of its
/// absorption coefficient
fn color_falloff(beta_n: f64) -> f64 {
    #[allow(clippy::suboptimal_flops)]
    {
        5.969 - 0.215 * beta_n + 2.532 * beta_n.powi(2) - 10.73 * beta_n.powi(3)
            + 5.574 * beta_n.powi(4)
            + 0.245 * beta_n.powi(5)
    }
}
