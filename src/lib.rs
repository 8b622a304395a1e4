#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::suboptimal_flops)]
#![deny(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]
#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::must_use_candidate)]
#![deny(clippy::double_must_use)]
#![deny(clippy::use_self)]
#![deny(clippy::unreadable_literal)]
#![deny(clippy::explicit_iter_loop)]
// these are lints to enable later
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]

//! This crate provides a scattering model for hair and fur fibers in a path tracer.
//! Furthermore, methods for importance sampling are provided.
//!
//! # Design Decisions
//! **NOTE: This crate is pretty much in alpha state. Therefore a lot of the following things may
//! or may not change in the future**
//!
//! The code is geared towards pathtracing. Direct lighting techniques such as image based lighting or
//! polygonal lights are **not implemented**.
//!
//! Lighting calculations are done exclusively in [f64]s. Fiber lobes of shiny hair are extremely
//! narrow and [f64] keeps the numerical errors of evaluating them small. However, material
//! parameters are stored as [f32]s for a minimal memory footprint. Everything that only depends
//! on the parameters is computed once, when a [BSDF] is constructed.
//!
//! [BSDF]s are computed in a local space. For fibers, the x-axis is the tangent of the fiber and
//! the y-axis is the normal of the ribbon the fiber is rendered as. Therefore incident and exitant
//! vectors must be rotated before or after evaluation of the [BSDF].
//!
//! Fiber [BSDF]s are densities over the full sphere of directions. Unlike surface [BSDF]s, no
//! `|cos theta_i|` term has to be multiplied in. Pdf's are with respect to solid angle as well.
//!
//! `sample_...` functions are deterministic. That means you are responsible for generate [f64] in the
//! range of `0.0..1.0`. This allows you to control the sampling process and the random generator
//! or low discrepancy sequence in use. These random floats are passed as a [Vec4d].
//!
//! This crate is built on [glam] for a simple but fast vector math library at the core.
//! Diagnostics are reported through the [log] facade. No logger is installed by this crate.
//!
//! # Features
//! * `hair` (default) - [`hair::HairBsdf`]
//! * `serde` - `Serialize` and `Deserialize` for the material parameters
//!
//! # References
//! A lot of pathtracing literature went into this. Here are the most influential papers and other
//! sources I have used:
//! * Stephen R. Marschner, Henrik Wann Jensen, Mike Cammarano, Steve Worley, and Pat Hanrahan.
//!     Light scattering from human hair fibers. *ACM Transactions on Graphics 22(3):780–791,* 2003.
//! * Eugene d'Eon, Guillaume François, Martin Hill, Joe Letteri, and Jean-Marie Aubry. An
//!     energy-conserving hair reflectance model. *Computer Graphics Forum 30(4):1181–1187,* 2011.
//! * Benedikt Bitterli and Matt Pharr. A practical and controllable hair and fur model for
//!     production path tracing. *Computer Graphics Forum 35(2):275–283,* 2016.
//! * Eric Veach. *Robust monte carlo methods for light transport simulation.* PhD thesis, Stanford University, 1997.
//! * PBRTs implementation of the hair BSDF: <https://github.com/mmp/pbrt-v3/blob/master/src/materials/hair.cpp>

mod core;

pub use core::{RgbD, RgbF, SampleIncomingResponse, Vec2d, Vec3d, Vec4d, BSDF};

#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod utils;

#[cfg(feature = "hair")]
pub mod hair;
