/// used for colors
pub type RgbD = glam::f64::DVec3;
/// used for colors
pub type RgbF = glam::f32::Vec3;

/// used for direction vectors
pub type Vec3d = glam::f64::DVec3;
/// used for direction vectors
pub type Vec2d = glam::f64::DVec2;
/// used for passing canonical random numbers to the sampling functions
pub type Vec4d = glam::f64::DVec4;

/// Contains the Data that is returned by [`BSDF::sample_incoming`]
#[derive(Clone, Copy, Debug)]
pub struct SampleIncomingResponse {
    /// # Incoming Direction
    ///The direction where light could be arriving at the fiber
    pub omega_i: Vec3d,

    /// The value at for the BSDF. Indicates how much light is scattered from the incoming
    /// direction to the outgoing direction
    pub bsdf: RgbD,

    /// The probability density for choosing `omega_i` given `omega_o`, with respect to solid
    /// angle. This is always the full density of all lobes at `omega_i`, exactly what
    /// [`BSDF::sample_incoming_pdf`] returns for the same pair of directions.
    pub pdf: f64,
}

/// Bidirectional Scattering Distribution Functions. A trait that describes how light is scattered
/// at a shading point.
///
/// This trait contains functions to importance sample and evaluate a specific BSDF
pub trait BSDF {
    /// Given a direction where light is scattered to, samples an incident direction, from which the light
    /// may come from
    ///
    /// # Arguments
    /// * `omega_o` - The direction where light is scattered to. Outgoing direction
    /// * `rdf` - Four canonical random numbers in `[0,1)`. The caller owns the random
    ///     generator or low discrepancy sequence they come from.
    ///
    /// # Return
    /// See [`SampleIncomingResponse`]
    fn sample_incoming(&self, omega_o: Vec3d, rdf: Vec4d) -> SampleIncomingResponse;

    /// Returns the value of the BSDF at the given directions
    ///
    /// # Arguments
    /// * `omega_o` - Exitant light direction
    /// * `omega_i` - Incident light direction
    fn evaluate(&self, omega_o: Vec3d, omega_i: Vec3d) -> RgbD;

    /// Returns the probability density sampling an incoming direction given an outgoing direction
    /// See [`BSDF::sample_incoming`] and [`SampleIncomingResponse`]
    fn sample_incoming_pdf(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64;

    /// Returns the base color of the surface.
    /// This function is used to generate auxiliary images for AI tools such as Open Image Denoise
    fn base_color(&self, omega_o: Vec3d) -> RgbD;
}
