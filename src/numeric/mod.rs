//! Numerical kernels.
//!
//! Everything here is a pure function with explicit tolerances, an
//! iteration cap, and a value-level failure mode (`None` or a `converged`
//! flag). Nothing panics on bad input.

pub(crate) mod charpoly;
pub(crate) mod newton;
pub(crate) mod simpson;
pub(crate) mod simulate;
pub mod special;

use num_traits::{Float, FloatConst, FromPrimitive};

/// Scalar bound shared by the generic kernels: a float with the usual
/// constants and conversions available.
pub trait MathScalar: Float + FloatConst + FromPrimitive {}

impl<T: Float + FloatConst + FromPrimitive> MathScalar for T {}

pub use charpoly::{characteristic_roots, dominant_root, group_roots};
pub use newton::critical_exponent;
pub use simpson::{Quadrature, adaptive_simpson};
pub use simulate::{simulate_divide_and_conquer, simulate_linear};
