//! PCG32 generators and the uniform draws taken from them.
//!
//! [`Pcg32`] is `rand_pcg`'s XSH-RR 64/32 generator. Its state advances by a
//! 64-bit linear congruential step whose increment is derived from the stream
//! index, so two generators sharing a seed but built with different stream
//! indices walk different sequences and their outputs do not overlap.
//!
//! The draws in [`UniformDraws`] are implemented here on top of the raw
//! outputs, so bootstrap resamples stay the same across `rand` releases.

use rand::RngCore;

use crate::error::{Result, StabilityError};

pub use rand_pcg::Pcg32;

/// Uniform draws with a fixed, documented mapping from raw generator output.
pub trait UniformDraws: RngCore {
    /// Uniform value in `[0, 1)` carrying 53 random bits.
    fn uniform_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 * SCALE
    }

    /// Uniform integer in `[0, bound)` without modulo bias.
    ///
    /// Uses the widening multiply of Lemire (2019), rejecting the few raw draws
    /// that would over-represent the low values.
    fn uniform_below(&mut self, bound: u32) -> Result<u32> {
        if bound == 0 {
            return Err(StabilityError::InvalidArgument(
                "upper bound for a uniform integer draw must be positive".to_string(),
            ));
        }

        let mut product = u64::from(self.next_u32()) * u64::from(bound);
        let mut low = product as u32;
        if low < bound {
            let threshold = bound.wrapping_neg() % bound;
            while low < threshold {
                product = u64::from(self.next_u32()) * u64::from(bound);
                low = product as u32;
            }
        }
        Ok((product >> 32) as u32)
    }

    /// Uniform index in `[0, n)`, for indexing into collections.
    fn uniform_index(&mut self, n: usize) -> Result<usize> {
        let bound = u32::try_from(n).map_err(|_| {
            StabilityError::InvalidArgument(format!(
                "cannot draw a uniform index below {}, limit is {}",
                n,
                u32::MAX
            ))
        })?;
        Ok(self.uniform_below(bound)? as usize)
    }
}

impl<R: RngCore + ?Sized> UniformDraws for R {}
