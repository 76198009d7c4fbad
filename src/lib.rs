//! # single-stability
//!
//! Reproducible random streams and bootstrap cluster-stability estimation for single-cell data,
//! part of the single-rust ecosystem.
//!
//! Clustering results in single-cell analysis are only as meaningful as they are stable. This crate
//! estimates how reliably each cluster is recovered when cells are resampled with replacement and
//! reclustered, and provides the seeded, stream-indexed random number generators that make such
//! resampling reproducible even when trials run on many threads.
//!
//! ## Core Features
//!
//! - **Parallel-safe random streams**: PCG32 generators selected by seed and stream index, with no
//!   shared or global state
//! - **Seed normalization**: integers, 32-bit word vectors, digit strings and integral floats all
//!   reduce to the same 64-bit seed
//! - **Bootstrap stability**: averaged co-assignment probabilities between original clusters, for
//!   any caller-supplied clustering procedure
//! - **Dense and sparse data**: `ndarray::Array2` and `CsrMatrix` from nalgebra-sparse
//!
//! ## Module Organization
//!
//! - **[`random`]**: Seed conversion, PCG32 streams and batch validation
//! - **[`clustering`]**: Bootstrap engine, co-assignment accumulation and summaries
//! - **[`error`]**: Error type shared by both

pub mod clustering;
pub mod error;
pub mod random;

pub use error::{Result, StabilityError};
