//! Reproducible, parallel-safe random number streams.
//!
//! Each independently scheduled task gets its own [`Pcg32`] built from a shared
//! seed and a task-specific stream index. There is no global generator; a
//! generator is owned by exactly one task.
//!
//! ## Quick Example
//!
//! ```rust
//! use single_stability::random::{UniformDraws, create_stream, create_stream_batch};
//!
//! let mut rng = create_stream(42u64, 0).unwrap();
//! let index = rng.uniform_below(10).unwrap();
//! assert!(index < 10);
//!
//! // One generator per task, validated before dispatch
//! let seeds = vec![42u64; 4];
//! let streams: Vec<u64> = (0..4).collect();
//! let generators = create_stream_batch(&seeds, &streams, 4, "cells").unwrap();
//! assert_eq!(generators.len(), 4);
//! ```

mod pcg;
mod seed;
mod streams;

pub use pcg::{Pcg32, UniformDraws};
pub use seed::{Seed, normalize_seed};
pub use streams::{create_stream, create_stream_batch, validate_stream_batch};
