use log::trace;

use crate::error::{Result, StabilityError};
use crate::random::{Pcg32, Seed};

/// Build an independent generator for one task.
///
/// # Arguments
///
/// * `seed` - Seed in any representation accepted by [`Seed`]
/// * `stream` - Stream index; distinct indices give non-overlapping sequences
///
/// # Returns
///
/// A freshly owned generator. Nothing is cached between calls.
pub fn create_stream(seed: impl Into<Seed>, stream: u64) -> Result<Pcg32> {
    let seed = seed.into().normalize()?;
    trace!("creating PCG32 stream {} for seed {}", stream, seed);
    Ok(Pcg32::new(seed, stream))
}

/// Check that a batch of seeds and stream indices lines up with `expected` tasks.
///
/// Meant to run once, before any work is dispatched, so that a configuration
/// error is reported a single time rather than by every worker.
///
/// # Arguments
///
/// * `seeds` - One seed per task
/// * `streams` - One stream index per task
/// * `expected` - Number of tasks
/// * `subject` - What the tasks are, used in the error message (e.g. "cells")
pub fn validate_stream_batch<S>(
    seeds: &[S],
    streams: &[u64],
    expected: usize,
    subject: &str,
) -> Result<()> {
    if seeds.len() != expected {
        return Err(StabilityError::dimension_mismatch(subject, "seeds"));
    }

    if streams.len() != expected {
        return Err(StabilityError::dimension_mismatch(subject, "streams"));
    }

    Ok(())
}

/// Validate a batch and build one generator per task.
///
/// Seeds are normalized before any generator is created, so an invalid seed
/// anywhere in the batch fails the whole batch.
pub fn create_stream_batch<S>(
    seeds: &[S],
    streams: &[u64],
    expected: usize,
    subject: &str,
) -> Result<Vec<Pcg32>>
where
    S: Clone + Into<Seed>,
{
    validate_stream_batch(seeds, streams, expected, subject)?;

    let normalized = seeds
        .iter()
        .map(|seed| seed.clone().into().normalize())
        .collect::<Result<Vec<u64>>>()?;

    Ok(normalized
        .into_iter()
        .zip(streams.iter())
        .map(|(seed, &stream)| Pcg32::new(seed, stream))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_create_stream_is_deterministic() {
        let mut a = create_stream(1000u64, 3).unwrap();
        let mut b = create_stream("1000", 3).unwrap();
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_create_stream_rejects_bad_seed() {
        assert!(matches!(
            create_stream("abc", 0),
            Err(StabilityError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn test_validate_stream_batch() {
        let seeds = vec![1u64; 5];
        let streams: Vec<u64> = (0..5).collect();
        assert!(validate_stream_batch(&seeds, &streams, 5, "genes").is_ok());

        let err = validate_stream_batch(&seeds[..4], &streams, 5, "genes").unwrap_err();
        assert_eq!(err.to_string(), "number of genes and seeds should be the same");

        let err = validate_stream_batch(&seeds, &streams[..4], 5, "genes").unwrap_err();
        assert_eq!(err.to_string(), "number of genes and streams should be the same");
    }

    #[test]
    fn test_seeds_checked_before_streams() {
        let seeds = vec![1u64; 4];
        let streams: Vec<u64> = (0..4).collect();
        let err = validate_stream_batch(&seeds, &streams, 5, "cells").unwrap_err();
        assert!(err.to_string().contains("seeds"));
    }

    #[test]
    fn test_create_stream_batch() {
        let seeds = vec![7u64, 7, 8];
        let streams = vec![0u64, 1, 0];
        let mut batch = create_stream_batch(&seeds, &streams, 3, "tasks").unwrap();
        assert_eq!(batch.len(), 3);

        let firsts: Vec<u32> = batch.iter_mut().map(|rng| rng.next_u32()).collect();
        assert_eq!(firsts[1], Pcg32::new(7, 1).next_u32());
        assert_ne!(firsts[0], firsts[1]);
        assert_ne!(firsts[0], firsts[2]);
    }

    #[test]
    fn test_create_stream_batch_invalid_seed_fails_whole_batch() {
        let seeds = vec!["1", "x", "3"];
        let streams = vec![0u64, 1, 2];
        assert!(create_stream_batch(&seeds, &streams, 3, "tasks").is_err());
    }
}
