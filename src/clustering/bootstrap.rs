use log::{debug, trace, warn};
use ndarray::Array2;
use rayon::prelude::*;

use crate::clustering::{
    BootstrapConfig, BootstrapOutput, ClusterFn, CoassignAccumulator, CoassignMatrix, CoassignProb,
    ItemAxis, ItemMatrix, LabelSet, draw_with_replacement,
};
use crate::error::{Result, StabilityError, TrialStage};
use crate::random::{Pcg32, create_stream_batch};

/// Estimate cluster stability by bootstrapping items and reclustering.
///
/// Each trial draws as many items as the data holds, uniformly with
/// replacement, reclusters the resampled data and scores the new clustering
/// against the original labels of the drawn items. Trial `t` draws from its own
/// generator, stream `t` of `config.seed`, so serial and parallel runs produce
/// identical results.
///
/// # Arguments
///
/// * `data` - Data container; items are its columns, or its rows if `config.transposed`
/// * `cluster_fn` - Clustering procedure applied to the original and resampled data
/// * `coassign` - Co-assignment probability between two label sets
/// * `original` - Original labels, one per item; computed with `cluster_fn` if `None`
/// * `config` - Number of iterations, orientation, seed and parallelism
///
/// # Returns
///
/// The averaged co-assignment matrix indexed by the original labels in sorted
/// order. Any failure of a collaborator aborts the run.
pub fn bootstrap_cluster<D, C, P>(
    data: &D,
    cluster_fn: &C,
    coassign: &P,
    original: Option<&[C::Label]>,
    config: &BootstrapConfig,
) -> Result<CoassignMatrix<C::Label>>
where
    D: ItemMatrix,
    C: ClusterFn<D>,
    P: CoassignProb,
{
    config.validate()?;
    let axis = config.axis();
    let n_items = data.n_items(axis);

    if n_items == 0 {
        return Err(StabilityError::InvalidArgument(
            "data has no items to resample".to_string(),
        ));
    }

    let original_labels = match original {
        Some(labels) => labels.to_vec(),
        None => cluster_fn
            .cluster(data)
            .map_err(|e| StabilityError::collaborator(None, TrialStage::Cluster, e))?,
    };

    if original_labels.len() != n_items {
        return Err(StabilityError::dimension_mismatch("items", "labels"));
    }

    let labels = LabelSet::from_labels(&original_labels);
    let n_labels = labels.n_levels();

    debug!(
        "Bootstrapping {} items in {} clusters: {} iterations, seed {:?}, {:?}",
        n_items, n_labels, config.iterations, config.seed, axis
    );

    // One generator per trial, built before any trial is dispatched
    let iterations = config.iterations;
    let seeds = vec![config.seed.clone(); iterations];
    let streams: Vec<u64> = (0..iterations as u64).collect();
    let generators = create_stream_batch(&seeds, &streams, iterations, "iterations")?;

    let mut accumulator = CoassignAccumulator::new(n_labels);

    if config.parallel {
        // Collected in trial order so the accumulated sums match a serial run
        let trials = generators
            .into_par_iter()
            .enumerate()
            .map(|(trial, rng)| run_trial(trial, rng, data, axis, &labels, cluster_fn, coassign))
            .collect::<Result<Vec<Array2<f64>>>>()?;

        for matrix in &trials {
            accumulator.accumulate(matrix.view())?;
        }
    } else {
        for (trial, rng) in generators.into_iter().enumerate() {
            let matrix = run_trial(trial, rng, data, axis, &labels, cluster_fn, coassign)?;
            accumulator.accumulate(matrix.view())?;
        }
    }

    let values = accumulator.finalize();

    let undefined = (0..n_labels)
        .flat_map(|i| (i..n_labels).map(move |j| (i, j)))
        .filter(|&(i, j)| values[[i, j]].is_nan())
        .count();
    if undefined > 0 {
        warn!(
            "{} label pairs had no defined co-assignment in {} trials",
            undefined, config.iterations
        );
    }

    debug!("Finished {} bootstrap trials", accumulator.trials());

    Ok(CoassignMatrix {
        labels: labels.levels().to_vec(),
        values,
    })
}

/// Run [`bootstrap_cluster`] and return either the full matrix or, if
/// `config.summarize` is set, its per-label summary.
pub fn bootstrap_stability<D, C, P>(
    data: &D,
    cluster_fn: &C,
    coassign: &P,
    original: Option<&[C::Label]>,
    config: &BootstrapConfig,
) -> Result<BootstrapOutput<C::Label>>
where
    D: ItemMatrix,
    C: ClusterFn<D>,
    P: CoassignProb,
{
    let matrix = bootstrap_cluster(data, cluster_fn, coassign, original, config)?;

    if config.summarize {
        Ok(BootstrapOutput::Summary(matrix.summarize()))
    } else {
        Ok(BootstrapOutput::Matrix(matrix))
    }
}

fn run_trial<D, C, P>(
    trial: usize,
    mut rng: Pcg32,
    data: &D,
    axis: ItemAxis,
    labels: &LabelSet<C::Label>,
    cluster_fn: &C,
    coassign: &P,
) -> Result<Array2<f64>>
where
    D: ItemMatrix,
    C: ClusterFn<D>,
    P: CoassignProb,
{
    let n_items = labels.len();
    let n_labels = labels.n_levels();

    let chosen = draw_with_replacement(&mut rng, n_items)?;
    trace!("Trial {}: drew {} items", trial, chosen.len());

    let resampled = data
        .select_items(&chosen, axis)
        .map_err(|e| StabilityError::collaborator(Some(trial), TrialStage::Resample, e))?;

    let reclusters = cluster_fn
        .cluster(&resampled)
        .map_err(|e| StabilityError::collaborator(Some(trial), TrialStage::Cluster, e))?;

    if reclusters.len() != n_items {
        return Err(StabilityError::collaborator(
            Some(trial),
            TrialStage::Cluster,
            anyhow::anyhow!(
                "clustering returned {} labels for {} items",
                reclusters.len(),
                n_items
            ),
        ));
    }

    let other = LabelSet::from_labels(&reclusters);
    let reference = labels.select(&chosen);

    let matrix = coassign
        .coassign(&reference, n_labels, other.codes(), other.n_levels())
        .map_err(|e| StabilityError::collaborator(Some(trial), TrialStage::Coassign, e))?;

    if matrix.dim() != (n_labels, n_labels) {
        return Err(StabilityError::collaborator(
            Some(trial),
            TrialStage::Coassign,
            anyhow::anyhow!(
                "co-assignment matrix has shape {:?}, expected ({}, {})",
                matrix.dim(),
                n_labels,
                n_labels
            ),
        ));
    }

    Ok(matrix)
}
