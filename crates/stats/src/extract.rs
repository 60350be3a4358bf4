use crate::error::{Result, StatsError};
use vertexwise_repository::{ModelKey, Repository};
use vertexwise_surface::{HemiPair, Hemisphere, MapDecoder, SurfaceError, SurfaceVector};

/// Significance-masked view of one (model, term, measure).
///
/// Global statistics run over the union of both hemispheres' masked betas and
/// are NaN when no vertex anywhere is significant (a valid result, not an
/// error).
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub global_min_beta: f32,
    pub global_max_beta: f32,
    pub global_mean_beta: f32,
    pub cluster_counts: HemiPair<u32>,
    pub cluster_labels: HemiPair<SurfaceVector>,
    pub masked_betas: HemiPair<SurfaceVector>,
    pub raw_betas: HemiPair<SurfaceVector>,
}

struct HemiMaps {
    labels: SurfaceVector,
    masked: SurfaceVector,
    raw: SurfaceVector,
    cluster_count: u32,
}

/// Load both hemispheres' cluster and coefficient maps, apply the
/// significance mask, and reduce to summary statistics.
///
/// Both hemispheres are checked before failing so the error can name every
/// missing one at once.
pub fn extract(
    repo: &Repository,
    key: &ModelKey,
    term: u32,
    measure: &str,
    decoder: &dyn MapDecoder,
) -> Result<ExtractionResult> {
    let mut missing = Vec::new();
    let mut loaded: Vec<(Hemisphere, HemiMaps)> = Vec::new();

    for hemi in Hemisphere::BOTH {
        let paths = repo.map_paths(key, measure, term, hemi);
        if !paths.cluster.is_file() || !paths.coef.is_file() {
            log::debug!(
                "No {hemi} hemisphere files for {key} term {term} ({measure})"
            );
            missing.push(hemi);
            continue;
        }

        let labels = decoder.decode(&paths.cluster)?.values;
        let raw = decoder.decode(&paths.coef)?.values;
        if labels.len() != raw.len() {
            return Err(SurfaceError::LengthMismatch {
                left: labels.len(),
                right: raw.len(),
            }
            .into());
        }

        loaded.push((hemi, mask_hemisphere(labels, raw)));
    }

    if !missing.is_empty() {
        return Err(StatsError::MissingHemispheres(missing));
    }

    // Both present: loaded is exactly [left, right].
    let mut iter = loaded.into_iter();
    let (_, left) = iter.next().expect("left hemisphere loaded");
    let (_, right) = iter.next().expect("right hemisphere loaded");

    let all_masked = left.masked.iter().chain(right.masked.iter()).copied();
    let (global_min_beta, global_max_beta, global_mean_beta) = nan_stats(all_masked);

    Ok(ExtractionResult {
        global_min_beta,
        global_max_beta,
        global_mean_beta,
        cluster_counts: HemiPair::new(left.cluster_count, right.cluster_count),
        cluster_labels: HemiPair::new(left.labels, right.labels),
        masked_betas: HemiPair::new(left.masked, right.masked),
        raw_betas: HemiPair::new(left.raw, right.raw),
    })
}

/// NaN out betas at non-significant vertices; an all-zero cluster map yields
/// an all-NaN masked vector and a count of zero.
fn mask_hemisphere(labels: SurfaceVector, raw: SurfaceVector) -> HemiMaps {
    let any_significant = labels.iter().any(|&l| l > 0.0);

    let (masked, cluster_count) = if any_significant {
        let masked = ndarray::Zip::from(&labels)
            .and(&raw)
            .map_collect(|&label, &beta| if label > 0.0 { beta } else { f32::NAN });
        let max_label = labels.iter().fold(0.0f32, |acc, &l| acc.max(l));
        (masked, max_label as u32)
    } else {
        (SurfaceVector::from_elem(labels.len(), f32::NAN), 0)
    };

    HemiMaps {
        labels,
        masked,
        raw,
        cluster_count,
    }
}

/// (min, max, mean) ignoring NaN; all-NaN input yields NaN for each.
fn nan_stats(values: impl Iterator<Item = f32>) -> (f32, f32, f32) {
    let mut min = f32::NAN;
    let mut max = f32::NAN;
    let mut sum = 0.0f64;
    let mut n = 0usize;

    for v in values {
        if v.is_nan() {
            continue;
        }
        if min.is_nan() || v < min {
            min = v;
        }
        if max.is_nan() || v > max {
            max = v;
        }
        sum += v as f64;
        n += 1;
    }

    let mean = if n == 0 { f32::NAN } else { (sum / n as f64) as f32 };
    (min, max, mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn masking_invariant_holds_per_vertex() {
        let labels = array![0.0, 1.0, 2.0, 0.0, 1.0];
        let raw = array![0.5, -1.0, 2.5, 3.0, 0.0];
        let maps = mask_hemisphere(labels.clone(), raw.clone());

        for v in 0..labels.len() {
            if labels[v] == 0.0 {
                assert!(maps.masked[v].is_nan(), "vertex {v} should be masked");
            } else {
                assert_eq!(maps.masked[v], raw[v], "vertex {v} should be raw");
            }
        }
        assert_eq!(maps.cluster_count, 2);
    }

    #[test]
    fn all_zero_labels_mask_everything() {
        let maps = mask_hemisphere(array![0.0, 0.0, 0.0], array![1.0, 2.0, 3.0]);
        assert_eq!(maps.cluster_count, 0);
        assert!(maps.masked.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn nan_stats_ignore_missing_values() {
        let (min, max, mean) = nan_stats([f32::NAN, 2.0, -4.0, f32::NAN, 5.0].into_iter());
        assert_eq!(min, -4.0);
        assert_eq!(max, 5.0);
        assert_eq!(mean, 1.0);
    }

    #[test]
    fn all_nan_reduction_is_a_valid_result() {
        let (min, max, mean) = nan_stats([f32::NAN, f32::NAN].into_iter());
        assert!(min.is_nan());
        assert!(max.is_nan());
        assert!(mean.is_nan());
    }
}
