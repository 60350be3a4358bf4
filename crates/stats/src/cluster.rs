use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use vertexwise_surface::{HemiPair, Hemisphere, SurfaceError, SurfaceVector};

/// Size and beta range of one significant cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStat {
    pub hemisphere: Hemisphere,
    pub cluster_id: u32,
    pub size: usize,
    pub mean_beta: f32,
    pub min_beta: f32,
    pub max_beta: f32,
}

/// Group masked betas by cluster id, left hemisphere rows before right.
///
/// A hemisphere whose cluster map is entirely zero contributes no rows at
/// all; the hemisphere column is the section boundary between the two.
pub fn cluster_stats(
    labels: &HemiPair<SurfaceVector>,
    masked_betas: &HemiPair<SurfaceVector>,
) -> Result<Vec<ClusterStat>> {
    let mut rows = Vec::new();

    for hemi in Hemisphere::BOTH {
        let hemi_labels = labels.get(hemi);
        let hemi_betas = masked_betas.get(hemi);
        if hemi_labels.len() != hemi_betas.len() {
            return Err(SurfaceError::LengthMismatch {
                left: hemi_labels.len(),
                right: hemi_betas.len(),
            }
            .into());
        }

        if hemi_labels.iter().all(|&l| l == 0.0) {
            continue;
        }

        let mut groups: BTreeMap<u32, ClusterAccum> = BTreeMap::new();
        for (&label, &beta) in hemi_labels.iter().zip(hemi_betas) {
            if label > 0.0 {
                groups.entry(label as u32).or_default().push(beta);
            }
        }

        rows.extend(groups.into_iter().map(|(cluster_id, accum)| ClusterStat {
            hemisphere: hemi,
            cluster_id,
            size: accum.size,
            mean_beta: accum.mean(),
            min_beta: accum.min,
            max_beta: accum.max,
        }));
    }

    Ok(rows)
}

#[derive(Debug)]
struct ClusterAccum {
    size: usize,
    sum: f64,
    finite: usize,
    min: f32,
    max: f32,
}

impl Default for ClusterAccum {
    fn default() -> Self {
        Self {
            size: 0,
            sum: 0.0,
            finite: 0,
            min: f32::NAN,
            max: f32::NAN,
        }
    }
}

impl ClusterAccum {
    fn push(&mut self, beta: f32) {
        self.size += 1;
        if beta.is_nan() {
            return;
        }
        self.sum += beta as f64;
        self.finite += 1;
        if self.min.is_nan() || beta < self.min {
            self.min = beta;
        }
        if self.max.is_nan() || beta > self.max {
            self.max = beta;
        }
    }

    fn mean(&self) -> f32 {
        if self.finite == 0 {
            f32::NAN
        } else {
            (self.sum / self.finite as f64) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn groups_by_cluster_with_left_rows_first() {
        let labels = HemiPair::new(array![1.0, 2.0, 1.0, 0.0], array![0.0, 1.0, 0.0, 0.0]);
        let betas = HemiPair::new(array![0.5, -1.0, 1.5, f32::NAN], array![f32::NAN, 4.0, f32::NAN, f32::NAN]);

        let rows = cluster_stats(&labels, &betas).expect("stats");
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].hemisphere, Hemisphere::Left);
        assert_eq!(rows[0].cluster_id, 1);
        assert_eq!(rows[0].size, 2);
        assert_eq!(rows[0].mean_beta, 1.0);
        assert_eq!(rows[0].min_beta, 0.5);
        assert_eq!(rows[0].max_beta, 1.5);

        assert_eq!(rows[1].cluster_id, 2);
        assert_eq!(rows[1].size, 1);

        assert_eq!(rows[2].hemisphere, Hemisphere::Right);
        assert_eq!(rows[2].cluster_id, 1);
        assert_eq!(rows[2].mean_beta, 4.0);
    }

    #[test]
    fn all_zero_hemisphere_is_skipped_without_placeholder() {
        let labels = HemiPair::new(array![1.0, 1.0], array![0.0, 0.0]);
        let betas = HemiPair::new(array![2.0, 4.0], array![f32::NAN, f32::NAN]);

        let rows = cluster_stats(&labels, &betas).expect("stats");
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.hemisphere == Hemisphere::Left));
        assert_eq!(rows[0].mean_beta, 3.0);
    }

    #[test]
    fn both_zero_hemispheres_yield_no_rows() {
        let labels = HemiPair::new(array![0.0, 0.0], array![0.0]);
        let betas = HemiPair::new(array![f32::NAN, f32::NAN], array![f32::NAN]);
        assert!(cluster_stats(&labels, &betas).expect("stats").is_empty());
    }
}
