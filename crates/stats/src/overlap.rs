use crate::error::Result;
use ndarray::Array1;
use serde::Serialize;
use std::collections::BTreeMap;
use vertexwise_surface::{HemiPair, SurfaceError, SurfaceVector};

/// Per-vertex overlap class between two significance maps.
///
/// The numeric codes are additive by construction: the first map contributes
/// 1 where significant, the second contributes 2, and their sum lands on 3
/// only when both do. One pass over the vertices yields all four classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum OverlapCategory {
    Neither,
    OnlyFirst,
    OnlySecond,
    Both,
}

impl OverlapCategory {
    /// Boundary code, stable for existing consumers: 0/1/2/3.
    pub fn code(self) -> u8 {
        match self {
            OverlapCategory::Neither => 0,
            OverlapCategory::OnlyFirst => 1,
            OverlapCategory::OnlySecond => 2,
            OverlapCategory::Both => 3,
        }
    }

    /// The three significant classes, in reporting order.
    pub const SIGNIFICANT: [OverlapCategory; 3] = [
        OverlapCategory::OnlyFirst,
        OverlapCategory::OnlySecond,
        OverlapCategory::Both,
    ];
}

/// Per-vertex category codes, one array per hemisphere.
pub type CategoryVector = Array1<u8>;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlapMap {
    pub codes: HemiPair<CategoryVector>,
}

/// Vertex count and share of one significant category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub count: usize,
    pub percent: f64,
}

/// Counts and percentages for categories 1..=3, across both hemispheres.
/// Every category is present, absent ones as (0, 0.0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapSummary {
    pub categories: BTreeMap<u8, CategoryShare>,
}

impl OverlapSummary {
    pub fn share(&self, category: OverlapCategory) -> CategoryShare {
        self.categories[&category.code()]
    }
}

/// Classify every vertex of two cluster-label map pairs into the four overlap
/// categories and summarize the three significant ones.
pub fn compute_overlap(
    labels_a: &HemiPair<SurfaceVector>,
    labels_b: &HemiPair<SurfaceVector>,
) -> Result<(OverlapSummary, OverlapMap)> {
    let codes = HemiPair::new(
        hemi_codes(&labels_a.left, &labels_b.left)?,
        hemi_codes(&labels_a.right, &labels_b.right)?,
    );

    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for (_, codes_h) in codes.iter() {
        for &code in codes_h {
            if code > 0 {
                *counts.entry(code).or_insert(0) += 1;
            }
        }
    }

    let total: usize = counts.values().sum();
    let mut categories = BTreeMap::new();
    for category in OverlapCategory::SIGNIFICANT {
        let count = counts.get(&category.code()).copied().unwrap_or(0);
        let percent = if total == 0 {
            0.0
        } else {
            round1(count as f64 / total as f64 * 100.0)
        };
        categories.insert(category.code(), CategoryShare { count, percent });
    }

    Ok((OverlapSummary { categories }, OverlapMap { codes }))
}

fn hemi_codes(a: &SurfaceVector, b: &SurfaceVector) -> Result<CategoryVector> {
    if a.len() != b.len() {
        return Err(SurfaceError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        }
        .into());
    }

    // indicator(a) + 2 * indicator(b): the only route to 3 is both.
    Ok(ndarray::Zip::from(a)
        .and(b)
        .map_collect(|&la, &lb| u8::from(la > 0.0) + 2 * u8::from(lb > 0.0)))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn pair(left: SurfaceVector, right: SurfaceVector) -> HemiPair<SurfaceVector> {
        HemiPair::new(left, right)
    }

    #[test]
    fn five_vertex_example_classifies_and_summarizes() {
        // A significant at {0,1,2}, B at {2,3}.
        let a = pair(array![1.0, 2.0, 1.0, 0.0, 0.0], SurfaceVector::zeros(5));
        let b = pair(array![0.0, 0.0, 3.0, 1.0, 0.0], SurfaceVector::zeros(5));

        let (summary, map) = compute_overlap(&a, &b).expect("overlap");
        assert_eq!(map.codes.left.to_vec(), vec![1, 1, 3, 2, 0]);

        assert_eq!(summary.share(OverlapCategory::OnlyFirst), CategoryShare { count: 2, percent: 50.0 });
        assert_eq!(summary.share(OverlapCategory::OnlySecond), CategoryShare { count: 1, percent: 25.0 });
        assert_eq!(summary.share(OverlapCategory::Both), CategoryShare { count: 1, percent: 25.0 });
    }

    #[test]
    fn code_three_requires_both_sources() {
        let a = pair(array![5.0, 0.0, 2.0], array![0.0, 1.0, 0.0]);
        let b = pair(array![1.0, 0.0, 0.0], array![0.0, 4.0, 1.0]);

        let (_, map) = compute_overlap(&a, &b).expect("overlap");
        for (hemi, codes) in map.codes.iter() {
            for (v, &code) in codes.iter().enumerate() {
                assert!(code <= 3);
                let both = a.get(hemi)[v] > 0.0 && b.get(hemi)[v] > 0.0;
                assert_eq!(code == 3, both, "vertex {v} on {hemi}");
            }
        }
    }

    #[test]
    fn counts_merge_across_hemispheres() {
        let a = pair(array![1.0, 0.0], array![2.0, 0.0]);
        let b = pair(array![0.0, 0.0], array![1.0, 0.0]);

        let (summary, _) = compute_overlap(&a, &b).expect("overlap");
        assert_eq!(summary.share(OverlapCategory::OnlyFirst).count, 1);
        assert_eq!(summary.share(OverlapCategory::Both).count, 1);
        assert_eq!(summary.share(OverlapCategory::OnlySecond).count, 0);
        assert_eq!(summary.share(OverlapCategory::OnlySecond).percent, 0.0);
    }

    #[test]
    fn percentages_sum_to_one_hundred_when_any_vertex_is_significant() {
        let a = pair(array![1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0], SurfaceVector::zeros(7));
        let b = pair(array![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0], SurfaceVector::zeros(7));

        let (summary, _) = compute_overlap(&a, &b).expect("overlap");
        let sum: f64 = summary.categories.values().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() <= 0.1, "percent sum was {sum}");
    }

    #[test]
    fn empty_maps_report_zero_percent_everywhere() {
        let a = pair(array![0.0, 0.0], array![0.0, 0.0]);
        let b = pair(array![0.0, 0.0], array![0.0, 0.0]);

        let (summary, map) = compute_overlap(&a, &b).expect("overlap");
        for category in OverlapCategory::SIGNIFICANT {
            assert_eq!(summary.share(category), CategoryShare { count: 0, percent: 0.0 });
        }
        assert!(map.codes.left.iter().all(|&c| c == 0));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let a = pair(array![1.0, 0.0], array![0.0]);
        let b = pair(array![1.0, 0.0], array![0.0, 1.0]);
        assert!(compute_overlap(&a, &b).is_err());
    }

    #[test]
    fn category_codes_are_stable_at_the_boundary() {
        assert_eq!(OverlapCategory::Neither.code(), 0);
        assert_eq!(OverlapCategory::OnlyFirst.code(), 1);
        assert_eq!(OverlapCategory::OnlySecond.code(), 2);
        assert_eq!(OverlapCategory::Both.code(), 3);
    }
}
