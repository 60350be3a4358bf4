use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// One per-vertex scalar value at native mesh resolution.
///
/// NaN is the "no value" marker for coefficient maps; cluster-label maps hold
/// non-negative integers stored as f32, with 0 meaning "not significant".
pub type SurfaceVector = Array1<f32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    /// Left-then-right, the order every per-hemisphere loop uses.
    pub const BOTH: [Hemisphere; 2] = [Hemisphere::Left, Hemisphere::Right];

    /// Filename token ("lh" / "rh")
    pub fn prefix(&self) -> &'static str {
        match self {
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Hemisphere::Left => "left",
            Hemisphere::Right => "right",
        }
    }

    /// Parse a filename token; accepts "lh"/"rh" and the long names.
    pub fn from_token(token: &str) -> Option<Hemisphere> {
        match token {
            "lh" | "left" => Some(Hemisphere::Left),
            "rh" | "right" => Some(Hemisphere::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    Big,
    Little,
}

/// A decoded surface map: values already normalized to native byte order,
/// plus the order they were stored in on disk.
#[derive(Debug, Clone)]
pub struct DecodedMap {
    pub values: SurfaceVector,
    pub source_order: ByteOrder,
}

/// Anything carried once per hemisphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemiPair<T> {
    pub left: T,
    pub right: T,
}

impl<T> HemiPair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, hemi: Hemisphere) -> &T {
        match hemi {
            Hemisphere::Left => &self.left,
            Hemisphere::Right => &self.right,
        }
    }

    /// (hemisphere, value) pairs, left first.
    pub fn iter(&self) -> impl Iterator<Item = (Hemisphere, &T)> {
        Hemisphere::BOTH.iter().map(move |&h| (h, self.get(h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hemisphere_tokens_round_trip() {
        for hemi in Hemisphere::BOTH {
            assert_eq!(Hemisphere::from_token(hemi.prefix()), Some(hemi));
            assert_eq!(Hemisphere::from_token(hemi.name()), Some(hemi));
        }
        assert_eq!(Hemisphere::from_token("mh"), None);
    }

    #[test]
    fn hemi_pair_iterates_left_first() {
        let pair = HemiPair::new("l", "r");
        let order: Vec<_> = pair.iter().collect();
        assert_eq!(order, vec![(Hemisphere::Left, &"l"), (Hemisphere::Right, &"r")]);
    }
}
