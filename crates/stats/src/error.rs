use thiserror::Error;
use vertexwise_surface::{Hemisphere, SurfaceError};

/// Result type for extraction and comparison
pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    /// One or both hemispheres had no result files; always lists every
    /// missing hemisphere, never just the first.
    #[error(
        "Could not find result files for the {} hemisphere. \
         Please check your results directory for missing or corrupted files.",
        join_hemis(.0)
    )]
    MissingHemispheres(Vec<Hemisphere>),

    #[error("Surface map error: {0}")]
    Surface(#[from] SurfaceError),
}

fn join_hemis(hemis: &[Hemisphere]) -> String {
    hemis
        .iter()
        .map(|h| h.name())
        .collect::<Vec<_>>()
        .join(" nor the ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_hemispheres_message_lists_all() {
        let err = StatsError::MissingHemispheres(vec![Hemisphere::Left, Hemisphere::Right]);
        let text = err.to_string();
        assert!(text.contains("left nor the right"));
    }
}
