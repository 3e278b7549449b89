//! Summary counts over the resource collection.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{ProcessingState, ResourceWrapper};

/// Simple counts of resources by processing state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStats {
    pub total: usize,
    pub completed: usize,
    pub processing: usize,
    pub failed: usize,
    pub not_started: usize,
}

impl ResourceStats {
    /// Tallies the collection in one pass.
    pub fn collect(resources: &[ResourceWrapper]) -> Self {
        let mut stats = Self {
            total: resources.len(),
            ..Self::default()
        };
        for wrapper in resources {
            match wrapper.resource.metadata.state {
                ProcessingState::Completed => stats.completed += 1,
                ProcessingState::Processing => stats.processing += 1,
                ProcessingState::Failed => stats.failed += 1,
                ProcessingState::NotStarted => stats.not_started += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_resources;

    #[test]
    fn test_counts_sample_collection_by_state() {
        let stats = ResourceStats::collect(&sample_resources());
        assert_eq!(
            stats,
            ResourceStats {
                total: 6,
                completed: 3,
                processing: 1,
                failed: 1,
                not_started: 1,
            }
        );
    }

    #[test]
    fn test_empty_collection_yields_zeroes() {
        assert_eq!(ResourceStats::collect(&[]), ResourceStats::default());
    }
}
