use super::types::{OptimizationResult, Size};
use crate::config::Fingerprint;
use crate::ir::NodeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size_hits: usize,
    pub size_misses: usize,
    pub layout_hits: usize,
    pub layout_misses: usize,
}

/// Memo tables for one layout run. Node ids are only unique within a single
/// tree, so a cache must never outlive the call that created it.
#[derive(Debug, Default)]
pub struct LayoutCache {
    sizes: HashMap<(NodeId, Fingerprint), Size>,
    layouts: HashMap<(Vec<NodeId>, Fingerprint), OptimizationResult>,
    stats: CacheStats,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_size(&mut self, id: &NodeId, fingerprint: Fingerprint) -> Option<Size> {
        let hit = self.sizes.get(&(id.clone(), fingerprint)).copied();
        if hit.is_some() {
            self.stats.size_hits += 1;
        } else {
            self.stats.size_misses += 1;
        }
        hit
    }

    pub fn set_node_size(&mut self, id: NodeId, fingerprint: Fingerprint, size: Size) {
        self.sizes.insert((id, fingerprint), size);
    }

    /// Keyed on the child ids in their original order.
    pub fn layout(
        &mut self,
        child_ids: &[NodeId],
        fingerprint: Fingerprint,
    ) -> Option<&OptimizationResult> {
        let hit = self.layouts.get(&(child_ids.to_vec(), fingerprint));
        if hit.is_some() {
            self.stats.layout_hits += 1;
        } else {
            self.stats.layout_misses += 1;
        }
        hit
    }

    pub fn set_layout(
        &mut self,
        child_ids: Vec<NodeId>,
        fingerprint: Fingerprint,
        result: OptimizationResult,
    ) {
        self.layouts.insert((child_ids, fingerprint), result);
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Entry counts as `(sizes, layouts)`.
    pub fn entries(&self) -> (usize, usize) {
        (self.sizes.len(), self.layouts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{GridLayout, SearchStats};

    fn result() -> OptimizationResult {
        OptimizationResult {
            layout: GridLayout {
                rows: 1,
                cols: 1,
                width: 180.0,
                height: 150.0,
                deviation: 0.04,
                positions: Vec::new(),
            },
            permutation: vec![0],
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn sizes_are_keyed_by_fingerprint() {
        let mut cache = LayoutCache::new();
        let id = NodeId::Int(7);
        cache.set_node_size(id.clone(), Fingerprint(1), Size::new(10.0, 20.0));
        assert_eq!(cache.node_size(&id, Fingerprint(1)), Some(Size::new(10.0, 20.0)));
        assert_eq!(cache.node_size(&id, Fingerprint(2)), None);
        let stats = cache.stats();
        assert_eq!((stats.size_hits, stats.size_misses), (1, 1));
    }

    #[test]
    fn layouts_are_keyed_by_child_order() {
        let mut cache = LayoutCache::new();
        let ids = vec![NodeId::Int(1), NodeId::Int(2)];
        cache.set_layout(ids.clone(), Fingerprint(1), result());
        assert!(cache.layout(&ids, Fingerprint(1)).is_some());
        let reversed = vec![NodeId::Int(2), NodeId::Int(1)];
        assert!(cache.layout(&reversed, Fingerprint(1)).is_none());
        assert_eq!(cache.entries(), (0, 1));
    }
}
