use super::cache::{CacheStats, LayoutCache};
use super::error::LayoutError;
use super::optimize::optimize;
use super::types::{OptimizationResult, Size};
use crate::config::{Fingerprint, LayoutConfig};
use crate::ir::TreeNode;

/// Deepest nesting the walker follows before giving up.
pub const MAX_TREE_DEPTH: usize = 256;

/// One layout run: the settings, their fingerprint and the memo tables.
///
/// Sizing is a post-order pass and placement a pre-order pass; placement
/// reuses the grid results cached while sizing.
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    fingerprint: Fingerprint,
    cache: LayoutCache,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            fingerprint: config.fingerprint(),
            cache: LayoutCache::new(),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Cached `(sizes, layouts)` after the last run.
    pub fn cache_entries(&self) -> (usize, usize) {
        self.cache.entries()
    }

    /// Sizes the whole tree, then places it with `root` at the origin.
    pub fn run(&mut self, root: &mut TreeNode) -> Result<(), LayoutError> {
        self.size_of(root)?;
        self.place(root, 0.0, 0.0)?;
        let stats = self.cache.stats();
        let (cached_sizes, cached_layouts) = self.cache.entries();
        tracing::debug!(
            fingerprint = %self.fingerprint,
            root = %root.id,
            width = root.width,
            height = root.height,
            size_hits = stats.size_hits,
            size_misses = stats.size_misses,
            layout_hits = stats.layout_hits,
            layout_misses = stats.layout_misses,
            cached_sizes,
            cached_layouts,
            "tree laid out"
        );
        Ok(())
    }

    /// Minimum bounding size of `node`'s subtree.
    pub fn size_of(&mut self, node: &TreeNode) -> Result<Size, LayoutError> {
        self.size_at(node, 0)
    }

    /// Assigns absolute positions to `node` and its subtree. Children are
    /// reordered in place to the winning arrangement.
    pub fn place(&mut self, node: &mut TreeNode, x: f64, y: f64) -> Result<(), LayoutError> {
        self.place_at(node, x, y, 0)
    }

    fn leaf_size(&self) -> Size {
        Size::new(self.config.box_min_width, self.config.box_min_height)
    }

    fn size_at(&mut self, node: &TreeNode, depth: usize) -> Result<Size, LayoutError> {
        check_depth(depth)?;
        if let Some(size) = self.cache.node_size(&node.id, self.fingerprint) {
            return Ok(size);
        }
        let size = if node.is_leaf() {
            self.leaf_size()
        } else {
            self.child_layout(node, depth)?.layout.size()
        };
        self.cache.set_node_size(node.id.clone(), self.fingerprint, size);
        Ok(size)
    }

    /// Optimizer result for `node`'s children in their current order.
    fn child_layout(
        &mut self,
        node: &TreeNode,
        depth: usize,
    ) -> Result<OptimizationResult, LayoutError> {
        let sizes = node
            .children
            .iter()
            .map(|child| self.size_at(child, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let child_ids = node.child_ids();
        if let Some(hit) = self.cache.layout(&child_ids, self.fingerprint) {
            return Ok(hit.clone());
        }
        let result = optimize(&sizes, self.config)?;
        self.cache
            .set_layout(child_ids, self.fingerprint, result.clone());
        Ok(result)
    }

    fn place_at(
        &mut self,
        node: &mut TreeNode,
        x: f64,
        y: f64,
        depth: usize,
    ) -> Result<(), LayoutError> {
        check_depth(depth)?;
        node.x = x;
        node.y = y;
        if node.is_leaf() {
            let size = self.leaf_size();
            node.width = size.width;
            node.height = size.height;
            return Ok(());
        }

        let result = self.child_layout(node, depth)?;
        reorder_children(&mut node.children, &result.permutation);
        node.width = result.layout.width;
        node.height = result.layout.height;

        for (child, pos) in node.children.iter_mut().zip(&result.layout.positions) {
            self.place_at(child, x + pos.x, y + pos.y, depth + 1)?;
            // rounded placement wins over the child's own size
            child.width = pos.width;
            child.height = pos.height;
        }
        Ok(())
    }
}

fn check_depth(depth: usize) -> Result<(), LayoutError> {
    if depth > MAX_TREE_DEPTH {
        return Err(LayoutError::DepthExceeded {
            limit: MAX_TREE_DEPTH,
        });
    }
    Ok(())
}

/// Moves `children[permutation[k]]` to slot `k`.
fn reorder_children(children: &mut Vec<TreeNode>, permutation: &[usize]) {
    let mut slot_of = vec![0usize; permutation.len()];
    for (slot, &original) in permutation.iter().enumerate() {
        slot_of[original] = slot;
    }
    let mut indexed: Vec<(usize, TreeNode)> = children
        .drain(..)
        .enumerate()
        .map(|(original, child)| (slot_of[original], child))
        .collect();
    indexed.sort_by_key(|(slot, _)| *slot);
    children.extend(indexed.into_iter().map(|(_, child)| child));
}

/// Lays out the whole tree rooted at `root` and returns it.
///
/// Every node gets absolute `x`, `y`, `width` and `height`. Sibling order is
/// changed to the winning arrangement; snapshot `children` first if the input
/// order matters. Each call uses fresh caches.
pub fn layout_tree<'t>(
    root: &'t mut TreeNode,
    config: &LayoutConfig,
) -> Result<&'t mut TreeNode, LayoutError> {
    LayoutEngine::new(config).run(root)?;
    Ok(root)
}
