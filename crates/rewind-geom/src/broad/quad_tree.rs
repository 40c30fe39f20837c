// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use tracing::trace;

use crate::types::aabb::Aabb;

/// Fixed shape of the quad-tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadTreeConfig {
    /// Deepest level a node may be created at (the root is depth 0).
    pub max_depth: u32,
    /// A leaf above `max_depth` subdivides once it holds more entries than this.
    pub leaf_capacity: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            leaf_capacity: 8,
        }
    }
}

/// A simplified bounding box paired with the key it was inserted under.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadEntry<K> {
    /// Conservative bounds of the keyed shape.
    pub aabb: Aabb,
    /// Caller-defined key (a collider handle in the physics world).
    pub key: K,
}

#[derive(Debug, Clone)]
struct QuadNode<K> {
    boundary: Aabb,
    depth: u32,
    children: Option<[u32; 4]>,
    entries: Vec<QuadEntry<K>>,
}

impl<K> QuadNode<K> {
    fn new(boundary: Aabb, depth: u32) -> Self {
        Self {
            boundary,
            depth,
            children: None,
            entries: Vec::new(),
        }
    }
}

/// Read-only view of one node, for introspection and debug drawing.
#[derive(Debug, Clone, Copy)]
pub struct QuadNodeView<'a, K> {
    /// Region covered by the node.
    pub boundary: Aabb,
    /// Depth below the root (root is 0).
    pub depth: u32,
    /// Entries held directly at this node.
    pub entries: &'a [QuadEntry<K>],
    /// Whether the node has been subdivided.
    pub has_children: bool,
}

/// Region quad-tree rebuilt from scratch every step.
///
/// Nodes live in one flat vector and refer to their children by index, so
/// the tree is a plain value: cloning it deep-copies every node, which is
/// what world snapshots rely on. [`QuadTree::clear`] keeps node allocations
/// (including each node's entry buffer) for the next build.
///
/// Placement rule: an entry sinks into a child only when exactly one child
/// quadrant contains its AABB; entries straddling quadrant edges (or lying
/// outside the root boundary) stay at the node where they stopped. Pair
/// generation relies on this: two entries can only overlap if one of them
/// sits on the path from the root to the other.
#[derive(Debug, Clone)]
pub struct QuadTree<K> {
    config: QuadTreeConfig,
    nodes: Vec<QuadNode<K>>,
    live: usize,
    len: usize,
    subdivisions: usize,
}

impl<K: Copy> Default for QuadTree<K> {
    fn default() -> Self {
        Self::new(QuadTreeConfig::default())
    }
}

impl<K: Copy> QuadTree<K> {
    /// Creates an empty tree whose root covers a degenerate box at the origin.
    pub fn new(config: QuadTreeConfig) -> Self {
        Self {
            config,
            nodes: vec![QuadNode::new(Aabb::default(), 0)],
            live: 1,
            len: 0,
            subdivisions: 0,
        }
    }

    /// Tree configuration.
    pub fn config(&self) -> QuadTreeConfig {
        self.config
    }

    /// Root boundary.
    pub fn boundary(&self) -> Aabb {
        self.nodes[0].boundary
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in use (the root counts as one).
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Number of subdivisions performed since the last clear.
    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Empties every node and detaches children; allocations are retained.
    pub fn clear(&mut self) {
        for node in &mut self.nodes[..self.live] {
            node.entries.clear();
            node.children = None;
        }
        self.live = 1;
        self.len = 0;
        self.subdivisions = 0;
    }

    /// Clears the tree and sets a new root boundary.
    pub fn reset(&mut self, boundary: Aabb) {
        self.clear();
        self.nodes[0].boundary = boundary;
        self.nodes[0].depth = 0;
    }

    /// Inserts `key` with bounds `aabb`.
    pub fn insert(&mut self, aabb: Aabb, key: K) {
        let entry = QuadEntry { aabb, key };
        let mut idx = 0usize;
        loop {
            if let Some(children) = self.nodes[idx].children {
                match self.fitting_child(&children, &aabb) {
                    Some(child) => idx = child,
                    None => {
                        self.nodes[idx].entries.push(entry);
                        break;
                    }
                }
            } else {
                self.nodes[idx].entries.push(entry);
                let node = &self.nodes[idx];
                if node.entries.len() > self.config.leaf_capacity
                    && node.depth < self.config.max_depth
                {
                    self.subdivide(idx);
                }
                break;
            }
        }
        self.len += 1;
    }

    /// Collects every pair of entries whose AABBs overlap and that could
    /// therefore be touching.
    ///
    /// Each node tests its entries pairwise and against every entry in its
    /// descendant subtree; sibling subtrees are never compared directly. The
    /// result is a superset of the truly intersecting pairs (AABBs are
    /// conservative) and lists each pair once, in pre-order traversal order.
    pub fn calculate_possible_pairs(&self) -> Vec<(K, K)> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut order = vec![0usize];
        while let Some(idx) = order.pop() {
            let node = &self.nodes[idx];
            for (i, a) in node.entries.iter().enumerate() {
                for b in &node.entries[i + 1..] {
                    if a.aabb.overlaps(&b.aabb) {
                        out.push((a.key, b.key));
                    }
                }
            }
            if let Some(children) = node.children {
                if !node.entries.is_empty() {
                    push_children(&children, &mut stack);
                    while let Some(d) = stack.pop() {
                        let desc = &self.nodes[d];
                        for a in &node.entries {
                            for b in &desc.entries {
                                if a.aabb.overlaps(&b.aabb) {
                                    out.push((a.key, b.key));
                                }
                            }
                        }
                        if let Some(grand) = desc.children {
                            push_children(&grand, &mut stack);
                        }
                    }
                }
                push_children(&children, &mut order);
            }
        }
        out
    }

    /// Keys of every entry whose AABB overlaps `area`.
    pub fn query(&self, area: &Aabb) -> Vec<K> {
        let mut out = Vec::new();
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            out.extend(
                node.entries
                    .iter()
                    .filter(|e| e.aabb.overlaps(area))
                    .map(|e| e.key),
            );
            if let Some(children) = node.children {
                for &c in children.iter().rev() {
                    if self.nodes[c as usize].boundary.overlaps(area) {
                        stack.push(c as usize);
                    }
                }
            }
        }
        out
    }

    /// Live nodes in pre-order (root first, children in quadrant order).
    pub fn nodes(&self) -> Vec<QuadNodeView<'_, K>> {
        let mut views = Vec::with_capacity(self.live);
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            views.push(QuadNodeView {
                boundary: node.boundary,
                depth: node.depth,
                entries: &node.entries,
                has_children: node.children.is_some(),
            });
            if let Some(children) = node.children {
                push_children(&children, &mut stack);
            }
        }
        views
    }

    fn fitting_child(&self, children: &[u32; 4], aabb: &Aabb) -> Option<usize> {
        let mut found = None;
        for &c in children {
            if self.nodes[c as usize].boundary.contains(aabb) {
                if found.is_some() {
                    return None;
                }
                found = Some(c as usize);
            }
        }
        found
    }

    fn alloc_node(&mut self, boundary: Aabb, depth: u32) -> u32 {
        let idx = self.live;
        if idx < self.nodes.len() {
            let node = &mut self.nodes[idx];
            node.boundary = boundary;
            node.depth = depth;
            node.children = None;
            node.entries.clear();
        } else {
            self.nodes.push(QuadNode::new(boundary, depth));
        }
        self.live += 1;
        idx as u32
    }

    fn subdivide(&mut self, idx: usize) {
        let depth = self.nodes[idx].depth + 1;
        let quads = self.nodes[idx].boundary.quadrants();
        let children = quads.map(|q| self.alloc_node(q, depth));
        self.nodes[idx].children = Some(children);
        self.subdivisions += 1;

        let mut entries = std::mem::take(&mut self.nodes[idx].entries);
        let mut kept = 0;
        for i in 0..entries.len() {
            let entry = entries[i];
            if let Some(child) = self.fitting_child(&children, &entry.aabb) {
                self.nodes[child].entries.push(entry);
            } else {
                entries[kept] = entry;
                kept += 1;
            }
        }
        trace!(
            node = idx,
            depth,
            kept,
            moved = entries.len() - kept,
            "quad-tree subdivide"
        );
        entries.truncate(kept);
        self.nodes[idx].entries = entries;
    }
}

// Pushes in reverse so that popping visits quadrants in order.
fn push_children(children: &[u32; 4], stack: &mut Vec<usize>) {
    stack.extend(children.iter().rev().map(|&c| c as usize));
}
