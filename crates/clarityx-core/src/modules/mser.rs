//! Maximally stable extremal regions.
//!
//! Pixels are flooded in intensity order and merged with a union-find into a
//! component tree. Each tree node is one connected component of
//! `{p : I(p) <= level}` and records the level at which it last changed.
//! A node is stable when its area barely grows over the next `delta` levels,
//! measured as `(area(ancestor at level + delta) - area) / area`.
//!
//! Dark regions come from the image itself, bright regions from its inverse.

use image::GrayImage;
use imageproc::point::Point;
use tracing::trace;

const NONE: usize = usize::MAX;

/// Configuration for stable region extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct MserConfig {
    /// Number of intensity levels over which stability is measured.
    pub delta: u8,
    /// Smallest region kept, in pixels.
    pub min_area: usize,
    /// Largest region kept, in pixels.
    pub max_area: usize,
    /// Largest relative area growth over `delta` levels for a stable region.
    pub max_variation: f64,
}

impl Default for MserConfig {
    fn default() -> Self {
        Self {
            delta: 5,
            min_area: 60,
            max_area: 8000,
            max_variation: 0.25,
        }
    }
}

/// Extracts stable regions of both polarities.
///
/// Each region is returned as the list of its pixel coordinates.
#[must_use]
pub fn extract_regions(gray: &GrayImage, config: &MserConfig) -> Vec<Vec<Point<i32>>> {
    let (width, height) = gray.dimensions();
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let dark = gray.as_raw();
    let bright: Vec<u8> = dark.iter().map(|&v| u8::MAX - v).collect();

    let mut regions = ComponentTree::build(dark, width, height).stable_regions(config);
    let dark_count = regions.len();
    regions.extend(ComponentTree::build(&bright, width, height).stable_regions(config));

    trace!(
        dark = dark_count,
        bright = regions.len() - dark_count,
        "extracted stable regions"
    );
    regions
}

#[derive(Debug, Clone, Copy)]
struct Node {
    level: u8,
    area: usize,
    parent: usize,
}

/// Union-find with union by size and path halving.
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Links two roots and returns the surviving root.
    fn link(&mut self, a: usize, b: usize) -> usize {
        let (root, child) = if self.size[a] >= self.size[b] {
            (a, b)
        } else {
            (b, a)
        };
        self.parent[child] = root;
        self.size[root] += self.size[child];
        root
    }
}

struct ComponentTree {
    nodes: Vec<Node>,
    /// Node created at the level where each pixel was flooded.
    pixel_node: Vec<usize>,
    width: usize,
}

/// Mutable state used while flooding one level at a time.
struct TreeBuilder {
    sets: DisjointSets,
    flooded: Vec<bool>,
    /// Closed node currently representing each root.
    node_of: Vec<usize>,
    /// Closed nodes that merge into each root at the current level.
    children: Vec<Vec<usize>>,
    /// Last level at which each root was touched (`u16::MAX` = never).
    touched_at: Vec<u16>,
    touched: Vec<usize>,
    nodes: Vec<Node>,
}

impl TreeBuilder {
    fn new(len: usize) -> Self {
        Self {
            sets: DisjointSets::new(len),
            flooded: vec![false; len],
            node_of: vec![NONE; len],
            children: vec![Vec::new(); len],
            touched_at: vec![u16::MAX; len],
            touched: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Marks a root as changing at `level`, turning its closed node into a child.
    fn touch(&mut self, root: usize, level: u8) {
        if self.touched_at[root] == u16::from(level) {
            return;
        }
        self.touched_at[root] = u16::from(level);
        let closed = std::mem::replace(&mut self.node_of[root], NONE);
        if closed != NONE {
            self.children[root].push(closed);
        }
        self.touched.push(root);
    }

    fn merge(&mut self, p: usize, q: usize, level: u8) {
        let rp = self.sets.find(p);
        let rq = self.sets.find(q);
        if rp == rq {
            return;
        }
        self.touch(rp, level);
        self.touch(rq, level);
        let root = self.sets.link(rp, rq);
        let other = if root == rp { rq } else { rp };
        let moved = std::mem::take(&mut self.children[other]);
        self.children[root].extend(moved);
    }

    /// Creates one node per component that changed at `level`.
    fn close_level(&mut self, level: u8) {
        let touched = std::mem::take(&mut self.touched);
        for &r in &touched {
            if self.sets.find(r) != r {
                continue;
            }
            let id = self.nodes.len();
            self.nodes.push(Node {
                level,
                area: self.sets.size[r],
                parent: NONE,
            });
            for child in std::mem::take(&mut self.children[r]) {
                self.nodes[child].parent = id;
            }
            self.node_of[r] = id;
        }
        self.touched = touched;
        self.touched.clear();
    }
}

impl ComponentTree {
    fn build(values: &[u8], width: usize, height: usize) -> Self {
        let len = values.len();

        // Counting sort: starts[v]..starts[v + 1] indexes pixels of intensity v.
        let mut starts = [0usize; 257];
        for &v in values {
            starts[usize::from(v) + 1] += 1;
        }
        for i in 1..starts.len() {
            starts[i] += starts[i - 1];
        }
        let mut order = vec![0usize; len];
        let mut cursor = starts;
        for (i, &v) in values.iter().enumerate() {
            order[cursor[usize::from(v)]] = i;
            cursor[usize::from(v)] += 1;
        }

        let mut builder = TreeBuilder::new(len);
        let mut pixel_node = vec![NONE; len];

        for level in 0..=u8::MAX {
            let pixels = &order[starts[usize::from(level)]..starts[usize::from(level) + 1]];
            if pixels.is_empty() {
                continue;
            }

            for &p in pixels {
                builder.flooded[p] = true;
                builder.touch(p, level);

                let (x, y) = (p % width, p / width);
                if x > 0 && builder.flooded[p - 1] {
                    builder.merge(p, p - 1, level);
                }
                if x + 1 < width && builder.flooded[p + 1] {
                    builder.merge(p, p + 1, level);
                }
                if y > 0 && builder.flooded[p - width] {
                    builder.merge(p, p - width, level);
                }
                if y + 1 < height && builder.flooded[p + width] {
                    builder.merge(p, p + width, level);
                }
            }

            builder.close_level(level);

            for &p in pixels {
                let root = builder.sets.find(p);
                pixel_node[p] = builder.node_of[root];
            }
        }

        Self {
            nodes: builder.nodes,
            pixel_node,
            width,
        }
    }

    /// Relative area growth from a node to its ancestor `delta` levels up.
    #[allow(clippy::cast_precision_loss)]
    fn variation(&self, id: usize, delta: u8) -> f64 {
        let limit = u16::from(self.nodes[id].level) + u16::from(delta);
        let mut top = id;
        loop {
            let parent = self.nodes[top].parent;
            if parent == NONE || u16::from(self.nodes[parent].level) > limit {
                break;
            }
            top = parent;
        }
        let area = self.nodes[id].area as f64;
        (self.nodes[top].area as f64 - area) / area
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn stable_regions(&self, config: &MserConfig) -> Vec<Vec<Point<i32>>> {
        let total = self.pixel_node.len();
        let variations: Vec<f64> = (0..self.nodes.len())
            .map(|id| self.variation(id, config.delta))
            .collect();

        let mut min_child_variation = vec![f64::INFINITY; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if node.parent != NONE {
                let slot = &mut min_child_variation[node.parent];
                *slot = slot.min(variations[id]);
            }
        }

        let mut region_of = vec![NONE; self.nodes.len()];
        let mut regions: Vec<Vec<Point<i32>>> = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            let var = variations[id];
            let stable = node.area >= config.min_area
                && node.area <= config.max_area
                && node.area < total
                && var <= config.max_variation
                && (node.parent == NONE || var <= variations[node.parent])
                && var <= min_child_variation[id];
            if stable {
                region_of[id] = regions.len();
                regions.push(Vec::with_capacity(node.area));
            }
        }

        if regions.is_empty() {
            return regions;
        }

        // Ancestors only grow, so the walk stops once a node exceeds max_area.
        for (p, &first) in self.pixel_node.iter().enumerate() {
            let point = Point::new((p % self.width) as i32, (p / self.width) as i32);
            let mut id = first;
            while id != NONE && self.nodes[id].area <= config.max_area {
                if region_of[id] != NONE {
                    regions[region_of[id]].push(point);
                }
                id = self.nodes[id].parent;
            }
        }

        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn square_image(size: u32, square: (u32, u32, u32), fg: u8, bg: u8) -> GrayImage {
        let (x0, y0, side) = square;
        GrayImage::from_fn(size, size, |x, y| {
            if (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y) {
                Luma([fg])
            } else {
                Luma([bg])
            }
        })
    }

    #[test]
    fn test_default_config() {
        let config = MserConfig::default();
        assert_eq!(config.delta, 5);
        assert_eq!(config.min_area, 60);
        assert_eq!(config.max_area, 8000);
    }

    #[test]
    fn test_component_tree_root_covers_image() {
        let img = square_image(20, (5, 5, 6), 0, 255);
        let tree = ComponentTree::build(img.as_raw(), 20, 20);

        let roots: Vec<_> = tree.nodes.iter().filter(|n| n.parent == NONE).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].area, 400);
        assert_eq!(roots[0].level, 255);
    }

    #[test]
    fn test_component_tree_square_node() {
        let img = square_image(20, (5, 5, 6), 0, 255);
        let tree = ComponentTree::build(img.as_raw(), 20, 20);

        let square = tree
            .nodes
            .iter()
            .find(|n| n.level == 0)
            .copied()
            .unwrap_or(Node { level: 0, area: 0, parent: NONE });
        assert_eq!(square.area, 36);
        assert_ne!(square.parent, NONE);
    }

    #[test]
    fn test_dark_square_is_stable() {
        let img = square_image(100, (20, 30, 12), 0, 255);
        let regions = extract_regions(&img, &MserConfig::default());

        let squares: Vec<_> = regions.iter().filter(|r| r.len() == 144).collect();
        assert_eq!(squares.len(), 1, "expected the dark square as one region");
        assert!(squares[0].iter().all(|p| (20..32).contains(&p.x) && (30..42).contains(&p.y)));
    }

    #[test]
    fn test_bright_square_is_stable() {
        let img = square_image(100, (40, 40, 10), 230, 20);
        let regions = extract_regions(&img, &MserConfig::default());

        assert!(
            regions.iter().any(|r| r.len() == 100),
            "expected the bright square as a region"
        );
    }

    #[test]
    fn test_small_square_below_min_area() {
        let img = square_image(100, (10, 10, 5), 0, 255);
        let regions = extract_regions(&img, &MserConfig::default());
        assert!(regions.iter().all(|r| r.len() != 25));
    }

    #[test]
    fn test_uniform_image_has_no_regions() {
        let img = GrayImage::from_pixel(64, 64, Luma([128]));
        assert!(extract_regions(&img, &MserConfig::default()).is_empty());

        // Small enough to fit max_area, still never a region
        let small = GrayImage::from_pixel(20, 20, Luma([90]));
        assert!(extract_regions(&small, &MserConfig::default()).is_empty());
    }

    #[test]
    fn test_gradient_is_unstable() {
        // Area grows by a full column per level: never within 25% over 5 levels early on
        let img = GrayImage::from_fn(256, 40, |x, _| Luma([u8::try_from(x).unwrap_or(255)]));
        let regions = extract_regions(&img, &MserConfig::default());
        assert!(regions.iter().all(|r| r.len() >= 40 * 20));
    }

    #[test]
    fn test_empty_image() {
        let img = GrayImage::new(0, 0);
        assert!(extract_regions(&img, &MserConfig::default()).is_empty());
    }
}
