//! Binary Space Partitioning (BSP) for rectangle subdivision
//!
//! Splits a rectangle recursively into leaf rectangles of bounded size. The leaves
//! tile the root exactly and are used as building lots for settlements.

use std::fmt::Write;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, WorldError};

/// Probability of splitting a child that already fits within `max_size`
const EXTRA_SPLIT_CHANCE: f64 = 0.75;

/// Axis-aligned rectangle; `x` is the column and `y` the row of its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Which dimension a split divides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    /// Cut along a row: children are stacked top and bottom
    Horizontal,
    /// Cut along a column: children sit left and right
    Vertical,
}

/// A node of the partition tree. Children are owned by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BspNode {
    Leaf(Rect),
    Split {
        rect: Rect,
        axis: SplitAxis,
        left: Box<BspNode>,
        right: Box<BspNode>,
    },
}

impl BspNode {
    pub fn rect(&self) -> Rect {
        match self {
            BspNode::Leaf(rect) | BspNode::Split { rect, .. } => *rect,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BspNode::Leaf(_))
    }

    /// Leaf rectangles in order (left subtree before right).
    pub fn leaves(&self) -> Vec<Rect> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }

    pub fn depth(&self) -> usize {
        match self {
            BspNode::Leaf(_) => 0,
            BspNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Indented outline of the tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(self, 0, &mut out);
        out
    }
}

fn collect_leaves(node: &BspNode, leaves: &mut Vec<Rect>) {
    match node {
        BspNode::Leaf(rect) => leaves.push(*rect),
        BspNode::Split { left, right, .. } => {
            collect_leaves(left, leaves);
            collect_leaves(right, leaves);
        }
    }
}

fn dump_node(node: &BspNode, level: usize, out: &mut String) {
    let rect = node.rect();
    let _ = writeln!(
        out,
        "{}|--> x:{} y:{} w:{} h:{}{}",
        "    ".repeat(level),
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        if node.is_leaf() { " (leaf)" } else { "" }
    );
    if let BspNode::Split { left, right, .. } = node {
        dump_node(left, level + 1, out);
        dump_node(right, level + 1, out);
    }
}

/// Build a partition of `rect`. Every leaf is at least `min_size` on both axes
/// (provided the root is), and splitting continues while a node exceeds
/// `max_size`.
pub fn build(rect: Rect, min_size: usize, max_size: usize, rng: &mut ChaCha8Rng) -> Result<BspNode> {
    if min_size == 0 {
        return Err(WorldError::parameter("BSP min_size must be positive"));
    }
    if min_size >= max_size {
        return Err(WorldError::parameter(format!(
            "BSP min_size {} must be smaller than max_size {}",
            min_size, max_size
        )));
    }
    if rect.width < min_size || rect.height < min_size {
        return Err(WorldError::parameter(format!(
            "BSP root {}x{} is smaller than min_size {}",
            rect.width, rect.height, min_size
        )));
    }
    Ok(split_node(rect, min_size, max_size, rng))
}

/// Pick the split axis. Starts random, then forces the long axis when the
/// rectangle is more than 2:1 or only one dimension still exceeds `max_size`.
fn choose_axis(rect: Rect, max_size: usize, rng: &mut ChaCha8Rng) -> SplitAxis {
    let (w, h) = (rect.width as f32, rect.height as f32);
    if h / w < 0.5 || (rect.height < max_size && rect.width > max_size) {
        SplitAxis::Vertical
    } else if w / h < 0.5 || (rect.height > max_size && rect.width < max_size) {
        SplitAxis::Horizontal
    } else if rng.gen_bool(0.5) {
        SplitAxis::Horizontal
    } else {
        SplitAxis::Vertical
    }
}

fn split_node(rect: Rect, min_size: usize, max_size: usize, rng: &mut ChaCha8Rng) -> BspNode {
    let axis = choose_axis(rect, max_size, rng);
    let length = match axis {
        SplitAxis::Horizontal => rect.height,
        SplitAxis::Vertical => rect.width,
    };

    // Both children must keep at least min_size
    if length <= min_size * 2 {
        return BspNode::Leaf(rect);
    }

    let cut = rng.gen_range(min_size..length - min_size);
    let (first, second) = match axis {
        SplitAxis::Horizontal => (
            Rect::new(rect.x, rect.y, rect.width, cut),
            Rect::new(rect.x, rect.y + cut, rect.width, rect.height - cut),
        ),
        SplitAxis::Vertical => (
            Rect::new(rect.x, rect.y, cut, rect.height),
            Rect::new(rect.x + cut, rect.y, rect.width - cut, rect.height),
        ),
    };

    let left = grow_child(first, min_size, max_size, rng);
    let right = grow_child(second, min_size, max_size, rng);

    BspNode::Split {
        rect,
        axis,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn grow_child(rect: Rect, min_size: usize, max_size: usize, rng: &mut ChaCha8Rng) -> BspNode {
    let oversized = rect.width > max_size || rect.height > max_size;
    if oversized || rng.gen_bool(EXTRA_SPLIT_CHANCE) {
        split_node(rect, min_size, max_size, rng)
    } else {
        BspNode::Leaf(rect)
    }
}
