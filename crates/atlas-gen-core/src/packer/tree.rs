use crate::model::Rect;

/// Node of the packing tree.
///
/// A leaf is either empty or holds exactly one occupant. A split node owns two children that
/// partition its region exactly; split nodes never hold an occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        region: Rect,
        /// Index of the rectangle stored here.
        occupant: Option<usize>,
    },
    Split {
        region: Rect,
        first: Box<Node>,
        second: Box<Node>,
    },
}

impl Node {
    /// Empty leaf covering `region`.
    pub fn new(region: Rect) -> Self {
        Node::Leaf {
            region,
            occupant: None,
        }
    }

    pub fn region(&self) -> Rect {
        match self {
            Node::Leaf { region, .. } | Node::Split { region, .. } => *region,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn occupant(&self) -> Option<usize> {
        match self {
            Node::Leaf { occupant, .. } => *occupant,
            Node::Split { .. } => None,
        }
    }

    pub fn children(&self) -> Option<(&Node, &Node)> {
        match self {
            Node::Split { first, second, .. } => Some((first, second)),
            Node::Leaf { .. } => None,
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// Collects `(occupant, region)` for every occupied leaf, first child first.
    pub fn occupied(&self) -> Vec<(usize, Rect)> {
        let mut out = Vec::new();
        self.collect_occupied(&mut out);
        out
    }

    fn collect_occupied(&self, out: &mut Vec<(usize, Rect)>) {
        match self {
            Node::Leaf {
                region,
                occupant: Some(id),
            } => out.push((*id, *region)),
            Node::Leaf { occupant: None, .. } => {}
            Node::Split { first, second, .. } => {
                first.collect_occupied(out);
                second.collect_occupied(out);
            }
        }
    }

    /// Places a `w x h` rectangle identified by `id` somewhere below this node.
    ///
    /// Returns the region it now occupies, or `None` if no empty leaf can hold it.
    pub(crate) fn insert(&mut self, id: usize, w: u32, h: u32) -> Option<Rect> {
        match self {
            Node::Split { first, second, .. } => {
                first.insert(id, w, h).or_else(|| second.insert(id, w, h))
            }
            Node::Leaf {
                occupant: Some(_), ..
            } => None,
            Node::Leaf {
                region,
                occupant: None,
            } => {
                let region = *region;
                if w > region.w || h > region.h {
                    return None;
                }
                if w == region.w && h == region.h {
                    *self = Node::Leaf {
                        region,
                        occupant: Some(id),
                    };
                    return Some(region);
                }

                // Split off the larger leftover strip; the first child matches the rect on that axis.
                let dw = region.w - w;
                let dh = region.h - h;
                let (a, b) = if dw > dh {
                    (
                        Rect::new(region.x, region.y, w, region.h),
                        Rect::new(region.x + w, region.y, region.w - w, region.h),
                    )
                } else {
                    (
                        Rect::new(region.x, region.y, region.w, h),
                        Rect::new(region.x, region.y + h, region.w, region.h - h),
                    )
                };
                let mut first = Box::new(Node::new(a));
                let placed = first.insert(id, w, h);
                *self = Node::Split {
                    region,
                    first,
                    second: Box::new(Node::new(b)),
                };
                placed
            }
        }
    }
}
