use foundation::bounds::Aabb3;
use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::entity::PrimitiveId;

/// Bounding volume hierarchy over primitive bounds.
///
/// Queries return primitives in ascending `PrimitiveId::index()` order so
/// callers that break ties by index see the same answer regardless of how
/// the tree was split.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        bounds: Aabb3,
        items: Vec<Item>,
    },
    Internal {
        bounds: Aabb3,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Item {
    pub primitive: PrimitiveId,
    pub bounds: Aabb3,
}

impl Bvh {
    pub fn build(items: Vec<Item>) -> Self {
        let mut nodes = Vec::new();
        let mut items = items;
        if !items.is_empty() {
            build_node(&mut nodes, &mut items);
        }
        Self { nodes }
    }

    /// Builds over every primitive currently in `world`.
    pub fn from_world(world: &World) -> Self {
        Self::build(
            world
                .primitives()
                .map(|(primitive, p)| Item {
                    primitive,
                    bounds: p.bounds,
                })
                .collect(),
        )
    }

    /// Primitives whose bounds the ray `origin + t * dir` enters for some
    /// `t` in `[t_min, t_max]`.
    pub fn query_ray(&self, origin: Vec3, dir: Vec3, t_min: f64, t_max: f64) -> Vec<PrimitiveId> {
        let (o, d) = (origin.as_array(), dir.as_array());
        self.collect(|b| ray_intersects_aabb(o, d, b, t_min, t_max))
    }

    fn collect(&self, hit: impl Fn(&Aabb3) -> bool) -> Vec<PrimitiveId> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<PrimitiveId> = Vec::new();
        let mut stack: Vec<usize> = vec![0];

        while let Some(idx) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { bounds, items } => {
                    if !hit(bounds) {
                        continue;
                    }
                    hits.extend(
                        items
                            .iter()
                            .filter(|item| hit(&item.bounds))
                            .map(|item| item.primitive),
                    );
                }
                Node::Internal {
                    bounds,
                    left,
                    right,
                } => {
                    if !hit(bounds) {
                        continue;
                    }
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }

        hits.sort_by_key(|p| p.index());
        hits.dedup();
        hits
    }
}

const LEAF_MAX: usize = 8;

fn build_node(nodes: &mut Vec<Node>, items: &mut [Item]) -> usize {
    let bounds = bounds_for_items(items);
    if items.len() <= LEAF_MAX {
        let idx = nodes.len();
        nodes.push(Node::Leaf {
            bounds,
            items: items.to_vec(),
        });
        return idx;
    }

    let axis = split_axis(&bounds);
    items.sort_by(|a, b| {
        let ca = centroid_axis(&a.bounds, axis);
        let cb = centroid_axis(&b.bounds, axis);
        stable_total_cmp_f64(ca, cb).then_with(|| a.primitive.index().cmp(&b.primitive.index()))
    });

    let mid = items.len() / 2;
    let (left_items, right_items) = items.split_at_mut(mid);

    let idx = nodes.len();
    // Patched once both children exist.
    nodes.push(Node::Leaf {
        bounds,
        items: Vec::new(),
    });

    let left = build_node(nodes, left_items);
    let right = build_node(nodes, right_items);

    nodes[idx] = Node::Internal {
        bounds,
        left,
        right,
    };
    idx
}

fn centroid_axis(aabb: &Aabb3, axis: usize) -> f64 {
    (aabb.min[axis] + aabb.max[axis]) * 0.5
}

fn split_axis(bounds: &Aabb3) -> usize {
    let ex = bounds.max[0] - bounds.min[0];
    let ey = bounds.max[1] - bounds.min[1];
    let ez = bounds.max[2] - bounds.min[2];

    // Ties prefer X, then Y, then Z.
    if ex >= ey && ex >= ez {
        0
    } else if ey >= ez {
        1
    } else {
        2
    }
}

fn bounds_for_items(items: &[Item]) -> Aabb3 {
    items[1..]
        .iter()
        .fold(items[0].bounds, |b, item| b.union(&item.bounds))
}

/// Slab test. Flat boxes (zero extent on an axis) still count when the ray
/// crosses their plane, which matters for ground-level ribbons.
pub(crate) fn ray_intersects_aabb(
    origin: [f64; 3],
    dir: [f64; 3],
    aabb: &Aabb3,
    mut t_min: f64,
    mut t_max: f64,
) -> bool {
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let min = aabb.min[axis];
        let max = aabb.max[axis];

        if d.abs() < 1e-12 {
            if o < min || o > max {
                return false;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min - o) * inv;
        let mut t2 = (max - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return false;
        }
    }

    true
}
