//! Bounding-volume hierarchy over models. Built once, immutable
//! during rendering; leaves reference contiguous ranges of a permuted
//! model array, and traversal runs over a flattened node list with a
//! manual stack, visiting the near child first so an early hit can
//! prune the far subtree.

// std
use std::sync::Arc;
// others
use typed_arena::Arena;
// crate
use crate::core::geometry::{bnd3_union_bnd3f, bnd3_union_pnt3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::interaction::SurfaceInteraction;
use crate::core::model::Model;
use crate::core::precision::Float;

#[derive(Debug, Clone, PartialEq)]
pub enum SplitMethod {
    SAH,
    HLBVH,
    Middle,
    EqualCounts,
}

#[derive(Debug, Default, Copy, Clone)]
struct ModelBound {
    model_number: usize,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl ModelBound {
    fn new(model_number: usize, bounds: Bounds3f) -> Self {
        ModelBound {
            model_number,
            bounds,
            centroid: bounds.p_min * 0.5 + bounds.p_max * 0.5,
        }
    }
}

#[derive(Debug)]
struct BuildNode<'a> {
    bounds: Bounds3f,
    child1: Option<&'a BuildNode<'a>>,
    child2: Option<&'a BuildNode<'a>>,
    split_axis: u8,
    first_model_offset: usize,
    n_models: usize,
}

impl<'a> Default for BuildNode<'a> {
    fn default() -> Self {
        BuildNode {
            bounds: Bounds3f::default(),
            child1: None,
            child2: None,
            split_axis: 0_u8,
            first_model_offset: 0_usize,
            n_models: 0_usize,
        }
    }
}

impl<'a> BuildNode<'a> {
    fn init_leaf(&mut self, first: usize, n: usize, b: &Bounds3f) {
        self.first_model_offset = first;
        self.n_models = n;
        self.bounds = *b;
        self.child1 = None;
        self.child2 = None;
    }
    fn init_interior(&mut self, axis: u8, c0: &'a BuildNode<'a>, c1: &'a BuildNode<'a>) {
        self.n_models = 0;
        self.bounds = bnd3_union_bnd3f(&c0.bounds, &c1.bounds);
        self.child1 = Some(c0);
        self.child2 = Some(c1);
        self.split_axis = axis;
    }
}

#[derive(Debug, Copy, Clone)]
struct BucketInfo {
    count: usize,
    bounds: Bounds3f,
}

impl Default for BucketInfo {
    fn default() -> Self {
        BucketInfo {
            count: 0_usize,
            bounds: Bounds3f::default(),
        }
    }
}

/// Flattened node: a leaf stores its model range, an interior node
/// the offset of its second child (the first follows immediately).
#[derive(Debug, Default, Clone)]
struct LinearNode {
    bounds: Bounds3f,
    offset: i32,
    n_models: u16,
    axis: u8,
}

pub struct BoundingVolumeHierarchy {
    max_models_in_node: usize,
    split_method: SplitMethod,
    pub models: Vec<Arc<Model>>,
    nodes: Vec<LinearNode>,
}

impl BoundingVolumeHierarchy {
    pub fn new(
        models: Vec<Arc<Model>>,
        max_models_in_node: usize,
        split_method: SplitMethod,
    ) -> Self {
        let mut bvh = BoundingVolumeHierarchy {
            max_models_in_node: std::cmp::min(max_models_in_node, 255),
            split_method,
            models,
            nodes: Vec::new(),
        };
        let num_models: usize = bvh.models.len();
        // an empty aggregate is valid; it just never intersects
        if num_models == 0_usize {
            return bvh;
        }
        let mut model_info: Vec<ModelBound> = vec![ModelBound::default(); num_models];
        for (i, item) in model_info.iter_mut().enumerate().take(num_models) {
            let world_bound: Bounds3f = bvh.models[i].world_bound();
            *item = ModelBound::new(i, world_bound);
        }
        let arena: Arena<BuildNode> = Arena::with_capacity(1024 * 1024);
        let mut total_nodes: usize = 0;
        let mut ordered_models: Vec<Arc<Model>> = Vec::with_capacity(num_models);
        let root: &BuildNode = BoundingVolumeHierarchy::recursive_build(
            &bvh.models,
            bvh.max_models_in_node,
            &bvh.split_method,
            &arena,
            &mut model_info,
            0,
            num_models,
            &mut total_nodes,
            &mut ordered_models,
        );
        let mut nodes: Vec<LinearNode> = vec![LinearNode::default(); total_nodes];
        let mut offset: usize = 0;
        BoundingVolumeHierarchy::flatten_tree(root, &mut nodes, &mut offset);
        assert_eq!(nodes.len(), total_nodes);
        bvh.models = ordered_models;
        bvh.nodes = nodes;
        bvh
    }
    #[allow(clippy::too_many_arguments)]
    fn recursive_build<'a>(
        models: &[Arc<Model>],
        max_models_in_node: usize,
        split_method: &SplitMethod,
        arena: &'a Arena<BuildNode<'a>>,
        model_info: &mut Vec<ModelBound>,
        start: usize,
        end: usize,
        total_nodes: &mut usize,
        ordered_models: &mut Vec<Arc<Model>>,
    ) -> &'a BuildNode<'a> {
        assert_ne!(start, end);
        let node: &mut BuildNode<'a> = arena.alloc(BuildNode::default());
        *total_nodes += 1_usize;
        // bounds of all models in this range
        let mut bounds: Bounds3f = Bounds3f::default();
        for item in model_info.iter().take(end).skip(start) {
            bounds = bnd3_union_bnd3f(&bounds, &item.bounds);
        }
        let n_models: usize = end - start;
        if n_models == 1 {
            let first_model_offset: usize = ordered_models.len();
            for item in model_info.iter().take(end).skip(start) {
                ordered_models.push(models[item.model_number].clone());
            }
            node.init_leaf(first_model_offset, n_models, &bounds);
            return node;
        }
        // split axis = largest extent of the centroid bounds
        let mut centroid_bounds: Bounds3f = Bounds3f::default();
        for item in model_info.iter().take(end).skip(start) {
            centroid_bounds = bnd3_union_pnt3f(&centroid_bounds, &item.centroid);
        }
        let dim: u8 = centroid_bounds.maximum_extent();
        let dim_i: XYZEnum = XYZEnum::from_index(dim);
        // degenerate centroid bounds leave nothing to split on
        if centroid_bounds.p_max[dim_i] == centroid_bounds.p_min[dim_i] {
            let first_model_offset: usize = ordered_models.len();
            for item in model_info.iter().take(end).skip(start) {
                ordered_models.push(models[item.model_number].clone());
            }
            node.init_leaf(first_model_offset, n_models, &bounds);
            return node;
        }
        let mut mid: usize = (start + end) / 2_usize;
        // the HLBVH request falls back to the SAH build here; the
        // Morton path only pays off for very large scenes
        let effective_split: &SplitMethod = match split_method {
            SplitMethod::HLBVH => &SplitMethod::SAH,
            other => other,
        };
        let mut make_leaf: bool = false;
        match effective_split {
            SplitMethod::Middle => {
                // partition by the geometric midpoint of the centroids
                let pmid: Float =
                    (centroid_bounds.p_min[dim_i] + centroid_bounds.p_max[dim_i]) / 2.0 as Float;
                mid = start
                    + partition_in_place(&mut model_info[start..end], |mb| {
                        mb.centroid[dim_i] < pmid
                    });
                // fall through to equal counts if the midpoint failed
                // to separate anything (many coincident centroids)
                if mid == start || mid == end {
                    mid = (start + end) / 2;
                    model_info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                        a.centroid[dim_i]
                            .partial_cmp(&b.centroid[dim_i])
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                }
            }
            SplitMethod::EqualCounts => {
                mid = (start + end) / 2;
                model_info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                    a.centroid[dim_i]
                        .partial_cmp(&b.centroid[dim_i])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            SplitMethod::SAH | SplitMethod::HLBVH => {
                if n_models <= 2 {
                    mid = (start + end) / 2;
                    if start != end - 1
                        && model_info[end - 1].centroid[dim_i] < model_info[start].centroid[dim_i]
                    {
                        model_info.swap(start, end - 1);
                    }
                } else {
                    // bucket the centroids along the chosen axis
                    let n_buckets: usize = 12;
                    let mut buckets: [BucketInfo; 12] = [BucketInfo::default(); 12];
                    for item in model_info.iter().take(end).skip(start) {
                        let mut b: usize = (n_buckets as Float
                            * centroid_bounds.offset(&item.centroid)[dim_i])
                            as usize;
                        if b == n_buckets {
                            b = n_buckets - 1;
                        }
                        buckets[b].count += 1;
                        buckets[b].bounds = bnd3_union_bnd3f(&buckets[b].bounds, &item.bounds);
                    }
                    // expected cost of splitting after each bucket
                    let mut cost: [Float; 11] = [0.0 as Float; 11];
                    for (i, cost_item) in cost.iter_mut().enumerate().take(n_buckets - 1) {
                        let mut b0: Bounds3f = Bounds3f::default();
                        let mut b1: Bounds3f = Bounds3f::default();
                        let mut count0: usize = 0;
                        let mut count1: usize = 0;
                        for item in buckets.iter().take(i + 1) {
                            b0 = bnd3_union_bnd3f(&b0, &item.bounds);
                            count0 += item.count;
                        }
                        for item in buckets.iter().take(n_buckets).skip(i + 1) {
                            b1 = bnd3_union_bnd3f(&b1, &item.bounds);
                            count1 += item.count;
                        }
                        *cost_item = 1.0 as Float
                            + (count0 as Float * b0.surface_area()
                                + count1 as Float * b1.surface_area())
                                / bounds.surface_area();
                    }
                    let mut min_cost: Float = cost[0];
                    let mut min_cost_split_bucket: usize = 0;
                    for (i, item) in cost.iter().enumerate().take(n_buckets - 1) {
                        if *item < min_cost {
                            min_cost = *item;
                            min_cost_split_bucket = i;
                        }
                    }
                    // split only when the SAH says it beats a leaf
                    let leaf_cost: Float = n_models as Float;
                    if n_models > max_models_in_node || min_cost < leaf_cost {
                        mid = start
                            + partition_in_place(&mut model_info[start..end], |mb| {
                                let mut b: usize = (n_buckets as Float
                                    * centroid_bounds.offset(&mb.centroid)[dim_i])
                                    as usize;
                                if b == n_buckets {
                                    b = n_buckets - 1;
                                }
                                b <= min_cost_split_bucket
                            });
                    } else {
                        make_leaf = true;
                    }
                }
            }
        }
        if make_leaf || mid == start || mid == end {
            let first_model_offset: usize = ordered_models.len();
            for item in model_info.iter().take(end).skip(start) {
                ordered_models.push(models[item.model_number].clone());
            }
            node.init_leaf(first_model_offset, n_models, &bounds);
            return node;
        }
        let c0 = BoundingVolumeHierarchy::recursive_build(
            models,
            max_models_in_node,
            split_method,
            arena,
            model_info,
            start,
            mid,
            total_nodes,
            ordered_models,
        );
        let c1 = BoundingVolumeHierarchy::recursive_build(
            models,
            max_models_in_node,
            split_method,
            arena,
            model_info,
            mid,
            end,
            total_nodes,
            ordered_models,
        );
        node.init_interior(dim, c0, c1);
        node
    }
    fn flatten_tree<'a>(
        node: &BuildNode<'a>,
        nodes: &mut Vec<LinearNode>,
        offset: &mut usize,
    ) -> usize {
        let my_offset: usize = *offset;
        *offset += 1;
        if node.n_models > 0 {
            // leaf
            nodes[my_offset] = LinearNode {
                bounds: node.bounds,
                offset: node.first_model_offset as i32,
                n_models: node.n_models as u16,
                axis: 0_u8,
            };
        } else {
            // interior: first child is adjacent, second child offset
            // is recorded
            if let Some(child1) = node.child1 {
                BoundingVolumeHierarchy::flatten_tree(child1, nodes, offset);
            }
            if let Some(child2) = node.child2 {
                let second: usize = BoundingVolumeHierarchy::flatten_tree(child2, nodes, offset);
                nodes[my_offset] = LinearNode {
                    bounds: node.bounds,
                    offset: second as i32,
                    n_models: 0_u16,
                    axis: node.split_axis,
                };
            }
        }
        my_offset
    }
    pub fn world_bound(&self) -> Bounds3f {
        if !self.nodes.is_empty() {
            self.nodes[0].bounds
        } else {
            Bounds3f::default()
        }
    }
    pub fn intersect(&self, ray: &Ray, isect: &mut SurfaceInteraction) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut hit: bool = false;
        let inv_dir: Vector3f = Vector3f {
            x: 1.0 as Float / ray.d.x,
            y: 1.0 as Float / ray.d.y,
            z: 1.0 as Float / ray.d.z,
        };
        let dir_is_neg: [u8; 3] = [
            (inv_dir.x < 0.0 as Float) as u8,
            (inv_dir.y < 0.0 as Float) as u8,
            (inv_dir.z < 0.0 as Float) as u8,
        ];
        let mut to_visit_offset: u32 = 0;
        let mut current_node_index: u32 = 0;
        let mut nodes_to_visit: [u32; 64] = [0_u32; 64];
        loop {
            let node: &LinearNode = &self.nodes[current_node_index as usize];
            if node.bounds.intersect_p(ray, &inv_dir, &dir_is_neg) {
                if node.n_models > 0 {
                    // intersect every model in the leaf; each accepted
                    // hit tightens ray.t_max
                    for i in 0..node.n_models {
                        if self.models[node.offset as usize + i as usize].intersect(ray, isect) {
                            hit = true;
                        }
                    }
                    if to_visit_offset == 0_u32 {
                        break;
                    }
                    to_visit_offset -= 1_u32;
                    current_node_index = nodes_to_visit[to_visit_offset as usize];
                } else {
                    // visit the near child first, stack the far one
                    if dir_is_neg[node.axis as usize] == 1_u8 {
                        nodes_to_visit[to_visit_offset as usize] = current_node_index + 1_u32;
                        to_visit_offset += 1_u32;
                        current_node_index = node.offset as u32;
                    } else {
                        nodes_to_visit[to_visit_offset as usize] = node.offset as u32;
                        to_visit_offset += 1_u32;
                        current_node_index += 1_u32;
                    }
                }
            } else {
                if to_visit_offset == 0_u32 {
                    break;
                }
                to_visit_offset -= 1_u32;
                current_node_index = nodes_to_visit[to_visit_offset as usize];
            }
        }
        hit
    }
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let inv_dir: Vector3f = Vector3f {
            x: 1.0 as Float / ray.d.x,
            y: 1.0 as Float / ray.d.y,
            z: 1.0 as Float / ray.d.z,
        };
        let dir_is_neg: [u8; 3] = [
            (inv_dir.x < 0.0 as Float) as u8,
            (inv_dir.y < 0.0 as Float) as u8,
            (inv_dir.z < 0.0 as Float) as u8,
        ];
        let mut to_visit_offset: u32 = 0;
        let mut current_node_index: u32 = 0;
        let mut nodes_to_visit: [u32; 64] = [0_u32; 64];
        loop {
            let node: &LinearNode = &self.nodes[current_node_index as usize];
            if node.bounds.intersect_p(ray, &inv_dir, &dir_is_neg) {
                if node.n_models > 0 {
                    for i in 0..node.n_models {
                        // first hit settles a visibility query
                        if self.models[node.offset as usize + i as usize].intersect_p(ray) {
                            return true;
                        }
                    }
                    if to_visit_offset == 0_u32 {
                        break;
                    }
                    to_visit_offset -= 1_u32;
                    current_node_index = nodes_to_visit[to_visit_offset as usize];
                } else if dir_is_neg[node.axis as usize] == 1_u8 {
                    nodes_to_visit[to_visit_offset as usize] = current_node_index + 1_u32;
                    to_visit_offset += 1_u32;
                    current_node_index = node.offset as u32;
                } else {
                    nodes_to_visit[to_visit_offset as usize] = node.offset as u32;
                    to_visit_offset += 1_u32;
                    current_node_index += 1_u32;
                }
            } else {
                if to_visit_offset == 0_u32 {
                    break;
                }
                to_visit_offset -= 1_u32;
                current_node_index = nodes_to_visit[to_visit_offset as usize];
            }
        }
        false
    }
}

/// In-place partition; returns the number of elements for which
/// the predicate holds.
fn partition_in_place<T, P>(slice: &mut [T], pred: P) -> usize
where
    T: Copy,
    P: Fn(&T) -> bool,
{
    let mut first: usize = 0;
    for i in 0..slice.len() {
        if pred(&slice[i]) {
            slice.swap(first, i);
            first += 1;
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{GeometricModel, Model};
    use crate::core::rng::Rng;
    use crate::core::shape::Shape;
    use crate::core::transform::Transform;
    use crate::shapes::sphere::Sphere;

    fn sphere_model(center: Vector3f, radius: Float) -> Arc<Model> {
        let object_to_world: Transform = Transform::translate(&center);
        let world_to_object: Transform = object_to_world.inverse();
        let sphere: Sphere = Sphere::new(
            object_to_world,
            world_to_object,
            false,
            radius,
            -radius,
            radius,
            360.0,
        );
        Arc::new(Model::Geometric(GeometricModel::new(
            Arc::new(Shape::Sphere(sphere)),
            None,
            None,
        )))
    }

    #[test]
    fn empty_hierarchy_never_intersects() {
        let bvh: BoundingVolumeHierarchy =
            BoundingVolumeHierarchy::new(Vec::new(), 4, SplitMethod::SAH);
        let ray: Ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        assert!(!bvh.intersect(&ray, &mut isect));
        assert!(!bvh.intersect_p(&ray));
    }

    #[test]
    fn single_model_matches_direct_intersection() {
        let model: Arc<Model> = sphere_model(Vector3f::new(0.0, 0.0, -4.0), 1.0);
        let bvh: BoundingVolumeHierarchy =
            BoundingVolumeHierarchy::new(vec![model.clone()], 4, SplitMethod::SAH);
        let ray_b: Ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, -1.0));
        let ray_d: Ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, -1.0));
        let mut isect_b: SurfaceInteraction = SurfaceInteraction::default();
        let mut isect_d: SurfaceInteraction = SurfaceInteraction::default();
        assert!(bvh.intersect(&ray_b, &mut isect_b));
        assert!(model.intersect(&ray_d, &mut isect_d));
        assert_eq!(ray_b.t_max.get(), ray_d.t_max.get());
        assert_eq!(isect_b.common.p, isect_d.common.p);
    }

    #[test]
    fn hierarchy_bound_contains_every_model_bound() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(17);
        let mut models: Vec<Arc<Model>> = Vec::new();
        for _ in 0..200 {
            let center: Vector3f = Vector3f {
                x: (rng.uniform_float() - 0.5) * 40.0,
                y: (rng.uniform_float() - 0.5) * 40.0,
                z: (rng.uniform_float() - 0.5) * 40.0,
            };
            models.push(sphere_model(center, 0.1 + rng.uniform_float()));
        }
        for split in [
            SplitMethod::SAH,
            SplitMethod::Middle,
            SplitMethod::EqualCounts,
            SplitMethod::HLBVH,
        ]
        .iter()
        {
            let bvh: BoundingVolumeHierarchy =
                BoundingVolumeHierarchy::new(models.clone(), 4, split.clone());
            let world: Bounds3f = bvh.world_bound();
            for model in bvh.models.iter() {
                let b: Bounds3f = model.world_bound();
                assert!(world.contains(&b.p_min));
                assert!(world.contains(&b.p_max));
            }
        }
    }

    #[test]
    fn traversal_agrees_with_brute_force() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(23);
        let mut models: Vec<Arc<Model>> = Vec::new();
        for _ in 0..10_000 {
            let center: Vector3f = Vector3f {
                x: (rng.uniform_float() - 0.5) * 100.0,
                y: (rng.uniform_float() - 0.5) * 100.0,
                z: (rng.uniform_float() - 0.5) * 100.0,
            };
            models.push(sphere_model(center, 0.05 + 0.4 * rng.uniform_float()));
        }
        let bvh: BoundingVolumeHierarchy =
            BoundingVolumeHierarchy::new(models.clone(), 4, SplitMethod::SAH);
        for _ in 0..1_000 {
            let o: Point3f = Point3f {
                x: (rng.uniform_float() - 0.5) * 120.0,
                y: (rng.uniform_float() - 0.5) * 120.0,
                z: (rng.uniform_float() - 0.5) * 120.0,
            };
            let d: Vector3f = Vector3f {
                x: rng.uniform_float() - 0.5,
                y: rng.uniform_float() - 0.5,
                z: rng.uniform_float() - 0.5,
            };
            if d.length_squared() == 0.0 {
                continue;
            }
            let d: Vector3f = d.normalize();
            // brute force over the unordered model list
            let brute_ray: Ray = Ray::new(o, d);
            let mut brute_isect: SurfaceInteraction = SurfaceInteraction::default();
            let mut brute_hit: bool = false;
            for model in models.iter() {
                if model.intersect(&brute_ray, &mut brute_isect) {
                    brute_hit = true;
                }
            }
            let bvh_ray: Ray = Ray::new(o, d);
            let mut bvh_isect: SurfaceInteraction = SurfaceInteraction::default();
            let bvh_hit: bool = bvh.intersect(&bvh_ray, &mut bvh_isect);
            assert_eq!(brute_hit, bvh_hit);
            if brute_hit {
                assert!((brute_ray.t_max.get() - bvh_ray.t_max.get()).abs() < 1e-4);
                assert!(
                    (brute_isect.common.p - bvh_isect.common.p).length() < 1e-4,
                    "nearest hits disagree"
                );
            }
        }
    }
}
