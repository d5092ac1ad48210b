//! Region quadtree over sprite collider bounds.
//!
//! Used only to prune candidate pairs; exact shape tests still decide every
//! collision. Entries outside the root region are kept at the root so the
//! tree never loses an object.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::Deserialize;

use crate::api::types::SpriteId;
use crate::core::geometry::Aabb;

/// Split thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Objects a node holds before splitting.
    pub max_objects: usize,
    /// Maximum depth below the root.
    pub max_levels: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            max_levels: 10,
        }
    }
}

#[derive(Debug)]
struct Node {
    bounds: Aabb,
    level: usize,
    objects: Vec<(SpriteId, Aabb)>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Aabb, level: usize) -> Self {
        Self {
            bounds,
            level,
            objects: Vec::new(),
            children: None,
        }
    }

    /// Index of the child that fully contains `aabb`, if any.
    fn quadrant(&self, aabb: &Aabb) -> Option<usize> {
        let children = self.children.as_ref()?;
        children.iter().position(|c| c.bounds.contains(aabb))
    }

    fn split(&mut self) {
        let min = self.bounds.min;
        let half = self.bounds.half_size();
        let mid = min + half;
        let level = self.level + 1;
        self.children = Some(Box::new([
            Node::new(Aabb::new(min, mid), level),
            Node::new(Aabb::new(Vec2::new(mid.x, min.y), Vec2::new(self.bounds.max.x, mid.y)), level),
            Node::new(Aabb::new(Vec2::new(min.x, mid.y), Vec2::new(mid.x, self.bounds.max.y)), level),
            Node::new(Aabb::new(mid, self.bounds.max), level),
        ]));
    }

    fn insert(&mut self, id: SpriteId, aabb: Aabb, config: &QuadTreeConfig) {
        if let Some(q) = self.quadrant(&aabb) {
            if let Some(children) = self.children.as_mut() {
                children[q].insert(id, aabb, config);
                return;
            }
        }

        self.objects.push((id, aabb));

        if self.children.is_none()
            && self.objects.len() > config.max_objects
            && self.level < config.max_levels
        {
            self.split();
            let objects = std::mem::take(&mut self.objects);
            for (oid, oaabb) in objects {
                match self.quadrant(&oaabb) {
                    Some(q) => {
                        if let Some(children) = self.children.as_mut() {
                            children[q].insert(oid, oaabb, config);
                        }
                    }
                    None => self.objects.push((oid, oaabb)),
                }
            }
        }
    }

    /// Remove by walking the same path insertion would take.
    fn remove(&mut self, id: SpriteId, aabb: &Aabb) -> bool {
        if let Some(q) = self.quadrant(aabb) {
            if let Some(children) = self.children.as_mut() {
                return children[q].remove(id, aabb);
            }
        }
        match self.objects.iter().position(|(oid, _)| *oid == id) {
            Some(i) => {
                self.objects.swap_remove(i);
                true
            }
            None => false,
        }
    }

    fn query(&self, area: &Aabb, out: &mut Vec<SpriteId>) {
        for (id, aabb) in &self.objects {
            if touches(aabb, area) {
                out.push(*id);
            }
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                if touches(&child.bounds, area) {
                    child.query(area, out);
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self.children.as_ref() {
            Some(children) => 1 + children.iter().map(Node::depth).max().unwrap_or(0),
            None => 0,
        }
    }
}

/// Inclusive intersection: candidates must be a superset of real overlaps.
fn touches(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

/// Quadtree keyed by sprite id.
#[derive(Debug)]
pub struct QuadTree {
    root: Node,
    entries: HashMap<SpriteId, Aabb>,
    config: QuadTreeConfig,
}

impl QuadTree {
    pub fn new(config: QuadTreeConfig) -> Self {
        Self {
            root: Node::new(Aabb::new(Vec2::ZERO, Vec2::ZERO), 0),
            entries: HashMap::new(),
            config,
        }
    }

    /// Discard everything and rebuild around the given items.
    /// The root region is the union of all item bounds.
    pub fn rebuild(&mut self, items: Vec<(SpriteId, Aabb)>) {
        let bounds = items
            .iter()
            .map(|(_, aabb)| *aabb)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or(Aabb::new(Vec2::ZERO, Vec2::ZERO));

        self.root = Node::new(bounds, 0);
        self.entries.clear();
        for (id, aabb) in items {
            self.insert(id, aabb);
        }
    }

    pub fn insert(&mut self, id: SpriteId, aabb: Aabb) {
        if self.entries.contains_key(&id) {
            self.remove(id);
        }
        self.root.insert(id, aabb, &self.config);
        self.entries.insert(id, aabb);
    }

    pub fn remove(&mut self, id: SpriteId) -> bool {
        match self.entries.remove(&id) {
            Some(aabb) => self.root.remove(id, &aabb),
            None => false,
        }
    }

    /// Move an entry to new bounds. No-op if unchanged.
    pub fn update(&mut self, id: SpriteId, aabb: Aabb) {
        if self.entries.get(&id) == Some(&aabb) {
            return;
        }
        self.insert(id, aabb);
    }

    /// Make the entries match `items` exactly: update moved ones, insert
    /// new ones and drop the rest.
    pub fn sync(&mut self, items: Vec<(SpriteId, Aabb)>) {
        let live: HashSet<SpriteId> = items.iter().map(|(id, _)| *id).collect();
        let stale: Vec<SpriteId> = self
            .entries
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            self.remove(id);
        }
        for (id, aabb) in items {
            self.update(id, aabb);
        }
    }

    /// Ids whose stored bounds touch `area`.
    pub fn query(&self, area: &Aabb) -> Vec<SpriteId> {
        let mut out = Vec::new();
        self.root.query(area, &mut out);
        out
    }

    pub fn bounds_of(&self, id: SpriteId) -> Option<Aabb> {
        self.entries.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Levels below the root currently in use.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn clear(&mut self) {
        self.root = Node::new(Aabb::new(Vec2::ZERO, Vec2::ZERO), 0);
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: f32, y: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::splat(4.0))
    }

    fn grid() -> Vec<(SpriteId, Aabb)> {
        let mut items = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                let id = SpriteId(i * 10 + j);
                items.push((id, cell(i as f32 * 10.0, j as f32 * 10.0)));
            }
        }
        items
    }

    #[test]
    fn splits_when_crowded() {
        let mut qt = QuadTree::new(QuadTreeConfig::default());
        qt.rebuild(grid());
        assert_eq!(qt.len(), 100);
        assert!(qt.depth() > 0);
    }

    #[test]
    fn query_finds_only_nearby_entries() {
        let mut qt = QuadTree::new(QuadTreeConfig::default());
        qt.rebuild(grid());
        let found = qt.query(&cell(0.0, 0.0));
        assert!(found.contains(&SpriteId(0)));
        assert!(!found.contains(&SpriteId(99)));
        assert!(found.len() < 100);
    }

    #[test]
    fn query_matches_brute_force() {
        let mut qt = QuadTree::new(QuadTreeConfig { max_objects: 2, max_levels: 6 });
        let items = grid();
        qt.rebuild(items.clone());
        let area = Aabb::new(Vec2::new(15.0, 25.0), Vec2::new(42.0, 61.0));

        let mut expected: Vec<_> = items
            .iter()
            .filter(|(_, aabb)| touches(aabb, &area))
            .map(|(id, _)| *id)
            .collect();
        let mut found = qt.query(&area);
        expected.sort();
        found.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn objects_outside_root_are_kept() {
        let mut qt = QuadTree::new(QuadTreeConfig::default());
        qt.rebuild(grid());
        qt.insert(SpriteId(500), cell(-1000.0, -1000.0));
        assert_eq!(qt.query(&cell(-1000.0, -1000.0)), vec![SpriteId(500)]);
    }

    #[test]
    fn update_and_sync_move_entries() {
        let mut qt = QuadTree::new(QuadTreeConfig::default());
        qt.rebuild(grid());
        qt.update(SpriteId(0), cell(90.0, 90.0));
        assert!(!qt.query(&cell(0.0, 0.0)).contains(&SpriteId(0)));
        assert!(qt.query(&cell(90.0, 90.0)).contains(&SpriteId(0)));

        qt.sync(vec![(SpriteId(1), cell(5.0, 5.0))]);
        assert_eq!(qt.len(), 1);
        assert_eq!(qt.bounds_of(SpriteId(1)), Some(cell(5.0, 5.0)));
        assert!(!qt.remove(SpriteId(0)));
    }
}
