//! Uniform-grid broad-phase for colliders.
//!
//! The [`CollisionGrid`] buckets collider keys by the grid cells their world
//! bounds touch. It lives in the scene's `World` as a resource and is driven
//! by the collision systems:
//!
//! - [`register_colliders`](crate::systems::collision::register_colliders)
//!   flushes added, changed, and removed colliders at the start of a frame
//! - [`resolve_movement`](crate::systems::movement::resolve_movement) updates
//!   the mover after each resolved step
//! - [`collision_post_update`](crate::systems::collision::collision_post_update)
//!   re-buckets anything whose owner was moved some other way
//!
//! The grid never owns colliders. For each key it records the world bounds,
//! tags, and cell range of the last (re)bucket, and a key is listed in exactly
//! the cells of that range. Cells are addressed with `floor(edge / cell_size)`
//! on all four edges, inclusive, and are stored sparsely so the grid extends
//! past the initial world bounds when colliders leave them.

use bevy_ecs::prelude::{Entity, Resource};
use glam::IVec2;
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::bounds::Bounds;
use crate::components::collider::{ColliderKey, ColliderSlot, CollisionTags};
use crate::error::CollisionError;

/// Inclusive rectangle of cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: IVec2,
    pub max: IVec2,
}

impl CellRange {
    /// Cells touched by `bounds` on a grid of `cell_size`.
    pub fn covering(bounds: &Bounds, cell_size: f32) -> Self {
        let cell = |v: f32| (v / cell_size).floor() as i32;
        Self {
            min: IVec2::new(cell(bounds.left()), cell(bounds.top())),
            max: IVec2::new(cell(bounds.right()), cell(bounds.bottom())),
        }
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Row-major iteration over every cell in the range.
    pub fn iter(&self) -> impl Iterator<Item = IVec2> + use<> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| IVec2::new(x, y)))
    }

    pub fn len(&self) -> usize {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1).max(0) as usize;
        span(self.min.x, self.max.x).saturating_mul(span(self.min.y, self.max.y))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the grid remembers about an indexed collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub bounds: Bounds,
    pub tags: CollisionTags,
    pub cells: CellRange,
}

/// One result of a grid query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHit {
    pub key: ColliderKey,
    pub bounds: Bounds,
    pub tags: CollisionTags,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridConfig {
    world_bounds: Bounds,
    cell_size: f32,
}

type Bucket = SmallVec<[ColliderKey; 4]>;

/// Spatial index over every active collider of the scene.
#[derive(Resource, Debug, Default)]
pub struct CollisionGrid {
    config: Option<GridConfig>,
    cells: FxHashMap<IVec2, Bucket>,
    entries: FxHashMap<ColliderKey, GridEntry>,
    slots_by_entity: FxHashMap<Entity, SmallVec<[ColliderSlot; 2]>>,
}

impl CollisionGrid {
    /// Reset the grid to cover `world_bounds` with square cells of `cell_size`.
    ///
    /// All previous buckets are dropped; colliders have to be registered again.
    pub fn initialize(&mut self, world_bounds: Bounds, cell_size: f32) -> Result<(), CollisionError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CollisionError::InvalidArgument(format!(
                "cell size must be positive, got {cell_size}"
            )));
        }
        if world_bounds.is_empty() || !world_bounds.width.is_finite() || !world_bounds.height.is_finite() {
            return Err(CollisionError::InvalidArgument(format!(
                "degenerate world bounds {world_bounds:?}"
            )));
        }
        self.cells.clear();
        self.entries.clear();
        self.slots_by_entity.clear();
        self.config = Some(GridConfig {
            world_bounds,
            cell_size,
        });
        info!(
            "Collision grid initialized: {}x{} world, cell size {}",
            world_bounds.width, world_bounds.height, cell_size
        );
        Ok(())
    }

    /// Tile-count form: a `width` x `height` map of `cell_size` tiles at the origin.
    pub fn initialize_tiles(&mut self, width: u32, height: u32, cell_size: f32) -> Result<(), CollisionError> {
        let world = Bounds::try_new(0.0, 0.0, width as f32 * cell_size, height as f32 * cell_size)
            .map_err(|e| CollisionError::InvalidArgument(e.to_string()))?;
        self.initialize(world, cell_size)
    }

    /// Drop every bucket and return to the uninitialized state.
    pub fn teardown(&mut self) {
        self.cells.clear();
        self.entries.clear();
        self.slots_by_entity.clear();
        if self.config.take().is_some() {
            info!("Collision grid torn down");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    pub fn cell_size(&self) -> Option<f32> {
        self.config.map(|c| c.cell_size)
    }

    pub fn world_bounds(&self) -> Option<Bounds> {
        self.config.map(|c| c.world_bounds)
    }

    fn checked_cell_size(&self) -> Result<f32, CollisionError> {
        self.config
            .map(|c| c.cell_size)
            .ok_or(CollisionError::NotInitialized)
    }

    /// Cells that `bounds` would be indexed under.
    pub fn cell_range(&self, bounds: &Bounds) -> Result<CellRange, CollisionError> {
        Ok(CellRange::covering(bounds, self.checked_cell_size()?))
    }

    /// Index a collider. Inserting a key that is already present updates it.
    pub fn insert(&mut self, key: ColliderKey, bounds: Bounds, tags: CollisionTags) -> Result<(), CollisionError> {
        self.update(key, bounds, tags)
    }

    /// Re-bucket a collider after its bounds changed, touching only the cells
    /// it leaves and enters. Unknown keys are inserted.
    pub fn update(&mut self, key: ColliderKey, bounds: Bounds, tags: CollisionTags) -> Result<(), CollisionError> {
        let cells = CellRange::covering(&bounds, self.checked_cell_size()?);
        match self.entries.get_mut(&key) {
            Some(entry) => {
                let old = entry.cells;
                *entry = GridEntry {
                    bounds,
                    tags,
                    cells,
                };
                if old != cells {
                    for cell in old.iter().filter(|c| !cells.contains(*c)) {
                        Self::unlink(&mut self.cells, cell, key);
                    }
                    for cell in cells.iter().filter(|c| !old.contains(*c)) {
                        self.cells.entry(cell).or_default().push(key);
                    }
                }
            }
            None => {
                self.entries.insert(
                    key,
                    GridEntry {
                        bounds,
                        tags,
                        cells,
                    },
                );
                self.slots_by_entity
                    .entry(key.entity)
                    .or_default()
                    .push(key.slot);
                for cell in cells.iter() {
                    self.cells.entry(cell).or_default().push(key);
                }
                debug!("Indexed {:?} in {} cell(s)", key, cells.len());
            }
        }
        Ok(())
    }

    /// Remove a collider from every bucket it is listed in.
    ///
    /// Returns whether the key was indexed; removing an absent key is a no-op.
    pub fn remove(&mut self, key: ColliderKey) -> Result<bool, CollisionError> {
        self.checked_cell_size()?;
        let Some(entry) = self.entries.remove(&key) else {
            return Ok(false);
        };
        for cell in entry.cells.iter() {
            Self::unlink(&mut self.cells, cell, key);
        }
        if let Some(slots) = self.slots_by_entity.get_mut(&key.entity) {
            slots.retain(|s| *s != key.slot);
            if slots.is_empty() {
                self.slots_by_entity.remove(&key.entity);
            }
        }
        debug!("Removed {:?} from the collision grid", key);
        Ok(true)
    }

    /// Remove every collider owned by `entity`. Returns how many were indexed.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<usize, CollisionError> {
        self.checked_cell_size()?;
        let Some(slots) = self.slots_by_entity.remove(&entity) else {
            return Ok(0);
        };
        let mut removed = 0;
        for slot in slots {
            let key = ColliderKey { entity, slot };
            if let Some(entry) = self.entries.remove(&key) {
                for cell in entry.cells.iter() {
                    Self::unlink(&mut self.cells, cell, key);
                }
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove every hitbox slot of `entity`, keeping its body collider.
    pub fn remove_hitboxes(&mut self, entity: Entity) -> Result<usize, CollisionError> {
        let hitboxes: SmallVec<[ColliderSlot; 4]> = self
            .slots_by_entity
            .get(&entity)
            .map(|slots| {
                slots
                    .iter()
                    .copied()
                    .filter(|s| matches!(s, ColliderSlot::Hitbox(_)))
                    .collect()
            })
            .unwrap_or_default();
        let mut removed = 0;
        for slot in hitboxes {
            if self.remove(ColliderKey { entity, slot })? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove the hitbox slots of `entity` numbered `len` and above, for a
    /// collection that now holds only `len` entries. Returns how many were
    /// indexed.
    pub fn truncate_hitboxes(
        &mut self,
        entity: Entity,
        len: usize,
    ) -> Result<usize, CollisionError> {
        self.checked_cell_size()?;
        let stale: SmallVec<[ColliderSlot; 4]> = self
            .slots_by_entity
            .get(&entity)
            .map(|slots| {
                slots
                    .iter()
                    .copied()
                    .filter(|s| matches!(s, ColliderSlot::Hitbox(i) if *i as usize >= len))
                    .collect()
            })
            .unwrap_or_default();
        let mut removed = 0;
        for slot in stale {
            if self.remove(ColliderKey { entity, slot })? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn unlink(cells: &mut FxHashMap<IVec2, Bucket>, cell: IVec2, key: ColliderKey) {
        if let Some(bucket) = cells.get_mut(&cell) {
            bucket.retain(|k| *k != key);
            if bucket.is_empty() {
                cells.remove(&cell);
            }
        }
    }

    /// Broad-phase query: every indexed collider listed in a cell touched by
    /// `region` whose tags intersect `filter`. Each collider is reported once,
    /// in no particular order.
    pub fn query(&self, region: &Bounds, filter: CollisionTags) -> Result<Vec<GridHit>, CollisionError> {
        let range = CellRange::covering(region, self.checked_cell_size()?);
        let mut hits = Vec::new();
        if filter.is_empty() {
            return Ok(hits);
        }
        let mut seen: FxHashSet<ColliderKey> = FxHashSet::default();
        for cell in range.iter() {
            let Some(bucket) = self.cells.get(&cell) else {
                continue;
            };
            for key in bucket {
                if !seen.insert(*key) {
                    continue;
                }
                let Some(entry) = self.entries.get(key) else {
                    continue;
                };
                if entry.tags.intersects(filter) {
                    hits.push(GridHit {
                        key: *key,
                        bounds: entry.bounds,
                        tags: entry.tags,
                    });
                }
            }
        }
        Ok(hits)
    }

    /// [`CollisionGrid::query`] narrowed to colliders whose recorded bounds
    /// actually intersect `region`.
    pub fn overlapping(&self, region: &Bounds, filter: CollisionTags) -> Result<Vec<GridHit>, CollisionError> {
        let mut hits = self.query(region, filter)?;
        hits.retain(|hit| hit.bounds.intersects(region));
        Ok(hits)
    }

    pub fn contains(&self, key: ColliderKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn entry(&self, key: ColliderKey) -> Option<&GridEntry> {
        self.entries.get(&key)
    }

    /// Number of indexed colliders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ColliderKey, &GridEntry)> {
        self.entries.iter()
    }

    /// Keys listed in one cell.
    pub fn cell_contents(&self, cell: IVec2) -> &[ColliderKey] {
        self.cells.get(&cell).map(|b| b.as_slice()).unwrap_or(&[])
    }

    /// Every non-empty cell with its keys.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (IVec2, &[ColliderKey])> {
        self.cells.iter().map(|(cell, bucket)| (*cell, bucket.as_slice()))
    }

    /// Exhaustive scan of the index invariants: every key sits in exactly the
    /// cells covering its recorded bounds, once per cell, and nothing else is
    /// listed anywhere.
    pub fn is_consistent(&self) -> bool {
        let Some(cell_size) = self.cell_size() else {
            return self.cells.is_empty() && self.entries.is_empty();
        };
        let mut listed: FxHashMap<ColliderKey, usize> = FxHashMap::default();
        for (cell, bucket) in &self.cells {
            let mut in_cell: FxHashSet<ColliderKey> = FxHashSet::default();
            for key in bucket {
                if !in_cell.insert(*key) {
                    return false;
                }
                let Some(entry) = self.entries.get(key) else {
                    return false;
                };
                if !entry.cells.contains(*cell) {
                    return false;
                }
                *listed.entry(*key).or_default() += 1;
            }
        }
        self.entries.iter().all(|(key, entry)| {
            entry.cells == CellRange::covering(&entry.bounds, cell_size)
                && listed.get(key).copied().unwrap_or(0) == entry.cells.len()
                && self
                    .slots_by_entity
                    .get(&key.entity)
                    .is_some_and(|slots| slots.contains(&key.slot))
        })
    }
}
