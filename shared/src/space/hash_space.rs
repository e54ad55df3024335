use std::collections::{HashMap, HashSet};

use log::warn;

use crate::geom::{Rect, Shape};

use super::{SpaceConfig, SpaceError};

/// Identifies an element within a single [`HashSpace`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(u64);

impl ElementKey {
    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellCoord {
    level: u8,
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    Cells {
        level: u8,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    },
    Oversized,
}

/// A shape stored in a [`HashSpace`], along with the value that identifies its owner
pub struct SpaceElement<T> {
    shape: Shape,
    bounds: Rect,
    user: T,
    placement: Placement,
}

impl<T> SpaceElement<T> {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn user(&self) -> &T {
        &self.user
    }
}

/// A multi-level hashed grid over 2D shapes.
///
/// Each element is bucketed at the finest level whose cells are at least as
/// large as the element's bounds, so it never covers more than 2x2 cells.
/// Insertion, removal & movement cost is proportional to that footprint.
/// Queries walk the cells covered by the query at each populated level, or
/// fall back to a linear scan when that would touch more cells than there
/// are elements.
pub struct HashSpace<T: Copy> {
    config: SpaceConfig,
    next_key: u64,
    elements: HashMap<ElementKey, SpaceElement<T>>,
    cells: HashMap<CellCoord, Vec<ElementKey>>,
    level_counts: Vec<usize>,
    oversized: Vec<ElementKey>,
}

impl<T: Copy> HashSpace<T> {
    pub fn new(config: SpaceConfig) -> Result<Self, SpaceError> {
        config.validate()?;
        Ok(Self {
            config,
            next_key: 0,
            elements: HashMap::new(),
            cells: HashMap::new(),
            level_counts: vec![0; config.levels as usize],
            oversized: Vec::new(),
        })
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, key: &ElementKey) -> Option<&SpaceElement<T>> {
        self.elements.get(key)
    }

    /// Adds a shape to the space, returning the key used to move or remove it
    pub fn insert(&mut self, shape: Shape, user: T) -> ElementKey {
        self.next_key += 1;
        let key = ElementKey(self.next_key);

        let bounds = shape.bounds();
        let placement = self.placement(&bounds);
        self.link(key, placement);

        self.elements.insert(
            key,
            SpaceElement {
                shape,
                bounds,
                user,
                placement,
            },
        );

        key
    }

    /// Removes an element from the space, returning its user value
    pub fn remove(&mut self, key: &ElementKey) -> Result<T, SpaceError> {
        let Some(element) = self.elements.remove(key) else {
            return Err(SpaceError::ElementNotFound { key: *key });
        };
        self.unlink(*key, element.placement);
        Ok(element.user)
    }

    /// Replaces the shape of an element, re-bucketing it only if the cells it
    /// covers have changed
    pub fn update(&mut self, key: &ElementKey, shape: Shape) -> Result<(), SpaceError> {
        let bounds = shape.bounds();
        let placement = self.placement(&bounds);

        let Some(element) = self.elements.get_mut(key) else {
            return Err(SpaceError::ElementNotFound { key: *key });
        };
        let old_placement = element.placement;
        element.shape = shape;
        element.bounds = bounds;
        element.placement = placement;

        if old_placement != placement {
            self.unlink(*key, old_placement);
            self.link(*key, placement);
        }
        Ok(())
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.elements.clear();
        self.cells.clear();
        self.oversized.clear();
        self.level_counts.iter_mut().for_each(|count| *count = 0);
    }

    /// Appends the user values of all elements whose bounds intersect `rect`.
    /// Each element is reported at most once.
    pub fn query_bounds(&self, rect: &Rect, results: &mut Vec<T>) {
        self.visit(rect, |element| {
            results.push(element.user);
        });
    }

    /// Appends the user values of all elements whose shapes intersect `shape`.
    /// Each element is reported at most once.
    pub fn query_intersecting(&self, shape: &Shape, results: &mut Vec<T>) {
        let bounds = shape.bounds();
        self.visit(&bounds, |element| {
            if element.shape.intersects(shape) {
                results.push(element.user);
            }
        });
    }

    fn visit<F: FnMut(&SpaceElement<T>)>(&self, rect: &Rect, mut visitor: F) {
        let mut seen: HashSet<ElementKey> = HashSet::new();
        let mut accept = |key: &ElementKey, seen: &mut HashSet<ElementKey>| {
            let Some(element) = self.elements.get(key) else {
                warn!("HashSpace: cell references missing element {:?}", key);
                return;
            };
            if element.bounds.intersects(rect) && seen.insert(*key) {
                visitor(element);
            }
        };

        for key in &self.oversized {
            accept(key, &mut seen);
        }

        let mut scan_levels = Vec::new();
        for level in 0..self.config.levels {
            let count = self.level_counts[level as usize];
            if count == 0 {
                continue;
            }
            let (min_x, min_y, max_x, max_y) = self.cell_range(rect, level);
            let walk_cells = cell_span(min_x, max_x)
                .checked_mul(cell_span(min_y, max_y))
                .is_some_and(|cells| cells <= count as u64);
            if !walk_cells {
                scan_levels.push(level);
                continue;
            }
            for x in min_x..=max_x {
                for y in min_y..=max_y {
                    if let Some(keys) = self.cells.get(&CellCoord { level, x, y }) {
                        for key in keys {
                            accept(key, &mut seen);
                        }
                    }
                }
            }
        }

        if !scan_levels.is_empty() {
            for (key, element) in &self.elements {
                if let Placement::Cells { level, .. } = element.placement {
                    if scan_levels.contains(&level) {
                        accept(key, &mut seen);
                    }
                }
            }
        }
    }

    fn placement(&self, bounds: &Rect) -> Placement {
        let size = bounds.longest_edge();
        if !size.is_finite() || size > self.config.cell_size {
            return Placement::Oversized;
        }
        let mut level = self.config.levels - 1;
        while level > 0 && size > self.config.level_cell_size(level) {
            level -= 1;
        }
        let (min_x, min_y, max_x, max_y) = self.cell_range(bounds, level);
        Placement::Cells {
            level,
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn cell_range(&self, rect: &Rect, level: u8) -> (i32, i32, i32, i32) {
        let size = self.config.level_cell_size(level);
        (
            (rect.min.x / size).floor() as i32,
            (rect.min.y / size).floor() as i32,
            (rect.max.x / size).floor() as i32,
            (rect.max.y / size).floor() as i32,
        )
    }

    fn link(&mut self, key: ElementKey, placement: Placement) {
        match placement {
            Placement::Oversized => self.oversized.push(key),
            Placement::Cells {
                level,
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                for x in min_x..=max_x {
                    for y in min_y..=max_y {
                        self.cells
                            .entry(CellCoord { level, x, y })
                            .or_default()
                            .push(key);
                    }
                }
                self.level_counts[level as usize] += 1;
            }
        }
    }

    fn unlink(&mut self, key: ElementKey, placement: Placement) {
        match placement {
            Placement::Oversized => {
                if let Some(index) = self.oversized.iter().position(|other| *other == key) {
                    self.oversized.swap_remove(index);
                } else {
                    warn!("HashSpace: oversized element {:?} missing from list", key);
                }
            }
            Placement::Cells {
                level,
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                for x in min_x..=max_x {
                    for y in min_y..=max_y {
                        let coord = CellCoord { level, x, y };
                        let Some(keys) = self.cells.get_mut(&coord) else {
                            warn!("HashSpace: element {:?} missing cell {:?}", key, coord);
                            continue;
                        };
                        if let Some(index) = keys.iter().position(|other| *other == key) {
                            keys.swap_remove(index);
                        }
                        if keys.is_empty() {
                            self.cells.remove(&coord);
                        }
                    }
                }
                self.level_counts[level as usize] -= 1;
            }
        }
    }

    #[cfg(test)]
    fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

// Number of cells covered by `min..=max`.
fn cell_span(min: i32, max: i32) -> u64 {
    (i64::from(max) - i64::from(min) + 1).max(0) as u64
}
