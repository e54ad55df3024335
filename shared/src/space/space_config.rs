use super::SpaceError;

/// Contains Config properties for a [`HashSpace`](super::HashSpace)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpaceConfig {
    /// Edge length of the coarsest grid cells. Elements whose bounds are
    /// larger than this are kept in a separate list that every query scans.
    pub cell_size: f32,
    /// Number of grid levels. Each level halves the cell size of the one
    /// above it, so small elements land in small cells.
    pub levels: u8,
}

impl SpaceConfig {
    pub fn new(cell_size: f32, levels: u8) -> Self {
        Self { cell_size, levels }
    }

    pub(crate) fn validate(&self) -> Result<(), SpaceError> {
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(SpaceError::InvalidConfig {
                reason: "cell_size must be positive and finite",
            });
        }
        if self.levels == 0 || self.levels > 16 {
            return Err(SpaceError::InvalidConfig {
                reason: "levels must be between 1 and 16",
            });
        }
        Ok(())
    }

    /// Cell edge length at the given level (0 is the coarsest)
    pub fn level_cell_size(&self, level: u8) -> f32 {
        self.cell_size / (1u32 << level) as f32
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            levels: 6,
        }
    }
}
