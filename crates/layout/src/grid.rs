use brickyard_common::Transform;
use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Parameters of the wall that delivered bricks are stacked into.
///
/// Delivery index `i` lands at row `i / bricks_per_row`, column
/// `i % bricks_per_row`. Rows climb +Y, columns run along +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallLayout {
    /// X shared by every brick of the wall.
    pub base_x: f32,
    /// Z of column 0.
    pub start_z: f32,
    /// Y of row 0 (brick centre).
    pub base_y: f32,
    pub bricks_per_row: u32,
    pub row_height: f32,
    pub col_step: f32,
}

impl Default for WallLayout {
    fn default() -> Self {
        // Continues the decorative wall (centre z 1.5, five columns) one step
        // past its last column.
        Self {
            base_x: 8.0,
            start_z: 1.5 + 3.0 * 0.65,
            base_y: 0.15,
            bricks_per_row: 3,
            row_height: 0.32,
            col_step: 0.65,
        }
    }
}

impl WallLayout {
    /// `(row, column)` of a zero-based delivery index.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        let per_row = self.bricks_per_row.max(1);
        (index / per_row, index % per_row)
    }

    /// Resting position of the brick with the given delivery index.
    pub fn position(&self, index: u32) -> Vec3 {
        let (row, col) = self.cell(index);
        Vec3::new(
            self.base_x,
            self.base_y + row as f32 * self.row_height,
            self.start_z + col as f32 * self.col_step,
        )
    }

    /// Resting transform: [`WallLayout::position`] turned a quarter so the
    /// brick's long side runs along the wall.
    pub fn transform(&self, index: u32) -> Transform {
        Transform::from_position(self.position(index)).with_yaw(std::f32::consts::FRAC_PI_2)
    }
}

/// A regular 3D lattice of positions, used for decorative brick stacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Position of cell (0, 0, 0).
    pub origin: Vec3,
    /// Cells along X, Y, Z.
    pub counts: UVec3,
    /// Spacing along X, Y, Z.
    pub step: Vec3,
}

impl GridLayout {
    /// Largest lattice a scene may ask for.
    pub const MAX_CELLS: usize = 4096;

    pub fn new(origin: Vec3, counts: UVec3, step: Vec3) -> Self {
        Self {
            origin,
            counts,
            step,
        }
    }

    /// Number of cells, or `None` when the product overflows.
    pub fn cell_count(&self) -> Option<usize> {
        (self.counts.x as usize)
            .checked_mul(self.counts.y as usize)?
            .checked_mul(self.counts.z as usize)
    }

    /// Saturating cell count.
    pub fn len(&self) -> usize {
        self.cell_count().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cell positions, Z outermost then Y then X.
    pub fn positions(&self) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.len().min(Self::MAX_CELLS));
        for z in 0..self.counts.z {
            for y in 0..self.counts.y {
                for x in 0..self.counts.x {
                    let cell = Vec3::new(x as f32, y as f32, z as f32);
                    out.push(self.origin + cell * self.step);
                }
            }
        }
        out
    }
}

/// Offsets of `count` items spaced `spacing` apart and centred on zero.
pub fn batch_offsets(count: u32, spacing: f32) -> Vec<f32> {
    let mid = (count as f32 - 1.0) / 2.0;
    (0..count).map(|i| (i as f32 - mid) * spacing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn wall_cells_wrap_per_row() {
        let wall = WallLayout::default();
        assert_eq!(wall.cell(0), (0, 0));
        assert_eq!(wall.cell(2), (0, 2));
        assert_eq!(wall.cell(3), (1, 0));
        assert_eq!(wall.cell(8), (2, 2));
    }

    #[test]
    fn wall_positions_follow_steps() {
        let wall = WallLayout::default();
        assert!(approx(wall.position(0), Vec3::new(8.0, 0.15, 3.45)));
        assert!(approx(wall.position(4), Vec3::new(8.0, 0.47, 4.1)));
        assert!(approx(wall.position(8), Vec3::new(8.0, 0.79, 4.75)));
    }

    #[test]
    fn wall_is_deterministic() {
        let wall = WallLayout::default();
        assert_eq!(wall.transform(5), wall.transform(5));
    }

    #[test]
    fn zero_bricks_per_row_does_not_divide_by_zero() {
        let wall = WallLayout {
            bricks_per_row: 0,
            ..WallLayout::default()
        };
        assert_eq!(wall.cell(4), (4, 0));
    }

    #[test]
    fn grid_layout_enumerates_every_cell() {
        let grid = GridLayout::new(
            Vec3::new(-8.7, 0.15, 0.5),
            UVec3::new(3, 2, 6),
            Vec3::new(0.7, 0.32, 0.35),
        );
        let positions = grid.positions();
        assert_eq!(positions.len(), 36);
        assert_eq!(grid.len(), 36);
        assert!(approx(positions[0], Vec3::new(-8.7, 0.15, 0.5)));
        assert!(approx(positions[1], Vec3::new(-8.0, 0.15, 0.5)));
        assert!(approx(positions[3], Vec3::new(-8.7, 0.47, 0.5)));
        assert!(approx(positions[35], Vec3::new(-7.3, 0.47, 2.25)));
    }

    #[test]
    fn huge_counts_do_not_wrap() {
        let grid = GridLayout::new(Vec3::ZERO, UVec3::new(70_000, 70_000, 1), Vec3::ONE);
        assert_eq!(grid.cell_count(), Some(4_900_000_000));
        assert!(grid.len() > GridLayout::MAX_CELLS);
        assert!(!grid.is_empty());

        let max = GridLayout::new(Vec3::ZERO, UVec3::splat(u32::MAX), Vec3::ONE);
        assert_eq!(max.cell_count(), None);
        assert_eq!(max.len(), usize::MAX);
    }

    #[test]
    fn batch_offsets_are_centred() {
        let offsets = batch_offsets(3, 0.7);
        assert_eq!(offsets.len(), 3);
        assert!((offsets[0] + 0.7).abs() < 1e-6);
        assert!(offsets[1].abs() < 1e-6);
        assert!((offsets[2] - 0.7).abs() < 1e-6);
        assert!(batch_offsets(0, 1.0).is_empty());
    }
}
