use super::Cell;
use crate::piece::Vec2;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// Screen placement of the grid: equally sized tiles separated by `spacing`, filling `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    bounds: Rect,
    columns: usize,
    rows: usize,
    spacing: f32,
    tile: Vec2,
}

impl GridLayout {
    pub fn new(bounds: Rect, columns: usize, rows: usize, spacing: f32) -> Self {
        let tile = Vec2::new(
            (bounds.width - spacing * columns.saturating_sub(1) as f32) / columns.max(1) as f32,
            (bounds.height - spacing * rows.saturating_sub(1) as f32) / rows.max(1) as f32,
        );

        Self {
            bounds,
            columns,
            rows,
            spacing,
            tile,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile
    }

    /// Distance between the origins of two neighbouring tiles.
    pub fn step(&self) -> Vec2 {
        Vec2::new(self.tile.x + self.spacing, self.tile.y + self.spacing)
    }

    /// Top-left corner of the tile at `cell`.
    pub fn cell_position(&self, cell: Cell) -> Vec2 {
        let step = self.step();
        self.bounds.origin() + Vec2::new(step.x * cell.column as f32, step.y * cell.row as f32)
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let Vec2 { x, y } = self.cell_position(cell);
        Rect::new(x, y, self.tile.x, self.tile.y)
    }

    /// Where new pieces for `column` appear: one tile and one gap above the top row.
    pub fn insert_position(&self, column: usize) -> Vec2 {
        self.cell_position(Cell::new(column, 0)) - Vec2::new(0.0, self.step().y)
    }

    /// The tile under `point`. Points in the gaps between tiles or outside the board hit nothing.
    pub fn cell_at(&self, point: Vec2) -> Option<Cell> {
        let relative = point - self.bounds.origin();
        if relative.x < 0.0 || relative.y < 0.0 {
            return None;
        }

        let step = self.step();
        let cell = Cell::new(
            (relative.x / step.x) as usize,
            (relative.y / step.y) as usize,
        );

        let inside = cell.column < self.columns && cell.row < self.rows;
        (inside && self.cell_rect(cell).contains(point)).then_some(cell)
    }
}
