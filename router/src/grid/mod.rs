use chipgrid_common::db::core::DesignDB;
use chipgrid_common::db::indices::ComponentId;
use chipgrid_common::geom::{Rect, Vec2};

/// Fixed-size cell grid tracking which component currently covers each cell.
/// Rebuilt from scratch on every layout change; stale occupancy must never
/// be read across a rebuild boundary.
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    cells: Vec<Option<ComponentId>>,
}

impl OccupancyGrid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline(always)]
    pub fn index(&self, p: Vec2) -> usize {
        (p.y * self.width + p.x) as usize
    }

    #[inline(always)]
    pub fn coord(&self, index: usize) -> Vec2 {
        Vec2::new(index as i32 % self.width, index as i32 / self.width)
    }

    pub fn occupant(&self, p: Vec2) -> Option<ComponentId> {
        assert!(self.in_bounds(p), "cell {:?} outside {}x{} grid", p, self.width, self.height);
        self.cells[self.index(p)]
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Writes `id` into every cell of `rect` that lies on the grid. Cells
    /// hanging off the edge are skipped; overhang is the collision check's
    /// business, not an error here. Last writer wins on overlap.
    pub fn occupy_rect(&mut self, rect: Rect, id: ComponentId) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = self.index(Vec2::new(x, y));
                self.cells[idx] = Some(id);
            }
        }
    }

    pub fn rebuild_occupancy(&mut self, db: &DesignDB) {
        self.clear();
        for (id, comp) in db.iter_components() {
            self.occupy_rect(comp.bounds(), id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_clips_to_grid() {
        let mut grid = OccupancyGrid::new(10, 10);
        let id = ComponentId::new(0);
        grid.occupy_rect(Rect::new(-2, -2, 5, 5), id);
        assert_eq!(grid.occupant(Vec2::new(0, 0)), Some(id));
        assert_eq!(grid.occupant(Vec2::new(2, 2)), Some(id));
        assert_eq!(grid.occupant(Vec2::new(3, 3)), None);
    }

    #[test]
    fn last_writer_wins() {
        let mut grid = OccupancyGrid::new(10, 10);
        let a = ComponentId::new(0);
        let b = ComponentId::new(1);
        grid.occupy_rect(Rect::new(1, 1, 3, 3), a);
        grid.occupy_rect(Rect::new(2, 2, 3, 3), b);
        assert_eq!(grid.occupant(Vec2::new(1, 1)), Some(a));
        assert_eq!(grid.occupant(Vec2::new(2, 2)), Some(b));
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut grid = OccupancyGrid::new(4, 4);
        grid.occupy_rect(Rect::new(0, 0, 4, 4), ComponentId::new(7));
        grid.clear();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.occupant(Vec2::new(x, y)), None);
            }
        }
    }
}
