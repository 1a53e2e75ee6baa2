use crate::grid::OccupancyGrid;
use chipgrid_common::geom::{Dir, Vec2};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Shortest-path search over the occupancy grid: best-first on
/// `g + Manhattan(goal)`, 4-connected unit-cost moves. The goal cell is
/// traversable even when occupied, since attachment points sit on a
/// component's own boundary.
///
/// Scratch state (best cost, arrival direction, visited tag) lives here, not
/// on the grid, and is recycled across calls with the tag trick so a search
/// never observes a previous search's values.
pub struct PathFinder {
    best_cost: Vec<i32>,
    arrival: Vec<Dir>,
    visited_tag: Vec<u32>,
    current_tag: u32,
    frontier: PriorityQueue<u32, Reverse<(i32, i32)>>,
}

impl PathFinder {
    pub fn new() -> Self {
        Self {
            best_cost: Vec::new(),
            arrival: Vec::new(),
            visited_tag: Vec::new(),
            current_tag: 0,
            frontier: PriorityQueue::new(),
        }
    }

    fn begin_search(&mut self, cells: usize) {
        if self.best_cost.len() < cells {
            self.best_cost.resize(cells, 0);
            self.arrival.resize(cells, Dir::Left);
            self.visited_tag.resize(cells, 0);
        }
        self.current_tag = self.current_tag.wrapping_add(1);
        if self.current_tag == 0 {
            self.visited_tag.fill(0);
            self.current_tag = 1;
        }
        self.frontier.clear();
    }

    /// Returns the shortest route from `start` to `goal` inclusive, ordered
    /// start to goal, or None when no route exists. Out-of-bounds endpoints
    /// are a normal no-path outcome, not an error. `start == goal` yields a
    /// single-cell path.
    pub fn find_path(
        &mut self,
        grid: &OccupancyGrid,
        start: Vec2,
        goal: Vec2,
    ) -> Option<Vec<Vec2>> {
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return None;
        }
        self.begin_search(grid.len());

        let start_idx = grid.index(start);
        self.best_cost[start_idx] = 0;
        self.visited_tag[start_idx] = self.current_tag;
        self.frontier
            .push(start_idx as u32, Reverse((start.manhattan(goal), 0)));

        while let Some((idx, _)) = self.frontier.pop() {
            let pos = grid.coord(idx as usize);
            if pos == goal {
                return Some(self.reconstruct(grid, start, goal));
            }
            let cost = self.best_cost[idx as usize] + 1;
            for dir in Dir::ALL {
                let next = pos + dir.offset();
                if !grid.in_bounds(next) {
                    continue;
                }
                if grid.occupant(next).is_some() && next != goal {
                    continue;
                }
                let next_idx = grid.index(next);
                if self.visited_tag[next_idx] != self.current_tag
                    || cost < self.best_cost[next_idx]
                {
                    self.visited_tag[next_idx] = self.current_tag;
                    self.best_cost[next_idx] = cost;
                    self.arrival[next_idx] = dir;
                    // keyed push relaxes an already-queued cell in place
                    self.frontier
                        .push(next_idx as u32, Reverse((cost + next.manhattan(goal), cost)));
                }
            }
        }
        None
    }

    fn reconstruct(&self, grid: &OccupancyGrid, start: Vec2, goal: Vec2) -> Vec<Vec2> {
        let mut path = vec![goal];
        let mut pos = goal;
        while pos != start {
            let dir = self.arrival[grid.index(pos)];
            pos = pos - dir.offset();
            path.push(pos);
        }
        path.reverse();
        path
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipgrid_common::db::indices::ComponentId;
    use chipgrid_common::geom::Rect;

    fn empty_grid() -> OccupancyGrid {
        OccupancyGrid::new(10, 10)
    }

    #[test]
    fn straight_line_is_manhattan_shortest() {
        let grid = empty_grid();
        let mut finder = PathFinder::new();
        let path = finder
            .find_path(&grid, Vec2::new(1, 1), Vec2::new(6, 4))
            .unwrap();
        // cell count = manhattan steps + 1
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], Vec2::new(1, 1));
        assert_eq!(*path.last().unwrap(), Vec2::new(6, 4));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn start_equals_goal_yields_single_cell() {
        let grid = empty_grid();
        let mut finder = PathFinder::new();
        let path = finder
            .find_path(&grid, Vec2::new(3, 3), Vec2::new(3, 3))
            .unwrap();
        assert_eq!(path, vec![Vec2::new(3, 3)]);
    }

    #[test]
    fn out_of_bounds_endpoints_are_no_path() {
        let grid = empty_grid();
        let mut finder = PathFinder::new();
        assert!(finder
            .find_path(&grid, Vec2::new(-1, 0), Vec2::new(3, 3))
            .is_none());
        assert!(finder
            .find_path(&grid, Vec2::new(3, 3), Vec2::new(10, 0))
            .is_none());
    }

    #[test]
    fn detours_around_an_obstacle_wall() {
        let mut grid = empty_grid();
        // vertical wall at x=5, one gap at y=9
        grid.occupy_rect(Rect::new(5, 0, 1, 9), ComponentId::new(0));
        let mut finder = PathFinder::new();
        let path = finder
            .find_path(&grid, Vec2::new(2, 2), Vec2::new(8, 2))
            .unwrap();
        assert_eq!(path[0], Vec2::new(2, 2));
        assert_eq!(*path.last().unwrap(), Vec2::new(8, 2));
        // down to the gap and back up: 6 across + 2*7 vertical, inclusive
        assert_eq!(path.len(), 21);
        assert!(path.iter().all(|&p| p.x != 5 || p.y == 9));
    }

    #[test]
    fn fully_walled_goal_is_unreachable() {
        let mut grid = empty_grid();
        grid.occupy_rect(Rect::new(5, 0, 1, 10), ComponentId::new(0));
        let mut finder = PathFinder::new();
        assert!(finder
            .find_path(&grid, Vec2::new(2, 2), Vec2::new(8, 2))
            .is_none());
    }

    #[test]
    fn occupied_goal_cell_is_traversable() {
        let mut grid = empty_grid();
        grid.occupy_rect(Rect::new(4, 4, 3, 3), ComponentId::new(0));
        let mut finder = PathFinder::new();
        // goal on the obstacle's boundary cell
        let path = finder
            .find_path(&grid, Vec2::new(0, 4), Vec2::new(4, 4))
            .unwrap();
        assert_eq!(*path.last().unwrap(), Vec2::new(4, 4));
        assert_eq!(path.len(), 5);
        // but a goal buried in the interior stays unreachable
        assert!(finder
            .find_path(&grid, Vec2::new(0, 4), Vec2::new(5, 5))
            .is_none());
    }

    #[test]
    fn scratch_state_does_not_leak_between_searches() {
        let mut grid = empty_grid();
        let mut finder = PathFinder::new();
        let first = finder
            .find_path(&grid, Vec2::new(0, 0), Vec2::new(9, 9))
            .unwrap();
        grid.occupy_rect(Rect::new(0, 5, 10, 1), ComponentId::new(0));
        assert!(finder
            .find_path(&grid, Vec2::new(0, 0), Vec2::new(9, 9))
            .is_none());
        grid.clear();
        let third = finder
            .find_path(&grid, Vec2::new(0, 0), Vec2::new(9, 9))
            .unwrap();
        assert_eq!(first.len(), third.len());
    }
}
