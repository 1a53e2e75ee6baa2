pub mod algo;
pub mod grid;

pub use algo::astar::PathFinder;
pub use grid::OccupancyGrid;

use chipgrid_common::db::core::DesignDB;

/// Recomputes the path of every live link against the current occupancy.
/// A link with an unresolvable endpoint (pin without an offset) stays
/// unrouted. Returns true iff every link ended up satisfied; individual
/// failures never abort the rest of the pass.
pub fn route_links(db: &mut DesignDB, grid: &OccupancyGrid, finder: &mut PathFinder) -> bool {
    let mut all_linked = true;
    for id in db.live_link_ids() {
        let (a, b) = {
            let link = db.link(id);
            (link.a, link.b)
        };
        let path = match (db.pin_position(a), db.pin_position(b)) {
            (Some(from), Some(to)) => finder.find_path(grid, from, to),
            _ => None,
        };
        if path.is_none() {
            log::debug!("{:?} unrouted under current occupancy", id);
            all_linked = false;
        }
        db.link_mut(id).path = path;
    }
    all_linked
}
