use crate::canvas::Layout;
use chipgrid_common::geom::Vec2;

/// Post-recompute consistency verification. These are invariants of the
/// engine itself, not user-data conditions; a failure here means a bug.
pub fn run(layout: &Layout) -> Result<(), String> {
    log::info!("Starting layout verification...");
    let mut msgs = Vec::new();

    match check_occupancy(layout) {
        Ok(()) => log::info!("\x1b[32mPASS\x1b[0m: occupancy matches component bounds."),
        Err(e) => {
            log::error!("\x1b[31mFAIL\x1b[0m: {}", e);
            msgs.push(e);
        }
    }
    match check_collision_flags(layout) {
        Ok(()) => log::info!("\x1b[32mPASS\x1b[0m: collision flags are consistent."),
        Err(e) => {
            log::error!("\x1b[31mFAIL\x1b[0m: {}", e);
            msgs.push(e);
        }
    }
    match check_paths(layout) {
        Ok(()) => log::info!("\x1b[32mPASS\x1b[0m: routed paths anchor on their pins."),
        Err(e) => {
            log::error!("\x1b[31mFAIL\x1b[0m: {}", e);
            msgs.push(e);
        }
    }

    if msgs.is_empty() {
        Ok(())
    } else {
        Err(msgs.join("; "))
    }
}

/// Every occupied cell must lie inside its occupant's current bounds.
fn check_occupancy(layout: &Layout) -> Result<(), String> {
    let grid = layout.grid();
    let db = layout.db();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = Vec2::new(x, y);
            if let Some(id) = grid.occupant(cell)
                && !db.component(id).bounds().contains(cell)
            {
                return Err(format!(
                    "cell {:?} claims occupant '{}' whose bounds exclude it",
                    cell,
                    db.component(id).name
                ));
            }
        }
    }
    Ok(())
}

/// Re-derives the per-component flags with an independent pairwise scan and
/// compares. Flagging one side of an overlap without the other is a defect.
fn check_collision_flags(layout: &Layout) -> Result<(), String> {
    let db = layout.db();
    let grid = layout.grid();
    let ids = db.live_component_ids();
    for &id in &ids {
        let comp = db.component(id);
        let bounds = comp.bounds();
        let out_of_die = bounds.x < 0
            || bounds.y < 0
            || bounds.right() > grid.width()
            || bounds.bottom() > grid.height();
        let overlapping = ids
            .iter()
            .any(|&other| other != id && bounds.overlaps(&db.component(other).bounds()));
        let expected = out_of_die || overlapping;
        if comp.collision != expected {
            return Err(format!(
                "component '{}' flag {} but rescan says {}",
                comp.name, comp.collision, expected
            ));
        }
    }
    if layout.has_collision() != ids.iter().any(|&id| db.component(id).collision) {
        return Err("global collision flag disagrees with per-component flags".to_string());
    }
    Ok(())
}

/// Satisfied links must hold a unit-step path running from pin a to pin b.
fn check_paths(layout: &Layout) -> Result<(), String> {
    let db = layout.db();
    for (id, link) in db.iter_links() {
        let Some(path) = &link.path else { continue };
        if path.is_empty() {
            return Err(format!("{:?} satisfied with an empty path", id));
        }
        let a = db.pin_position(link.a);
        let b = db.pin_position(link.b);
        if a != path.first().copied() || b != path.last().copied() {
            return Err(format!(
                "{:?} path endpoints {:?}..{:?} do not match pins {:?}/{:?}",
                id,
                path.first(),
                path.last(),
                a,
                b
            ));
        }
        for pair in path.windows(2) {
            if pair[0].manhattan(pair[1]) != 1 {
                return Err(format!("{:?} path contains a non-unit step", id));
            }
        }
    }
    Ok(())
}
