use chipgrid_common::db::core::DesignDB;
use chipgrid_common::db::indices::ComponentId;
use chipgrid_router::OccupancyGrid;

/// Aggregate numbers for a clean, fully-linked layout. The formulas are
/// heuristic constants of the toy circuit; keep them as-is for behavioral
/// compatibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub total_wire: i64,
    pub max_wire: i64,
    pub component_delay: i64,
    pub total_power: i64,
    pub total_price: i64,
    pub clock_mhz: f64,
    pub power_w: f64,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Flags every component whose footprint leaves the die or overlaps another
/// component's footprint. Overlap flags both parties. Returns true iff any
/// component is flagged; a single collision invalidates the whole layout's
/// metrics.
pub fn update_collisions(db: &mut DesignDB, grid: &OccupancyGrid) -> bool {
    let ids = db.live_component_ids();
    for &id in &ids {
        let bounds = db.component(id).bounds();
        let out_of_die = bounds.x < 0
            || bounds.y < 0
            || bounds.right() > grid.width()
            || bounds.bottom() > grid.height();
        db.component_mut(id).collision = out_of_die;
    }
    for i in 0..ids.len() {
        let bounds_i = db.component(ids[i]).bounds();
        for j in (i + 1)..ids.len() {
            if bounds_i.overlaps(&db.component(ids[j]).bounds()) {
                db.component_mut(ids[i]).collision = true;
                db.component_mut(ids[j]).collision = true;
            }
        }
    }
    let any = ids.iter().any(|&id| db.component(id).collision);
    if any {
        log::debug!("collision detected; metrics suppressed this frame");
    }
    any
}

/// Wire totals plus the delay/power/price roll-up. The clock is the timing
/// reference and contributes no delay; power and price sum over every
/// component on the die.
pub fn aggregate_metrics(
    db: &DesignDB,
    control: ComponentId,
    register: ComponentId,
    alus: &[ComponentId],
) -> Metrics {
    let total_wire: i64 = db.iter_links().map(|(_, l)| l.path_len()).sum();
    let max_wire: i64 = db.iter_links().map(|(_, l)| l.path_len()).max().unwrap_or(0);

    let component_delay = db.component(control).kind.delay()
        + db.component(register).kind.delay()
        + alus
            .iter()
            .map(|&a| db.component(a).kind.delay())
            .sum::<i64>();
    let total_power: i64 = db.iter_components().map(|(_, c)| c.kind.power()).sum();
    let total_price: i64 = db.iter_components().map(|(_, c)| c.kind.price()).sum();

    let delay = component_delay as f64 + max_wire as f64 * 0.2;
    let clock_mhz = round1(1000.0 / delay);
    let power_w = round1((total_power as f64 + total_wire as f64 * 0.2) * 0.5);

    log::debug!(
        "totalwire={} maxwire={} cptdelay={} cptpower={} price={}",
        total_wire,
        max_wire,
        component_delay,
        total_power,
        total_price
    );

    Metrics {
        total_wire,
        max_wire,
        component_delay,
        total_power,
        total_price,
        clock_mhz,
        power_w,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(12.35), 12.4);
        assert_eq!(round1(7.0), 7.0);
    }
}
