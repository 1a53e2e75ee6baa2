use crate::canvas::Layout;
use crate::evaluate::Metrics;
use chipgrid_common::geom::{Rect, Vec2};

/// Read-only per-frame view for the rendering collaborator. Everything a
/// frontend needs to draw the board: world-frame footprints, rotation and
/// collision state per component, the routed cell path (or its absence) per
/// wire, and the three display strings.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub components: Vec<ComponentView>,
    pub links: Vec<LinkView>,
    pub clock_display: String,
    pub power_display: String,
    pub price_display: String,
    pub valid: bool,
}

#[derive(Clone, Debug)]
pub struct ComponentView {
    pub name: String,
    pub bounds: Rect,
    pub rotation: u8,
    pub collision: bool,
}

#[derive(Clone, Debug)]
pub struct LinkView {
    pub color: &'static str,
    pub path: Option<Vec<Vec2>>,
}

impl Snapshot {
    pub fn capture(layout: &Layout) -> Self {
        let db = layout.db();
        let components = db
            .iter_components()
            .map(|(_, c)| ComponentView {
                name: c.name.clone(),
                bounds: c.bounds(),
                rotation: c.rot.steps(),
                collision: c.collision,
            })
            .collect();
        let links = db
            .iter_links()
            .map(|(_, l)| LinkView {
                color: l.class.color(),
                path: l.path.clone(),
            })
            .collect();
        let (clock_display, power_display, price_display) = displays(layout.metrics());
        Snapshot {
            components,
            links,
            clock_display,
            power_display,
            price_display,
            valid: layout.metrics().is_some(),
        }
    }
}

fn displays(metrics: Option<&Metrics>) -> (String, String, String) {
    match metrics {
        Some(m) => (
            format!("{:.1}MHz", m.clock_mhz),
            format!("{:.1}W", m.power_w),
            format!("${}", m.total_price),
        ),
        None => (
            "---MHz".to_string(),
            "---W".to_string(),
            "$---".to_string(),
        ),
    }
}
