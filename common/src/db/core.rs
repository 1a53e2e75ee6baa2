use crate::db::indices::{ComponentId, LinkId, PinId};
use crate::geom::{Rect, Rotation, Vec2};
use std::collections::HashMap;

/// What a placed block is, together with the sizing parameters its shape and
/// attributes are derived from. Delay/power/price are functions of these
/// parameters only, never of where the block sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    Clock,
    Control { nregs: i32, nalus: i32 },
    Register { datawidth: i32, nregs: i32 },
    Alu { datawidth: i32 },
    Blockage { hsize: i32, vsize: i32 },
}

impl ComponentKind {
    /// Half-extents along/across before rotation. The covered footprint is
    /// `2h+1 x 2v+1` cells, centered on the component.
    pub fn half_extents(&self) -> (i32, i32) {
        match *self {
            ComponentKind::Clock => (3, 2),
            ComponentKind::Control { nregs, nalus } => (nregs * 3 + 10, nalus * 3 + 2),
            ComponentKind::Register { datawidth, nregs } => (datawidth + 4, nregs * 2 + 1),
            ComponentKind::Alu { datawidth } => (datawidth * 2 + 2, datawidth + 2),
            ComponentKind::Blockage { hsize, vsize } => (hsize, vsize),
        }
    }

    pub fn delay(&self) -> i64 {
        match *self {
            ComponentKind::Control { nregs, .. } => (nregs + 5) as i64,
            ComponentKind::Register { datawidth, nregs } => (nregs * 2 + datawidth) as i64,
            ComponentKind::Alu { datawidth } => (datawidth * 2) as i64,
            ComponentKind::Clock | ComponentKind::Blockage { .. } => 0,
        }
    }

    pub fn power(&self) -> i64 {
        match *self {
            ComponentKind::Control { nalus, .. } => (nalus * 5) as i64,
            ComponentKind::Register { datawidth, nregs } => (nregs * datawidth + 10) as i64,
            ComponentKind::Alu { datawidth } => (datawidth * 2) as i64,
            ComponentKind::Clock | ComponentKind::Blockage { .. } => 0,
        }
    }

    pub fn price(&self) -> i64 {
        match *self {
            ComponentKind::Control { nregs, nalus } => (nregs * nalus + 10) as i64,
            ComponentKind::Register { datawidth, nregs } => (nregs * datawidth + 10) as i64,
            ComponentKind::Alu { datawidth } => (datawidth * 10 + 10) as i64,
            ComponentKind::Clock | ComponentKind::Blockage { .. } => 0,
        }
    }
}

/// Display class of a wire; the rendering collaborator maps it to a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetClass {
    ClockTree,
    Control,
    Operand,
    Result,
}

impl NetClass {
    pub fn color(self) -> &'static str {
        match self {
            NetClass::ClockTree => "#f0f",
            NetClass::Control => "#a00",
            NetClass::Operand => "#0f0",
            NetClass::Result => "#0cc",
        }
    }
}

/// Attachment point on a component, in the component's unrotated frame.
/// A pin with no offset has no grid position and can never be routed.
#[derive(Clone, Debug)]
pub struct PinData {
    pub name: String,
    pub owner: ComponentId,
    pub offset: Option<Vec2>,
}

/// Wire between two pins. `path` holds the most recent routing result;
/// `None` means unrouted this frame.
#[derive(Clone, Debug)]
pub struct LinkData {
    pub a: PinId,
    pub b: PinId,
    pub class: NetClass,
    pub path: Option<Vec<Vec2>>,
}

impl LinkData {
    pub fn is_satisfied(&self) -> bool {
        self.path.is_some()
    }

    pub fn path_len(&self) -> i64 {
        self.path.as_ref().map_or(0, |p| p.len() as i64)
    }
}

#[derive(Clone, Debug)]
pub struct ComponentData {
    pub name: String,
    pub kind: ComponentKind,
    pub center: Vec2,
    pub rot: Rotation,
    pub hsize: i32,
    pub vsize: i32,
    pub pins: Vec<PinId>,
    pub collision: bool,
}

impl ComponentData {
    /// World-frame footprint, with half-extents swapped on odd rotations.
    pub fn bounds(&self) -> Rect {
        let (h, v) = if self.rot.swaps_axes() {
            (self.vsize, self.hsize)
        } else {
            (self.hsize, self.vsize)
        };
        Rect::new(self.center.x - h, self.center.y - v, h * 2 + 1, v * 2 + 1)
    }
}

/// Arena of components, pins and links addressed by stable integer ids.
/// Slots are freed on removal and never reused; touching a freed slot is a
/// caller contract breach and panics.
pub struct DesignDB {
    components: Vec<Option<ComponentData>>,
    pins: Vec<Option<PinData>>,
    links: Vec<Option<LinkData>>,
    name_map: HashMap<String, ComponentId>,
}

impl DesignDB {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            pins: Vec::new(),
            links: Vec::new(),
            name_map: HashMap::new(),
        }
    }

    pub fn add_component(&mut self, name: &str, kind: ComponentKind, center: Vec2) -> ComponentId {
        assert!(
            !self.name_map.contains_key(name),
            "component name '{}' already in use",
            name
        );
        let id = ComponentId::new(self.components.len());
        self.components.push(Some(ComponentData {
            name: name.to_string(),
            kind,
            center,
            rot: Rotation::default(),
            hsize: 0,
            vsize: 0,
            pins: Vec::new(),
            collision: false,
        }));
        self.name_map.insert(name.to_string(), id);

        let pin_names: &[&str] = match self.component(id).kind {
            ComponentKind::Clock => &["clock_out"],
            ComponentKind::Control { .. } => &["clock_in", "ctrl_reg"],
            ComponentKind::Register { .. } => &["ctrl_in", "reg_in", "reg_out"],
            ComponentKind::Alu { .. } => &["ctrl_in", "reg1_in", "reg2_in", "alu_out"],
            ComponentKind::Blockage { .. } => &[],
        };
        for pin_name in pin_names {
            self.add_pin(id, pin_name);
        }
        self.refresh_geometry(id);
        log::debug!("added component '{}' as {:?}", name, id);
        id
    }

    /// Frees the component and every pin it owns. Links touching those pins
    /// must already be gone.
    pub fn remove_component(&mut self, id: ComponentId) {
        let comp = self.components[id.index()]
            .take()
            .unwrap_or_else(|| panic!("{:?} is not live", id));
        for pin in &comp.pins {
            assert!(
                self.links_touching(*pin).is_empty(),
                "removing {:?} while a link still uses pin {:?}",
                id,
                pin
            );
            self.pins[pin.index()] = None;
        }
        self.name_map.remove(&comp.name);
        log::debug!("removed component '{}' ({:?})", comp.name, id);
    }

    pub fn add_pin(&mut self, owner: ComponentId, name: &str) -> PinId {
        let pin = PinId::new(self.pins.len());
        self.pins.push(Some(PinData {
            name: name.to_string(),
            owner,
            offset: None,
        }));
        self.component_mut(owner).pins.push(pin);
        pin
    }

    pub fn add_link(&mut self, a: PinId, b: PinId, class: NetClass) -> LinkId {
        let id = LinkId::new(self.links.len());
        self.links.push(Some(LinkData {
            a,
            b,
            class,
            path: None,
        }));
        id
    }

    pub fn remove_link(&mut self, id: LinkId) {
        let slot = &mut self.links[id.index()];
        assert!(slot.is_some(), "{:?} is not live", id);
        *slot = None;
    }

    /// Detaches and frees every link ending on one of the given pins.
    /// Returns how many links were removed.
    pub fn remove_links_touching(&mut self, pins: &[PinId]) -> usize {
        let mut removed = 0;
        for slot in &mut self.links {
            if let Some(link) = slot
                && (pins.contains(&link.a) || pins.contains(&link.b))
            {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    pub fn links_touching(&self, pin: PinId) -> Vec<LinkId> {
        self.iter_links()
            .filter(|(_, l)| l.a == pin || l.b == pin)
            .map(|(id, _)| id)
            .collect()
    }

    /// Re-derives half-extents and pin offsets from the component's kind.
    /// Must run after any sizing parameter changes.
    pub fn refresh_geometry(&mut self, id: ComponentId) {
        let comp = self.component(id);
        let (h, v) = comp.kind.half_extents();
        let offsets: Vec<(PinId, Vec2)> = match comp.kind {
            ComponentKind::Clock => vec![(comp.pins[0], Vec2::new(0, v))],
            ComponentKind::Control { nalus, .. } => {
                let mut out = vec![
                    (comp.pins[0], Vec2::new(-h, 0)),
                    (comp.pins[1], Vec2::new(-h + 2, v)),
                ];
                for i in 0..nalus {
                    let x = ((i + 1) * h * 2) / (nalus + 1);
                    out.push((comp.pins[2 + i as usize], Vec2::new(-h + 4 + x, v)));
                }
                out
            }
            ComponentKind::Register { .. } => vec![
                (comp.pins[0], Vec2::new(-h, 0)),
                (comp.pins[1], Vec2::new(0, -v)),
                (comp.pins[2], Vec2::new(0, v)),
            ],
            ComponentKind::Alu { .. } => {
                let x = 1 + h / 2;
                vec![
                    (comp.pins[0], Vec2::new(h, 0)),
                    (comp.pins[1], Vec2::new(-x, -v)),
                    (comp.pins[2], Vec2::new(x, -v)),
                    (comp.pins[3], Vec2::new(0, v)),
                ]
            }
            ComponentKind::Blockage { .. } => Vec::new(),
        };
        let comp = self.component_mut(id);
        comp.hsize = h;
        comp.vsize = v;
        for (pin, offset) in offsets {
            self.pin_mut(pin).offset = Some(offset);
        }
    }

    pub fn set_kind(&mut self, id: ComponentId, kind: ComponentKind) {
        self.component_mut(id).kind = kind;
        self.refresh_geometry(id);
    }

    /// Grows the control unit by one per-ALU control pin.
    pub fn control_add_alu_pin(&mut self, control: ComponentId) -> PinId {
        let nalus = match self.component(control).kind {
            ComponentKind::Control { nalus, .. } => nalus,
            ref k => panic!("control_add_alu_pin on {:?}", k),
        };
        let pin = self.add_pin(control, &format!("ctrl_alu{}", nalus));
        match &mut self.component_mut(control).kind {
            ComponentKind::Control { nalus, .. } => *nalus += 1,
            _ => unreachable!(),
        }
        self.refresh_geometry(control);
        pin
    }

    /// Inverse of `control_add_alu_pin`. The pin's links must already be gone.
    pub fn control_pop_alu_pin(&mut self, control: ComponentId) {
        match &mut self.component_mut(control).kind {
            ComponentKind::Control { nalus, .. } => {
                assert!(*nalus >= 1, "control unit has no ALU pins left");
                *nalus -= 1;
            }
            k => panic!("control_pop_alu_pin on {:?}", k),
        }
        let pin = self
            .component_mut(control)
            .pins
            .pop()
            .unwrap_or_else(|| panic!("control unit pin list empty"));
        assert!(
            self.links_touching(pin).is_empty(),
            "popping control pin {:?} while a link still uses it",
            pin
        );
        self.pins[pin.index()] = None;
        self.refresh_geometry(control);
    }

    /// World-frame position of a pin, or None when it has no local offset.
    pub fn pin_position(&self, pin: PinId) -> Option<Vec2> {
        let data = self.pin(pin);
        let comp = self.component(data.owner);
        data.offset.map(|o| comp.center + comp.rot.apply(o))
    }

    pub fn find_pin(&self, comp: ComponentId, name: &str) -> PinId {
        *self
            .component(comp)
            .pins
            .iter()
            .find(|&&p| self.pin(p).name == name)
            .unwrap_or_else(|| panic!("{:?} has no pin '{}'", comp, name))
    }

    pub fn component_by_name(&self, name: &str) -> Option<ComponentId> {
        self.name_map.get(name).copied()
    }

    pub fn component(&self, id: ComponentId) -> &ComponentData {
        self.components[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{:?} is not live", id))
    }

    pub fn component_mut(&mut self, id: ComponentId) -> &mut ComponentData {
        self.components[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("{:?} is not live", id))
    }

    pub fn pin(&self, id: PinId) -> &PinData {
        self.pins[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{:?} is not live", id))
    }

    pub fn pin_mut(&mut self, id: PinId) -> &mut PinData {
        self.pins[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("{:?} is not live", id))
    }

    pub fn link(&self, id: LinkId) -> &LinkData {
        self.links[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{:?} is not live", id))
    }

    pub fn link_mut(&mut self, id: LinkId) -> &mut LinkData {
        self.links[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("{:?} is not live", id))
    }

    pub fn iter_components(&self) -> impl Iterator<Item = (ComponentId, &ComponentData)> {
        self.components
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ComponentId::new(i), c)))
    }

    pub fn iter_links(&self) -> impl Iterator<Item = (LinkId, &LinkData)> {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|l| (LinkId::new(i), l)))
    }

    pub fn live_component_ids(&self) -> Vec<ComponentId> {
        self.iter_components().map(|(id, _)| id).collect()
    }

    pub fn live_link_ids(&self) -> Vec<LinkId> {
        self.iter_links().map(|(id, _)| id).collect()
    }

    pub fn num_components(&self) -> usize {
        self.iter_components().count()
    }

    pub fn num_links(&self) -> usize {
        self.iter_links().count()
    }
}

impl Default for DesignDB {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pin_sits_on_bottom_edge() {
        let mut db = DesignDB::new();
        let clock = db.add_component("clock", ComponentKind::Clock, Vec2::new(5, 4));
        let pin = db.find_pin(clock, "clock_out");
        assert_eq!(db.pin_position(pin), Some(Vec2::new(5, 6)));
        assert_eq!(db.component(clock).bounds(), Rect::new(2, 2, 7, 5));
    }

    #[test]
    fn rotation_moves_pins_and_swaps_bounds() {
        let mut db = DesignDB::new();
        let clock = db.add_component("clock", ComponentKind::Clock, Vec2::new(10, 10));
        let pin = db.find_pin(clock, "clock_out");

        db.component_mut(clock).rot = Rotation::new(1);
        // local (0, 2) -> (-2, 0)
        assert_eq!(db.pin_position(pin), Some(Vec2::new(8, 10)));
        let b = db.component(clock).bounds();
        assert_eq!((b.width, b.height), (5, 7));

        db.component_mut(clock).rot = Rotation::new(0);
        assert_eq!(db.pin_position(pin), Some(Vec2::new(10, 12)));
    }

    #[test]
    fn control_grows_and_shrinks_with_alu_pins() {
        let mut db = DesignDB::new();
        let ctrl = db.add_component(
            "control",
            ComponentKind::Control { nregs: 2, nalus: 0 },
            Vec2::new(30, 10),
        );
        assert_eq!(db.component(ctrl).pins.len(), 2);
        assert_eq!(db.component(ctrl).vsize, 2);

        db.control_add_alu_pin(ctrl);
        assert_eq!(db.component(ctrl).pins.len(), 3);
        assert_eq!(db.component(ctrl).vsize, 5);
        assert!(db.pin_position(db.find_pin(ctrl, "ctrl_alu0")).is_some());

        db.control_pop_alu_pin(ctrl);
        assert_eq!(db.component(ctrl).pins.len(), 2);
        assert_eq!(db.component(ctrl).vsize, 2);
    }

    #[test]
    fn remove_component_frees_name_and_pins() {
        let mut db = DesignDB::new();
        let alu = db.add_component("alu0", ComponentKind::Alu { datawidth: 8 }, Vec2::new(30, 45));
        let pins = db.component(alu).pins.clone();
        db.remove_component(alu);
        assert!(db.component_by_name("alu0").is_none());
        assert_eq!(db.num_components(), 0);
        // freed pin slots stay freed
        for pin in pins {
            let dead = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _ = db.pin(pin);
            }));
            assert!(dead.is_err());
        }
    }

    #[test]
    #[should_panic(expected = "is not live")]
    fn dead_component_lookup_panics() {
        let mut db = DesignDB::new();
        let b = db.add_component(
            "b",
            ComponentKind::Blockage { hsize: 0, vsize: 0 },
            Vec2::new(1, 1),
        );
        db.remove_component(b);
        let _ = db.component(b);
    }

    #[test]
    fn link_removal_by_pin() {
        let mut db = DesignDB::new();
        let clock = db.add_component("clock", ComponentKind::Clock, Vec2::new(5, 4));
        let ctrl = db.add_component(
            "control",
            ComponentKind::Control { nregs: 2, nalus: 0 },
            Vec2::new(30, 10),
        );
        let out = db.find_pin(clock, "clock_out");
        let inp = db.find_pin(ctrl, "clock_in");
        db.add_link(out, inp, NetClass::ClockTree);
        assert_eq!(db.num_links(), 1);
        assert_eq!(db.remove_links_touching(&[out]), 1);
        assert_eq!(db.num_links(), 0);
    }
}
