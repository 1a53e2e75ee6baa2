use crate::evaluate::{self, Metrics};
use chipgrid_common::db::command::{EditCommand, EditError};
use chipgrid_common::db::core::{ComponentKind, DesignDB, NetClass};
use chipgrid_common::db::indices::ComponentId;
use chipgrid_common::geom::Vec2;
use chipgrid_common::util::config::{Config, LimitsConfig};
use chipgrid_router::{OccupancyGrid, PathFinder};

// Canonical default session, matching the original demo board.
const CLOCK_CENTER: Vec2 = Vec2::new(5, 4);
const CONTROL_CENTER: Vec2 = Vec2::new(30, 10);
const REGISTER_CENTER: Vec2 = Vec2::new(30, 25);
const DEFAULT_DATA_WIDTH: i64 = 8;
const DEFAULT_NUM_REGS: i64 = 2;
const DEFAULT_NUM_ALUS: i64 = 1;

fn alu_center(index: usize) -> Vec2 {
    Vec2::new(30 + 2 * index as i32, 45 + index as i32)
}

/// One active layout session: the design database, the occupancy grid, the
/// router scratch, and the cached results of the last recompute. Every edit
/// runs the full pipeline (occupancy -> routing -> collisions -> metrics)
/// before returning, so the cached results are always consistent with the
/// current component and link state.
pub struct Layout {
    db: DesignDB,
    grid: OccupancyGrid,
    finder: PathFinder,
    limits: LimitsConfig,
    datawidth: i32,
    nregs: i32,
    clock: ComponentId,
    control: ComponentId,
    register: ComponentId,
    alus: Vec<ComponentId>,
    collision: bool,
    fully_linked: bool,
    metrics: Option<Metrics>,
}

impl Layout {
    pub fn new(config: &Config) -> Self {
        let mut db = DesignDB::new();
        let (clock, control, register) = build_circuit(&mut db);
        let mut layout = Self {
            db,
            grid: OccupancyGrid::new(config.grid.width, config.grid.height),
            finder: PathFinder::new(),
            limits: config.limits,
            datawidth: 0,
            nregs: 0,
            clock,
            control,
            register,
            alus: Vec::new(),
            collision: false,
            fully_linked: false,
            metrics: None,
        };
        layout.set_data_width(DEFAULT_DATA_WIDTH);
        layout.set_num_regs(DEFAULT_NUM_REGS);
        layout.set_num_alus(DEFAULT_NUM_ALUS);
        layout.recompute();
        layout
    }

    /// Drops the whole session state and rebuilds the canonical default
    /// layout. Previously handed-out ids are dead afterwards.
    fn reset(&mut self) {
        log::info!("resetting layout to the default session");
        self.db = DesignDB::new();
        let (clock, control, register) = build_circuit(&mut self.db);
        self.clock = clock;
        self.control = control;
        self.register = register;
        self.alus.clear();
        self.datawidth = 0;
        self.nregs = 0;
        self.set_data_width(DEFAULT_DATA_WIDTH);
        self.set_num_regs(DEFAULT_NUM_REGS);
        self.set_num_alus(DEFAULT_NUM_ALUS);
    }

    /// Applies one edit and recomputes. On a command-boundary error the
    /// layout is unchanged and the cached results stay valid.
    pub fn apply(&mut self, cmd: &EditCommand) -> Result<(), EditError> {
        match cmd {
            EditCommand::Reset => self.reset(),
            EditCommand::SetDataWidth(n) => self.set_data_width(*n),
            EditCommand::SetNumRegs(n) => self.set_num_regs(*n),
            EditCommand::SetNumAlus(n) => self.set_num_alus(*n),
            EditCommand::AddAlu => self.set_num_alus(self.alus.len() as i64 + 1),
            EditCommand::RemoveAlu => self.set_num_alus(self.alus.len() as i64 - 1),
            EditCommand::Move { name, to } => {
                let id = self.resolve(name)?;
                self.db.component_mut(id).center = *to;
            }
            EditCommand::Rotate { name } => {
                let id = self.resolve(name)?;
                let comp = self.db.component_mut(id);
                comp.rot = comp.rot.turned();
            }
            EditCommand::AddBlockage {
                name,
                center,
                hsize,
                vsize,
            } => {
                if *hsize < 0 || *vsize < 0 {
                    return Err(EditError::BadExtent(*hsize, *vsize));
                }
                if self.db.component_by_name(name).is_some() {
                    return Err(EditError::DuplicateName(name.clone()));
                }
                self.db.add_component(
                    name,
                    ComponentKind::Blockage {
                        hsize: *hsize,
                        vsize: *vsize,
                    },
                    *center,
                );
            }
            EditCommand::Remove { name } => {
                let id = self.resolve(name)?;
                if !matches!(
                    self.db.component(id).kind,
                    ComponentKind::Blockage { .. }
                ) {
                    return Err(EditError::NotRemovable(name.clone()));
                }
                self.db.remove_component(id);
            }
            EditCommand::Recompute => {}
        }
        self.recompute();
        Ok(())
    }

    /// Sanitized to the configured range; a no-op when nothing changes.
    fn set_data_width(&mut self, value: i64) {
        let value = self.clamp(value);
        if value == self.datawidth {
            return;
        }
        self.datawidth = value;
        self.db.set_kind(
            self.register,
            ComponentKind::Register {
                datawidth: value,
                nregs: self.nregs,
            },
        );
        for &alu in &self.alus {
            self.db
                .set_kind(alu, ComponentKind::Alu { datawidth: value });
        }
    }

    fn set_num_regs(&mut self, value: i64) {
        let value = self.clamp(value);
        if value == self.nregs {
            return;
        }
        self.nregs = value;
        self.db.set_kind(
            self.control,
            ComponentKind::Control {
                nregs: value,
                nalus: self.alus.len() as i32,
            },
        );
        self.db.set_kind(
            self.register,
            ComponentKind::Register {
                datawidth: self.datawidth,
                nregs: value,
            },
        );
    }

    fn set_num_alus(&mut self, value: i64) {
        let value = self.clamp(value) as usize;
        while self.alus.len() < value {
            self.add_alu();
        }
        while self.alus.len() > value {
            self.remove_alu();
        }
    }

    /// Creates the next ALU, grows the control unit by one pin, and wires the
    /// four links: control, two operand fan-outs, one result.
    fn add_alu(&mut self) {
        let index = self.alus.len();
        let alu = self.db.add_component(
            &format!("alu{}", index),
            ComponentKind::Alu {
                datawidth: self.datawidth,
            },
            alu_center(index),
        );
        let ctrl_pin = self.db.control_add_alu_pin(self.control);
        let reg_out = self.db.find_pin(self.register, "reg_out");
        let reg_in = self.db.find_pin(self.register, "reg_in");
        self.db
            .add_link(ctrl_pin, self.db.find_pin(alu, "ctrl_in"), NetClass::Control);
        self.db
            .add_link(reg_out, self.db.find_pin(alu, "reg1_in"), NetClass::Operand);
        self.db
            .add_link(reg_out, self.db.find_pin(alu, "reg2_in"), NetClass::Operand);
        self.db
            .add_link(self.db.find_pin(alu, "alu_out"), reg_in, NetClass::Result);
        self.alus.push(alu);
    }

    /// Symmetric inverse of `add_alu`: every link touching the ALU's pins is
    /// detached before the ALU and its control pin are freed.
    fn remove_alu(&mut self) {
        let alu = self
            .alus
            .pop()
            .unwrap_or_else(|| panic!("remove_alu on a layout with no ALUs"));
        let pins = self.db.component(alu).pins.clone();
        let removed = self.db.remove_links_touching(&pins);
        debug_assert_eq!(removed, 4);
        self.db.remove_component(alu);
        self.db.control_pop_alu_pin(self.control);
    }

    /// Full pipeline: occupancy rebuild, per-link routing, collision flags,
    /// then metrics when (and only when) the layout is clean and fully
    /// linked.
    pub fn recompute(&mut self) {
        self.grid.rebuild_occupancy(&self.db);
        self.fully_linked = chipgrid_router::route_links(&mut self.db, &self.grid, &mut self.finder);
        self.collision = evaluate::update_collisions(&mut self.db, &self.grid);
        self.metrics = if !self.collision && self.fully_linked {
            Some(evaluate::aggregate_metrics(
                &self.db,
                self.control,
                self.register,
                &self.alus,
            ))
        } else {
            None
        };
    }

    fn resolve(&self, name: &str) -> Result<ComponentId, EditError> {
        self.db
            .component_by_name(name)
            .ok_or_else(|| EditError::UnknownComponent(name.to_string()))
    }

    fn clamp(&self, value: i64) -> i32 {
        value.clamp(self.limits.min as i64, self.limits.max as i64) as i32
    }

    pub fn db(&self) -> &DesignDB {
        &self.db
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    pub fn has_collision(&self) -> bool {
        self.collision
    }

    pub fn is_fully_linked(&self) -> bool {
        self.fully_linked
    }

    pub fn data_width(&self) -> i32 {
        self.datawidth
    }

    pub fn num_regs(&self) -> i32 {
        self.nregs
    }

    pub fn num_alus(&self) -> usize {
        self.alus.len()
    }

    pub fn clock_id(&self) -> ComponentId {
        self.clock
    }

    pub fn control_id(&self) -> ComponentId {
        self.control
    }

    pub fn register_id(&self) -> ComponentId {
        self.register
    }

    pub fn alu_ids(&self) -> &[ComponentId] {
        &self.alus
    }
}

/// Places the three fixed blocks and their two base wires. Sizing parameters
/// start at zero; the setters bring them to the session defaults.
fn build_circuit(db: &mut DesignDB) -> (ComponentId, ComponentId, ComponentId) {
    let clock = db.add_component("clock", ComponentKind::Clock, CLOCK_CENTER);
    let control = db.add_component(
        "control",
        ComponentKind::Control { nregs: 0, nalus: 0 },
        CONTROL_CENTER,
    );
    let register = db.add_component(
        "register",
        ComponentKind::Register {
            datawidth: 0,
            nregs: 0,
        },
        REGISTER_CENTER,
    );
    db.add_link(
        db.find_pin(clock, "clock_out"),
        db.find_pin(control, "clock_in"),
        NetClass::ClockTree,
    );
    db.add_link(
        db.find_pin(control, "ctrl_reg"),
        db.find_pin(register, "ctrl_in"),
        NetClass::Control,
    );
    (clock, control, register)
}
