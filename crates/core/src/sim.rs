//! Host-side implementations of every board collaborator, for running
//! the controller through power cycles without hardware. The CLI demo
//! and the state-machine tests both drive these.

use std::collections::HashMap;

use anyhow::Context;

use crate::context::{ContextOps, CoreContext, RestoreOutcome};
use crate::controller::Node;
use crate::regs::table::REGISTER_TABLE;
use crate::store::{LinearMemory, FRAM_BASE, FRAM_SIZE, RAM_SIZE};
use crate::{
    CycleTimer, Edge, EdgeControl, FaultSignal, PowerMonitor, RegisterBus, SuspendControl,
    WakeEvent,
};

/// A simulated board: comparator output, edge line, fault LED, cycle
/// timer and peripheral register file, all inspectable.
#[derive(Debug)]
pub struct SimBoard {
    pub supply_ok: bool,
    pub armed_edge: Option<Edge>,
    pub line_enabled: bool,
    pub pending: bool,
    pub interrupts_enabled: bool,
    /// Cumulative fault-LED flash count.
    pub flash_count: u32,
    pub busy: bool,
    pub timer_running: bool,
    pub timer_count: u32,
    pub powered_down: bool,
    /// What the next `deep_sleep` call reports. Defaults to the rising
    /// edge arriving; tests flip it to model a node dying while parked.
    pub next_wake: WakeEvent,
    regs: HashMap<u16, u16>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        // Seed every catalogued register with a value derived from its
        // address so capture/replay is observable.
        let regs = REGISTER_TABLE
            .iter()
            .map(|e| (e.addr, e.addr.wrapping_mul(3)))
            .collect();
        Self {
            supply_ok: true,
            armed_edge: None,
            line_enabled: false,
            pending: false,
            interrupts_enabled: false,
            flash_count: 0,
            busy: false,
            timer_running: false,
            timer_count: 0,
            powered_down: false,
            next_wake: WakeEvent::RisingEdge,
            regs,
        }
    }

    /// Drive the supply rail. Returns true when the transition matches
    /// the armed edge on an enabled line, i.e. the handler should run.
    pub fn set_supply(&mut self, ok: bool) -> bool {
        let edge = match (self.supply_ok, ok) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        };
        self.supply_ok = ok;
        match edge {
            Some(e) if self.line_enabled && self.armed_edge == Some(e) => {
                self.pending = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_reg(&mut self, addr: u16, value: u16) {
        self.regs.insert(addr, value);
    }

    pub fn reg(&self, addr: u16) -> u16 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }
}

impl PowerMonitor for SimBoard {
    fn supply_ok(&self) -> bool {
        self.supply_ok
    }
}

impl EdgeControl for SimBoard {
    fn arm(&mut self, edge: Edge) {
        self.pending = false;
        self.armed_edge = Some(edge);
        self.line_enabled = true;
    }

    fn disarm(&mut self) {
        self.pending = false;
        self.line_enabled = false;
    }
}

impl SuspendControl for SimBoard {
    fn enable_interrupts(&mut self) {
        self.interrupts_enabled = true;
    }

    fn deep_sleep(&mut self) -> WakeEvent {
        self.interrupts_enabled = true;
        let wake = self.next_wake;
        if wake == WakeEvent::RisingEdge {
            // Waking means the rail came back.
            self.supply_ok = true;
        }
        wake
    }

    fn power_down(&mut self) {
        self.powered_down = true;
    }
}

impl FaultSignal for SimBoard {
    fn flash(&mut self, times: u32) {
        self.flash_count += times;
    }

    fn set_busy(&mut self, active: bool) {
        self.busy = active;
    }
}

impl CycleTimer for SimBoard {
    fn stop_and_reset(&mut self) {
        self.timer_running = false;
        self.timer_count = 0;
    }

    fn start(&mut self) {
        self.timer_running = true;
    }
}

impl RegisterBus for SimBoard {
    fn read_reg(&self, addr: u16) -> u16 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }

    fn write_reg(&mut self, addr: u16, value: u16) {
        self.regs.insert(addr, value);
    }
}

/// Simulated context primitive: the register file is plain data and the
/// splice either lands (state replayed, `Resumed`) or is made to fall
/// through on request.
#[derive(Debug, Default)]
pub struct SimContext {
    pub ctx: CoreContext,
    pub fail_next_restore: bool,
}

impl ContextOps for SimContext {
    fn save_core_registers(&mut self) -> CoreContext {
        self.ctx.clone()
    }

    fn restore_core_registers(&mut self, ctx: &CoreContext) -> RestoreOutcome {
        if self.fail_next_restore {
            self.fail_next_restore = false;
            return RestoreOutcome::FellThrough;
        }
        self.ctx = ctx.clone();
        RestoreOutcome::Resumed
    }
}

/// Build a simulated node from a board descriptor, checking that the
/// declared RAM geometry fits the mirror region and that the declared
/// FRAM region covers the fixed snapshot layout.
pub fn node_from_descriptor(
    desc: &hibernus_config::BoardDescriptor,
) -> anyhow::Result<Node<SimContext, SimBoard>> {
    let ram_size = hibernus_config::parse_size(&desc.ram.size)
        .with_context(|| format!("Invalid RAM size for board '{}'", desc.name))?
        as usize;
    if ram_size > RAM_SIZE {
        anyhow::bail!(
            "Board '{}' declares {} bytes of RAM but the mirror region holds {}",
            desc.name,
            ram_size,
            RAM_SIZE
        );
    }

    let fram_size = hibernus_config::parse_size(&desc.fram.size)
        .with_context(|| format!("Invalid FRAM size for board '{}'", desc.name))?
        as usize;
    let fram_end = desc.fram.base as u64 + fram_size as u64;
    if desc.fram.base > FRAM_BASE || fram_end < FRAM_BASE as u64 + FRAM_SIZE as u64 {
        anyhow::bail!(
            "Board '{}' FRAM region {:#x}+{:#x} does not cover the snapshot layout {:#x}+{:#x}",
            desc.name,
            desc.fram.base,
            fram_size,
            FRAM_BASE,
            FRAM_SIZE
        );
    }

    let mut node = Node::new(SimContext::default(), SimBoard::new());
    node.ram = LinearMemory::new(ram_size, desc.ram.base);
    Ok(node)
}
