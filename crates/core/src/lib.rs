pub mod context;
pub mod controller;
pub mod edge;
pub mod regs;
pub mod sim;
pub mod snapshot;
pub mod store;

mod tests;

pub use context::{ContextOps, CoreContext, RestoreOutcome};
pub use controller::{EnterOutcome, Node};
pub use store::{CheckFlag, InterruptFlag};

#[derive(Debug, thiserror::Error)]
pub enum HibernusError {
    #[error("Persistent store access out of range at {0:#x}")]
    StoreOutOfRange(u32),
    #[error("Volatile memory access out of range at {0:#x}")]
    MemoryOutOfRange(u32),
    #[error("Mirror region too small: need {need} bytes, have {have}")]
    MirrorTooSmall { need: usize, have: usize },
}

pub type HibResult<T> = Result<T, HibernusError>;

/// Which transition of the comparator output an interrupt line watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Supply climbing back above the operating threshold.
    Rising,
    /// Supply collapsing below the operating threshold.
    Falling,
}

/// Why a deep-sleep wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeEvent {
    /// The configured rising edge fired; execution continues.
    RisingEdge,
    /// Supply drained away entirely while parked. The next thing that
    /// happens to this node is a cold boot.
    PowerLost,
}

/// Synchronous view of the external comparator output.
pub trait PowerMonitor {
    fn supply_ok(&self) -> bool;
}

/// The edge-sensitive interrupt line wired to the comparator output.
///
/// Arming always clears any pending indication first; the line is never
/// re-armed implicitly, only by whichever controller phase runs next.
pub trait EdgeControl {
    fn arm(&mut self, edge: Edge);
    fn disarm(&mut self);
}

/// Processor suspend and global interrupt control.
pub trait SuspendControl {
    fn enable_interrupts(&mut self);
    /// Enter the lowest-power retention mode with interrupts enabled.
    /// Returns once the configured edge wakes the core.
    fn deep_sleep(&mut self) -> WakeEvent;
    /// Park after a completed save; only a power cycle brings the node back.
    fn power_down(&mut self);
}

/// Bounded visual fault indication plus the controller-activity debug line.
pub trait FaultSignal {
    fn flash(&mut self, times: u32);
    fn set_busy(&mut self, active: bool);
}

/// The millisecond-delay timer used by the surrounding application.
///
/// Not part of the hibernation state machine itself, but its counting
/// state must not survive a re-arm, so the handler gets to reset it.
pub trait CycleTimer {
    fn stop_and_reset(&mut self);
    fn start(&mut self);
}

/// Word access to the memory-mapped peripheral register file.
pub trait RegisterBus {
    fn read_reg(&self, addr: u16) -> u16;
    fn write_reg(&mut self, addr: u16, value: u16);
}

/// Everything the controller needs from the platform, bundled so that a
/// `Node` owns exactly one board value.
pub trait Board:
    PowerMonitor + EdgeControl + SuspendControl + FaultSignal + CycleTimer + RegisterBus
{
}

impl<T> Board for T where
    T: PowerMonitor + EdgeControl + SuspendControl + FaultSignal + CycleTimer + RegisterBus
{
}
