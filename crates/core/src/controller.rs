//! The hibernation state machine: decides on every entry whether to
//! restore a previous life, arm for a future hibernate, or park and wait
//! for power; owns the persistent flag protocol.

use crate::context::{ContextOps, RestoreOutcome};
use crate::regs;
use crate::store::{
    CheckFlag, FramStore, InterruptFlag, LinearMemory, FAULT_FLASH_COUNT, RAM_SIZE, RAM_START,
    SETUP_SENTINEL,
};
use crate::{Board, Edge, HibResult, WakeEvent};

/// What a boot-time `enter()` resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// A committed snapshot was replayed; execution logically continues
    /// at the instruction after the interrupted `hibernate()` call.
    Resumed,
    /// No snapshot; the falling edge is armed and the foreground task
    /// should run.
    ArmedForHibernate,
    /// Supply was insufficient and drained away completely while parked
    /// waiting for the rising edge.
    ArmedForRestore,
}

/// One intermittently-powered node: the context primitive, the board
/// collaborators, the persistent store and the volatile working memory,
/// all owned in one place. No ambient globals.
pub struct Node<C: ContextOps, B: Board> {
    pub ctx: C,
    pub board: B,
    pub fram: FramStore,
    pub ram: LinearMemory,
    /// Boot-lifetime marker: the last restore attempt fell through.
    /// Volatile on purpose; a power cycle clears it.
    pub restore_attempted: bool,
}

impl<C: ContextOps, B: Board> Node<C, B> {
    pub fn new(ctx: C, board: B) -> Self {
        Self {
            ctx,
            board,
            fram: FramStore::new(),
            ram: LinearMemory::new(RAM_SIZE, RAM_START),
            restore_attempted: false,
        }
    }

    /// Boot/resume entry point. Normalizes the check flag, then either
    /// restores, parks for power, or arms the falling edge and hands
    /// control back to the foreground task.
    pub fn enter(&mut self) -> HibResult<EnterOutcome> {
        self.board.set_busy(true);

        // Ran before but nothing to recover: a save was expected and
        // never committed. Signal it, then steer onto the arm path.
        if self.fram.check_flag() == CheckFlag::NoValidSnapshot {
            tracing::warn!("previous cycle left no committed snapshot");
            self.board.flash(FAULT_FLASH_COUNT);
            self.fram.set_check_flag(CheckFlag::Unknown(SETUP_SENTINEL));
        }

        let outcome = match self.fram.check_flag() {
            CheckFlag::ValidSnapshot => match self.restore()? {
                RestoreOutcome::Resumed => EnterOutcome::Resumed,
                RestoreOutcome::FellThrough => EnterOutcome::ArmedForHibernate,
            },
            _ => {
                self.fram.set_check_flag(CheckFlag::NoValidSnapshot);

                if !self.board.supply_ok() {
                    self.fram.set_interrupt_flag(InterruptFlag::ArmedForRestore);
                    self.board.arm(Edge::Rising);
                    tracing::info!("supply low, parking until the rising edge");
                    if self.board.deep_sleep() == WakeEvent::PowerLost {
                        self.board.set_busy(false);
                        return Ok(EnterOutcome::ArmedForRestore);
                    }
                }

                self.fram.set_interrupt_flag(InterruptFlag::ArmedForHibernate);
                self.board.arm(Edge::Falling);
                self.board.enable_interrupts();
                tracing::info!("armed for hibernate on the falling edge");
                EnterOutcome::ArmedForHibernate
            }
        };

        self.board.set_busy(false);
        Ok(outcome)
    }

    /// Capture the full machine state. Invoked from the edge handler with
    /// the interrupt line already disarmed; runs to completion or is
    /// abandoned by total power loss.
    ///
    /// The check flag is cleared first and committed last: an
    /// interruption anywhere in between leaves the snapshot untrusted.
    pub fn hibernate(&mut self) -> HibResult<()> {
        self.fram.set_check_flag(CheckFlag::NoValidSnapshot);
        self.restore_attempted = false;

        let ctx = self.ctx.save_core_registers();
        tracing::info!("hibernating at pc {:#x}", ctx.pc);
        self.fram.write_core_context(&ctx);
        self.fram.mirror_from_ram(&self.ram)?;
        regs::snapshot_peripherals(&self.board, &mut self.fram);

        // Commit. Only now does the next boot trust the snapshot.
        self.fram.set_check_flag(CheckFlag::ValidSnapshot);
        Ok(())
    }

    /// Replay the committed snapshot. Peripheral registers and working
    /// memory go first; the core register splice runs last because the
    /// resumed code expects everything else to already be in place.
    pub fn restore(&mut self) -> HibResult<RestoreOutcome> {
        // The snapshot is consumed the moment a restore begins.
        self.fram.set_check_flag(CheckFlag::NoValidSnapshot);

        regs::restore_peripherals(&mut self.board, &self.fram);
        self.fram.restore_ram(&mut self.ram)?;

        let ctx = self.fram.read_core_context();
        match self.ctx.restore_core_registers(&ctx) {
            RestoreOutcome::Resumed => {
                // Execution is logically back in the resumed handler
                // tail, which samples the comparator before re-arming.
                tracing::info!("resumed saved context at pc {:#x}", ctx.pc);

                // The rail can collapse again around the restore. A
                // falling edge can never fire on an already-low rail,
                // so park instead of arming it.
                if !self.board.supply_ok() {
                    tracing::warn!("supply low after resume, powering down");
                    self.fram.set_interrupt_flag(InterruptFlag::PostHibernateIdle);
                    self.board.power_down();
                    return Ok(RestoreOutcome::Resumed);
                }

                self.fram.set_interrupt_flag(InterruptFlag::ArmedForHibernate);
                self.board.arm(Edge::Falling);
                self.board.stop_and_reset();
                self.board.start();
                self.board.enable_interrupts();
                Ok(RestoreOutcome::Resumed)
            }
            RestoreOutcome::FellThrough => {
                // The splice did not divert control. Degrade to a fresh
                // start and try to hibernate correctly next time.
                tracing::warn!("restore fell through, discarding snapshot");
                self.fram.set_interrupt_flag(InterruptFlag::ArmedForHibernate);
                self.board.arm(Edge::Falling);
                self.fram.set_check_flag(CheckFlag::NoValidSnapshot);
                self.restore_attempted = true;
                self.board.enable_interrupts();
                Ok(RestoreOutcome::FellThrough)
            }
        }
    }
}
