//! The power-edge interrupt handler.
//!
//! The handler itself owns no persistent state: it reads the interrupt
//! flag, dispatches, and calls back into the controller. Its decisions
//! are pure functions of (flag, retry marker, power sample) so the whole
//! state machine is exercisable without a real interrupt.

use crate::context::ContextOps;
use crate::controller::Node;
use crate::store::InterruptFlag;
use crate::{Board, Edge, HibResult};

/// What an incoming edge means given the armed expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Falling edge while armed for hibernate: capture now.
    RunHibernate,
    /// Any other expectation: the next phase re-arms explicitly,
    /// nothing to do here.
    Ignore,
}

pub fn edge_decision(flag: InterruptFlag) -> EdgeDecision {
    match flag {
        InterruptFlag::ArmedForHibernate => EdgeDecision::RunHibernate,
        _ => EdgeDecision::Ignore,
    }
}

/// What to do once `hibernate()` has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSaveAction {
    /// Power really is collapsing: park until the boot path revives us.
    PowerDown,
    /// The edge was noise; supply is still fine. Re-arm and keep going.
    Rearm,
    /// A failed restore already re-armed everything; just clear the
    /// retry marker on the way out.
    AlreadyRearmed,
}

pub fn post_save_action(restore_attempted: bool, supply_ok: bool) -> PostSaveAction {
    if restore_attempted {
        PostSaveAction::AlreadyRearmed
    } else if supply_ok {
        PostSaveAction::Rearm
    } else {
        PostSaveAction::PowerDown
    }
}

impl<C: ContextOps, B: Board> Node<C, B> {
    /// Entry point for the comparator-edge interrupt.
    pub fn on_power_edge(&mut self) -> HibResult<()> {
        self.board.set_busy(true);
        // Pending cleared and line disabled; whichever path runs next
        // re-arms explicitly.
        self.board.disarm();

        if edge_decision(self.fram.interrupt_flag()) == EdgeDecision::RunHibernate {
            self.hibernate()?;

            match post_save_action(self.restore_attempted, self.board.supply_ok()) {
                PostSaveAction::PowerDown => {
                    self.fram.set_interrupt_flag(InterruptFlag::PostHibernateIdle);
                    tracing::info!("snapshot committed, powering down");
                    self.board.power_down();
                }
                PostSaveAction::Rearm => {
                    self.fram.set_interrupt_flag(InterruptFlag::ArmedForHibernate);
                    self.board.arm(Edge::Falling);
                    // A mid-cycle countdown must not leak across the
                    // re-arm, or the foreground wait never terminates.
                    self.board.stop_and_reset();
                    self.board.start();
                    self.board.enable_interrupts();
                    tracing::debug!("transient edge, re-armed for hibernate");
                }
                PostSaveAction::AlreadyRearmed => {}
            }
        }

        self.restore_attempted = false;
        self.board.set_busy(false);
        Ok(())
    }
}
