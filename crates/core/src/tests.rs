#[cfg(test)]
mod tests {
    use crate::context::RestoreOutcome;
    use crate::controller::{EnterOutcome, Node};
    use crate::edge::{edge_decision, post_save_action, EdgeDecision, PostSaveAction};
    use crate::regs::{self, table::REGISTER_TABLE};
    use crate::sim::{SimBoard, SimContext};
    use crate::store::{CheckFlag, FramStore, InterruptFlag, RAM_START};
    use crate::{Edge, RegisterBus, WakeEvent};

    fn fresh_node() -> Node<SimContext, SimBoard> {
        Node::new(SimContext::default(), SimBoard::new())
    }

    /// Boot a node, run it to a committed snapshot, and hand back the
    /// surviving FRAM image as a power cycle would.
    fn checkpointed_node() -> Node<SimContext, SimBoard> {
        let mut node = fresh_node();
        assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForHibernate);

        // Foreground work leaves a footprint in RAM and in the context.
        node.ram.write_u32(RAM_START, 42);
        node.ctx.ctx.pc = 0x5A5A;
        node.ctx.ctx.regs[0] = 0x2BFE; // frame link

        // Supply collapses: falling edge fires the handler.
        assert!(node.board.set_supply(false));
        node.on_power_edge().unwrap();
        assert!(node.board.powered_down);
        assert_eq!(node.fram.check_flag(), CheckFlag::ValidSnapshot);

        // Cold boot: volatile state is gone, FRAM survives.
        let mut rebooted = fresh_node();
        rebooted.fram = node.fram.clone();
        rebooted
    }

    #[test]
    fn test_fresh_boot_arms_for_hibernate() {
        // Erased storage reads back as an unknown check flag: no fault
        // indication, straight to the arm path.
        let mut node = fresh_node();
        assert!(matches!(node.fram.check_flag(), CheckFlag::Unknown(_)));

        assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForHibernate);
        assert_eq!(node.board.flash_count, 0);
        assert_eq!(node.fram.interrupt_flag_raw(), 2);
        assert_eq!(node.fram.check_flag(), CheckFlag::NoValidSnapshot);
        assert_eq!(node.board.armed_edge, Some(Edge::Falling));
        assert!(node.board.interrupts_enabled);
        assert!(!node.board.busy);
    }

    #[test]
    fn test_boot_with_missing_snapshot_flashes_fault() {
        // check flag 0 means a save was expected and never committed.
        let mut node = fresh_node();
        node.fram.set_check_flag(CheckFlag::NoValidSnapshot);

        assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForHibernate);
        assert_eq!(node.board.flash_count, 5);
        assert_eq!(node.fram.check_flag(), CheckFlag::NoValidSnapshot);
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::ArmedForHibernate);
    }

    #[test]
    fn test_idempotent_boot_for_any_corrupt_flag() {
        // Everything outside {0, 1} normalizes to the arm phase and
        // never attempts a restore.
        for raw in [2u32, 7, 0xFFFF, 0xDEAD_BEEF, u32::MAX] {
            let mut node = fresh_node();
            node.fram.set_check_flag_raw(raw);
            node.ctx.fail_next_restore = true; // would be visible if restore ran

            assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForHibernate);
            assert!(node.ctx.fail_next_restore, "restore ran for raw {raw:#x}");
            assert_eq!(node.fram.check_flag(), CheckFlag::NoValidSnapshot);
        }
    }

    #[test]
    fn test_boot_with_low_supply_parks_until_rising_edge() {
        let mut node = fresh_node();
        node.board.supply_ok = false;

        assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForHibernate);
        // Parked armed for the rising edge first, then re-armed falling
        // once the rail came back.
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::ArmedForHibernate);
        assert_eq!(node.board.armed_edge, Some(Edge::Falling));
        assert!(node.board.supply_ok);
    }

    #[test]
    fn test_boot_dies_while_parked() {
        let mut node = fresh_node();
        node.board.supply_ok = false;
        node.board.next_wake = WakeEvent::PowerLost;

        assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForRestore);
        // Armed for restore means rising-edge only.
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::ArmedForRestore);
        assert_eq!(node.board.armed_edge, Some(Edge::Rising));
    }

    #[test]
    fn test_hibernate_commits_last() {
        // Everything short of the final write leaves the flag at
        // NoValidSnapshot, so a crash anywhere mid-save discards it.
        let mut node = fresh_node();
        node.enter().unwrap();
        node.ram.write_u32(RAM_START, 7);

        // The same capture sequence hibernate() runs, minus the commit.
        node.fram.set_check_flag(CheckFlag::NoValidSnapshot);
        let ctx = node.ctx.ctx.clone();
        node.fram.write_core_context(&ctx);
        node.fram.mirror_from_ram(&node.ram).unwrap();
        regs::snapshot_peripherals(&node.board, &mut node.fram);
        assert_eq!(node.fram.check_flag(), CheckFlag::NoValidSnapshot);

        // Next boot treats it as absent and flashes the fault.
        let mut rebooted = fresh_node();
        rebooted.fram = node.fram.clone();
        assert_eq!(rebooted.enter().unwrap(), EnterOutcome::ArmedForHibernate);
        assert_eq!(rebooted.board.flash_count, 5);

        // The full hibernate() does commit.
        let mut node = fresh_node();
        node.enter().unwrap();
        node.hibernate().unwrap();
        assert_eq!(node.fram.check_flag(), CheckFlag::ValidSnapshot);
    }

    #[test]
    fn test_restore_resumes_saved_context() {
        let mut node = checkpointed_node();

        assert_eq!(node.enter().unwrap(), EnterOutcome::Resumed);
        // Execution continues at the saved program counter with the
        // frame link and working memory back in place.
        assert_eq!(node.ctx.ctx.pc, 0x5A5A);
        assert_eq!(node.ctx.ctx.regs[0], 0x2BFE);
        assert_eq!(node.ram.read_u32(RAM_START), Some(42));
        // The snapshot was consumed and the next hibernation is armed.
        assert_eq!(node.fram.check_flag(), CheckFlag::NoValidSnapshot);
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::ArmedForHibernate);
        assert_eq!(node.board.armed_edge, Some(Edge::Falling));
        assert!(node.board.timer_running);
        assert_eq!(node.board.timer_count, 0);
    }

    #[test]
    fn test_resume_with_collapsed_supply_powers_down() {
        // The rail dies again around the restore. Arming the falling
        // edge would wait forever on an already-low rail, so the node
        // parks with the saved state replayed.
        let mut node = checkpointed_node();
        node.board.supply_ok = false;

        assert_eq!(node.enter().unwrap(), EnterOutcome::Resumed);
        assert_eq!(node.ctx.ctx.pc, 0x5A5A);
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::PostHibernateIdle);
        assert!(node.board.powered_down);
        assert!(!node.board.line_enabled);
        assert!(!node.board.timer_running);
    }

    #[test]
    fn test_failed_restore_falls_back() {
        // A splice that does not divert control leaves the node
        // armed for hibernate with the snapshot discarded.
        let mut node = checkpointed_node();
        node.ctx.fail_next_restore = true;

        assert_eq!(node.enter().unwrap(), EnterOutcome::ArmedForHibernate);
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::ArmedForHibernate);
        assert_eq!(node.fram.check_flag(), CheckFlag::NoValidSnapshot);
        assert!(node.restore_attempted);
        assert_eq!(node.board.armed_edge, Some(Edge::Falling));
    }

    #[test]
    fn test_degraded_node_checkpoints_on_next_edge() {
        // After a failed restore the node runs forward from scratch and
        // the next falling edge must produce a good snapshot.
        let mut node = checkpointed_node();
        node.ctx.fail_next_restore = true;
        node.enter().unwrap();

        node.ram.write_u32(RAM_START, 9);
        assert!(node.board.set_supply(false));
        node.on_power_edge().unwrap();

        assert_eq!(node.fram.check_flag(), CheckFlag::ValidSnapshot);
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::PostHibernateIdle);
        assert!(node.board.powered_down);
        assert!(!node.restore_attempted);
    }

    #[test]
    fn test_spurious_edge_rearms() {
        // Falling edge fires but the rail recovers before the handler
        // samples it: save anyway, then re-arm and keep running.
        let mut node = fresh_node();
        node.enter().unwrap();

        assert!(node.board.set_supply(false));
        node.board.supply_ok = true; // noise, not a real collapse
        node.on_power_edge().unwrap();

        assert!(!node.board.powered_down);
        assert_eq!(node.fram.interrupt_flag(), InterruptFlag::ArmedForHibernate);
        assert_eq!(node.fram.check_flag(), CheckFlag::ValidSnapshot);
        assert_eq!(node.board.armed_edge, Some(Edge::Falling));
        // The countdown was mid-cycle; it must restart from zero.
        assert!(node.board.timer_running);
        assert_eq!(node.board.timer_count, 0);
    }

    #[test]
    fn test_edge_ignored_unless_armed_for_hibernate() {
        let mut node = fresh_node();
        node.fram.set_interrupt_flag(InterruptFlag::ArmedForRestore);
        node.fram.set_check_flag(CheckFlag::ValidSnapshot);

        node.on_power_edge().unwrap();

        // No save ran; the snapshot flag is untouched.
        assert_eq!(node.fram.check_flag(), CheckFlag::ValidSnapshot);
        assert!(!node.board.line_enabled);
    }

    #[test]
    fn test_edge_decision_table() {
        assert_eq!(
            edge_decision(InterruptFlag::ArmedForHibernate),
            EdgeDecision::RunHibernate
        );
        assert_eq!(edge_decision(InterruptFlag::Idle), EdgeDecision::Ignore);
        assert_eq!(
            edge_decision(InterruptFlag::ArmedForRestore),
            EdgeDecision::Ignore
        );
        assert_eq!(
            edge_decision(InterruptFlag::PostHibernateIdle),
            EdgeDecision::Ignore
        );
    }

    #[test]
    fn test_post_save_action_table() {
        assert_eq!(post_save_action(false, false), PostSaveAction::PowerDown);
        assert_eq!(post_save_action(false, true), PostSaveAction::Rearm);
        assert_eq!(post_save_action(true, false), PostSaveAction::AlreadyRearmed);
        assert_eq!(post_save_action(true, true), PostSaveAction::AlreadyRearmed);
    }

    /// Register bus that records every write, for replay-order checks.
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u16, u16)>,
    }

    impl RegisterBus for RecordingBus {
        fn read_reg(&self, _addr: u16) -> u16 {
            0
        }

        fn write_reg(&mut self, addr: u16, value: u16) {
            self.writes.push((addr, value));
        }
    }

    #[test]
    fn test_restore_never_replays_excluded_registers() {
        // Excluded addresses never receive a snapshot value. The
        // four lock registers only ever see the key bytes; the radio
        // pins and the watchdog are never written at all.
        let store = FramStore::new();
        let mut bus = RecordingBus::default();
        regs::restore_peripherals(&mut bus, &store);

        let lock_regs = [0x5a0, 0x120, 0x140, 0x160];
        for (addr, value) in &bus.writes {
            assert_ne!(*addr, 0x222, "radio P3OUT was written");
            assert_ne!(*addr, 0x224, "radio P3DIR was written");
            assert_ne!(*addr, 0x15c, "watchdog was written");
            if lock_regs.contains(addr) {
                let key = value >> 8;
                assert!(key == 0xA5 || key == 0x01, "lock register got a copied value");
            }
        }
    }

    #[test]
    fn test_restore_unlocks_first_and_relocks_last() {
        let store = FramStore::new();
        let mut bus = RecordingBus::default();
        regs::restore_peripherals(&mut bus, &store);

        let unlocks: Vec<_> = bus.writes.iter().take(4).collect();
        assert!(unlocks.iter().all(|(_, v)| v >> 8 == 0xA5));

        let relocks: Vec<_> = bus.writes.iter().rev().take(4).collect();
        assert!(relocks.iter().all(|(_, v)| v >> 8 == 0x01));

        // Replayed writes: whole table minus the 7 exclusions.
        assert_eq!(bus.writes.len(), 4 + (514 - 7) + 4);
    }

    #[test]
    fn test_peripheral_restore_respects_exclusions_end_to_end() {
        let mut node = fresh_node();
        node.enter().unwrap();
        node.board.set_reg(0x202, 0x1111); // P1OUT
        node.board.set_reg(0x222, 0x2222); // P3OUT, excluded
        node.hibernate().unwrap();

        // State drifts after the save.
        node.board.set_reg(0x202, 0xAAAA);
        node.board.set_reg(0x222, 0xBBBB);

        regs::restore_peripherals(&mut node.board, &node.fram);
        assert_eq!(node.board.reg(0x202), 0x1111);
        assert_eq!(node.board.reg(0x222), 0xBBBB, "excluded register was replayed");
    }

    #[test]
    fn test_register_table_shape() {
        assert_eq!(REGISTER_TABLE.len(), 514);
        let excluded: Vec<u16> = REGISTER_TABLE
            .iter()
            .filter(|e| e.excluded)
            .map(|e| e.addr)
            .collect();
        assert_eq!(excluded, vec![0x120, 0x140, 0x15c, 0x160, 0x222, 0x224, 0x5a0]);
    }

    #[test]
    fn test_descriptor_fram_must_cover_snapshot_layout() {
        use hibernus_config::{BoardDescriptor, MemoryRange};

        let mut desc = BoardDescriptor {
            name: "launchpad".to_string(),
            mcu: "msp430fr5994".to_string(),
            ram: MemoryRange {
                base: 0x1C00,
                size: "4KiB".to_string(),
            },
            fram: MemoryRange {
                base: 0x6000,
                size: "6KiB".to_string(),
            },
            comparator_pin: "P4.1".to_string(),
            debug_leds: vec![],
        };
        assert!(crate::sim::node_from_descriptor(&desc).is_ok());

        // Too small to hold the snapshot bookkeeping.
        desc.fram.size = "2KiB".to_string();
        assert!(crate::sim::node_from_descriptor(&desc).is_err());

        // Right size, wrong place.
        desc.fram = MemoryRange {
            base: 0x8000,
            size: "6KiB".to_string(),
        };
        assert!(crate::sim::node_from_descriptor(&desc).is_err());
    }

    #[test]
    fn test_snapshot_export() {
        let node = checkpointed_node();
        let snap = crate::snapshot::NodeSnapshot::capture(&node);
        assert_eq!(snap.kind, "hibernus_node");
        assert_eq!(snap.check_flag, 1);
        assert_eq!(snap.core.pc, 0x5A5A);
        assert_eq!(snap.peripheral_registers.len(), 514);

        let json = serde_json::to_string(&snap).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["interrupt_flag"], 4);
    }

    #[test]
    fn test_progress_survives_many_power_cycles() {
        // The whole point of the system: forward progress accumulates
        // across repeated unpredictable power loss.
        let mut fram = FramStore::new();
        for cycle in 0..5u32 {
            let mut node = fresh_node();
            node.fram = fram;

            let outcome = node.enter().unwrap();
            if cycle == 0 {
                assert_eq!(outcome, EnterOutcome::ArmedForHibernate);
            } else {
                assert_eq!(outcome, EnterOutcome::Resumed);
                assert_eq!(node.ram.read_u32(RAM_START), Some(cycle * 10));
            }

            let progress = node.ram.read_u32(RAM_START).unwrap_or(0);
            node.ram.write_u32(RAM_START, progress + 10);

            assert!(node.board.set_supply(false));
            node.on_power_edge().unwrap();
            assert!(node.board.powered_down);
            fram = node.fram;
        }
    }

    #[test]
    fn test_restore_outcome_explicitness() {
        // The failure path is a value, not a fallthrough.
        let mut node = checkpointed_node();
        node.ctx.fail_next_restore = true;
        assert_eq!(node.restore().unwrap(), RestoreOutcome::FellThrough);
    }
}
