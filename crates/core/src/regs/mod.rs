//! Peripheral register capture and replay over the [`RegisterBus`] seam.

pub mod table;

use crate::store::FramStore;
use crate::RegisterBus;
use bitflags::bitflags;
use table::REGISTER_TABLE;

bitflags! {
    /// The register blocks that must be unlocked before any write lands
    /// in their group during replay.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LockGroups: u8 {
        const MPU   = 1 << 0;
        const PMM   = 1 << 1;
        const FRCTL = 1 << 2;
        const CS    = 1 << 3;
    }
}

/// Key byte that opens a lock-protected block for writing.
pub const UNLOCK_KEY: u16 = 0xA5;
/// Key byte that closes it again.
pub const LOCK_KEY: u16 = 0x01;

const LOCK_REGISTERS: [(LockGroups, u16); 4] = [
    (LockGroups::MPU, 0x5a0),
    (LockGroups::PMM, 0x120),
    (LockGroups::FRCTL, 0x140),
    (LockGroups::CS, 0x160),
];

fn write_key<B: RegisterBus + ?Sized>(bus: &mut B, groups: LockGroups, key: u16) {
    for (group, addr) in LOCK_REGISTERS {
        if groups.contains(group) {
            let value = (bus.read_reg(addr) & 0x00FF) | (key << 8);
            bus.write_reg(addr, value);
        }
    }
}

/// Capture every register in the table into the persistent snapshot
/// array, by table index. Excluded entries are captured too; exclusion
/// only bites on replay.
pub fn snapshot_peripherals<B: RegisterBus + ?Sized>(bus: &B, store: &mut FramStore) {
    for (i, entry) in REGISTER_TABLE.iter().enumerate() {
        store.set_periph_slot(i, bus.read_reg(entry.addr));
    }
    tracing::debug!(slots = REGISTER_TABLE.len(), "peripheral registers captured");
}

/// Replay the snapshot array back into the register file, skipping the
/// exclusion set. The lock-protected groups are opened before the first
/// write and closed only after the whole table has been processed.
pub fn restore_peripherals<B: RegisterBus + ?Sized>(bus: &mut B, store: &FramStore) {
    write_key(bus, LockGroups::all(), UNLOCK_KEY);

    let mut replayed = 0usize;
    for (i, entry) in REGISTER_TABLE.iter().enumerate() {
        if entry.excluded {
            continue;
        }
        bus.write_reg(entry.addr, store.periph_slot(i));
        replayed += 1;
    }

    write_key(bus, LockGroups::all(), LOCK_KEY);
    tracing::debug!(replayed, "peripheral registers replayed");
}
