use crate::context::{CoreContext, CORE_REGISTER_COUNT};
use crate::regs::table::REGISTER_COUNT;
use crate::{HibResult, HibernusError};

// Fixed FRAM layout, addresses inherited from the MSP430FR5994 port.
// Everything lives above the mirrored RAM range so a mirror restore can
// never overwrite the snapshot bookkeeping.
pub const INTERRUPT_FLAG_ADDR: u32 = 0x6000;
pub const CHECK_FLAG_ADDR: u32 = 0x6004;
pub const SAVED_PC_ADDR: u32 = 0x6008;
pub const CORE_REGS_ADDR: u32 = 0x600C;
pub const RAM_MIRROR_ADDR: u32 = 0x6050;

/// Volatile working-memory extent covered by the mirror.
pub const RAM_START: u32 = 0x1C00;
pub const RAM_END: u32 = 0x2C00;
pub const RAM_SIZE: usize = (RAM_END - RAM_START) as usize;

pub const PERIPH_SNAPSHOT_ADDR: u32 = RAM_MIRROR_ADDR + RAM_SIZE as u32;

pub const FRAM_BASE: u32 = 0x6000;
pub const FRAM_SIZE: usize = 0x1800;

/// Sentinel forced into the check flag when a corrupt snapshot is
/// discarded, steering the controller onto the arm path.
pub const SETUP_SENTINEL: u32 = 2;

/// How many times the fault LED flashes when a boot finds a snapshot
/// that was expected but never committed.
pub const FAULT_FLASH_COUNT: u32 = 5;

/// Which edge the interrupt line is armed for and what the handler
/// should do when it fires. Persisted; survives power loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptFlag {
    Idle,
    ArmedForRestore,
    ArmedForHibernate,
    PostHibernateIdle,
}

impl InterruptFlag {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => InterruptFlag::ArmedForRestore,
            2 => InterruptFlag::ArmedForHibernate,
            4 => InterruptFlag::PostHibernateIdle,
            _ => InterruptFlag::Idle,
        }
    }

    pub fn as_raw(self) -> u32 {
        match self {
            InterruptFlag::Idle => 0,
            InterruptFlag::ArmedForRestore => 1,
            InterruptFlag::ArmedForHibernate => 2,
            InterruptFlag::PostHibernateIdle => 4,
        }
    }
}

/// Whether a complete, committed snapshot exists in the store.
///
/// Anything outside the two meaningful values is `Unknown`: first boot
/// over erased storage, or the leavings of a cycle that died mid-save.
/// Both are treated as "nothing to restore".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFlag {
    NoValidSnapshot,
    ValidSnapshot,
    Unknown(u32),
}

impl CheckFlag {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => CheckFlag::NoValidSnapshot,
            1 => CheckFlag::ValidSnapshot,
            other => CheckFlag::Unknown(other),
        }
    }

    pub fn as_raw(self) -> u32 {
        match self {
            CheckFlag::NoValidSnapshot => 0,
            CheckFlag::ValidSnapshot => 1,
            CheckFlag::Unknown(other) => other,
        }
    }
}

/// A flat byte store with a base address, bounds-checked at the edges.
#[derive(Debug, Clone)]
pub struct LinearMemory {
    pub data: Vec<u8>,
    pub base_addr: u32,
}

impl LinearMemory {
    pub fn new(size: usize, base_addr: u32) -> Self {
        Self {
            data: vec![0; size],
            base_addr,
        }
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base_addr && addr < self.base_addr + self.data.len() as u32
    }

    pub fn read_u8(&self, addr: u32) -> Option<u8> {
        if self.contains(addr) {
            Some(self.data[(addr - self.base_addr) as usize])
        } else {
            None
        }
    }

    pub fn write_u8(&mut self, addr: u32, value: u8) -> bool {
        if self.contains(addr) {
            self.data[(addr - self.base_addr) as usize] = value;
            true
        } else {
            false
        }
    }

    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        let b0 = self.read_u8(addr)? as u32;
        let b1 = self.read_u8(addr + 1)? as u32;
        let b2 = self.read_u8(addr + 2)? as u32;
        let b3 = self.read_u8(addr + 3)? as u32;
        // Little endian
        Some(b0 | (b1 << 8) | (b2 << 16) | (b3 << 24))
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> bool {
        self.write_u8(addr, (value & 0xFF) as u8)
            && self.write_u8(addr + 1, ((value >> 8) & 0xFF) as u8)
            && self.write_u8(addr + 2, ((value >> 16) & 0xFF) as u8)
            && self.write_u8(addr + 3, ((value >> 24) & 0xFF) as u8)
    }
}

/// The non-volatile state store: control flags, saved execution context,
/// the working-memory mirror and the peripheral snapshot array, all at
/// fixed addresses.
///
/// A freshly constructed store models erased FRAM (all `0xFF`), which the
/// flag accessors read back as `CheckFlag::Unknown`, the state a first
/// boot is supposed to find.
#[derive(Debug, Clone)]
pub struct FramStore {
    mem: LinearMemory,
}

impl Default for FramStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FramStore {
    pub fn new() -> Self {
        let mut mem = LinearMemory::new(FRAM_SIZE, FRAM_BASE);
        mem.data.fill(0xFF);
        Self { mem }
    }

    pub fn read_u32(&self, addr: u32) -> HibResult<u32> {
        self.mem
            .read_u32(addr)
            .ok_or(HibernusError::StoreOutOfRange(addr))
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> HibResult<()> {
        if self.mem.write_u32(addr, value) {
            Ok(())
        } else {
            Err(HibernusError::StoreOutOfRange(addr))
        }
    }

    // The fixed-layout accessors below index inside the owned buffer and
    // cannot fail; the layout constants are all within FRAM_SIZE.

    fn scalar(&self, addr: u32) -> u32 {
        self.mem.read_u32(addr).unwrap_or(0)
    }

    fn set_scalar(&mut self, addr: u32, value: u32) {
        self.mem.write_u32(addr, value);
    }

    pub fn interrupt_flag(&self) -> InterruptFlag {
        InterruptFlag::from_raw(self.scalar(INTERRUPT_FLAG_ADDR))
    }

    pub fn set_interrupt_flag(&mut self, flag: InterruptFlag) {
        self.set_scalar(INTERRUPT_FLAG_ADDR, flag.as_raw());
    }

    pub fn check_flag(&self) -> CheckFlag {
        CheckFlag::from_raw(self.scalar(CHECK_FLAG_ADDR))
    }

    pub fn set_check_flag(&mut self, flag: CheckFlag) {
        self.set_scalar(CHECK_FLAG_ADDR, flag.as_raw());
    }

    pub fn check_flag_raw(&self) -> u32 {
        self.scalar(CHECK_FLAG_ADDR)
    }

    pub fn set_check_flag_raw(&mut self, raw: u32) {
        self.set_scalar(CHECK_FLAG_ADDR, raw);
    }

    pub fn interrupt_flag_raw(&self) -> u32 {
        self.scalar(INTERRUPT_FLAG_ADDR)
    }

    pub fn saved_pc(&self) -> u32 {
        self.scalar(SAVED_PC_ADDR)
    }

    pub fn set_saved_pc(&mut self, pc: u32) {
        self.set_scalar(SAVED_PC_ADDR, pc);
    }

    pub fn write_core_context(&mut self, ctx: &CoreContext) {
        for (i, reg) in ctx.regs.iter().enumerate() {
            self.set_scalar(CORE_REGS_ADDR + (i as u32) * 4, *reg);
        }
        self.set_saved_pc(ctx.pc);
    }

    pub fn read_core_context(&self) -> CoreContext {
        let mut ctx = CoreContext::default();
        for i in 0..CORE_REGISTER_COUNT {
            ctx.regs[i] = self.scalar(CORE_REGS_ADDR + (i as u32) * 4);
        }
        ctx.pc = self.saved_pc();
        ctx
    }

    /// Copy the full volatile working-memory range into the mirror.
    pub fn mirror_from_ram(&mut self, ram: &LinearMemory) -> HibResult<()> {
        if ram.data.len() > RAM_SIZE {
            return Err(HibernusError::MirrorTooSmall {
                need: ram.data.len(),
                have: RAM_SIZE,
            });
        }
        let start = (RAM_MIRROR_ADDR - FRAM_BASE) as usize;
        self.mem.data[start..start + ram.data.len()].copy_from_slice(&ram.data);
        Ok(())
    }

    /// Copy the mirror back over volatile working memory.
    pub fn restore_ram(&self, ram: &mut LinearMemory) -> HibResult<()> {
        if ram.data.len() > RAM_SIZE {
            return Err(HibernusError::MirrorTooSmall {
                need: ram.data.len(),
                have: RAM_SIZE,
            });
        }
        let start = (RAM_MIRROR_ADDR - FRAM_BASE) as usize;
        let len = ram.data.len();
        ram.data.copy_from_slice(&self.mem.data[start..start + len]);
        Ok(())
    }

    pub fn periph_slot(&self, index: usize) -> u16 {
        debug_assert!(index < REGISTER_COUNT);
        let addr = PERIPH_SNAPSHOT_ADDR + (index as u32) * 2;
        let lo = self.mem.read_u8(addr).unwrap_or(0) as u16;
        let hi = self.mem.read_u8(addr + 1).unwrap_or(0) as u16;
        lo | (hi << 8)
    }

    pub fn set_periph_slot(&mut self, index: usize, value: u16) {
        debug_assert!(index < REGISTER_COUNT);
        let addr = PERIPH_SNAPSHOT_ADDR + (index as u32) * 2;
        self.mem.write_u8(addr, (value & 0xFF) as u8);
        self.mem.write_u8(addr + 1, (value >> 8) as u8);
    }
}
