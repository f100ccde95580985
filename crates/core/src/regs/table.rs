//! The compiled-in catalogue of peripheral/control registers captured on
//! hibernate and replayed on restore.
//!
//! Addresses are the MSP430FR5994 memory-mapped register file. Slot order
//! is part of the persisted layout: `FramStore` stores snapshot words by
//! table index, so entries must never be reordered.
//!
//! Excluded entries are still captured but never replayed verbatim:
//! the lock-protected blocks (PMM, FRAM controller, watchdog, clock
//! system, MPU) force a power-up clear when their key byte is written
//! with a copied value, and the radio port pins (P3OUT/P3DIR) must not
//! twitch during restore or the radio's wake line fires.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegisterCategory {
    Sfr,
    Pmm,
    FramController,
    Crc16,
    RamController,
    Watchdog,
    ClockSystem,
    Sys,
    SharedReference,
    Port,
    Timer,
    CapTouch,
    Rtc,
    Multiplier,
    Dma,
    Mpu,
    Usci,
    Adc,
    Comparator,
    Crc32,
    Aes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterEntry {
    pub addr: u16,
    pub category: RegisterCategory,
    pub excluded: bool,
}

pub const REGISTER_COUNT: usize = 514;

const fn r(addr: u16, category: RegisterCategory) -> RegisterEntry {
    RegisterEntry {
        addr,
        category,
        excluded: false,
    }
}

const fn x(addr: u16, category: RegisterCategory) -> RegisterEntry {
    RegisterEntry {
        addr,
        category,
        excluded: true,
    }
}

use RegisterCategory as C;

pub static REGISTER_TABLE: [RegisterEntry; REGISTER_COUNT] = [
    // Special function registers
    r(0x100, C::Sfr), r(0x102, C::Sfr), r(0x104, C::Sfr),
    // PMM (PMMCTL0 is lock-protected)
    x(0x120, C::Pmm), r(0x12a, C::Pmm), r(0x130, C::Pmm),
    // FRAM controller A (FRCTL0 is lock-protected)
    x(0x140, C::FramController), r(0x144, C::FramController), r(0x146, C::FramController),
    // CRC16
    r(0x150, C::Crc16), r(0x152, C::Crc16), r(0x154, C::Crc16), r(0x156, C::Crc16),
    // RAM controller
    r(0x158, C::RamController),
    // Watchdog (WDTCTL is password-protected)
    x(0x15c, C::Watchdog),
    // Clock system (CSCTL0 is lock-protected)
    x(0x160, C::ClockSystem), r(0x162, C::ClockSystem), r(0x164, C::ClockSystem),
    r(0x168, C::ClockSystem), r(0x16a, C::ClockSystem), r(0x16c, C::ClockSystem),
    // Sys registers
    r(0x180, C::Sys), r(0x186, C::Sys), r(0x188, C::Sys), r(0x18a, C::Sys), r(0x18c, C::Sys),
    r(0x18e, C::Sys), r(0x19a, C::Sys), r(0x19c, C::Sys), r(0x19e, C::Sys),
    // Shared reference
    r(0x1b0, C::SharedReference),
    // Port 1
    r(0x200, C::Port), r(0x202, C::Port), r(0x204, C::Port), r(0x206, C::Port),
    r(0x20a, C::Port), r(0x20c, C::Port), r(0x20e, C::Port), r(0x216, C::Port),
    r(0x218, C::Port), r(0x21a, C::Port), r(0x21c, C::Port),
    // Port 2
    r(0x201, C::Port), r(0x203, C::Port), r(0x205, C::Port), r(0x207, C::Port),
    r(0x20b, C::Port), r(0x20d, C::Port), r(0x217, C::Port), r(0x21e, C::Port),
    r(0x219, C::Port), r(0x21b, C::Port), r(0x21d, C::Port),
    // Port 3 (P3OUT/P3DIR drive the radio pins; hands off)
    r(0x220, C::Port), x(0x222, C::Port), x(0x224, C::Port), r(0x226, C::Port),
    r(0x22a, C::Port), r(0x22c, C::Port), r(0x22e, C::Port), r(0x236, C::Port),
    r(0x238, C::Port), r(0x23a, C::Port), r(0x23c, C::Port),
    // Port 4
    r(0x221, C::Port), r(0x223, C::Port), r(0x225, C::Port), r(0x227, C::Port),
    r(0x22b, C::Port), r(0x22d, C::Port), r(0x237, C::Port), r(0x23e, C::Port),
    r(0x239, C::Port), r(0x23b, C::Port), r(0x23d, C::Port),
    // Port 5
    r(0x240, C::Port), r(0x242, C::Port), r(0x244, C::Port), r(0x246, C::Port),
    r(0x24a, C::Port), r(0x24c, C::Port), r(0x24e, C::Port), r(0x256, C::Port),
    r(0x258, C::Port), r(0x25a, C::Port), r(0x25c, C::Port),
    // Port 6
    r(0x241, C::Port), r(0x243, C::Port), r(0x245, C::Port), r(0x247, C::Port),
    r(0x24b, C::Port), r(0x24d, C::Port), r(0x257, C::Port), r(0x25e, C::Port),
    r(0x259, C::Port), r(0x25b, C::Port), r(0x25d, C::Port),
    // Port 7
    r(0x260, C::Port), r(0x262, C::Port), r(0x264, C::Port), r(0x266, C::Port),
    r(0x26a, C::Port), r(0x26c, C::Port), r(0x26e, C::Port), r(0x276, C::Port),
    r(0x278, C::Port), r(0x27a, C::Port), r(0x27c, C::Port),
    // Port 8
    r(0x261, C::Port), r(0x263, C::Port), r(0x265, C::Port), r(0x267, C::Port),
    r(0x26b, C::Port), r(0x26d, C::Port), r(0x277, C::Port), r(0x27e, C::Port),
    r(0x279, C::Port), r(0x27b, C::Port), r(0x27d, C::Port),
    // Port J
    r(0x320, C::Port), r(0x322, C::Port), r(0x324, C::Port), r(0x326, C::Port),
    r(0x32a, C::Port), r(0x32c, C::Port), r(0x336, C::Port),
    // TA0
    r(0x340, C::Timer), r(0x342, C::Timer), r(0x344, C::Timer), r(0x346, C::Timer),
    r(0x350, C::Timer), r(0x352, C::Timer), r(0x354, C::Timer), r(0x356, C::Timer),
    r(0x360, C::Timer), r(0x36e, C::Timer),
    // TA1
    r(0x380, C::Timer), r(0x382, C::Timer), r(0x384, C::Timer), r(0x386, C::Timer),
    r(0x390, C::Timer), r(0x392, C::Timer), r(0x394, C::Timer), r(0x396, C::Timer),
    r(0x3a0, C::Timer), r(0x3ae, C::Timer),
    // TB0
    r(0x3c0, C::Timer), r(0x3c2, C::Timer), r(0x3c4, C::Timer), r(0x3c6, C::Timer),
    r(0x3c8, C::Timer), r(0x3ca, C::Timer), r(0x3cc, C::Timer), r(0x3ce, C::Timer),
    r(0x3d0, C::Timer), r(0x3d2, C::Timer), r(0x3d4, C::Timer), r(0x3d6, C::Timer),
    r(0x3d8, C::Timer), r(0x3da, C::Timer), r(0x3dc, C::Timer), r(0x3de, C::Timer),
    r(0x3e0, C::Timer), r(0x3ee, C::Timer),
    // TA2
    r(0x400, C::Timer), r(0x402, C::Timer), r(0x404, C::Timer), r(0x410, C::Timer),
    r(0x412, C::Timer), r(0x420, C::Timer), r(0x42e, C::Timer),
    // Capacitive touch I/O 0
    r(0x430, C::CapTouch),
    // TA3
    r(0x440, C::Timer), r(0x442, C::Timer), r(0x444, C::Timer), r(0x450, C::Timer),
    r(0x452, C::Timer), r(0x454, C::Timer), r(0x460, C::Timer), r(0x46e, C::Timer),
    // Capacitive touch I/O 1
    r(0x470, C::CapTouch),
    // RTC_C (the datasheet block overlaps a few TA3 addresses; the
    // original list keeps them and so does the persisted slot layout)
    r(0x4a0, C::Rtc), r(0x4a1, C::Rtc), r(0x4a2, C::Rtc), r(0x4a3, C::Rtc),
    r(0x4a4, C::Rtc), r(0x4a6, C::Rtc), r(0x4a8, C::Rtc), r(0x4aa, C::Rtc),
    r(0x4ac, C::Rtc), r(0x4ad, C::Rtc), r(0x4ae, C::Rtc),
    r(0x450, C::Rtc), r(0x451, C::Rtc), r(0x452, C::Rtc), r(0x453, C::Rtc),
    r(0x454, C::Rtc), r(0x455, C::Rtc), r(0x456, C::Rtc), r(0x458, C::Rtc),
    r(0x459, C::Rtc), r(0x45a, C::Rtc), r(0x45b, C::Rtc),
    r(0x45c, C::Rtc), r(0x45e, C::Rtc),
    // 32-bit hardware multiplier
    r(0x4c0, C::Multiplier), r(0x4c2, C::Multiplier), r(0x4c4, C::Multiplier),
    r(0x4c6, C::Multiplier), r(0x4c8, C::Multiplier), r(0x4ca, C::Multiplier),
    r(0x4cc, C::Multiplier), r(0x4ce, C::Multiplier), r(0x4d0, C::Multiplier),
    r(0x4d2, C::Multiplier), r(0x4d4, C::Multiplier), r(0x4d6, C::Multiplier),
    r(0x4d8, C::Multiplier), r(0x4da, C::Multiplier), r(0x4dc, C::Multiplier),
    r(0x4de, C::Multiplier), r(0x4e0, C::Multiplier), r(0x4e2, C::Multiplier),
    r(0x4e4, C::Multiplier), r(0x4e6, C::Multiplier), r(0x4e8, C::Multiplier),
    r(0x4ea, C::Multiplier), r(0x4ec, C::Multiplier),
    // DMA general control
    r(0x500, C::Dma), r(0x502, C::Dma), r(0x504, C::Dma), r(0x506, C::Dma),
    r(0x508, C::Dma), r(0x50e, C::Dma),
    // DMA channel 0
    r(0x510, C::Dma), r(0x512, C::Dma), r(0x514, C::Dma), r(0x516, C::Dma),
    r(0x518, C::Dma), r(0x51a, C::Dma),
    // DMA channel 1
    r(0x520, C::Dma), r(0x522, C::Dma), r(0x524, C::Dma), r(0x526, C::Dma),
    r(0x528, C::Dma), r(0x52a, C::Dma),
    // DMA channel 2
    r(0x530, C::Dma), r(0x532, C::Dma), r(0x534, C::Dma), r(0x536, C::Dma),
    r(0x538, C::Dma), r(0x53a, C::Dma),
    // DMA channel 3
    r(0x540, C::Dma), r(0x542, C::Dma), r(0x544, C::Dma), r(0x546, C::Dma),
    r(0x548, C::Dma), r(0x54a, C::Dma),
    // DMA channel 4
    r(0x550, C::Dma), r(0x552, C::Dma), r(0x554, C::Dma), r(0x556, C::Dma),
    r(0x558, C::Dma), r(0x55a, C::Dma),
    // DMA channel 5
    r(0x560, C::Dma), r(0x562, C::Dma), r(0x564, C::Dma), r(0x566, C::Dma),
    r(0x568, C::Dma), r(0x56a, C::Dma),
    // MPU control (MPUCTL0 is lock-protected)
    x(0x5a0, C::Mpu), r(0x5a2, C::Mpu), r(0x5a4, C::Mpu), r(0x5a6, C::Mpu),
    r(0x5a8, C::Mpu), r(0x5aa, C::Mpu), r(0x5ac, C::Mpu), r(0x5ae, C::Mpu),
    // eUSCI_A0
    r(0x5c0, C::Usci), r(0x5c2, C::Usci), r(0x5c6, C::Usci), r(0x5c7, C::Usci),
    r(0x5c8, C::Usci), r(0x5ca, C::Usci), r(0x5cc, C::Usci), r(0x5ce, C::Usci),
    r(0x5d0, C::Usci), r(0x5d2, C::Usci), r(0x5d3, C::Usci), r(0x5da, C::Usci),
    r(0x5dc, C::Usci), r(0x5de, C::Usci),
    // eUSCI_A1
    r(0x5e0, C::Usci), r(0x5e2, C::Usci), r(0x5e6, C::Usci), r(0x5e7, C::Usci),
    r(0x5e8, C::Usci), r(0x5ea, C::Usci), r(0x5ec, C::Usci), r(0x5ee, C::Usci),
    r(0x5f0, C::Usci), r(0x5f2, C::Usci), r(0x5f3, C::Usci), r(0x5fa, C::Usci),
    r(0x5fc, C::Usci), r(0x5fe, C::Usci),
    // eUSCI_A2
    r(0x600, C::Usci), r(0x602, C::Usci), r(0x606, C::Usci), r(0x607, C::Usci),
    r(0x608, C::Usci), r(0x60a, C::Usci), r(0x60c, C::Usci), r(0x60e, C::Usci),
    r(0x610, C::Usci), r(0x612, C::Usci), r(0x613, C::Usci), r(0x61a, C::Usci),
    r(0x61c, C::Usci), r(0x61e, C::Usci),
    // eUSCI_A3
    r(0x620, C::Usci), r(0x622, C::Usci), r(0x626, C::Usci), r(0x627, C::Usci),
    r(0x628, C::Usci), r(0x62a, C::Usci), r(0x62c, C::Usci), r(0x62e, C::Usci),
    r(0x630, C::Usci), r(0x632, C::Usci), r(0x633, C::Usci), r(0x63a, C::Usci),
    r(0x63c, C::Usci), r(0x63e, C::Usci),
    // eUSCI_B0
    r(0x640, C::Usci), r(0x642, C::Usci), r(0x646, C::Usci), r(0x647, C::Usci),
    r(0x648, C::Usci), r(0x64a, C::Usci), r(0x64c, C::Usci), r(0x64e, C::Usci),
    r(0x654, C::Usci), r(0x656, C::Usci), r(0x658, C::Usci), r(0x65a, C::Usci),
    r(0x65c, C::Usci), r(0x65e, C::Usci), r(0x660, C::Usci), r(0x66a, C::Usci),
    r(0x66c, C::Usci), r(0x66e, C::Usci),
    // eUSCI_B1
    r(0x680, C::Usci), r(0x682, C::Usci), r(0x686, C::Usci), r(0x687, C::Usci),
    r(0x688, C::Usci), r(0x68a, C::Usci), r(0x68c, C::Usci), r(0x68e, C::Usci),
    r(0x694, C::Usci), r(0x696, C::Usci), r(0x698, C::Usci), r(0x69a, C::Usci),
    r(0x69c, C::Usci), r(0x69e, C::Usci), r(0x6a0, C::Usci), r(0x6aa, C::Usci),
    r(0x6ac, C::Usci), r(0x6ae, C::Usci),
    // eUSCI_B2
    r(0x6c0, C::Usci), r(0x6c2, C::Usci), r(0x6c6, C::Usci), r(0x6c7, C::Usci),
    r(0x6c8, C::Usci), r(0x6ca, C::Usci), r(0x6cc, C::Usci), r(0x6ce, C::Usci),
    r(0x6d4, C::Usci), r(0x6d6, C::Usci), r(0x6d8, C::Usci), r(0x6da, C::Usci),
    r(0x6dc, C::Usci), r(0x6de, C::Usci), r(0x6e0, C::Usci), r(0x6ea, C::Usci),
    r(0x6ec, C::Usci), r(0x6ee, C::Usci),
    // eUSCI_B3
    r(0x700, C::Usci), r(0x702, C::Usci), r(0x706, C::Usci), r(0x707, C::Usci),
    r(0x708, C::Usci), r(0x70a, C::Usci), r(0x70c, C::Usci), r(0x70e, C::Usci),
    r(0x714, C::Usci), r(0x716, C::Usci), r(0x718, C::Usci), r(0x71a, C::Usci),
    r(0x71c, C::Usci), r(0x71e, C::Usci), r(0x720, C::Usci), r(0x72a, C::Usci),
    r(0x72c, C::Usci), r(0x72e, C::Usci),
    // TA4
    r(0x7c0, C::Timer), r(0x7c2, C::Timer), r(0x7c4, C::Timer), r(0x7d0, C::Timer),
    r(0x7d2, C::Timer), r(0x7d4, C::Timer), r(0x7e0, C::Timer), r(0x7ee, C::Timer),
    // ADC12_B
    r(0x800, C::Adc), r(0x802, C::Adc), r(0x804, C::Adc), r(0x806, C::Adc),
    r(0x808, C::Adc), r(0x80a, C::Adc), r(0x80c, C::Adc), r(0x80e, C::Adc),
    r(0x810, C::Adc), r(0x812, C::Adc), r(0x814, C::Adc), r(0x816, C::Adc),
    r(0x818, C::Adc),
    r(0x820, C::Adc), r(0x822, C::Adc), r(0x824, C::Adc), r(0x826, C::Adc),
    r(0x828, C::Adc), r(0x82a, C::Adc), r(0x82c, C::Adc), r(0x82e, C::Adc),
    r(0x830, C::Adc), r(0x832, C::Adc), r(0x834, C::Adc), r(0x836, C::Adc),
    r(0x838, C::Adc), r(0x83a, C::Adc), r(0x83c, C::Adc), r(0x83e, C::Adc),
    r(0x840, C::Adc), r(0x842, C::Adc), r(0x844, C::Adc), r(0x846, C::Adc),
    r(0x848, C::Adc), r(0x84a, C::Adc), r(0x84c, C::Adc), r(0x84e, C::Adc),
    r(0x850, C::Adc), r(0x852, C::Adc), r(0x854, C::Adc), r(0x856, C::Adc),
    r(0x858, C::Adc), r(0x85a, C::Adc), r(0x85c, C::Adc), r(0x85e, C::Adc),
    r(0x860, C::Adc), r(0x862, C::Adc), r(0x864, C::Adc), r(0x866, C::Adc),
    r(0x868, C::Adc), r(0x86a, C::Adc), r(0x86c, C::Adc), r(0x86e, C::Adc),
    r(0x870, C::Adc), r(0x872, C::Adc), r(0x874, C::Adc), r(0x876, C::Adc),
    r(0x878, C::Adc), r(0x87a, C::Adc), r(0x87c, C::Adc), r(0x87e, C::Adc),
    r(0x880, C::Adc), r(0x882, C::Adc), r(0x884, C::Adc), r(0x886, C::Adc),
    r(0x888, C::Adc), r(0x88a, C::Adc), r(0x88c, C::Adc), r(0x88e, C::Adc),
    r(0x890, C::Adc), r(0x892, C::Adc), r(0x894, C::Adc), r(0x896, C::Adc),
    r(0x898, C::Adc), r(0x89a, C::Adc), r(0x89c, C::Adc), r(0x89e, C::Adc),
    // Comparator_E
    r(0x8c0, C::Comparator), r(0x8c2, C::Comparator), r(0x8c4, C::Comparator),
    r(0x8c6, C::Comparator), r(0x8cc, C::Comparator), r(0x8ce, C::Comparator),
    // CRC32 (reserved datasheet slots are not in the table)
    r(0x980, C::Crc32), r(0x986, C::Crc32), r(0x988, C::Crc32), r(0x98a, C::Crc32),
    r(0x99c, C::Crc32), r(0x99e, C::Crc32), r(0x9a0, C::Crc32), r(0x9a6, C::Crc32),
    r(0x9a8, C::Crc32), r(0x9ae, C::Crc32),
    // AES accelerator (reserved datasheet slots are not in the table)
    r(0x9c0, C::Aes), r(0x9c4, C::Aes), r(0x9c6, C::Aes), r(0x9c8, C::Aes),
    r(0x9ca, C::Aes), r(0x9cc, C::Aes), r(0x9ce, C::Aes),
];
