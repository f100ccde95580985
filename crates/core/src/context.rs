use serde::{Deserialize, Serialize};

/// R1..R15 of the general-purpose register file. R1 is the stack pointer
/// and carries the frame link used to splice back into the interrupted
/// call stack; R0 is the program counter and is saved separately.
pub const CORE_REGISTER_COUNT: usize = 15;

/// The execution context captured at the moment of hibernation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreContext {
    pub regs: [u32; CORE_REGISTER_COUNT],
    pub pc: u32,
}

impl CoreContext {
    /// The stack-linking value (R1).
    pub fn frame_link(&self) -> u32 {
        self.regs[0]
    }
}

/// What happened when the saved context was replayed.
///
/// On real hardware a successful splice never returns: control lands at
/// the instruction after the original save. Making the failure case an
/// explicit value instead of "code after a jump that should never run"
/// keeps the path simulatable off-hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Execution is logically back inside the interrupted context.
    Resumed,
    /// The control transfer did not divert; the caller must degrade to a
    /// fresh start.
    FellThrough,
}

/// The architecture-coupled register transfer primitive. This is the only
/// seam behind which privileged, platform-specific code lives.
pub trait ContextOps {
    /// Capture the live register file and the resume address.
    ///
    /// Not reentrant: the caller keeps interrupts out of this path for
    /// the duration of the capture.
    fn save_core_registers(&mut self) -> CoreContext;

    /// Write the register file back and transfer control to the saved
    /// resume point. Precondition: working memory and peripheral
    /// registers have already been restored, because the spliced code
    /// expects that state to be in place the instant it runs.
    fn restore_core_registers(&mut self, ctx: &CoreContext) -> RestoreOutcome;
}
