use serde::{Deserialize, Serialize};

use crate::context::{ContextOps, CoreContext};
use crate::controller::Node;
use crate::regs::table::REGISTER_COUNT;
use crate::Board;

/// Inspectable view of a node's persistent state, for JSON export.
#[derive(Serialize, Deserialize, Debug)]
pub struct NodeSnapshot {
    pub kind: String,
    pub interrupt_flag: u32,
    pub check_flag: u32,
    pub core: CoreContext,
    pub peripheral_registers: Vec<u16>,
}

impl NodeSnapshot {
    pub fn capture<C: ContextOps, B: Board>(node: &Node<C, B>) -> Self {
        let peripheral_registers = (0..REGISTER_COUNT)
            .map(|i| node.fram.periph_slot(i))
            .collect();
        Self {
            kind: "hibernus_node".to_string(),
            interrupt_flag: node.fram.interrupt_flag_raw(),
            check_flag: node.fram.check_flag_raw(),
            core: node.fram.read_core_context(),
            peripheral_registers,
        }
    }
}
