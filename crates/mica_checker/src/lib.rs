//! mica_checker: Flow analysis over lowered bound trees.
//!
//! Builds a control flow graph from a lowered body and answers whether
//! every path through it ends in a `return`.

mod flow;

pub use flow::{all_paths_return, BasicBlock, BasicBlockBranch, BlockId, BlockKind, ControlFlowGraph, FlowError};
