//! Control flow graphs over lowered statement lists.
//!
//! A lowered body is split into basic blocks: a block starts at a label and
//! ends after a goto, a conditional goto or a return. Two synthetic blocks
//! bracket the graph, `start` (which falls into the first block) and `end`
//! (which every return and the final fall-through lead to).
//!
//! Branch conditions that fold to a constant only produce the edge that
//! can be taken. Blocks left without any incoming edge are taken out of
//! the graph and kept in [`ControlFlowGraph::unreachable`].

use indexmap::IndexMap;
use mica_binder::bound::*;
use mica_binder::TypeSymbol;
use mica_syntax::SyntaxKind;
use rustc_hash::FxHashMap;
use std::fmt::{self, Write as _};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Structured statements must be lowered before building a graph.
    #[error("unexpected {0:?} in a lowered body")]
    UnexpectedStatement(BoundNodeKind),
    #[error("jump to label '{0}' which is not declared in this body")]
    UnknownLabel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Start,
    End,
    Code,
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub statements: Vec<BoundStatement>,
}

impl BasicBlock {
    fn new(id: BlockId, kind: BlockKind, statements: Vec<BoundStatement>) -> Self {
        Self { id, kind, statements }
    }

    pub fn is_start(&self) -> bool {
        self.kind == BlockKind::Start
    }

    pub fn is_end(&self) -> bool {
        self.kind == BlockKind::End
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BlockKind::Start => f.write_str("<Start>"),
            BlockKind::End => f.write_str("<End>"),
            BlockKind::Code => {
                for statement in &self.statements {
                    f.write_str(&BoundTreePrinter::new().print_statement(statement))?;
                }
                Ok(())
            }
        }
    }
}

/// An edge between two blocks. `condition` is what must hold for the edge
/// to be taken; unconditional edges have none.
#[derive(Debug, Clone)]
pub struct BasicBlockBranch {
    pub from: BlockId,
    pub to: BlockId,
    pub condition: Option<BoundExpression>,
}

#[derive(Debug)]
pub struct ControlFlowGraph {
    start: BlockId,
    end: BlockId,
    blocks: IndexMap<BlockId, BasicBlock>,
    branches: Vec<BasicBlockBranch>,
    unreachable: Vec<BasicBlock>,
}

impl ControlFlowGraph {
    /// Build the graph for a lowered body.
    pub fn build(body: &BoundBlockStatement) -> Result<Self, FlowError> {
        let code_blocks = partition(&body.statements)?;
        let mut builder = GraphBuilder::new(code_blocks);
        builder.connect_all()?;
        let graph = builder.finish();
        debug!(
            blocks = graph.blocks.len(),
            branches = graph.branches.len(),
            unreachable = graph.unreachable.len(),
            "control flow graph built"
        );
        Ok(graph)
    }

    pub fn start(&self) -> &BasicBlock {
        &self.blocks[&self.start]
    }

    pub fn end(&self) -> &BasicBlock {
        &self.blocks[&self.end]
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    /// Reachable blocks, start first and end last.
    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values()
    }

    pub fn branches(&self) -> &[BasicBlockBranch] {
        &self.branches
    }

    pub fn unreachable(&self) -> &[BasicBlock] {
        &self.unreachable
    }

    pub fn incoming(&self, id: BlockId) -> impl Iterator<Item = &BasicBlockBranch> {
        self.branches.iter().filter(move |b| b.to == id)
    }

    pub fn outgoing(&self, id: BlockId) -> impl Iterator<Item = &BasicBlockBranch> {
        self.branches.iter().filter(move |b| b.from == id)
    }

    /// Graphviz rendering, one node per reachable block.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph G {\n");
        for block in self.blocks() {
            let label = block.to_string().replace('"', "\\\"").replace('\n', "\\l");
            let _ = writeln!(out, "    N{} [label = \"{}\", shape = box]", block.id.0, label);
        }
        for branch in &self.branches {
            let label = branch
                .condition
                .as_ref()
                .map(|c| c.to_string().replace('"', "\\\""))
                .unwrap_or_default();
            let _ = writeln!(out, "    N{} -> N{} [label = \"{}\"]", branch.from.0, branch.to.0, label);
        }
        out.push_str("}\n");
        out
    }
}

/// Whether every path through a lowered body ends in a `return`.
pub fn all_paths_return(body: &BoundBlockStatement) -> Result<bool, FlowError> {
    let graph = ControlFlowGraph::build(body)?;
    let returns = graph.incoming(graph.end).all(|branch| {
        graph
            .block(branch.from)
            .and_then(|block| block.statements.last())
            .is_some_and(|last| matches!(last, BoundStatement::Return(_)))
    });
    Ok(returns)
}

/// Split statements into the statement lists of the code blocks.
fn partition(statements: &[BoundStatement]) -> Result<Vec<Vec<BoundStatement>>, FlowError> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for statement in statements {
        match statement {
            BoundStatement::Label(_) => {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                current.push(statement.clone());
            }
            BoundStatement::Goto(_) | BoundStatement::ConditionalGoto(_) | BoundStatement::Return(_) => {
                current.push(statement.clone());
                blocks.push(std::mem::take(&mut current));
            }
            BoundStatement::VariableDeclaration(_) | BoundStatement::Expression(_) | BoundStatement::Nop(_) => {
                current.push(statement.clone());
            }
            BoundStatement::Block(_)
            | BoundStatement::If(_)
            | BoundStatement::While(_)
            | BoundStatement::DoWhile(_)
            | BoundStatement::For(_)
            | BoundStatement::Defer(_)
            | BoundStatement::Match(_) => return Err(FlowError::UnexpectedStatement(statement.kind())),
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    Ok(blocks)
}

struct GraphBuilder {
    start: BlockId,
    end: BlockId,
    blocks: IndexMap<BlockId, BasicBlock>,
    /// Code blocks in statement order.
    order: Vec<BlockId>,
    labels: FxHashMap<LabelId, BlockId>,
    branches: Vec<BasicBlockBranch>,
}

impl GraphBuilder {
    fn new(code_blocks: Vec<Vec<BoundStatement>>) -> Self {
        let start = BlockId(0);
        let end = BlockId(code_blocks.len() as u32 + 1);

        let mut blocks = IndexMap::with_capacity(code_blocks.len() + 2);
        let mut order = Vec::with_capacity(code_blocks.len());
        let mut labels = FxHashMap::default();

        blocks.insert(start, BasicBlock::new(start, BlockKind::Start, Vec::new()));
        for (i, statements) in code_blocks.into_iter().enumerate() {
            let id = BlockId(i as u32 + 1);
            if let Some(BoundStatement::Label(label)) = statements.first() {
                labels.insert(label.label.id(), id);
            }
            order.push(id);
            blocks.insert(id, BasicBlock::new(id, BlockKind::Code, statements));
        }
        blocks.insert(end, BasicBlock::new(end, BlockKind::End, Vec::new()));

        Self {
            start,
            end,
            blocks,
            order,
            labels,
            branches: Vec::new(),
        }
    }

    fn connect_all(&mut self) -> Result<(), FlowError> {
        let first = self.order.first().copied().unwrap_or(self.end);
        self.connect(self.start, first, None);

        let order = self.order.clone();
        for (i, &current) in order.iter().enumerate() {
            let next = order.get(i + 1).copied().unwrap_or(self.end);
            let last = self.blocks[&current].statements.last().cloned();
            match last {
                Some(BoundStatement::Goto(goto)) => {
                    let target = self.label_block(&goto.label)?;
                    self.connect(current, target, None);
                }
                Some(BoundStatement::ConditionalGoto(goto)) => {
                    let target = self.label_block(&goto.label)?;
                    let negated = negate(&goto.condition);
                    let (taken, fallthrough) = if goto.jump_if_true {
                        (goto.condition, negated)
                    } else {
                        (negated, goto.condition)
                    };
                    self.connect(current, target, Some(taken));
                    self.connect(current, next, Some(fallthrough));
                }
                Some(BoundStatement::Return(_)) => self.connect(current, self.end, None),
                _ => self.connect(current, next, None),
            }
        }
        Ok(())
    }

    fn label_block(&self, label: &BoundLabel) -> Result<BlockId, FlowError> {
        self.labels
            .get(&label.id())
            .copied()
            .ok_or_else(|| FlowError::UnknownLabel(label.name().to_string()))
    }

    fn connect(&mut self, from: BlockId, to: BlockId, condition: Option<BoundExpression>) {
        let condition = match condition {
            Some(c) => match c.constant_value().and_then(|v| v.as_bool()) {
                Some(true) => None,
                Some(false) => return,
                None => Some(c),
            },
            None => None,
        };
        self.branches.push(BasicBlockBranch { from, to, condition });
    }

    /// Drop code blocks nothing jumps or falls into, until none are left.
    fn finish(mut self) -> ControlFlowGraph {
        let mut incoming: FxHashMap<BlockId, usize> = FxHashMap::default();
        for branch in &self.branches {
            *incoming.entry(branch.to).or_default() += 1;
        }

        let mut worklist: Vec<BlockId> = self
            .order
            .iter()
            .copied()
            .filter(|id| !incoming.contains_key(id))
            .collect();

        let mut unreachable = Vec::new();
        while let Some(id) = worklist.pop() {
            let Some(block) = self.blocks.shift_remove(&id) else {
                continue;
            };
            for branch in self.branches.iter().filter(|b| b.from == id) {
                if let Some(count) = incoming.get_mut(&branch.to) {
                    *count -= 1;
                    if *count == 0 && self.blocks.get(&branch.to).is_some_and(|b| b.kind == BlockKind::Code) {
                        worklist.push(branch.to);
                    }
                }
            }
            unreachable.push(block);
        }

        let blocks = &self.blocks;
        self.branches
            .retain(|b| blocks.contains_key(&b.from) && blocks.contains_key(&b.to));
        unreachable.sort_by_key(|b| b.id);

        ControlFlowGraph {
            start: self.start,
            end: self.end,
            blocks: self.blocks,
            branches: self.branches,
            unreachable,
        }
    }
}

/// `!condition`, folded when the condition is constant.
fn negate(condition: &BoundExpression) -> BoundExpression {
    match BoundUnaryOperator::bind(SyntaxKind::BangToken, TypeSymbol::Bool) {
        Some(op) if condition.ty() == TypeSymbol::Bool => BoundExpression::unary(condition.span(), op, condition.clone()),
        _ => BoundExpression::error(condition.span()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::text::TextSpan;

    fn span() -> TextSpan {
        TextSpan::new(0, 1)
    }

    fn body(statements: Vec<BoundStatement>) -> BoundBlockStatement {
        BoundBlockStatement { span: span(), statements }
    }

    fn ret() -> BoundStatement {
        BoundStatement::Return(BoundReturnStatement {
            span: span(),
            expression: None,
        })
    }

    #[test]
    fn test_empty_body_connects_start_to_end() {
        let graph = ControlFlowGraph::build(&body(vec![])).unwrap();
        assert_eq!(graph.blocks().count(), 2);
        assert_eq!(graph.branches().len(), 1);
        assert_eq!(graph.branches()[0].from, graph.start().id);
        assert_eq!(graph.branches()[0].to, graph.end().id);
        assert!(!all_paths_return(&body(vec![])).unwrap());
    }

    #[test]
    fn test_single_return() {
        assert!(all_paths_return(&body(vec![ret()])).unwrap());
    }

    #[test]
    fn test_blocks_split_at_labels_and_jumps() {
        let label = BoundLabel::new("Label1");
        let graph = ControlFlowGraph::build(&body(vec![
            BoundStatement::expression(BoundExpression::literal(span(), 1)),
            BoundStatement::goto(span(), label.clone()),
            BoundStatement::label(span(), label),
            ret(),
        ]))
        .unwrap();
        let sizes: Vec<usize> = graph
            .blocks()
            .filter(|b| b.kind == BlockKind::Code)
            .map(|b| b.statements.len())
            .collect();
        assert_eq!(sizes, vec![2, 2]);
    }

    #[test]
    fn test_constant_condition_prunes_dead_branch() {
        let label = BoundLabel::new("Label1");
        let graph = ControlFlowGraph::build(&body(vec![
            BoundStatement::conditional_goto(span(), label.clone(), BoundExpression::literal(span(), true), true),
            BoundStatement::expression(BoundExpression::literal(span(), 1)),
            BoundStatement::label(span(), label),
            ret(),
        ]))
        .unwrap();

        assert_eq!(graph.unreachable().len(), 1);
        assert_eq!(graph.unreachable()[0].statements[0].kind(), BoundNodeKind::ExpressionStatement);
        assert!(graph.branches().iter().all(|b| b.condition.is_none()));
        assert_eq!(graph.blocks().count(), 4);
    }

    #[test]
    fn test_unreachable_blocks_are_removed_transitively() {
        let a = BoundLabel::new("a");
        let b = BoundLabel::new("b");
        let graph = ControlFlowGraph::build(&body(vec![
            ret(),
            BoundStatement::expression(BoundExpression::literal(span(), 1)),
            BoundStatement::goto(span(), b.clone()),
            BoundStatement::label(span(), a),
            BoundStatement::expression(BoundExpression::literal(span(), 2)),
            BoundStatement::label(span(), b),
            ret(),
        ]))
        .unwrap();
        assert_eq!(graph.unreachable().len(), 3);
        assert_eq!(graph.blocks().count(), 3);
    }

    #[test]
    fn test_unknown_label() {
        let result = ControlFlowGraph::build(&body(vec![BoundStatement::goto(span(), BoundLabel::new("nowhere"))]));
        assert_eq!(result.unwrap_err(), FlowError::UnknownLabel("nowhere".to_string()));
    }

    #[test]
    fn test_structured_statement_is_rejected() {
        let result = ControlFlowGraph::build(&body(vec![BoundStatement::block(span(), vec![])]));
        assert_eq!(
            result.unwrap_err(),
            FlowError::UnexpectedStatement(BoundNodeKind::BlockStatement)
        );
    }

    #[test]
    fn test_dot_output_names_every_block() {
        let graph = ControlFlowGraph::build(&body(vec![ret()])).unwrap();
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("N0 -> N1"));
        assert!(dot.contains("N1 -> N2"));
    }
}
