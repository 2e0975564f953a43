use std::{fmt::Display, ops::Index};

use crate::{environment::prelude::ValueType, lexer::prelude::Token, utils::prelude::SrcSpan};

use super::error::{structural_error, StructuralError, StructuralErrorType};

/// Index of a node inside its `Ast` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Argument of a procedure call, either positional `P(1)` or named `P(a := 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<Token>,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Token),
    Variable(Token),
    UnaryOp {
        op: Token,
        operand: NodeId,
    },
    BinaryOp {
        left: NodeId,
        op: Token,
        right: NodeId,
    },
    Assign {
        target: NodeId,
        op: Token,
        value: NodeId,
    },
    Compound {
        children: Vec<NodeId>,
    },
    VarDecl {
        name: NodeId,
        type_spec: Token,
    },
    DeclList {
        items: Vec<NodeId>,
    },
    ParamList {
        params: Vec<NodeId>,
    },
    ProcedureDecl {
        name: Token,
        params: Option<NodeId>,
        block: NodeId,
    },
    ProcedureCall {
        name: Token,
        arguments: Vec<Argument>,
    },
    Block {
        declarations: NodeId,
        compound: NodeId,
    },
    Program {
        name: Option<Token>,
        block: NodeId,
    },
    Empty,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Literal(_) => "Literal",
            NodeKind::Variable(_) => "Variable",
            NodeKind::UnaryOp { .. } => "UnaryOp",
            NodeKind::BinaryOp { .. } => "BinaryOp",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::Compound { .. } => "Compound",
            NodeKind::VarDecl { .. } => "VarDecl",
            NodeKind::DeclList { .. } => "DeclList",
            NodeKind::ParamList { .. } => "ParamList",
            NodeKind::ProcedureDecl { .. } => "ProcedureDecl",
            NodeKind::ProcedureCall { .. } => "ProcedureCall",
            NodeKind::Block { .. } => "Block",
            NodeKind::Program { .. } => "Program",
            NodeKind::Empty => "Empty",
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal(_)
            | NodeKind::Variable(_)
            | NodeKind::UnaryOp { .. }
            | NodeKind::BinaryOp { .. }
            | NodeKind::ProcedureCall { .. }
        )
    }

    pub fn is_statement(&self) -> bool {
        self.is_expression() || matches!(
            self,
            NodeKind::Compound { .. } | NodeKind::Assign { .. } | NodeKind::Empty
        )
    }

    /// Child ids paired with the shape each position requires.
    fn slots(&self) -> Vec<(NodeId, Slot)> {
        match self {
            NodeKind::Literal(_) | NodeKind::Variable(_) | NodeKind::Empty => vec![],
            NodeKind::UnaryOp { operand, .. } => vec![(*operand, Slot::Expression)],
            NodeKind::BinaryOp { left, right, .. } => vec![(*left, Slot::Expression), (*right, Slot::Expression)],
            NodeKind::Assign { target, value, .. } => vec![(*target, Slot::Variable), (*value, Slot::Expression)],
            NodeKind::Compound { children } => children.iter().map(|id| (*id, Slot::Statement)).collect(),
            NodeKind::VarDecl { name, .. } => vec![(*name, Slot::Variable)],
            NodeKind::DeclList { items } => items.iter().map(|id| (*id, Slot::Declaration)).collect(),
            NodeKind::ParamList { params } => params.iter().map(|id| (*id, Slot::VarDecl)).collect(),
            NodeKind::ProcedureDecl { params, block, .. } => params.iter()
                .map(|id| (*id, Slot::ParamList))
                .chain(std::iter::once((*block, Slot::Block)))
                .collect(),
            NodeKind::ProcedureCall { arguments, .. } => arguments.iter().map(|arg| (arg.value, Slot::Expression)).collect(),
            NodeKind::Block { declarations, compound } => vec![(*declarations, Slot::DeclList), (*compound, Slot::Compound)],
            NodeKind::Program { block, .. } => vec![(*block, Slot::Block)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Expression,
    Statement,
    Variable,
    VarDecl,
    Declaration,
    DeclList,
    ParamList,
    Compound,
    Block,
}

impl Slot {
    fn label(self) -> &'static str {
        match self {
            Slot::Expression => "an expression",
            Slot::Statement => "a statement",
            Slot::Variable => "a Variable",
            Slot::VarDecl => "a VarDecl",
            Slot::Declaration => "a VarDecl or ProcedureDecl",
            Slot::DeclList => "a DeclList",
            Slot::ParamList => "a ParamList",
            Slot::Compound => "a Compound",
            Slot::Block => "a Block",
        }
    }

    fn accepts(self, kind: &NodeKind) -> bool {
        match self {
            Slot::Expression => kind.is_expression(),
            Slot::Statement => kind.is_statement(),
            Slot::Variable => matches!(kind, NodeKind::Variable(_)),
            Slot::VarDecl => matches!(kind, NodeKind::VarDecl { .. }),
            Slot::Declaration => matches!(kind, NodeKind::VarDecl { .. } | NodeKind::ProcedureDecl { .. }),
            Slot::DeclList => matches!(kind, NodeKind::DeclList { .. }),
            Slot::ParamList => matches!(kind, NodeKind::ParamList { .. }),
            Slot::Compound => matches!(kind, NodeKind::Compound { .. }),
            Slot::Block => matches!(kind, NodeKind::Block { .. }),
        }
    }
}

/// `VarDecl` resolved to its name and declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredVar<'a> {
    pub name: &'a Token,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: SrcSpan,
}

/// Arena holding every node of one parsed program. Nodes are only appended,
/// children must exist before their parent and belong to exactly one parent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    owned: Vec<bool>,
    /// Height of the subtree rooted at each node; leaves are 1.
    heights: Vec<usize>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes on the longest path from `id` down to a leaf.
    pub fn height(&self, id: NodeId) -> usize {
        self.heights.get(id.index()).copied().unwrap_or(0)
    }

    /// Appends a node after checking that every child it names exists, is
    /// still unowned and has the variant its position requires.
    pub fn add(&mut self, kind: NodeKind, span: SrcSpan) -> Result<NodeId, StructuralError> {
        let slots = kind.slots();

        for (idx, (child, slot)) in slots.iter().enumerate() {
            let node = match self.nodes.get(child.index()) {
                Some(node) => node,
                None => return structural_error(StructuralErrorType::DanglingChild { child: *child }, span),
            };

            if self.owned[child.index()] || slots[..idx].iter().any(|(other, _)| other == child) {
                return structural_error(StructuralErrorType::SharedChild { child: *child }, node.span);
            }

            if !slot.accepts(&node.kind) {
                return structural_error(
                    StructuralErrorType::UnexpectedNode {
                        context: kind.name(),
                        expected: slot.label(),
                        found: node.kind.name(),
                    },
                    node.span
                );
            }
        }

        for (child, _) in &slots {
            self.owned[child.index()] = true;
        }

        let height = 1 + slots.iter()
            .map(|(child, _)| self.heights[child.index()])
            .max()
            .unwrap_or(0);

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { kind, span });
        self.owned.push(false);
        self.heights.push(height);

        Ok(id)
    }

    pub fn set_root(&mut self, id: NodeId) -> Result<(), StructuralError> {
        let node = match self.nodes.get(id.index()) {
            Some(node) => node,
            None => return structural_error(StructuralErrorType::DanglingChild { child: id }, SrcSpan::default()),
        };

        if !matches!(node.kind, NodeKind::Program { .. }) {
            return structural_error(
                StructuralErrorType::UnexpectedNode { context: "root", expected: "a Program", found: node.kind.name() },
                node.span
            );
        }

        if self.owned[id.index()] {
            return structural_error(StructuralErrorType::SharedChild { child: id }, node.span);
        }

        self.root = Some(id);
        Ok(())
    }

    pub fn root(&self) -> Result<NodeId, StructuralError> {
        match self.root {
            Some(root) => Ok(root),
            None => structural_error(StructuralErrorType::MissingRoot, SrcSpan::default()),
        }
    }

    pub fn variable_name(&self, id: NodeId) -> Result<&Token, StructuralError> {
        let node = &self[id];

        match &node.kind {
            NodeKind::Variable(name) => Ok(name),
            kind => unexpected_node("name", "a Variable", kind.name(), node.span),
        }
    }

    pub fn declared_var(&self, id: NodeId) -> Result<DeclaredVar<'_>, StructuralError> {
        let node = &self[id];

        let NodeKind::VarDecl { name, type_spec } = &node.kind else {
            return unexpected_node("declaration", "a VarDecl", node.kind.name(), node.span);
        };

        match ValueType::from_type_spec(type_spec) {
            Some(value_type) => Ok(DeclaredVar { name: self.variable_name(*name)?, value_type }),
            None => unexpected_node("VarDecl", "INTEGER or FLOAT", "another type", type_spec.span()),
        }
    }

    /// Parameters of a procedure in declaration order, empty without a `ParamList`.
    pub fn declared_params(&self, params: Option<NodeId>) -> Result<Vec<DeclaredVar<'_>>, StructuralError> {
        let Some(params) = params else {
            return Ok(vec![]);
        };

        let node = &self[params];

        match &node.kind {
            NodeKind::ParamList { params } => params.iter().map(|param| self.declared_var(*param)).collect(),
            kind => unexpected_node("ProcedureDecl", "a ParamList", kind.name(), node.span),
        }
    }

    fn write_node(&self, f: &mut std::fmt::Formatter<'_>, id: NodeId, depth: usize) -> std::fmt::Result {
        let indent = "  ".repeat(depth);
        let node = &self[id];

        match &node.kind {
            NodeKind::Literal(token) => writeln!(f, "{indent}Literal {token}"),
            NodeKind::Variable(token) => writeln!(f, "{indent}Variable {}", token.text),
            NodeKind::UnaryOp { op, operand } => {
                writeln!(f, "{indent}UnaryOp {}", op.text)?;
                self.write_node(f, *operand, depth + 1)
            },
            NodeKind::BinaryOp { left, op, right } => {
                writeln!(f, "{indent}BinaryOp {}", op.text)?;
                self.write_node(f, *left, depth + 1)?;
                self.write_node(f, *right, depth + 1)
            },
            NodeKind::Assign { target, value, .. } => {
                writeln!(f, "{indent}Assign")?;
                self.write_node(f, *target, depth + 1)?;
                self.write_node(f, *value, depth + 1)
            },
            NodeKind::Compound { children } => {
                writeln!(f, "{indent}Compound")?;
                children.iter().try_for_each(|child| self.write_node(f, *child, depth + 1))
            },
            NodeKind::VarDecl { name, type_spec } => {
                writeln!(f, "{indent}VarDecl {}", type_spec.text)?;
                self.write_node(f, *name, depth + 1)
            },
            NodeKind::DeclList { items } => {
                writeln!(f, "{indent}DeclList")?;
                items.iter().try_for_each(|item| self.write_node(f, *item, depth + 1))
            },
            NodeKind::ParamList { params } => {
                writeln!(f, "{indent}ParamList")?;
                params.iter().try_for_each(|param| self.write_node(f, *param, depth + 1))
            },
            NodeKind::ProcedureDecl { name, params, block } => {
                writeln!(f, "{indent}ProcedureDecl {}", name.text)?;
                if let Some(params) = params {
                    self.write_node(f, *params, depth + 1)?;
                }
                self.write_node(f, *block, depth + 1)
            },
            NodeKind::ProcedureCall { name, arguments } => {
                writeln!(f, "{indent}ProcedureCall {}", name.text)?;
                arguments.iter().try_for_each(|arg| {
                    if let Some(name) = &arg.name {
                        writeln!(f, "{indent}  {} :=", name.text)?;
                    }
                    self.write_node(f, arg.value, depth + 1)
                })
            },
            NodeKind::Block { declarations, compound } => {
                writeln!(f, "{indent}Block")?;
                self.write_node(f, *declarations, depth + 1)?;
                self.write_node(f, *compound, depth + 1)
            },
            NodeKind::Program { name, block } => {
                match name {
                    Some(name) => writeln!(f, "{indent}Program {}", name.text)?,
                    None => writeln!(f, "{indent}Program")?,
                }
                self.write_node(f, *block, depth + 1)
            },
            NodeKind::Empty => writeln!(f, "{indent}Empty"),
        }
    }
}

pub fn unexpected_node<T>(
    context: &'static str,
    expected: &'static str,
    found: &'static str,
    span: SrcSpan
) -> Result<T, StructuralError> {
    structural_error(StructuralErrorType::UnexpectedNode { context, expected, found }, span)
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => self.write_node(f, root, 0),
            None => writeln!(f, "<empty>"),
        }
    }
}
