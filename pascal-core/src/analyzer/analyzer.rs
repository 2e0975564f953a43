use log::{debug, trace};

use crate::{
    environment::prelude::{ScopeStack, GLOBAL_LEVEL},
    lexer::prelude::Token,
    parser::prelude::{unexpected_node, Argument, Ast, NodeId, NodeKind},
    utils::prelude::SrcSpan,
};

use super::error::{AnalyzeError, AnalyzeErrorType};

/// First pass: resolves every name against the symbol half of the scope
/// chain. Never looks at values.
#[derive(Debug)]
pub struct SemanticAnalyzer<'a> {
    ast: &'a Ast,
    scopes: ScopeStack,
}

impl<'a> SemanticAnalyzer<'a> {
    /// Checks the whole tree, stopping at the first error. Returns the
    /// surviving global frame.
    pub fn analyze(ast: &'a Ast) -> Result<ScopeStack, AnalyzeError> {
        let mut analyzer = SemanticAnalyzer {
            ast,
            scopes: ScopeStack::new(),
        };

        let root = ast.root()?;
        analyzer.visit(root)?;

        Ok(analyzer.scopes)
    }

    fn visit(&mut self, id: NodeId) -> Result<(), AnalyzeError> {
        let ast = self.ast;
        let node = &ast[id];

        trace!("Analyzing {} {id}", node.kind.name());

        match &node.kind {
            NodeKind::Program { name, block } => {
                let name = name.as_ref().map_or("global", |name| name.text.as_str());
                self.scopes.push(name);

                self.visit(*block)
            },
            NodeKind::Block { declarations, compound } => {
                self.declare(*declarations)?;
                self.visit(*compound)?;

                if self.scopes.level() > GLOBAL_LEVEL {
                    self.scopes.pop();
                }

                Ok(())
            },
            NodeKind::Compound { children } => children.iter().try_for_each(|child| self.visit(*child)),
            NodeKind::Assign { target, value, .. } => {
                self.visit(*value)?;
                self.scopes.resolve(ast.variable_name(*target)?)?;

                Ok(())
            },
            NodeKind::Variable(name) => {
                self.scopes.resolve(name)?;

                Ok(())
            },
            NodeKind::UnaryOp { operand, .. } => self.visit(*operand),
            NodeKind::BinaryOp { left, right, .. } => {
                self.visit(*left)?;
                self.visit(*right)
            },
            NodeKind::ProcedureCall { name, arguments } => self.check_call(name, arguments, node.span),
            NodeKind::Literal(_) | NodeKind::Empty => Ok(()),
            NodeKind::VarDecl { .. }
            | NodeKind::DeclList { .. }
            | NodeKind::ParamList { .. }
            | NodeKind::ProcedureDecl { .. } => Ok(unexpected_node(
                "analysis",
                "a statement or an expression",
                node.kind.name(),
                node.span
            )?),
        }
    }

    fn declare(&mut self, declarations: NodeId) -> Result<(), AnalyzeError> {
        let ast = self.ast;
        let node = &ast[declarations];

        let NodeKind::DeclList { items } = &node.kind else {
            return Ok(unexpected_node("Block", "a DeclList", node.kind.name(), node.span)?);
        };

        for item in items {
            match &ast[*item].kind {
                NodeKind::ProcedureDecl { name, params, block } => {
                    // Registered before its body is checked, so the body may call itself.
                    self.scopes.register_procedure(name, *item)?;

                    let level = self.scopes.push(&name.text);
                    debug!("Analyzing procedure `{}` at level {level}", name.text);

                    for param in ast.declared_params(*params)? {
                        self.scopes.declare_variable(param.name, param.value_type)?;
                    }

                    self.visit(*block)?;
                },
                _ => {
                    let var = ast.declared_var(*item)?;
                    self.scopes.declare_variable(var.name, var.value_type)?;
                },
            }
        }

        Ok(())
    }

    fn check_call(&mut self, name: &Token, arguments: &[Argument], span: SrcSpan) -> Result<(), AnalyzeError> {
        let ast = self.ast;
        let procedure = self.scopes.resolve_procedure(name)?.node;

        let params = match &ast[procedure].kind {
            NodeKind::ProcedureDecl { params, .. } => ast.declared_params(*params)?,
            kind => return Ok(unexpected_node("ProcedureCall", "a ProcedureDecl", kind.name(), ast[procedure].span)?),
        };

        if params.len() != arguments.len() {
            return Err(AnalyzeError {
                error: AnalyzeErrorType::ArityMismatch {
                    procedure: name.text.clone(),
                    expected: params.len(),
                    got: arguments.len(),
                },
                location: span,
            });
        }

        let mut bound = vec![false; params.len()];

        for (idx, argument) in arguments.iter().enumerate() {
            let slot = match &argument.name {
                Some(arg_name) => params.iter().position(|param| param.name.text == arg_name.text),
                None => Some(idx),
            };

            match slot {
                Some(slot) if !bound[slot] => bound[slot] = true,
                _ => {
                    let (parameter, location) = match &argument.name {
                        Some(arg_name) => (arg_name.text.clone(), arg_name.span()),
                        None => (idx.to_string(), ast[argument.value].span),
                    };

                    return Err(AnalyzeError {
                        error: AnalyzeErrorType::UnknownParameter { procedure: name.text.clone(), parameter },
                        location,
                    });
                }
            }

            self.visit(argument.value)?;
        }

        Ok(())
    }
}
