use log::{debug, trace};

use crate::{
    environment::prelude::{ScopeStack, SymbolError, Table, Value, ValueType, GLOBAL_LEVEL},
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{unexpected_node, Argument, Ast, NodeId, NodeKind},
    utils::prelude::SrcSpan,
};

use super::{
    error::{RuntimeError, RuntimeErrorType},
    operator::{eval_binary, toggle_sign},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of nested procedure activations.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_call_depth: 64 }
    }
}

/// Second pass: walks the tree and keeps values in the memory half of each
/// scope. Frames are pushed and popped at the same nodes as in the
/// semantic analyzer.
#[derive(Debug)]
pub struct Interpreter<'a> {
    ast: &'a Ast,
    scopes: ScopeStack,
    config: InterpreterConfig,
    call_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(ast: &'a Ast, config: InterpreterConfig) -> Self {
        Self {
            ast,
            scopes: ScopeStack::new(),
            config,
            call_depth: 0,
        }
    }

    /// Interprets the whole program and returns the value of its last
    /// statement. On error the frames stay as they were at the failure.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        let root = self.ast.root()?;
        self.visit(root)
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn into_scopes(self) -> ScopeStack {
        self.scopes
    }

    fn visit(&mut self, id: NodeId) -> Result<Value, RuntimeError> {
        let ast = self.ast;
        let node = &ast[id];

        trace!("Visiting {} {id} at {}", node.kind.name(), node.span);

        match &node.kind {
            NodeKind::Program { name, block } => {
                let name = name.as_ref().map_or("global", |name| name.text.as_str());
                self.scopes.push(name);

                self.visit(*block)
            },
            NodeKind::Block { declarations, compound } => {
                self.declare(*declarations)?;
                let result = self.visit(*compound)?;

                if self.scopes.level() > GLOBAL_LEVEL {
                    self.scopes.pop();
                }

                Ok(result)
            },
            NodeKind::Compound { children } => {
                let mut result = Token::empty();

                for child in children {
                    result = self.visit(*child)?;
                }

                Ok(result)
            },
            NodeKind::Assign { target, value, .. } => {
                let value = self.visit(*value)?;
                let name = ast.variable_name(*target)?;

                self.assign(name, value)?;

                Ok(Token::empty())
            },
            NodeKind::Variable(name) => {
                let level = self.scopes.resolve(name)?;

                match self.scopes.read(&name.text, level) {
                    Some(value) => Ok(value.clone()),
                    None => Err(SymbolError::VariableNotInitialized {
                        location: name.span(),
                        variable: name.text.clone(),
                    }.into()),
                }
            },
            NodeKind::Literal(token) => Ok(token.clone()),
            NodeKind::UnaryOp { op, operand } => {
                let value = self.visit(*operand)?;

                match op.kind {
                    TokenKind::Plus if value.kind.is_numeric() => Ok(value),
                    TokenKind::Minus => {
                        let toggled = toggle_sign(&value, op)?;
                        debug!("Unary `-` at {}: {} -> {}", op.offset, value.text, toggled.text);

                        Ok(toggled)
                    },
                    _ => Err(RuntimeError::new(
                        RuntimeErrorType::InvalidUnaryOperand { op: op.kind, got: value.kind },
                        node.span
                    )),
                }
            },
            NodeKind::BinaryOp { left, op, right } => {
                let left = self.visit(*left)?;
                let right = self.visit(*right)?;

                eval_binary(&left, &right, op)
            },
            NodeKind::ProcedureCall { name, arguments } => self.call(name, arguments, node.span),
            NodeKind::Empty => Ok(Token::empty()),
            NodeKind::VarDecl { .. }
            | NodeKind::DeclList { .. }
            | NodeKind::ParamList { .. }
            | NodeKind::ProcedureDecl { .. } => Ok(unexpected_node(
                "evaluation",
                "a statement or an expression",
                node.kind.name(),
                node.span
            )?),
        }
    }

    /// Defines the variables and registers the procedures of a `DeclList`
    /// in the current frame.
    fn declare(&mut self, declarations: NodeId) -> Result<(), RuntimeError> {
        let ast = self.ast;
        let node = &ast[declarations];

        let NodeKind::DeclList { items } = &node.kind else {
            return Ok(unexpected_node("Block", "a DeclList", node.kind.name(), node.span)?);
        };

        for item in items {
            match &ast[*item].kind {
                NodeKind::ProcedureDecl { name, .. } => self.scopes.register_procedure(name, *item)?,
                _ => {
                    let var = ast.declared_var(*item)?;
                    self.scopes.declare_variable(var.name, var.value_type)?;
                },
            }
        }

        Ok(())
    }

    fn call(&mut self, name: &Token, arguments: &[Argument], span: SrcSpan) -> Result<Value, RuntimeError> {
        let ast = self.ast;
        let procedure = self.scopes.resolve_procedure(name)?.node;

        let decl = &ast[procedure];
        let NodeKind::ProcedureDecl { params, block, .. } = &decl.kind else {
            return Ok(unexpected_node("ProcedureCall", "a ProcedureDecl", decl.kind.name(), decl.span)?);
        };

        let params = ast.declared_params(*params)?;

        if params.len() != arguments.len() {
            return Err(RuntimeError::new(
                RuntimeErrorType::ArityMismatch {
                    procedure: name.text.clone(),
                    expected: params.len(),
                    got: arguments.len(),
                },
                span
            ));
        }

        // Arguments are evaluated in the caller's frame.
        let mut bound: Vec<Option<Value>> = vec![None; params.len()];

        for (idx, argument) in arguments.iter().enumerate() {
            let slot = match &argument.name {
                Some(arg_name) => params.iter().position(|param| param.name.text == arg_name.text),
                None => Some(idx),
            };

            match slot {
                Some(slot) if bound[slot].is_none() => bound[slot] = Some(self.visit(argument.value)?),
                _ => {
                    let (parameter, location) = match &argument.name {
                        Some(arg_name) => (arg_name.text.clone(), arg_name.span()),
                        None => (idx.to_string(), ast[argument.value].span),
                    };

                    return Err(RuntimeError::new(
                        RuntimeErrorType::UnknownParameter { procedure: name.text.clone(), parameter },
                        location
                    ));
                }
            }
        }

        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::new(
                RuntimeErrorType::CallDepthExceeded { procedure: name.text.clone(), limit: self.config.max_call_depth },
                span
            ));
        }

        let level = self.scopes.push(&name.text);
        self.call_depth += 1;
        debug!("Calling `{}` at level {level}, depth {}", name.text, self.call_depth);

        for (param, value) in params.iter().zip(bound) {
            self.scopes.declare_variable(param.name, param.value_type)?;

            if let Some(value) = value {
                self.assign(param.name, value)?;
            }
        }

        // The procedure's block pops the frame pushed above.
        let result = self.visit(*block)?;

        self.call_depth -= 1;
        debug!("Returned from `{}` with {result}", name.text);

        Ok(result)
    }

    /// Writes `value` into the frame that declares `name`.
    fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let level = self.scopes.resolve(name)?;

        let declared = self.scopes.frame(level)
            .and_then(|scope| scope.symbols.lookup(&name.text).map(|symbol| (scope, symbol.value_type)));

        if let Some((scope, expected)) = declared {
            let accepted = ValueType::of(&value)
                .is_some_and(|got| scope.symbols.check(&name.text, got));

            if !accepted {
                return Err(SymbolError::TypeMismatch {
                    location: name.span(),
                    variable: name.text.clone(),
                    expected,
                    got: value.kind,
                }.into());
            }
        }

        self.scopes.write(&name.text, level, value);

        Ok(())
    }
}
