use std::collections::BTreeMap;

use log::debug;

use crate::{lexer::prelude::Token, parser::prelude::NodeId, utils::prelude::SrcSpan};

use super::{
    error::SymbolError,
    value::{Value, ValueType},
};

pub const GLOBAL_LEVEL: usize = 1;

/// Common contract of the per-level tables.
pub trait Table {
    type Entry;

    /// Returns `false` if `name` already has an entry in this table.
    fn define(&mut self, name: &str, entry: Self::Entry) -> bool;

    fn lookup(&self, name: &str) -> Option<&Self::Entry>;

    fn valid(entry: &Self::Entry) -> bool;

    /// `name => description` pairs, sorted by name.
    fn describe(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarSymbol {
    pub name: String,
    pub value_type: ValueType,
    pub location: SrcSpan,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, VarSymbol>,
}

impl SymbolTable {
    /// `true` if `name` is declared here with type `candidate`.
    pub fn check(&self, name: &str, candidate: ValueType) -> bool {
        self.lookup(name)
            .is_some_and(|symbol| Self::valid(symbol) && symbol.value_type == candidate)
    }
}

impl Table for SymbolTable {
    type Entry = VarSymbol;

    fn define(&mut self, name: &str, entry: VarSymbol) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }

        self.symbols.insert(name.to_string(), entry);
        true
    }

    fn lookup(&self, name: &str) -> Option<&VarSymbol> {
        self.symbols.get(name)
    }

    fn valid(entry: &VarSymbol) -> bool {
        !entry.name.is_empty()
    }

    fn describe(&self) -> Vec<(String, String)> {
        self.symbols.iter()
            .map(|(name, symbol)| (name.clone(), format!("<{}, {}>", symbol.name, symbol.value_type)))
            .collect()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryTable {
    memory: BTreeMap<String, Value>,
}

impl MemoryTable {
    /// Writes `value`, replacing whatever `name` held before.
    pub fn store(&mut self, name: &str, value: Value) {
        self.memory.insert(name.to_string(), value);
    }
}

impl Table for MemoryTable {
    type Entry = Value;

    fn define(&mut self, name: &str, entry: Value) -> bool {
        if self.memory.contains_key(name) {
            return false;
        }

        self.store(name, entry);
        true
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.memory.get(name)
    }

    fn valid(entry: &Value) -> bool {
        ValueType::of(entry).is_some()
    }

    fn describe(&self) -> Vec<(String, String)> {
        self.memory.iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureSymbol {
    pub name: String,
    pub node: NodeId,
    pub location: SrcSpan,
}

/// Single global table: a procedure is visible everywhere once registered.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcedureTable {
    procedures: BTreeMap<String, ProcedureSymbol>,
}

impl Table for ProcedureTable {
    type Entry = ProcedureSymbol;

    fn define(&mut self, name: &str, entry: ProcedureSymbol) -> bool {
        if self.procedures.contains_key(name) {
            return false;
        }

        self.procedures.insert(name.to_string(), entry);
        true
    }

    fn lookup(&self, name: &str) -> Option<&ProcedureSymbol> {
        self.procedures.get(name)
    }

    fn valid(entry: &ProcedureSymbol) -> bool {
        !entry.name.is_empty()
    }

    fn describe(&self) -> Vec<(String, String)> {
        self.procedures.iter()
            .map(|(name, procedure)| (name.clone(), format!("<PROCEDURE {} @ {}>", procedure.name, procedure.node)))
            .collect()
    }
}

/// One lexical frame: symbols and memory of a single level.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub name: String,
    pub level: usize,
    pub symbols: SymbolTable,
    pub memory: MemoryTable,
}

impl Scope {
    pub fn new(name: impl Into<String>, level: usize) -> Self {
        Self {
            name: name.into(),
            level,
            symbols: SymbolTable::default(),
            memory: MemoryTable::default(),
        }
    }

    /// Symbols followed by memory, each as `name => description`.
    pub fn describe(&self) -> Vec<(String, String)> {
        self.symbols.describe().into_iter()
            .chain(self.memory.describe().into_iter()
                .map(|(name, value)| (name, format!("= {value}"))))
            .collect()
    }
}

/// Stack of scopes, innermost last. Symbols and memory of a level are pushed
/// and popped together, so the two chains cannot drift apart.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScopeStack {
    frames: Vec<Scope>,
    procedures: ProcedureTable,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting level, 0 before the global scope is pushed.
    pub fn level(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, name: &str) -> usize {
        let level = self.level() + 1;

        debug!("Entering scope `{name}` at level {level}");
        self.frames.push(Scope::new(name, level));

        level
    }

    /// Pops the innermost scope. The global scope is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.level() <= GLOBAL_LEVEL {
            return None;
        }

        let scope = self.frames.pop()?;

        debug!("Leaving scope `{}` at level {}: {:?}", scope.name, scope.level, scope.describe());

        Some(scope)
    }

    pub fn frames(&self) -> &[Scope] {
        &self.frames
    }

    pub fn frame(&self, level: usize) -> Option<&Scope> {
        level.checked_sub(1).and_then(|idx| self.frames.get(idx))
    }

    pub fn current(&self) -> Option<&Scope> {
        self.frames.last()
    }

    pub fn procedures(&self) -> &ProcedureTable {
        &self.procedures
    }

    /// Declares `symbol` in the innermost scope.
    pub fn define_symbol(&mut self, symbol: VarSymbol) -> bool {
        match self.frames.last_mut() {
            Some(scope) => {
                let name = symbol.name.clone();
                scope.symbols.define(&name, symbol)
            },
            None => false
        }
    }

    /// Searches from the innermost scope outward and returns the declaring
    /// level together with the symbol.
    pub fn lookup_symbol(&self, name: &str) -> Option<(usize, &VarSymbol)> {
        self.frames.iter()
            .rev()
            .find_map(|scope| scope.symbols.lookup(name).map(|symbol| (scope.level, symbol)))
    }

    /// Reads `name` from the memory of the frame at `level`.
    pub fn read(&self, name: &str, level: usize) -> Option<&Value> {
        self.frame(level)
            .and_then(|scope| scope.memory.lookup(name))
            .filter(|value| MemoryTable::valid(value))
    }

    /// Writes `name` into the memory of the frame at `level`.
    pub fn write(&mut self, name: &str, level: usize, value: Value) -> bool {
        match level.checked_sub(1).and_then(|idx| self.frames.get_mut(idx)) {
            Some(scope) => {
                scope.memory.store(name, value);
                true
            },
            None => false
        }
    }

    pub fn define_procedure(&mut self, procedure: ProcedureSymbol) -> bool {
        let name = procedure.name.clone();
        self.procedures.define(&name, procedure)
    }

    pub fn lookup_procedure(&self, name: &str) -> Option<&ProcedureSymbol> {
        self.procedures.lookup(name)
    }

    /// Declares `name` in the innermost scope, failing on a same-level clash.
    pub fn declare_variable(&mut self, name: &Token, value_type: ValueType) -> Result<(), SymbolError> {
        let defined = self.define_symbol(VarSymbol {
            name: name.text.clone(),
            value_type,
            location: name.span(),
        });

        if defined {
            return Ok(());
        }

        let location_a = self.current()
            .and_then(|scope| scope.symbols.lookup(&name.text))
            .map_or(name.span(), |symbol| symbol.location);

        Err(SymbolError::VariableRedeclaration {
            location_a,
            location_b: name.span(),
            variable: name.text.clone(),
        })
    }

    /// Registers a procedure declared by `node`. Registering the same node
    /// again is a no-op, so a block can be entered more than once.
    pub fn register_procedure(&mut self, name: &Token, node: NodeId) -> Result<(), SymbolError> {
        let defined = self.define_procedure(ProcedureSymbol {
            name: name.text.clone(),
            node,
            location: name.span(),
        });

        match self.lookup_procedure(&name.text) {
            Some(existing) if !defined && existing.node != node => Err(SymbolError::ProcedureRedeclaration {
                location_a: existing.location,
                location_b: name.span(),
                procedure: name.text.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Declaring level of `name`.
    pub fn resolve(&self, name: &Token) -> Result<usize, SymbolError> {
        match self.lookup_symbol(&name.text) {
            Some((level, _)) => Ok(level),
            None => Err(SymbolError::VariableNotDeclared {
                location: name.span(),
                variable: name.text.clone(),
            }),
        }
    }

    pub fn resolve_procedure(&self, name: &Token) -> Result<&ProcedureSymbol, SymbolError> {
        self.lookup_procedure(&name.text).ok_or_else(|| SymbolError::ProcedureNotDeclared {
            location: name.span(),
            procedure: name.text.clone(),
        })
    }
}
