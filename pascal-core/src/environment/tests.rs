use crate::{lexer::prelude::Token, parser::prelude::NodeId, utils::prelude::SrcSpan};

use super::prelude::{
    MemoryTable, ProcedureSymbol, ScopeStack, SymbolTable, Table, ValueType, VarSymbol, GLOBAL_LEVEL
};

fn var(name: &str, value_type: ValueType) -> VarSymbol {
    VarSymbol {
        name: name.to_string(),
        value_type,
        location: SrcSpan::default(),
    }
}

#[test]
fn test_symbol_table_rejects_same_level_redefinition() {
    let mut table = SymbolTable::default();

    assert!(table.define("a", var("a", ValueType::Integer)));
    assert!(!table.define("a", var("a", ValueType::Float)));

    assert_eq!(table.lookup("a").map(|s| s.value_type), Some(ValueType::Integer));
    assert!(table.check("a", ValueType::Integer));
    assert!(!table.check("a", ValueType::Float));
    assert!(!table.check("b", ValueType::Integer));
}

#[test]
fn test_memory_table_store_overwrites() {
    let mut memory = MemoryTable::default();

    assert!(memory.define("a", Token::integer(1, 0)));
    assert!(!memory.define("a", Token::integer(2, 0)));
    assert_eq!(memory.lookup("a"), Some(&Token::integer(1, 0)));

    memory.store("a", Token::integer(3, 0));
    assert_eq!(memory.lookup("a"), Some(&Token::integer(3, 0)));

    assert!(MemoryTable::valid(&Token::float(1.5, 0)));
    assert!(!MemoryTable::valid(&Token::empty()));
}

#[test]
fn test_global_frame_is_never_popped() {
    let mut scopes = ScopeStack::new();

    assert_eq!(scopes.level(), 0);
    assert_eq!(scopes.push("global"), GLOBAL_LEVEL);
    assert_eq!(scopes.push("Alpha"), 2);

    assert_eq!(scopes.pop().map(|scope| scope.name), Some("Alpha".to_string()));
    assert!(scopes.pop().is_none());
    assert_eq!(scopes.level(), GLOBAL_LEVEL);
}

#[test]
fn test_lookup_returns_declaring_level() {
    let mut scopes = ScopeStack::new();

    scopes.push("global");
    assert!(scopes.define_symbol(var("a", ValueType::Integer)));
    assert!(scopes.define_symbol(var("b", ValueType::Integer)));

    scopes.push("Alpha");
    assert!(scopes.define_symbol(var("a", ValueType::Float)));
    assert!(!scopes.define_symbol(var("a", ValueType::Integer)));

    let (level, symbol) = scopes.lookup_symbol("a").unwrap();
    assert_eq!((level, symbol.value_type), (2, ValueType::Float));

    let (level, symbol) = scopes.lookup_symbol("b").unwrap();
    assert_eq!((level, symbol.value_type), (1, ValueType::Integer));

    assert!(scopes.lookup_symbol("c").is_none());
}

#[test]
fn test_write_targets_declaring_frame() {
    let mut scopes = ScopeStack::new();

    scopes.push("global");
    scopes.define_symbol(var("a", ValueType::Integer));
    scopes.push("Alpha");

    let (level, _) = scopes.lookup_symbol("a").unwrap();
    assert!(scopes.write("a", level, Token::integer(7, 0)));

    assert!(scopes.read("a", 2).is_none());
    scopes.pop();

    assert_eq!(scopes.read("a", GLOBAL_LEVEL), Some(&Token::integer(7, 0)));
    assert!(!scopes.write("a", 5, Token::integer(1, 0)));
}

#[test]
fn test_procedures_are_global() {
    let mut scopes = ScopeStack::new();

    scopes.push("global");
    scopes.push("Alpha");

    let procedure = ProcedureSymbol {
        name: "Beta".to_string(),
        node: NodeId::new(3),
        location: SrcSpan::default(),
    };

    assert!(scopes.define_procedure(procedure.clone()));
    assert!(!scopes.define_procedure(procedure));

    scopes.pop();

    assert_eq!(scopes.lookup_procedure("Beta").map(|p| p.node), Some(NodeId::new(3)));
    assert_eq!(scopes.procedures().describe().len(), 1);
}

#[test]
fn test_describe_lists_symbols_and_values() {
    let mut scopes = ScopeStack::new();

    scopes.push("global");
    scopes.define_symbol(var("b", ValueType::Float));
    scopes.define_symbol(var("a", ValueType::Integer));
    scopes.write("a", 1, Token::integer(10, 0));

    let described = scopes.frame(1).unwrap().describe();

    assert_eq!(described, vec![
        ("a".to_string(), "<a, INTEGER>".to_string()),
        ("b".to_string(), "<b, FLOAT>".to_string()),
        ("a".to_string(), "= INTEGER 10".to_string()),
    ]);
}
