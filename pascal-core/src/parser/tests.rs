use crate::{
    lexer::prelude::{LexicalErrorType, Token, TokenKind},
    parser::prelude::{
        parse_program, parse_program_with, Ast, NodeKind, ParseError, ParseErrorType,
        ParserConfig, StructuralErrorType
    },
    utils::prelude::{ErrorClass, SrcSpan}
};

fn tree(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

#[test]
fn test_precedence() -> Result<(), ParseError> {
    let ast = parse_program("PROGRAM P; BEGIN a := 2 + 3 * 4 END.")?;

    assert_eq!(ast.to_string(), tree(&[
        "Program P",
        "  Block",
        "    DeclList",
        "    Compound",
        "      Assign",
        "        Variable a",
        "        BinaryOp +",
        "          Literal INTEGER 2",
        "          BinaryOp *",
        "            Literal INTEGER 3",
        "            Literal INTEGER 4",
    ]));

    Ok(())
}

#[test]
fn test_left_associative_chain() -> Result<(), ParseError> {
    let ast = parse_program("BEGIN x := 8 - 2 - (1 // 1) END.")?;

    assert_eq!(ast.to_string(), tree(&[
        "Program",
        "  Block",
        "    DeclList",
        "    Compound",
        "      Assign",
        "        Variable x",
        "        BinaryOp -",
        "          BinaryOp -",
        "            Literal INTEGER 8",
        "            Literal INTEGER 2",
        "          BinaryOp //",
        "            Literal INTEGER 1",
        "            Literal INTEGER 1",
    ]));

    Ok(())
}

#[test]
fn test_unary_chain_is_right_nested() -> Result<(), ParseError> {
    let ast = parse_program("BEGIN -+-1.5 END.")?;

    assert_eq!(ast.to_string(), tree(&[
        "Program",
        "  Block",
        "    DeclList",
        "    Compound",
        "      UnaryOp -",
        "        UnaryOp +",
        "          UnaryOp -",
        "            Literal FLOAT 1.5",
    ]));

    Ok(())
}

#[test]
fn test_declarations() -> Result<(), ParseError> {
    let input = r#"
        VAR a, b : INTEGER;
            c : FLOAT;
        PROCEDURE Alpha(x : INTEGER; y, z : FLOAT);
        BEGIN
        END;
        BEGIN
        END.
    "#;

    let ast = parse_program(input)?;

    assert_eq!(ast.to_string(), tree(&[
        "Program",
        "  Block",
        "    DeclList",
        "      VarDecl INTEGER",
        "        Variable a",
        "      VarDecl INTEGER",
        "        Variable b",
        "      VarDecl FLOAT",
        "        Variable c",
        "      ProcedureDecl Alpha",
        "        ParamList",
        "          VarDecl INTEGER",
        "            Variable x",
        "          VarDecl FLOAT",
        "            Variable y",
        "          VarDecl FLOAT",
        "            Variable z",
        "        Block",
        "          DeclList",
        "          Compound",
        "            Empty",
        "    Compound",
        "      Empty",
    ]));

    Ok(())
}

#[test]
fn test_call_arguments() -> Result<(), ParseError> {
    let ast = parse_program("BEGIN Alpha(1, b := 2 + x); Beta() END.")?;

    assert_eq!(ast.to_string(), tree(&[
        "Program",
        "  Block",
        "    DeclList",
        "    Compound",
        "      ProcedureCall Alpha",
        "        Literal INTEGER 1",
        "        b :=",
        "        BinaryOp +",
        "          Literal INTEGER 2",
        "          Variable x",
        "      ProcedureCall Beta",
    ]));

    Ok(())
}

#[test]
fn test_empty_statements() -> Result<(), ParseError> {
    let ast = parse_program("BEGIN ; BEGIN END; a := 1; END.")?;
    let root = ast.root()?;

    let NodeKind::Program { block, .. } = &ast[root].kind else { panic!("root is not a Program") };
    let NodeKind::Block { compound, .. } = &ast[*block].kind else { panic!("expected Block") };
    let NodeKind::Compound { children } = &ast[*compound].kind else { panic!("expected Compound") };

    let kinds = children.iter().map(|child| ast[*child].kind.name()).collect::<Vec<_>>();
    assert_eq!(kinds, vec!["Empty", "Compound", "Assign", "Empty"]);

    Ok(())
}

#[test]
fn test_spans() -> Result<(), ParseError> {
    let src = "BEGIN abc := 1 + 22 END.";
    let ast = parse_program(src)?;
    let root = ast.root()?;

    assert_eq!(ast[root].span, SrcSpan::from(0, src.len() as u32));

    let assign = (0..ast.len())
        .map(crate::parser::prelude::NodeId::new)
        .find(|id| matches!(ast[*id].kind, NodeKind::Assign { .. }))
        .unwrap();

    assert_eq!(ast[assign].span, SrcSpan::from(6, 19));

    Ok(())
}

#[test]
fn test_missing_dot() {
    let err = parse_program("BEGIN a := 1 END").unwrap_err();

    assert_eq!(err.error, ParseErrorType::UnexpectedEof);
    assert_eq!(err.class(), ErrorClass::Syntax);
}

#[test]
fn test_trailing_input() {
    let err = parse_program("BEGIN END. a").unwrap_err();

    assert!(matches!(err.error, ParseErrorType::UnexpectedToken { ref token, .. } if token.text == "a"));
}

#[test]
fn test_missing_operand() {
    let err = parse_program("BEGIN a := END.").unwrap_err();

    match err.error {
        ParseErrorType::UnexpectedToken { token, expected } => {
            assert_eq!(token.kind, TokenKind::End);
            assert!(expected.contains(&"INTEGER".to_string()));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.span.start, 11);
}

#[test]
fn test_expected_type() {
    let err = parse_program("VAR a : b; BEGIN END.").unwrap_err();

    assert_eq!(err.error, ParseErrorType::ExpectedType);
    assert_eq!(err.span, SrcSpan::from(8, 9));
}

#[test]
fn test_lex_error_wins() {
    let err = parse_program("BEGIN a := 1.2.3 END.").unwrap_err();

    match err.error {
        ParseErrorType::LexError { error } => assert_eq!(error.error, LexicalErrorType::MultipleFloatingPoints),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.class(), ErrorClass::Lex);
}

#[test]
fn test_arena_rejects_malformed_children() {
    let mut ast = Ast::new();

    let one = ast.add(NodeKind::Literal(Token::integer(1, 0)), SrcSpan::at(0)).unwrap();
    let dangling = crate::parser::prelude::NodeId::new(42);

    let err = ast.add(NodeKind::UnaryOp { op: Token::new(TokenKind::Minus, "-", 0), operand: dangling }, SrcSpan::at(0))
        .unwrap_err();
    assert_eq!(err.error, StructuralErrorType::DanglingChild { child: dangling });

    let err = ast.add(NodeKind::Assign { target: one, op: Token::new(TokenKind::Assign, ":=", 0), value: one }, SrcSpan::at(0))
        .unwrap_err();
    assert!(matches!(err.error, StructuralErrorType::UnexpectedNode { context: "Assign", found: "Literal", .. }));

    let neg = ast.add(NodeKind::UnaryOp { op: Token::new(TokenKind::Minus, "-", 0), operand: one }, SrcSpan::at(0)).unwrap();
    assert_eq!(ast.len(), 2);
    assert_eq!((ast.height(one), ast.height(neg)), (1, 2));

    let err = ast.add(NodeKind::UnaryOp { op: Token::new(TokenKind::Plus, "+", 0), operand: one }, SrcSpan::at(0))
        .unwrap_err();
    assert_eq!(err.error, StructuralErrorType::SharedChild { child: one });

    let err = ast.set_root(neg).unwrap_err();
    assert!(matches!(err.error, StructuralErrorType::UnexpectedNode { context: "root", .. }));
    assert_eq!(ast.root().unwrap_err().error, StructuralErrorType::MissingRoot);
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let src = format!("BEGIN {}1{} END.", "(".repeat(10_000), ")".repeat(10_000));
    let err = parse_program(&src).unwrap_err();

    assert_eq!(err.class(), ErrorClass::Limit);
    assert_eq!(err.error, ParseErrorType::NestingTooDeep { limit: ParserConfig::default().max_depth });

    let src = format!("BEGIN {}1{} END.", "(".repeat(100), ")".repeat(100));
    assert!(parse_program(&src).is_ok());
}

#[test]
fn test_deep_nesting_of_every_kind() {
    let cases = [
        format!("BEGIN {}1 END.", "-".repeat(200_000)),
        format!("BEGIN {}{} END.", "BEGIN ".repeat(5_000), "END ".repeat(5_000)),
        format!("BEGIN {} END.", vec!["1"; 1_000].join(" + ")),
        format!("BEGIN {}1{} END.", "P(".repeat(5_000), ")".repeat(5_000)),
    ];

    for src in cases {
        let err = parse_program(&src).unwrap_err();

        assert_eq!(err.class(), ErrorClass::Limit, "{}", &src[..20]);
    }
}

#[test]
fn test_nesting_limit_is_configurable() {
    let config = ParserConfig { max_depth: 8 };

    let err = parse_program_with("BEGIN a := ((((((((1)))))))) END.", config).unwrap_err();
    assert_eq!(err.error, ParseErrorType::NestingTooDeep { limit: 8 });
    assert_eq!(err.span.start, 19);

    assert!(parse_program_with("BEGIN a := (1) END.", config).is_ok());
}
