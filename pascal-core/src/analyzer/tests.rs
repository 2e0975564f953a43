use std::path::PathBuf;

use crate::{
    environment::prelude::{SymbolError, ValueType},
    parser::prelude::parse_program,
    utils::prelude::{Error, ErrorClass},
};

use super::prelude::{analyze_source, AnalyzeError, AnalyzeErrorType, SemanticAnalyzer};

fn analyze(src: &str) -> Result<(), AnalyzeError> {
    let ast = parse_program(src).unwrap();

    SemanticAnalyzer::analyze(&ast).map(|_| ())
}

#[test]
fn test_valid_program() -> Result<(), AnalyzeError> {
    let ast = parse_program(r#"
        PROGRAM Part10;
        VAR number, a : INTEGER;
            y : FLOAT;
        PROCEDURE P1(p : INTEGER);
        VAR a : FLOAT;
            PROCEDURE P2();
            BEGIN
                a := p + number;
                P2()
            END;
        BEGIN
            P2()
        END;
        BEGIN
            number := 2;
            a := number;
            y := 20 / 7 + 3.14;
            P1(number)
        END.
    "#).unwrap();

    let scopes = SemanticAnalyzer::analyze(&ast)?;

    assert_eq!(scopes.level(), 1);
    assert!(scopes.frame(1).unwrap().symbols.check("y", ValueType::Float));
    assert!(scopes.lookup_procedure("P2").is_some());

    Ok(())
}

#[test]
fn test_undeclared_variable() {
    let err = analyze("VAR x : INTEGER; BEGIN x := y END.").unwrap_err();

    assert_eq!(err.class(), ErrorClass::Symbol);
    assert_eq!(err.location.start, 28);
    assert!(matches!(
        err.error,
        AnalyzeErrorType::Symbol { error: SymbolError::VariableNotDeclared { ref variable, .. } } if variable == "y"
    ));
}

#[test]
fn test_undeclared_assignment_target() {
    let err = analyze("BEGIN x := 1 END.").unwrap_err();

    assert!(matches!(
        err.error,
        AnalyzeErrorType::Symbol { error: SymbolError::VariableNotDeclared { .. } }
    ));
}

#[test]
fn test_redeclaration() {
    let err = analyze("VAR a : INTEGER; a : FLOAT; BEGIN END.").unwrap_err();

    match err.error {
        AnalyzeErrorType::Symbol { error: SymbolError::VariableRedeclaration { location_a, location_b, variable } } => {
            assert_eq!(variable, "a");
            assert_eq!(location_a.start, 4);
            assert_eq!(location_b.start, 17);
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_shadowing_is_allowed() -> Result<(), AnalyzeError> {
    analyze(r#"
        VAR a : INTEGER;
        PROCEDURE Alpha(a : FLOAT);
        BEGIN
            a := 1.5
        END;
        BEGIN
            Alpha(2.5)
        END.
    "#)
}

#[test]
fn test_parameter_clashes_with_local() {
    let err = analyze(r#"
        PROCEDURE Alpha(a : INTEGER);
        VAR a : INTEGER;
        BEGIN
        END;
        BEGIN
        END.
    "#).unwrap_err();

    assert!(matches!(
        err.error,
        AnalyzeErrorType::Symbol { error: SymbolError::VariableRedeclaration { .. } }
    ));
}

#[test]
fn test_procedure_locals_do_not_leak() {
    let err = analyze(r#"
        PROCEDURE Alpha();
        VAR local : INTEGER;
        BEGIN
            local := 1
        END;
        BEGIN
            Alpha();
            local := 2
        END.
    "#).unwrap_err();

    assert!(matches!(
        err.error,
        AnalyzeErrorType::Symbol { error: SymbolError::VariableNotDeclared { ref variable, .. } } if variable == "local"
    ));
}

#[test]
fn test_procedures_are_visible_in_declaration_order() {
    let src = r#"
        PROCEDURE First();
        BEGIN
            Second()
        END;
        PROCEDURE Second();
        BEGIN
        END;
        BEGIN
            First()
        END.
    "#;

    let err = analyze(src).unwrap_err();

    assert!(matches!(
        err.error,
        AnalyzeErrorType::Symbol { error: SymbolError::ProcedureNotDeclared { ref procedure, .. } } if procedure == "Second"
    ));
}

#[test]
fn test_procedure_redeclaration() {
    let err = analyze(r#"
        PROCEDURE Alpha(); BEGIN END;
        PROCEDURE Alpha(); BEGIN END;
        BEGIN
        END.
    "#).unwrap_err();

    assert!(matches!(
        err.error,
        AnalyzeErrorType::Symbol { error: SymbolError::ProcedureRedeclaration { .. } }
    ));
}

#[test]
fn test_call_arguments() {
    let src = r#"
        PROCEDURE Alpha(a : INTEGER; b : FLOAT);
        BEGIN
        END;
        BEGIN
            Alpha(1, b := 2.0);
            Alpha(b := 2.0, a := 1);
            %CALL%
        END.
    "#;

    assert!(analyze(&src.replace("%CALL%", "")).is_ok());

    let err = analyze(&src.replace("%CALL%", "Alpha(1)")).unwrap_err();
    assert_eq!(err.error, AnalyzeErrorType::ArityMismatch { procedure: "Alpha".into(), expected: 2, got: 1 });
    assert_eq!(err.class(), ErrorClass::Syntax);

    let err = analyze(&src.replace("%CALL%", "Alpha(1, c := 2.0)")).unwrap_err();
    assert_eq!(err.error, AnalyzeErrorType::UnknownParameter { procedure: "Alpha".into(), parameter: "c".into() });

    let err = analyze(&src.replace("%CALL%", "Alpha(1, a := 2)")).unwrap_err();
    assert_eq!(err.error, AnalyzeErrorType::UnknownParameter { procedure: "Alpha".into(), parameter: "a".into() });

    let err = analyze(&src.replace("%CALL%", "Alpha(1, undefined)")).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Symbol);
}

#[test]
fn test_pipeline_reports_phase() {
    let err = analyze_source(PathBuf::from("bad.pas"), "BEGIN a := 1 END.".to_string()).unwrap_err();

    assert!(matches!(err, Error::Analyze { .. }));
    assert_eq!(err.offset(), Some(6));

    let rendered = err.pretty_string();
    assert!(rendered.contains("SymbolError"));
    assert!(rendered.contains("bad.pas"));

    let err = analyze_source(PathBuf::from("bad.pas"), "BEGIN a := 1 END".to_string()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}
