mod common;
use common::*;
use lox::lang::{ErrorCode, Location};
use lox::mach::Runtime;

#[test]
fn test_expect_expression() {
    assert_eq!(lox("print ;"), "[line 1] Error at ';': Expect expression\n");
    assert_eq!(lox("print 1 +"), "[line 1] Error at end: Expect expression\n");
}

#[test]
fn test_missing_semicolon() {
    assert_eq!(
        lox("print 1\nprint 2;"),
        "[line 2] Error at 'print': Expect ';' after value\n"
    );
}

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(
        lox("var a; var b; a + b = 1;"),
        "[line 1] Error at '=': Invalid assignment target\n"
    );
}

#[test]
fn test_local_in_own_initializer() {
    assert_eq!(
        lox("{ var a = a; }"),
        "[line 1] Error at 'a': Cannot read local variable in its own initializer\n"
    );
}

#[test]
fn test_local_redeclaration() {
    assert_eq!(
        lox("{ var a = 1; var a = 2; }"),
        "[line 1] Error at 'a': Variable with this name already declared in this scope\n"
    );
}

#[test]
fn test_lexical_errors_have_no_location() {
    assert_eq!(lox("print @;"), "[line 1] Error: Unexpected character\n");
    assert_eq!(lox("print \"open;"), "[line 1] Error: Unterminated string\n");
}

#[test]
fn test_recovery_reports_each_statement() {
    assert_eq!(
        lox("print ;\nvar 1;\nprint 3;"),
        "[line 1] Error at ';': Expect expression\n[line 2] Error at '1': Expect variable name\n"
    );
}

#[test]
fn test_compile_error_runs_nothing() {
    assert_eq!(lox("print 1; print ;"), "[line 1] Error at ';': Expect expression\n");
}

#[test]
fn test_undefined_variable() {
    assert_eq!(lox("print x;"), "Undefined variable 'x'\n[line 1] in script\n");
    assert_eq!(lox("\n\ny = 1;"), "Undefined variable 'y'\n[line 3] in script\n");
}

#[test]
fn test_type_errors() {
    assert_eq!(
        lox("true + 1;"),
        "Operands must be two numbers or two strings\n[line 1] in script\n"
    );
    assert_eq!(lox("-\"s\";"), "Operand must be a number\n[line 1] in script\n");
    assert_eq!(lox("\"a\" < 1;"), "Operands must be numbers\n[line 1] in script\n");
    assert_eq!(lox("nil * 2;"), "Operands must be numbers\n[line 1] in script\n");
}

#[test]
fn test_output_before_fault_is_kept() {
    assert_eq!(
        lox("print 1;\nprint -nil;\nprint 2;"),
        "1\nOperand must be a number\n[line 2] in script\n"
    );
}

#[test]
fn test_runtime_is_reusable_after_errors() {
    let mut r = Runtime::default();
    r.enter("var a = 1;");
    assert_eq!(exec(&mut r), "");
    r.enter("{ var b = 2; print b + nil; }");
    assert_eq!(
        exec(&mut r),
        "Operands must be two numbers or two strings\n[line 1] in script\n"
    );
    assert_eq!(r.stack_len(), 0);
    r.enter("print ;");
    assert_eq!(exec(&mut r), "[line 1] Error at ';': Expect expression\n");
    r.enter("print a;");
    assert_eq!(exec(&mut r), "1\n");
}

#[test]
fn test_error_locations() {
    let mut r = Runtime::default();
    let errors = r.compile("print 1 +").unwrap_err();
    assert_eq!(errors[0].location(), &Location::End);
    let errors = r.compile("print );").unwrap_err();
    assert_eq!(errors[0].location(), &Location::Lexeme(")".to_string()));
    let errors = r.compile("print #;").unwrap_err();
    assert_eq!(errors[0].location(), &Location::Unknown);
    assert_eq!(errors[0].code(), ErrorCode::SyntaxError);
}
