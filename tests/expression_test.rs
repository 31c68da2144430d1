mod common;
use common::*;

#[test]
fn test_arithmetic() {
    assert_eq!(lox("print 1 + 2;"), "3\n");
    assert_eq!(lox("print 1 + 2 * 3;"), "7\n");
    assert_eq!(lox("print (1 + 2) * 3;"), "9\n");
    assert_eq!(lox("print 10 - 4 - 3;"), "3\n");
    assert_eq!(lox("print 8 / 2 / 2;"), "2\n");
    assert_eq!(lox("print -(3 - 5);"), "2\n");
    assert_eq!(lox("print 1.5 + 1.25;"), "2.75\n");
    assert_eq!(lox("print 1 / 0;"), "inf\n");
}

#[test]
fn test_number_output_has_six_significant_digits() {
    assert_eq!(lox("print 0.1 + 0.2;"), "0.3\n");
    assert_eq!(lox("print 1 / 3;"), "0.333333\n");
    assert_eq!(lox("print 1000000000 * 1000000000 * 1000;"), "1e+21\n");
    assert_eq!(lox("print 1234567;"), "1.23457e+06\n");
    assert_eq!(lox("print 999999;"), "999999\n");
    assert_eq!(lox("print 1 / 100000;"), "1e-05\n");
}

#[test]
fn test_comparison() {
    assert_eq!(lox("print 1 < 2;"), "true\n");
    assert_eq!(lox("print 2 <= 2;"), "true\n");
    assert_eq!(lox("print 1 > 2;"), "false\n");
    assert_eq!(lox("print 3 >= 4;"), "false\n");
    assert_eq!(lox("print 1 == 1;"), "true\n");
    assert_eq!(lox("print 1 != 1;"), "false\n");
}

#[test]
fn test_equality_across_kinds() {
    assert_eq!(lox("print nil == nil;"), "true\n");
    assert_eq!(lox("print nil == false;"), "false\n");
    assert_eq!(lox("print 0 == false;"), "false\n");
    assert_eq!(lox("print \"a\" == \"a\";"), "true\n");
    assert_eq!(lox("print \"a\" == \"b\";"), "false\n");
    assert_eq!(lox("print \"1\" == 1;"), "false\n");
}

#[test]
fn test_truthiness() {
    assert_eq!(lox("print !nil;"), "true\n");
    assert_eq!(lox("print !false;"), "true\n");
    assert_eq!(lox("print !0;"), "false\n");
    assert_eq!(lox("print !\"\";"), "false\n");
    assert_eq!(lox("print !!true;"), "true\n");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(lox("print \"ab\" + \"c\";"), "abc\n");
    assert_eq!(lox("print \"\" + \"\";"), "\n");
    assert_eq!(lox("var a = \"x\"; print a + a + a;"), "xxx\n");
}

#[test]
fn test_literals() {
    assert_eq!(lox("print nil;"), "nil\n");
    assert_eq!(lox("print true;"), "true\n");
    assert_eq!(lox("print 42;"), "42\n");
    assert_eq!(lox("print \"multi\nline\";"), "multi\nline\n");
}

#[test]
fn test_assignment_is_an_expression() {
    assert_eq!(lox("var a; var b; a = b = 3; print a + b;"), "6\n");
    assert_eq!(lox("var a = 1; print a = 2;"), "2\n");
}
