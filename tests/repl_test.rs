mod common;
use common::*;
use lox::lang::ErrorCode;
use lox::mach::{Config, Event, Runtime};

#[test]
fn test_globals_persist_between_lines() {
    let mut r = Runtime::default();
    r.enter("var a = 1;");
    assert_eq!(exec(&mut r), "");
    r.enter("var b = a + 1;");
    assert_eq!(exec(&mut r), "");
    r.enter("print a + b;");
    assert_eq!(exec(&mut r), "3\n");
}

#[test]
fn test_free_objects_keeps_global_values() {
    let mut r = Runtime::default();
    r.enter("var s = \"a\" + \"b\";");
    assert_eq!(exec(&mut r), "");
    let count = r.object_count();
    assert!(count >= 3);
    assert_eq!(r.free_objects(), count);
    assert_eq!(r.object_count(), 0);
    assert_eq!(r.free_objects(), 0);
    r.enter("print s + \"c\";");
    assert_eq!(exec(&mut r), "abc\n");
}

#[test]
fn test_same_line_twice_gives_same_output() {
    let mut r = Runtime::default();
    for _ in 0..2 {
        r.enter("print \"x\" + \"y\";");
        assert_eq!(exec(&mut r), "xy\n");
        r.free_objects();
    }
}

#[test]
fn test_run_after_compile_shares_heap() {
    let mut r = Runtime::default();
    let chunk = r.compile("print \"k\";").unwrap();
    assert!(r.object_count() > 0);
    let mut out = Vec::new();
    r.run(chunk, &mut out).unwrap();
    assert_eq!(out, b"k\n");
}

#[test]
fn test_runtime_error_code_and_line() {
    let mut r = Runtime::default();
    r.enter("\nprint missing;");
    match r.execute(100) {
        Event::Errors(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code(), ErrorCode::UndefinedVariable);
            assert_eq!(errors[0].line_number(), Some(2));
            assert!(errors[0].is_runtime());
        }
        event => panic!("unexpected {:?}", event),
    }
}

#[test]
fn test_configured_stack_limit() {
    let mut r = Runtime::new(Config {
        stack_max: 2,
        ..Config::default()
    });
    r.enter("print 1 + 2;");
    assert_eq!(exec(&mut r), "3\n");
    r.enter("print 1 + (2 + 3);");
    assert_eq!(exec(&mut r), "Stack overflow\n[line 1] in script\n");
    r.enter("print 4;");
    assert_eq!(exec(&mut r), "4\n");
}

#[test]
fn test_small_cycle_budget() {
    let mut r = Runtime::default();
    r.enter("var a = 1; { var b = a + 1; print b; } print a;");
    assert_eq!(exec_n(&mut r, 1), "2\n1\n");
}
