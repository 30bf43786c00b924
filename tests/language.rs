use std::rc::Rc;

use badlang::context::{Context, SymbolTable};
use badlang::error::{LangError, LexingErrorKind};
use badlang::run;
use badlang::token::Kind;
use proptest::prelude::*;

fn fresh() -> Rc<Context> {
    Context::root(SymbolTable::with_globals())
}

fn eval(src: &str) -> Result<String, LangError> {
    run("<test>", src, &fresh()).map(|value| value.to_string())
}

fn assert_value(src: &str, expected: &str) {
    match eval(src) {
        Ok(value) => assert_eq!(value, expected, "evaluating {:?}", src),
        Err(e) => panic!("{:?} failed:\n{}", src, e),
    }
}

fn assert_error(src: &str) -> LangError {
    match eval(src) {
        Ok(value) => panic!("{:?} should fail, got {}", src, value),
        Err(e) => e,
    }
}

#[test]
fn precedence_and_associativity() {
    assert_value("3+4*2", "11");
    assert_value("(3+4)*2", "14");
    assert_value("8-3-2", "3");
    assert_value("2^3^2", "512");
    assert_value("-2^2", "-4");
    assert_value("2 * -3", "-6");
}

#[test]
fn division() {
    assert_value("7/2", "3.5");
    assert_value("8/4/2", "1.0");

    let err = assert_error("7/0");
    match err {
        LangError::Runtime(ref e) => assert_eq!(e.details, "Division by zero"),
        ref other => panic!("expected runtime error, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Traceback (most recent call last):\n  File <test>, line 1, in <program>\nRuntime Error: Division by zero"
    );
}

#[test]
fn comparisons_and_logic() {
    assert_value("5==5", "1");
    assert_value("5!=5", "0");
    assert_value("NOT 0", "1");
    assert_value("NOT 1 == 2", "1");
    assert_value("1 + 1 == 2 AND 3 > 2", "1");
    assert_value("FALSE OR NULL", "0");
    assert_value("2.5 >= 2", "1");
}

#[test]
fn variables_persist_in_the_environment() {
    let context = fresh();
    assert_eq!(run("<test>", "VAR myname1 = 5", &context).unwrap().to_string(), "5");
    assert_eq!(run("<test>", "myname1", &context).unwrap().to_string(), "5");

    let first = run("<test>", "myname1", &context).unwrap();
    let second = run("<test>", "myname1", &context).unwrap();
    assert_eq!(first.value, second.value);
}

#[test]
fn undefined_variable() {
    let err = assert_error("zzz");
    assert_eq!(
        err.to_string(),
        "Traceback (most recent call last):\n  File <test>, line 1, in <program>\nRuntime Error: 'zzz' is not defined"
    );
}

#[test]
fn declaration_names_are_six_to_eight_characters() {
    for src in ["VAR ab = 5", "VAR abcdefghi = 5"] {
        match assert_error(src) {
            LangError::Syntax(e) => assert_eq!(e.details, "Identifiers must be 6-8 characters"),
            other => panic!("expected syntax error for {:?}, got {:?}", src, other),
        }
    }
    assert_value("VAR abcdef = 5", "5");

    // Uses are not length checked.
    let context = fresh();
    context.assign("ab", badlang::number::Number::int(3));
    assert_eq!(run("<test>", "ab + 1", &context).unwrap().to_string(), "4");
}

#[test]
fn trailing_operator() {
    let err = assert_error("3 +");
    assert_eq!(
        err.to_string(),
        "Invalid Syntax: Expected int, float, identifier, '+', '-', '('\nFile <test>, line 1"
    );
    assert_eq!(err.span().0.index, 3);
}

#[test]
fn lexing_errors() {
    match assert_error("2 # 3") {
        LangError::Lexing(e) => {
            assert_eq!(e.kind, LexingErrorKind::IllegalCharacter);
            assert_eq!(e.to_string(), "Illegal Character: '#'\nFile <test>, line 1");
        }
        other => panic!("expected lexing error, got {:?}", other),
    }

    match assert_error("2 ! 3") {
        LangError::Lexing(e) => {
            assert_eq!(e.to_string(), "Expected Character: '=' (after '!')\nFile <test>, line 1")
        }
        other => panic!("expected lexing error, got {:?}", other),
    }
}

#[test]
fn run_line_reports_file_lines() {
    let context = fresh();
    badlang::run_line("prog.bdl", "VAR stored = 2", 0, &context).unwrap();
    let err = badlang::run_line("prog.bdl", "stored / 0", 3, &context).unwrap_err();
    assert!(err.to_string().contains("File prog.bdl, line 4, in <program>"));
}

#[test]
fn oversized_integer_literals() {
    let tokens = badlang::tokenize("<test>", "99999999999999999999").unwrap();
    assert_eq!(tokens[0].kind, Kind::Int);
    assert_value("99999999999999999999", "1e+20");
    assert_value("0.00001", "1e-05");
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let deep = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    match assert_error(&deep) {
        LangError::Syntax(e) => assert_eq!(e.details, "Expression nested too deeply"),
        other => panic!("expected syntax error, got {:?}", other),
    }

    let chain = format!("{}1", "1+".repeat(10_000));
    assert!(matches!(assert_error(&chain), LangError::Syntax(_)));

    assert_value(&format!("{}7{}", "(".repeat(50), ")".repeat(50)), "7");
    assert_value(&format!("{}1", "1+".repeat(400)), "401");
}

#[test]
fn arrows_point_at_the_failure() {
    let err = assert_error("1 + missing");
    assert!(err.with_arrows().ends_with("1 + missing\n    ^^^^^^^"));
}

proptest! {
    #[test]
    fn subtraction_chains_fold_left(a in 0i64..1000, b in 0i64..1000, c in 0i64..1000) {
        let value = eval(&format!("{}-{}-{}", a, b, c)).unwrap();
        prop_assert_eq!(value, (a - b - c).to_string());
    }

    #[test]
    fn power_chains_fold_right(a in 0i64..4, b in 0u32..3, c in 0u32..3) {
        let value = eval(&format!("{}^{}^{}", a, b, c)).unwrap();
        prop_assert_eq!(value, a.pow(b.pow(c)).to_string());
    }

    #[test]
    fn integer_literals_evaluate_to_themselves(n in 0i64..=i64::MAX) {
        prop_assert_eq!(eval(&n.to_string()).unwrap(), n.to_string());
    }

    #[test]
    fn digit_strings_lex_as_one_integer_literal(digits in "[0-9]{1,60}") {
        let tokens = badlang::tokenize("<test>", &digits).unwrap();
        let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
        prop_assert_eq!(kinds, vec![Kind::Int, Kind::EOF]);
        prop_assert!(eval(&digits).is_ok());
    }
}
