//! Testing primitives - assertion functions for Atlas
//!
//! Assertions count themselves on the execution context when they pass and
//! raise `RuntimeError::AssertionFailed` when they don't. Misuse (wrong
//! arity or argument type) raises `TypeError` instead, which the harness
//! reports as an error rather than a failure.
//!
//! # API
//!
//! ## Basic
//! - `assert(condition, message)` - assert condition is true
//! - `assertFalse(condition, message)` - assert condition is false
//!
//! ## Equality
//! - `assertEqual(actual, expected)` - assert deep equality
//! - `assertNotEqual(actual, expected)` - assert not equal
//!
//! ## Result
//! - `assertOk(result)` - assert `Result` is `Ok`, return unwrapped value
//! - `assertErr(result)` - assert `Result` is `Err`, return unwrapped error
//!
//! ## Option
//! - `assertSome(option)` - assert `Option` is `Some`, return unwrapped value
//! - `assertNone(option)` - assert `Option` is `None`
//!
//! ## Collections
//! - `assertContains(array, value)` - assert array contains value
//! - `assertLength(array, expected)` - assert array length matches

use crate::context::ExecutionContext;
use crate::value::{RuntimeError, Value};

// ============================================================================
// Internal helpers
// ============================================================================

fn type_error(expected: &str, got: &str) -> RuntimeError {
    RuntimeError::TypeError {
        msg: format!("expected {}, got {}", expected, got),
    }
}

fn check_arity(fn_name: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::TypeError {
            msg: format!(
                "{} expects {} argument{}, got {}",
                fn_name,
                expected,
                if expected == 1 { "" } else { "s" },
                args.len()
            ),
        });
    }
    Ok(())
}

/// Count a passing assertion and return its value
fn pass(ctx: &mut ExecutionContext, value: Value) -> Result<Value, RuntimeError> {
    ctx.record_assertion();
    Ok(value)
}

/// Render a value for failure messages; strings are quoted here so that
/// `"1"` and `1` are distinguishable in a diff.
fn display(v: &Value) -> String {
    match v {
        Value::String(s) => format!("{:?}", s.as_str()),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Option(Some(inner)) => format!("Some({})", display(inner)),
        Value::Result(Ok(inner)) => format!("Ok({})", display(inner)),
        Value::Result(Err(inner)) => format!("Err({})", display(inner)),
        other => other.to_string(),
    }
}

// ============================================================================
// Basic assertions
// ============================================================================

/// `assert(condition: bool, message: string) -> void`
pub fn assert(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assert", args, 2)?;

    let condition = match &args[0] {
        Value::Bool(b) => *b,
        other => return Err(type_error("bool", other.type_name())),
    };
    let message = match &args[1] {
        Value::String(s) => s.as_str(),
        other => return Err(type_error("string", other.type_name())),
    };

    if !condition {
        return Err(RuntimeError::assertion(format!(
            "Assertion failed: {}",
            message
        )));
    }
    pass(ctx, Value::Null)
}

/// `assertFalse(condition: bool, message: string) -> void`
pub fn assert_false(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertFalse", args, 2)?;

    let condition = match &args[0] {
        Value::Bool(b) => *b,
        other => return Err(type_error("bool", other.type_name())),
    };
    let message = match &args[1] {
        Value::String(s) => s.as_str(),
        other => return Err(type_error("string", other.type_name())),
    };

    if condition {
        return Err(RuntimeError::assertion(format!(
            "Assertion failed (expected false): {}",
            message
        )));
    }
    pass(ctx, Value::Null)
}

// ============================================================================
// Equality assertions
// ============================================================================

/// `assertEqual(actual: T, expected: T) -> void`
pub fn assert_equal(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertEqual", args, 2)?;

    let actual = &args[0];
    let expected = &args[1];

    if actual != expected {
        return Err(RuntimeError::assertion(format!(
            "Assertion failed: values not equal\n  Actual:   {}\n  Expected: {}",
            display(actual),
            display(expected)
        )));
    }
    pass(ctx, Value::Null)
}

/// `assertNotEqual(actual: T, expected: T) -> void`
pub fn assert_not_equal(
    ctx: &mut ExecutionContext,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    check_arity("assertNotEqual", args, 2)?;

    if args[0] == args[1] {
        return Err(RuntimeError::assertion(format!(
            "Assertion failed: values are equal (expected them to differ)\n  Value: {}",
            display(&args[0])
        )));
    }
    pass(ctx, Value::Null)
}

// ============================================================================
// Result assertions
// ============================================================================

/// `assertOk(result: Result<T, E>) -> T`
pub fn assert_ok(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertOk", args, 1)?;

    match &args[0] {
        Value::Result(Ok(val)) => pass(ctx, (**val).clone()),
        Value::Result(Err(err)) => Err(RuntimeError::assertion(format!(
            "assertOk: expected Ok, got Err({})",
            display(err)
        ))),
        other => Err(type_error("Result", other.type_name())),
    }
}

/// `assertErr(result: Result<T, E>) -> E`
pub fn assert_err(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertErr", args, 1)?;

    match &args[0] {
        Value::Result(Err(err)) => pass(ctx, (**err).clone()),
        Value::Result(Ok(val)) => Err(RuntimeError::assertion(format!(
            "assertErr: expected Err, got Ok({})",
            display(val)
        ))),
        other => Err(type_error("Result", other.type_name())),
    }
}

// ============================================================================
// Option assertions
// ============================================================================

/// `assertSome(option: Option<T>) -> T`
pub fn assert_some(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertSome", args, 1)?;

    match &args[0] {
        Value::Option(Some(val)) => pass(ctx, (**val).clone()),
        Value::Option(None) => Err(RuntimeError::assertion(
            "assertSome: expected Some, got None",
        )),
        other => Err(type_error("Option", other.type_name())),
    }
}

/// `assertNone(option: Option<T>) -> void`
pub fn assert_none(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertNone", args, 1)?;

    match &args[0] {
        Value::Option(None) => pass(ctx, Value::Null),
        Value::Option(Some(val)) => Err(RuntimeError::assertion(format!(
            "assertNone: expected None, got Some({})",
            display(val)
        ))),
        other => Err(type_error("Option", other.type_name())),
    }
}

// ============================================================================
// Collection assertions
// ============================================================================

/// `assertContains(array: array, value: T) -> void`
pub fn assert_contains(
    ctx: &mut ExecutionContext,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    check_arity("assertContains", args, 2)?;

    let items = match &args[0] {
        Value::Array(items) => items,
        other => return Err(type_error("array", other.type_name())),
    };
    let needle = &args[1];

    if !items.iter().any(|v| v == needle) {
        return Err(RuntimeError::assertion(format!(
            "assertContains: array does not contain {}",
            display(needle)
        )));
    }
    pass(ctx, Value::Null)
}

/// `assertLength(array: array, expected: number) -> void`
pub fn assert_length(ctx: &mut ExecutionContext, args: &[Value]) -> Result<Value, RuntimeError> {
    check_arity("assertLength", args, 2)?;

    let items = match &args[0] {
        Value::Array(items) => items,
        other => return Err(type_error("array", other.type_name())),
    };
    let expected_len = match &args[1] {
        Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 => *n as usize,
        Value::Number(n) => {
            return Err(RuntimeError::TypeError {
                msg: format!(
                    "assertLength: expected a non-negative integer length, got {}",
                    n
                ),
            })
        }
        other => return Err(type_error("number", other.type_name())),
    };

    if items.len() != expected_len {
        return Err(RuntimeError::assertion(format!(
            "assertLength: expected length {}, got {}",
            expected_len,
            items.len()
        )));
    }
    pass(ctx, Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new()
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn s(text: &str) -> Value {
        Value::string(text)
    }

    // -- assert ---------------------------------------------------------------

    #[test]
    fn test_assert_passes_and_counts() {
        let mut ctx = ctx();
        assert!(assert(&mut ctx, &[Value::Bool(true), s("ok")]).is_ok());
        assert_eq!(ctx.assertions_count(), 1);
    }

    #[test]
    fn test_assert_fails_with_message() {
        let mut ctx = ctx();
        let err = assert(&mut ctx, &[Value::Bool(false), s("math broke")]).unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Assertion failed: math broke");
        assert_eq!(ctx.assertions_count(), 0);
    }

    #[test]
    fn test_assert_type_error_is_not_assertion() {
        let mut ctx = ctx();
        let err = assert(&mut ctx, &[num(1.0), s("x")]).unwrap_err();
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("expected bool"));
    }

    #[test]
    fn test_assert_arity() {
        let err = assert(&mut ctx(), &[Value::Bool(true)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error: assert expects 2 arguments, got 1"
        );
    }

    #[test]
    fn test_assert_false() {
        let mut ctx = ctx();
        assert!(assert_false(&mut ctx, &[Value::Bool(false), s("ok")]).is_ok());
        assert!(assert_false(&mut ctx, &[Value::Bool(true), s("no")])
            .unwrap_err()
            .is_assertion());
        assert_eq!(ctx.assertions_count(), 1);
    }

    // -- equality -------------------------------------------------------------

    #[test]
    fn test_assert_equal_shows_diff() {
        let err = assert_equal(&mut ctx(), &[num(4.0), num(3.0)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assertion failed: values not equal\n  Actual:   4\n  Expected: 3"
        );
    }

    #[test]
    fn test_assert_equal_quotes_strings() {
        let err = assert_equal(&mut ctx(), &[s("1"), num(1.0)]).unwrap_err();
        assert!(err.to_string().contains("Actual:   \"1\""));
    }

    #[test]
    fn test_assert_equal_nested() {
        let a = Value::array(vec![Value::some(num(1.0)), Value::ok(s("x"))]);
        let b = Value::array(vec![Value::some(num(1.0)), Value::ok(s("x"))]);
        assert!(assert_equal(&mut ctx(), &[a, b]).is_ok());
    }

    #[test]
    fn test_assert_not_equal() {
        let mut ctx = ctx();
        assert!(assert_not_equal(&mut ctx, &[num(1.0), num(2.0)]).is_ok());
        let err = assert_not_equal(&mut ctx, &[s("same"), s("same")]).unwrap_err();
        assert!(err.to_string().contains("expected them to differ"));
    }

    // -- Result / Option ------------------------------------------------------

    #[test]
    fn test_assert_ok_unwraps() {
        let mut ctx = ctx();
        let value = assert_ok(&mut ctx, &[Value::ok(num(42.0))]).unwrap();
        assert_eq!(value, num(42.0));
        let err = assert_ok(&mut ctx, &[Value::err(s("oops"))]).unwrap_err();
        assert_eq!(err.to_string(), "assertOk: expected Ok, got Err(\"oops\")");
    }

    #[test]
    fn test_assert_err_unwraps() {
        let value = assert_err(&mut ctx(), &[Value::err(s("reason"))]).unwrap();
        assert_eq!(value, s("reason"));
        assert!(assert_err(&mut ctx(), &[Value::ok(Value::Null)]).is_err());
        assert!(!assert_err(&mut ctx(), &[num(1.0)]).unwrap_err().is_assertion());
    }

    #[test]
    fn test_assert_some_and_none() {
        let mut ctx = ctx();
        assert_eq!(
            assert_some(&mut ctx, &[Value::some(s("hello"))]).unwrap(),
            s("hello")
        );
        assert!(assert_none(&mut ctx, &[Value::none()]).is_ok());
        assert!(assert_some(&mut ctx, &[Value::none()])
            .unwrap_err()
            .to_string()
            .contains("None"));
        assert!(assert_none(&mut ctx, &[Value::some(num(9.0))])
            .unwrap_err()
            .to_string()
            .contains("Some(9)"));
        assert_eq!(ctx.assertions_count(), 2);
    }

    // -- collections ----------------------------------------------------------

    #[test]
    fn test_assert_contains() {
        let arr = Value::array(vec![num(1.0), num(2.0)]);
        assert!(assert_contains(&mut ctx(), &[arr.clone(), num(2.0)]).is_ok());
        let err = assert_contains(&mut ctx(), &[arr, num(99.0)]).unwrap_err();
        assert!(err.to_string().contains("does not contain 99"));
    }

    #[test]
    fn test_assert_length() {
        let arr = Value::array(vec![num(1.0)]);
        assert!(assert_length(&mut ctx(), &[arr.clone(), num(1.0)]).is_ok());
        let err = assert_length(&mut ctx(), &[arr.clone(), num(5.0)]).unwrap_err();
        assert!(err.to_string().contains("expected length 5, got 1"));
        assert!(!assert_length(&mut ctx(), &[arr, num(1.5)])
            .unwrap_err()
            .is_assertion());
    }
}
