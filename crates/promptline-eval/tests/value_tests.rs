use promptline_eval::Value;

#[test]
fn test_truthiness() {
    assert!(Value::Bool(true).is_truthy());
    assert!(!Value::Bool(false).is_truthy());

    assert!(Value::Number(1.0).is_truthy());
    assert!(Value::Number(-0.5).is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Number(f64::NAN).is_truthy());

    assert!(Value::from("x").is_truthy());
    assert!(!Value::from("").is_truthy());

    assert!(!Value::Null.is_truthy());
}

#[test]
fn test_render_numbers_minimal_decimal() {
    assert_eq!(Value::Number(2.0).render(), "2");
    assert_eq!(Value::Number(-3.0).render(), "-3");
    assert_eq!(Value::Number(2.5).render(), "2.5");
    assert_eq!(Value::Number(0.1).render(), "0.1");
    assert_eq!(Value::Number(16_000_000_000.0).render(), "16000000000");
}

#[test]
fn test_render_non_finite_is_empty() {
    assert_eq!(Value::Number(f64::INFINITY).render(), "");
    assert_eq!(Value::Number(f64::NEG_INFINITY).render(), "");
    assert_eq!(Value::Number(f64::NAN).render(), "");
}

#[test]
fn test_render_null_and_bool() {
    assert_eq!(Value::Null.render(), "");
    assert_eq!(Value::Bool(true).render(), "true");
    assert_eq!(Value::Bool(false).render(), "false");
}

#[test]
fn test_numeric_coercion() {
    assert_eq!(Value::from("2.5").as_number().unwrap(), 2.5);
    assert_eq!(Value::Null.as_number().unwrap(), 0.0);
    assert!(Value::from("eleven").as_number().is_err());
    assert!(Value::Bool(true).as_number().is_err());
}
