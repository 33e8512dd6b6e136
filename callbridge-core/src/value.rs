//! Loose conversions between JSON values and the text the host side expects.
//!
//! The legacy wire format joins arguments the way a script `Array.join`
//! does, and error fields are judged by script truthiness. Both rules live
//! here so the encoder and the response decoder agree.

use serde_json::{Number, Value};

/// Renders a value as a script string conversion would.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => render_number(v),
        Value::String(v) => v.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

/// Fixed notation in `[1e-6, 1e21)`, exponent notation with an explicit sign
/// outside it.
fn render_number(number: &Number) -> String {
    let Some(v) = number.as_f64().filter(|_| number.is_f64()) else {
        return number.to_string();
    };

    if v == 0.0 {
        return "0".to_owned();
    }

    if (1e-6..1e21).contains(&v.abs()) {
        return format!("{v}");
    }

    let exponent = format!("{v:e}");
    match exponent.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponent,
    }
}

/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(v) => *v,
        Value::Number(v) => v.as_f64().map_or(true, |v| v != 0.0 && !v.is_nan()),
        Value::String(v) => !v.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
