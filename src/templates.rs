use std::collections::HashMap;

use tera::Tera;

use crate::config::TEMPLATE_GLOB;
use crate::error::AppError;

/// Initialize the Tera template engine
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::new(TEMPLATE_GLOB)?;

    tera.register_filter("decimal", decimal_filter);

    Ok(tera)
}

/// Render a number with at least one fractional digit ("5000" -> "5000.0",
/// "5000.5" -> "5000.5"), which is how amounts appear on receipts.
///
/// Magnitudes outside `[1e-4, 1e16)` switch to exponent form with a signed,
/// two-digit exponent ("1e+16", "1.5e+20", "1e-05").
pub fn format_decimal(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        return format_exponent(value);
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn format_exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

fn decimal_filter(value: &tera::Value, _args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let number = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("decimal filter expects a number"))?;
    Ok(tera::Value::String(format_decimal(number)))
}
