use crate::config::NO_VALUE_SENTINEL;
use crate::db::models::Value;

/// Rendered in place of empty, zero or sentinel values.
pub const BLANK: &str = " ";

/// A single printf-style directive: `%s`, `%d`, `%[-][w][.p]f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Directive {
    left: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

fn parse_directive(fmt: &str) -> Option<Directive> {
    let spec = fmt.strip_prefix('%')?;
    let conversion = spec.chars().last()?;
    if !matches!(conversion, 's' | 'd' | 'f') {
        return None;
    }
    let mut body = &spec[..spec.len() - conversion.len_utf8()];
    let left = body.starts_with('-');
    if left {
        body = &body[1..];
    }
    let (width, precision) = match body.split_once('.') {
        Some((w, p)) => (w, Some(p.parse().ok()?)),
        None => (body, None),
    };
    let width = if width.is_empty() { 0 } else { width.parse().ok()? };
    Some(Directive {
        left,
        width,
        precision,
        conversion,
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Int(v) => *v == 0 || *v == NO_VALUE_SENTINEL,
        Value::Float(v) => *v == 0.0 || *v == NO_VALUE_SENTINEL as f64,
        Value::Text(s) => s.is_empty(),
    }
}

/// Format one cell. Blank cells render as [`BLANK`] whatever the format.
pub fn format_cell(fmt: &str, value: &Value) -> String {
    if is_blank(value) {
        return BLANK.to_string();
    }
    let Some(d) = parse_directive(fmt) else {
        return plain(value);
    };

    let body = match (d.conversion, value) {
        (_, Value::Text(s)) => s.clone(),
        ('d', v) => v.as_i64().map(|n| n.to_string()).unwrap_or_default(),
        ('f', v) => {
            let x = v.as_f64().unwrap_or_default();
            format!("{:.*}", d.precision.unwrap_or(6), x)
        }
        (_, v) => plain(v),
    };

    if d.left {
        format!("{body:<width$}", width = d.width)
    } else {
        format!("{body:>width$}", width = d.width)
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Text(s) => s.clone(),
    }
}

/// Cents as dollars: `$5.50` for 550, `$5` for whole amounts.
pub fn format_dollars(cents: i64) -> String {
    let dollars = cents as f64 / 100.0;
    if cents % 100 != 0 {
        format!("${dollars:.2}")
    } else {
        format!("${dollars:.0}")
    }
}

/// Capitalise each word, lower-case the rest: `holdem` → `Holdem`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
