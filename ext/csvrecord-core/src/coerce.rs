//! Cell text to typed value coercion

use ordered_float::OrderedFloat;
use std::sync::Arc;

use crate::error::CoercionError;
use crate::header::ColumnType;
use crate::schema::{FieldKind, FloatWidth, IntWidth, ScalarKind};
use crate::CellValue;

/// Element separator inside array cells
pub const ELEMENT_SEPARATOR: char = ',';
/// Group separator inside two-dimensional array cells
pub const GROUP_SEPARATOR: char = '|';

/// Result of coercing one cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Value(CellValue),
    /// Column's declared type does not match the field kind; the field keeps
    /// its default value
    Skip,
}

/// Coerce a cell for a field, honouring the column's declared type.
pub fn coerce_cell(
    kind: FieldKind,
    column_type: &ColumnType,
    text: &str,
) -> Result<CellOutcome, CoercionError> {
    if !column_type.accepts(kind) {
        return Ok(CellOutcome::Skip);
    }

    let value = match kind {
        FieldKind::Int(width) => coerce_scalar(ScalarKind::Int(width), text)?,
        FieldKind::Float(width) => coerce_scalar(ScalarKind::Float(width), text)?,
        FieldKind::String => coerce_scalar(ScalarKind::String, text)?,
        FieldKind::Array1(elem) => CellValue::List(coerce_array1(elem, text)?),
        FieldKind::Array2(elem) => CellValue::List(coerce_array2(elem, text)?),
    };
    Ok(CellOutcome::Value(value))
}

pub fn coerce_scalar(kind: ScalarKind, text: &str) -> Result<CellValue, CoercionError> {
    match kind {
        // parse_int has already range-checked against the width
        ScalarKind::Int(width) => {
            let v = parse_int(text, width)?;
            Ok(match width {
                IntWidth::W8 => CellValue::Int8(v as i8),
                IntWidth::W16 => CellValue::Int16(v as i16),
                IntWidth::W32 => CellValue::Int32(v as i32),
                IntWidth::W64 => CellValue::Int64(v),
            })
        }
        ScalarKind::Float(FloatWidth::W32) => {
            let v = parse_float::<f32>(text, 32)?;
            Ok(CellValue::Float32(OrderedFloat(v)))
        }
        ScalarKind::Float(FloatWidth::W64) => {
            let v = parse_float::<f64>(text, 64)?;
            Ok(CellValue::Float64(OrderedFloat(v)))
        }
        ScalarKind::String => Ok(CellValue::String(Arc::from(text))),
    }
}

/// `"1,2,3"` → `[1, 2, 3]`. An empty cell is an empty list.
pub fn coerce_array1(elem: ScalarKind, text: &str) -> Result<Vec<CellValue>, CoercionError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(ELEMENT_SEPARATOR)
        .map(|piece| coerce_scalar(elem, piece))
        .collect()
}

/// `"1,2|3,4"` → `[[1, 2], [3, 4]]`. Empty groups are empty lists.
pub fn coerce_array2(elem: ScalarKind, text: &str) -> Result<Vec<CellValue>, CoercionError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(GROUP_SEPARATOR)
        .map(|group| coerce_array1(elem, group).map(CellValue::List))
        .collect()
}

/// Parse a signed integer literal and check it fits in `width`.
///
/// The base follows the literal's prefix: `0x` hex, `0b` binary, `0o` or a
/// bare leading `0` octal, otherwise decimal. `_` may separate digits only in
/// prefixed literals.
pub fn parse_int(text: &str, width: IntWidth) -> Result<i64, CoercionError> {
    let invalid = || CoercionError::InvalidInt {
        text: text.to_string(),
    };
    let out_of_range = || CoercionError::IntOutOfRange {
        text: text.to_string(),
        bits: width.bits(),
    };

    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if body.is_empty() {
        return Err(invalid());
    }

    let (radix, digits, prefixed) = split_radix(body);
    let digits = strip_separators(digits, prefixed).ok_or_else(invalid)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    let magnitude = u64::from_str_radix(&digits, radix).map_err(|_| out_of_range())?;
    let limit = 1u64 << (width.bits() - 1);
    if negative {
        if magnitude > limit {
            return Err(out_of_range());
        }
        Ok((-(magnitude as i128)) as i64)
    } else {
        if magnitude >= limit {
            return Err(out_of_range());
        }
        Ok(magnitude as i64)
    }
}

fn split_radix(body: &str) -> (u32, &str, bool) {
    let bytes = body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..], true),
            b'b' | b'B' => return (2, &body[2..], true),
            b'o' | b'O' => return (8, &body[2..], true),
            _ => return (8, &body[1..], true),
        }
    }
    (10, body, false)
}

// `_` must sit between digits (or right after the base prefix)
fn strip_separators(digits: &str, prefixed: bool) -> Option<String> {
    if !digits.contains('_') {
        return Some(digits.to_string());
    }
    if !prefixed {
        return None;
    }
    let mut prev_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if prev_underscore {
                return None;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
    }
    if prev_underscore {
        return None;
    }
    Some(digits.replace('_', ""))
}

/// Parse a float at the given precision. Finite literals that overflow the
/// precision are errors rather than infinities.
pub fn parse_float<F>(text: &str, bits: u32) -> Result<F, CoercionError>
where
    F: std::str::FromStr<Err = std::num::ParseFloatError> + FloatLike,
{
    let v: F = text.parse().map_err(|source| CoercionError::InvalidFloat {
        text: text.to_string(),
        source,
    })?;
    if v.is_infinite_value() && !names_infinity(text) {
        return Err(CoercionError::FloatOutOfRange {
            text: text.to_string(),
            bits,
        });
    }
    Ok(v)
}

fn names_infinity(text: &str) -> bool {
    let unsigned = text.trim_start_matches(|c: char| c == '+' || c == '-');
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Floating point types `parse_float` can produce
pub trait FloatLike: Copy {
    fn is_infinite_value(self) -> bool;
}

impl FloatLike for f32 {
    fn is_infinite_value(self) -> bool {
        self.is_infinite()
    }
}

impl FloatLike for f64 {
    fn is_infinite_value(self) -> bool {
        self.is_infinite()
    }
}
