// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Textual forms of identifiers and literals.
//!
//! Characters that are invisible or easily confused in source text (marks,
//! separators, controls, format and private-use characters, connector
//! punctuation, modifier symbols, unassigned code points) are written as
//! `\uxxxx` escapes; characters outside the Basic Multilingual Plane use
//! `\Uxxxxxxxx`.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::ast::PrimitiveValue;

/// Appended to a string literal that was cut at the maximum length.
pub const STRING_TOO_LONG_MARKER: &str = "[...string is too long...]";

fn is_escaped_category(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::ConnectorPunctuation
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
    )
}

fn push_unicode_escape(out: &mut String, ch: char) {
    let code = ch as u32;
    if code > 0xFFFF {
        out.push_str(&format!("\\U{:08x}", code));
    } else {
        out.push_str(&format!("\\u{:04x}", code));
    }
}

/// Append the escaped form of a character inside a string or char literal.
fn push_char(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '\0' => out.push_str("\\0"),
        '\u{7}' => out.push_str("\\a"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{b}' => out.push_str("\\v"),
        // allowed verbatim although other characters of their category are not
        ' ' | '_' | '`' | '^' => out.push(ch),
        '\u{fffd}' => push_unicode_escape(out, ch),
        // supplementary characters are escaped whatever their category
        c if (c as u32) > 0xFFFF || is_escaped_category(c) => push_unicode_escape(out, c),
        c => out.push(c),
    }
}

/// The escaped form of a character, as it appears inside quotes.
pub fn convert_char(ch: char) -> String {
    let mut out = String::new();
    push_char(&mut out, ch);
    out
}

/// The body of a char literal (without the surrounding `'`).
pub fn convert_char_literal(ch: char) -> String {
    if ch == '\'' {
        return "\\'".to_string();
    }
    convert_char(ch)
}

/// The body of a string literal (without the surrounding `"`).
///
/// With `max_length`, at most that many characters are kept and
/// [`STRING_TOO_LONG_MARKER`] is appended when anything was cut.
pub fn convert_string(text: &str, max_length: Option<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.chars().enumerate() {
        if max_length.is_some_and(|max| i >= max) {
            out.push_str(STRING_TOO_LONG_MARKER);
            break;
        }
        if ch == '"' {
            out.push_str("\\\"");
        } else {
            push_char(&mut out, ch);
        }
    }
    out
}

fn is_printable_identifier_char(ch: char) -> bool {
    match ch {
        '\\' => false,
        ' ' | '_' | '`' | '^' => true,
        c => !is_escaped_category(c),
    }
}

/// Escape the characters of an identifier that cannot appear verbatim.
///
/// Does not add the `@` prefix; that depends on context.
pub fn escape_identifier(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for ch in identifier.chars() {
        if is_printable_identifier_char(ch) {
            out.push(ch);
        } else {
            push_unicode_escape(&mut out, ch);
        }
    }
    out
}

// ============================================================================
// Numbers
// ============================================================================

/// A floating-point value that has no literal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinite {
    PositiveInfinity,
    NegativeInfinity,
    NaN,
}

impl NonFinite {
    pub fn member_name(self) -> &'static str {
        match self {
            NonFinite::PositiveInfinity => "PositiveInfinity",
            NonFinite::NegativeInfinity => "NegativeInfinity",
            NonFinite::NaN => "NaN",
        }
    }

    fn classify(v: f64) -> Option<NonFinite> {
        if v.is_nan() {
            Some(NonFinite::NaN)
        } else if v == f64::INFINITY {
            Some(NonFinite::PositiveInfinity)
        } else if v == f64::NEG_INFINITY {
            Some(NonFinite::NegativeInfinity)
        } else {
            None
        }
    }
}

/// Shortest round-trip text of a finite value.
///
/// Positional notation is used for decimal exponents in
/// `-5..max_positional_exponent`; outside that range the mantissa is followed by
/// `E+dd` / `E-dd`.
fn round_trip(positional: String, scientific: String, max_positional_exponent: i32) -> String {
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return positional,
    };
    if (-5..max_positional_exponent).contains(&exponent) {
        return positional;
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}E{}{:02}", mantissa, sign, exponent.abs())
}

/// The literal text of a `float`, or its non-finite member.
pub fn format_float(v: f32) -> Result<String, NonFinite> {
    if let Some(nf) = NonFinite::classify(v as f64) {
        return Err(nf);
    }
    let mut text = round_trip(format!("{}", v), format!("{:e}", v), 7);
    text.push('f');
    if v == 0.0 && v.is_sign_negative() && !text.starts_with('-') {
        text.insert(0, '-');
    }
    Ok(text)
}

/// The literal text of a `double`, or its non-finite member.
pub fn format_double(v: f64) -> Result<String, NonFinite> {
    if let Some(nf) = NonFinite::classify(v) {
        return Err(nf);
    }
    let mut text = round_trip(format!("{}", v), format!("{:e}", v), 15);
    if !text.contains('.') && !text.contains('E') {
        text.push_str(".0");
    }
    if v == 0.0 && v.is_sign_negative() && !text.starts_with('-') {
        text.insert(0, '-');
    }
    Ok(text)
}

/// The literal text of a primitive value.
///
/// Non-finite floating-point values have no literal text; they are written
/// as a member access on the type keyword instead.
pub fn format_primitive(value: &PrimitiveValue, max_string_length: Option<usize>) -> Result<String, (&'static str, NonFinite)> {
    let text = match value {
        PrimitiveValue::Null => "null".to_string(),
        PrimitiveValue::Bool(true) => "true".to_string(),
        PrimitiveValue::Bool(false) => "false".to_string(),
        PrimitiveValue::Char(c) => format!("'{}'", convert_char_literal(*c)),
        PrimitiveValue::String(s) => format!("\"{}\"", convert_string(s, max_string_length)),
        PrimitiveValue::SByte(v) => v.to_string(),
        PrimitiveValue::Byte(v) => v.to_string(),
        PrimitiveValue::Short(v) => v.to_string(),
        PrimitiveValue::UShort(v) => v.to_string(),
        PrimitiveValue::Int(v) => v.to_string(),
        PrimitiveValue::UInt(v) => format!("{}U", v),
        PrimitiveValue::Long(v) => format!("{}L", v),
        PrimitiveValue::ULong(v) => format!("{}UL", v),
        PrimitiveValue::Float(v) => format_float(*v).map_err(|nf| ("float", nf))?,
        PrimitiveValue::Double(v) => format_double(*v).map_err(|nf| ("double", nf))?,
        PrimitiveValue::Decimal(digits) => format!("{}m", digits),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_escapes() {
        assert_eq!(convert_string("a\"b\\c\n", None), "a\\\"b\\\\c\\n");
        assert_eq!(convert_string("tab\there", None), "tab\\there");
        assert_eq!(convert_string("\0\u{7}\u{b}", None), "\\0\\a\\v");
        assert_eq!(convert_string("it's", None), "it's");
    }

    #[test]
    fn test_char_literal_escapes_quote_only_in_chars() {
        assert_eq!(convert_char_literal('\''), "\\'");
        assert_eq!(convert_char_literal('"'), "\"");
        assert_eq!(convert_char('\u{fffd}'), "\\ufffd");
    }

    #[test]
    fn test_category_escapes() {
        // non-breaking space is a space separator
        assert_eq!(convert_char('\u{a0}'), "\\u00a0");
        // zero width joiner is a format character
        assert_eq!(convert_char('\u{200d}'), "\\u200d");
        // plain letters and punctuation pass through
        assert_eq!(convert_char('é'), "é");
        assert_eq!(convert_char('_'), "_");
        assert_eq!(convert_char('\u{1F600}'), "\\U0001f600");
    }

    #[test]
    fn test_identifier_escapes() {
        assert_eq!(escape_identifier("plain_name"), "plain_name");
        assert_eq!(escape_identifier("a\\b"), "a\\u005cb");
        assert_eq!(escape_identifier("e\u{301}"), "e\\u0301");
        assert_eq!(escape_identifier("a\u{203f}b"), "a\\u203fb");
    }

    #[test]
    fn test_truncation_marker() {
        assert_eq!(
            convert_string("abcdef", Some(3)),
            format!("abc{}", STRING_TOO_LONG_MARKER)
        );
        assert_eq!(convert_string("abc", Some(3)), "abc");
    }

    #[test]
    fn test_integer_suffixes() {
        assert_eq!(format_primitive(&PrimitiveValue::Int(-4), None).unwrap(), "-4");
        assert_eq!(format_primitive(&PrimitiveValue::UInt(4), None).unwrap(), "4U");
        assert_eq!(format_primitive(&PrimitiveValue::Long(4), None).unwrap(), "4L");
        assert_eq!(format_primitive(&PrimitiveValue::ULong(4), None).unwrap(), "4UL");
        assert_eq!(
            format_primitive(&PrimitiveValue::Decimal("1.5".into()), None).unwrap(),
            "1.5m"
        );
    }

    #[test]
    fn test_double_forms() {
        assert_eq!(format_double(1.0).unwrap(), "1.0");
        assert_eq!(format_double(1.5).unwrap(), "1.5");
        assert_eq!(format_double(-0.0).unwrap(), "-0.0");
        assert_eq!(format_double(1e20).unwrap(), "1E+20");
        assert_eq!(format_double(1e-7).unwrap(), "1E-07");
        assert_eq!(format_double(0.0001).unwrap(), "0.0001");
        assert_eq!(format_double(f64::NAN), Err(NonFinite::NaN));
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(format_float(0.1).unwrap(), "0.1f");
        assert_eq!(format_float(2.0).unwrap(), "2f");
        assert_eq!(format_float(-0.0).unwrap(), "-0f");
        assert_eq!(format_float(f32::NEG_INFINITY), Err(NonFinite::NegativeInfinity));
    }
}
