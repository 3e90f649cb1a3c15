// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Literal values carried by primitive expressions.

/// The value of a literal.
///
/// `Decimal` keeps its textual digits; the tree never computes with it.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    Null,
    Bool(bool),
    Char(char),
    String(String),
    SByte(i8),
    Byte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Decimal(String),
}

impl PrimitiveValue {
    /// True for a numeric literal whose value is below zero.
    ///
    /// Negative literals behave like a unary minus for parenthesization.
    pub fn is_negative(&self) -> bool {
        match self {
            PrimitiveValue::SByte(v) => *v < 0,
            PrimitiveValue::Short(v) => *v < 0,
            PrimitiveValue::Int(v) => *v < 0,
            PrimitiveValue::Long(v) => *v < 0,
            PrimitiveValue::Float(v) => v.is_sign_negative() && !v.is_nan(),
            PrimitiveValue::Double(v) => v.is_sign_negative() && !v.is_nan(),
            PrimitiveValue::Decimal(s) => s.starts_with('-'),
            _ => false,
        }
    }

    pub fn is_string_or_char(&self) -> bool {
        matches!(self, PrimitiveValue::String(_) | PrimitiveValue::Char(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrimitiveValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a signed 128-bit integer, for integral literals.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            PrimitiveValue::SByte(v) => Some(*v as i128),
            PrimitiveValue::Byte(v) => Some(*v as i128),
            PrimitiveValue::Short(v) => Some(*v as i128),
            PrimitiveValue::UShort(v) => Some(*v as i128),
            PrimitiveValue::Int(v) => Some(*v as i128),
            PrimitiveValue::UInt(v) => Some(*v as i128),
            PrimitiveValue::Long(v) => Some(*v as i128),
            PrimitiveValue::ULong(v) => Some(*v as i128),
            PrimitiveValue::Char(c) => Some(*c as i128),
            _ => None,
        }
    }
}

impl From<bool> for PrimitiveValue {
    fn from(v: bool) -> Self {
        PrimitiveValue::Bool(v)
    }
}

impl From<i32> for PrimitiveValue {
    fn from(v: i32) -> Self {
        PrimitiveValue::Int(v)
    }
}

impl From<i64> for PrimitiveValue {
    fn from(v: i64) -> Self {
        PrimitiveValue::Long(v)
    }
}

impl From<f64> for PrimitiveValue {
    fn from(v: f64) -> Self {
        PrimitiveValue::Double(v)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        PrimitiveValue::String(v.to_string())
    }
}

impl From<char> for PrimitiveValue {
    fn from(v: char) -> Self {
        PrimitiveValue::Char(v)
    }
}
