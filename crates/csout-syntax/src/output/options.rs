// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Formatting policy.
//!
//! [`FormattingOptions`] is plain data read by the renderer at every optional
//! space, brace and wrapping decision. Missing fields take their value from
//! [`FormattingOptions::allman`], so a policy file only needs to list what it
//! changes:
//!
//! ```json
//! { "statement_brace_style": "end_of_line", "indentation_string": "    " }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Where an opening brace goes relative to the construct it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BraceStyle {
    /// `if (x) {`
    EndOfLine,
    /// `if (x){`
    EndOfLineWithoutSpace,
    /// The brace on its own line at the construct's indentation.
    NextLine,
    /// The brace on its own line, indented one level with the body.
    NextLineShifted,
    /// The brace on its own line indented one level, the body two.
    NextLineShifted2,
    /// `{` at the end of the line, `}` indented with the body.
    BannerStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrapping {
    DoNotWrap,
    WrapAlways,
    WrapIfTooLong,
}

/// Whether a keyword that continues a statement (`else`, `catch`, ...)
/// starts a new line after a closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewLinePlacement {
    SameLine,
    NewLine,
}

/// How a property whose accessors have no bodies is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFormatting {
    /// `int X { get; set; }`
    SingleLine,
    /// One accessor per line.
    MultipleLines,
}

/// The formatting policy consulted by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingOptions {
    // ---- Braces ----
    pub namespace_brace_style: BraceStyle,
    pub class_brace_style: BraceStyle,
    pub interface_brace_style: BraceStyle,
    pub struct_brace_style: BraceStyle,
    pub enum_brace_style: BraceStyle,
    pub method_brace_style: BraceStyle,
    pub constructor_brace_style: BraceStyle,
    pub property_brace_style: BraceStyle,
    pub accessor_brace_style: BraceStyle,
    pub anonymous_method_brace_style: BraceStyle,
    pub statement_brace_style: BraceStyle,
    pub array_initializer_brace_style: BraceStyle,
    pub auto_property_formatting: PropertyFormatting,

    // ---- Parentheses ----
    pub space_before_method_declaration_parentheses: bool,
    pub space_within_method_declaration_parentheses: bool,
    pub space_before_method_call_parentheses: bool,
    pub space_within_method_call_parentheses: bool,
    pub space_before_if_parentheses: bool,
    pub space_within_if_parentheses: bool,
    pub space_before_while_parentheses: bool,
    pub space_within_while_parentheses: bool,
    pub space_before_for_parentheses: bool,
    pub space_within_for_parentheses: bool,
    pub space_before_foreach_parentheses: bool,
    pub space_within_foreach_parentheses: bool,
    pub space_before_catch_parentheses: bool,
    pub space_within_catch_parentheses: bool,
    pub space_before_switch_parentheses: bool,
    pub space_within_switch_parentheses: bool,
    pub space_before_lock_parentheses: bool,
    pub space_within_lock_parentheses: bool,
    pub space_before_using_parentheses: bool,
    pub space_within_using_parentheses: bool,
    pub space_before_fixed_parentheses: bool,
    pub space_within_fixed_parentheses: bool,
    /// `checked(...)` and `unchecked(...)` expressions.
    pub space_before_checked_parentheses: bool,
    pub space_within_checked_parentheses: bool,
    /// `typeof(...)`, `sizeof(...)` and `default(...)`.
    pub space_before_typeof_parentheses: bool,
    pub space_within_typeof_parentheses: bool,
    pub space_within_cast_parentheses: bool,
    pub space_after_cast: bool,
    pub space_within_parentheses: bool,
    pub space_before_brackets: bool,
    pub space_within_brackets: bool,

    // ---- Operators and separators ----
    pub space_around_assignment: bool,
    pub space_around_binary_operators: bool,
    pub space_before_conditional_question: bool,
    pub space_after_conditional_question: bool,
    pub space_before_conditional_colon: bool,
    pub space_after_conditional_colon: bool,
    pub space_around_lambda_arrow: bool,
    pub space_before_comma: bool,
    pub space_after_comma: bool,
    pub space_before_for_semicolon: bool,
    pub space_after_for_semicolon: bool,

    // ---- New lines ----
    pub else_new_line_placement: NewLinePlacement,
    pub catch_new_line_placement: NewLinePlacement,
    pub finally_new_line_placement: NewLinePlacement,
    /// The `while` of a do-while loop.
    pub while_new_line_placement: NewLinePlacement,
    pub array_initializer_wrapping: Wrapping,

    // ---- Indentation ----
    pub indentation_string: String,
    pub indent_namespace_body: bool,
    pub indent_class_body: bool,
    pub indent_switch_body: bool,
    pub indent_case_body: bool,

    // ---- Blank lines ----
    pub blank_lines_after_usings: u32,
    pub blank_lines_between_types: u32,
    pub blank_lines_between_members: u32,
    pub blank_lines_between_fields: u32,

    // ---- Rewriting ----
    /// Add parentheses the grammar does not need but readers do.
    pub insert_parentheses_for_readability: bool,
    /// Cut string literals longer than this many characters.
    pub max_string_length: Option<usize>,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self::allman()
    }
}

impl FormattingOptions {
    /// Braces on their own lines, tab indentation, blank lines between members.
    pub fn allman() -> Self {
        FormattingOptions {
            namespace_brace_style: BraceStyle::NextLine,
            class_brace_style: BraceStyle::NextLine,
            interface_brace_style: BraceStyle::NextLine,
            struct_brace_style: BraceStyle::NextLine,
            enum_brace_style: BraceStyle::NextLine,
            method_brace_style: BraceStyle::NextLine,
            constructor_brace_style: BraceStyle::NextLine,
            property_brace_style: BraceStyle::NextLine,
            accessor_brace_style: BraceStyle::NextLine,
            anonymous_method_brace_style: BraceStyle::EndOfLine,
            statement_brace_style: BraceStyle::NextLine,
            array_initializer_brace_style: BraceStyle::NextLine,
            auto_property_formatting: PropertyFormatting::SingleLine,

            space_before_method_declaration_parentheses: false,
            space_within_method_declaration_parentheses: false,
            space_before_method_call_parentheses: false,
            space_within_method_call_parentheses: false,
            space_before_if_parentheses: true,
            space_within_if_parentheses: false,
            space_before_while_parentheses: true,
            space_within_while_parentheses: false,
            space_before_for_parentheses: true,
            space_within_for_parentheses: false,
            space_before_foreach_parentheses: true,
            space_within_foreach_parentheses: false,
            space_before_catch_parentheses: true,
            space_within_catch_parentheses: false,
            space_before_switch_parentheses: true,
            space_within_switch_parentheses: false,
            space_before_lock_parentheses: true,
            space_within_lock_parentheses: false,
            space_before_using_parentheses: true,
            space_within_using_parentheses: false,
            space_before_fixed_parentheses: true,
            space_within_fixed_parentheses: false,
            space_before_checked_parentheses: false,
            space_within_checked_parentheses: false,
            space_before_typeof_parentheses: false,
            space_within_typeof_parentheses: false,
            space_within_cast_parentheses: false,
            space_after_cast: false,
            space_within_parentheses: false,
            space_before_brackets: false,
            space_within_brackets: false,

            space_around_assignment: true,
            space_around_binary_operators: true,
            space_before_conditional_question: true,
            space_after_conditional_question: true,
            space_before_conditional_colon: true,
            space_after_conditional_colon: true,
            space_around_lambda_arrow: true,
            space_before_comma: false,
            space_after_comma: true,
            space_before_for_semicolon: false,
            space_after_for_semicolon: true,

            else_new_line_placement: NewLinePlacement::NewLine,
            catch_new_line_placement: NewLinePlacement::NewLine,
            finally_new_line_placement: NewLinePlacement::NewLine,
            while_new_line_placement: NewLinePlacement::NewLine,
            array_initializer_wrapping: Wrapping::WrapIfTooLong,

            indentation_string: "\t".to_string(),
            indent_namespace_body: true,
            indent_class_body: true,
            indent_switch_body: true,
            indent_case_body: true,

            blank_lines_after_usings: 1,
            blank_lines_between_types: 1,
            blank_lines_between_members: 1,
            blank_lines_between_fields: 0,

            insert_parentheses_for_readability: false,
            max_string_length: None,
        }
    }

    /// Opening braces at the end of the line; `else`, `catch`, `finally` and
    /// the `while` of a do-while follow the closing brace.
    pub fn k_and_r() -> Self {
        FormattingOptions {
            namespace_brace_style: BraceStyle::EndOfLine,
            class_brace_style: BraceStyle::EndOfLine,
            interface_brace_style: BraceStyle::EndOfLine,
            struct_brace_style: BraceStyle::EndOfLine,
            enum_brace_style: BraceStyle::EndOfLine,
            method_brace_style: BraceStyle::EndOfLine,
            constructor_brace_style: BraceStyle::EndOfLine,
            property_brace_style: BraceStyle::EndOfLine,
            accessor_brace_style: BraceStyle::EndOfLine,
            statement_brace_style: BraceStyle::EndOfLine,
            array_initializer_brace_style: BraceStyle::EndOfLine,
            else_new_line_placement: NewLinePlacement::SameLine,
            catch_new_line_placement: NewLinePlacement::SameLine,
            finally_new_line_placement: NewLinePlacement::SameLine,
            while_new_line_placement: NewLinePlacement::SameLine,
            ..Self::allman()
        }
    }

    /// K&R braces, two-space indentation and no blank lines.
    pub fn compact() -> Self {
        FormattingOptions {
            indentation_string: "  ".to_string(),
            space_before_if_parentheses: false,
            space_before_while_parentheses: false,
            space_before_for_parentheses: false,
            space_before_foreach_parentheses: false,
            space_before_catch_parentheses: false,
            space_before_switch_parentheses: false,
            space_before_lock_parentheses: false,
            space_before_using_parentheses: false,
            space_before_fixed_parentheses: false,
            blank_lines_after_usings: 0,
            blank_lines_between_types: 0,
            blank_lines_between_members: 0,
            blank_lines_between_fields: 0,
            ..Self::k_and_r()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON policy file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_take_allman_defaults() {
        let options =
            FormattingOptions::from_json_str(r#"{ "statement_brace_style": "end_of_line" }"#)
                .unwrap();
        assert_eq!(options.statement_brace_style, BraceStyle::EndOfLine);
        assert_eq!(options.method_brace_style, BraceStyle::NextLine);
        assert_eq!(options.indentation_string, "\t");
    }

    #[test]
    fn test_round_trip_through_json() {
        let options = FormattingOptions::compact();
        let json = options.to_json_pretty().unwrap();
        let back = FormattingOptions::from_json_str(&json).unwrap();
        assert_eq!(options, back);
    }

    #[test]
    fn test_presets_differ_where_expected() {
        let allman = FormattingOptions::allman();
        let kr = FormattingOptions::k_and_r();
        let compact = FormattingOptions::compact();
        assert_eq!(FormattingOptions::default(), allman);
        assert_eq!(kr.else_new_line_placement, NewLinePlacement::SameLine);
        assert_eq!(compact.statement_brace_style, BraceStyle::EndOfLine);
        assert_eq!(compact.blank_lines_between_members, 0);
        assert!(!compact.space_before_if_parentheses);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_string_length": 20, "indent_case_body": false }}"#).unwrap();
        let options = FormattingOptions::load(file.path()).unwrap();
        assert_eq!(options.max_string_length, Some(20));
        assert!(!options.indent_case_body);
    }

    #[test]
    fn test_load_reports_path_and_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        match FormattingOptions::load(&missing) {
            Err(OptionsError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io error, got {:?}", other),
        }
        assert!(matches!(
            FormattingOptions::from_json_str("{ not json"),
            Err(OptionsError::Parse(_))
        ));
    }
}
