//! # C# Source Generation
//!
//! Emits one partial class per table workbook plus an aggregate loader that
//! starts every table's bulk load. All files share the same header, namespace
//! and tab indentation.
use crate::error::TableError;
use std::fmt::Write;
use std::fs;
use std::path::Path;

pub mod class;
pub mod loader;

/// Namespace wrapping every generated type.
pub const NAMESPACE: &str = "GameFramework.Table";

/// Prefix of generated class names; the loader strips exactly this many characters.
pub const CLASS_PREFIX: &str = "T_";

/// Extension of generated source files.
pub const SOURCE_EXTENSION: &str = "cs";

pub(crate) const INDENT1: &str = "\t";
pub(crate) const INDENT2: &str = "\t\t";
pub(crate) const INDENT3: &str = "\t\t\t";
pub(crate) const INDENT4: &str = "\t\t\t\t";

/// Class name generated for a table: the prefix followed by the file stem.
pub fn class_name(table_name: &str) -> String {
    format!("{CLASS_PREFIX}{table_name}")
}

/// Upper-cases the first letter of every word.
///
/// Letters, digits and `_` continue a word; any other ASCII character or
/// whitespace starts a new one. The rest of each word is left untouched.
pub fn title_case(name: &str) -> String {
    let mut titled = String::with_capacity(name.len());
    let mut at_word_start = true;
    for character in name.chars() {
        if at_word_start {
            titled.extend(character.to_uppercase());
        } else {
            titled.push(character);
        }
        at_word_start = is_word_separator(character);
    }
    titled
}

fn is_word_separator(character: char) -> bool {
    if character.is_ascii() {
        !(character.is_ascii_alphanumeric() || character == '_')
    } else if character.is_alphanumeric() {
        false
    } else {
        character.is_whitespace()
    }
}

/// Writes the `using` lines and opens the namespace block.
pub(crate) fn write_prelude(output: &mut String) -> std::fmt::Result {
    writeln!(output, "using System;")?;
    writeln!(output, "using System.Collections.Generic;")?;
    writeln!(output)?;
    writeln!(output, "namespace {NAMESPACE}")?;
    writeln!(output, "{{")
}

/// Replaces the file at `path` with the generated source in one write.
pub(crate) fn write_source(path: &Path, source: &str) -> Result<(), TableError> {
    fs::write(path, source)?;
    Ok(())
}
