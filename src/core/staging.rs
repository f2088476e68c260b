// src/core/staging.rs

//! Naming and content of staged script files.

use crate::core::profile::Conventions;

const HASH_TRUNCATE_LENGTH: usize = 16; // 16 bytes = 32 hex characters

/// Content hash of a script, used to name its staged file.
pub fn script_hash(script: &str) -> String {
    let hash = blake3::hash(script.as_bytes());
    let bytes = hash.as_bytes();
    hex::encode(bytes.get(..HASH_TRUNCATE_LENGTH).unwrap_or(bytes))
}

/// `<hash><extension>`. Identical scripts under the same profile share a file name.
pub fn staged_file_name(script: &str, conventions: &Conventions) -> String {
    format!("{}{}", script_hash(script), conventions.file_extension)
}

/// Joins prefix lines, the script body and the profile's suffix lines into the staged content.
pub fn assemble_lines(prefix: Vec<String>, script: &str, conventions: &Conventions) -> Vec<String> {
    let mut lines = prefix;
    lines.extend(script_lines(script).map(str::to_string));
    lines.extend(conventions.suffix_lines.iter().map(|line| line.to_string()));
    lines
}

/// Splits a script at `\r\n`, `\n` and lone `\r`. A trailing line break yields a final empty
/// line, and an empty script is one empty line.
fn script_lines(script: &str) -> impl Iterator<Item = &str> {
    script
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| line.split('\r'))
}
