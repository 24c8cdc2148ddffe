//! Line-oriented wordlist parsing.
//!
//! Each useful line carries a term followed by its meaning in square
//! brackets, e.g. `laufen [to run]`. Lines missing either bracket are
//! skipped without comment so annotations and blank lines can live in the
//! same file.

use crate::model::VocabPair;

/// Parse a wordlist into vocabulary pairs.
///
/// The term is everything before the first `[`, the meaning everything from
/// there up to the first `]` (or the end of the line when the closing bracket
/// sits elsewhere). Both sides are trimmed; no further validation happens at
/// this stage.
#[must_use]
pub fn parse(input: &str) -> Vec<VocabPair> {
    input.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<VocabPair> {
    if !line.contains('[') || !line.contains(']') {
        return None;
    }
    let (term, rest) = line.split_once('[')?;
    let meaning = rest.split(']').next().unwrap_or(rest);
    Some(VocabPair::new(term.trim(), meaning.trim()))
}
