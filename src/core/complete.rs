//! Prefix autocompletion over variable and command names.
//!
//! Completion only fires when the edit cursor sits at the end of the
//! buffer. The match rule is shortest-name-wins: given `play` and
//! `playmp3`, the partial `pl` completes to `play`.

use super::ConsoleRegistry;
use super::eval::SIGIL;

/// Complete the partial name at the end of `buffer`, in place.
///
/// If the last space-delimited word contains `$`, the text after the
/// sigil is matched against variable names and the completion is spliced
/// in, advancing `cursor` by the length delta. Otherwise, a buffer with
/// no space at all is matched against command names and replaced whole.
/// No match leaves buffer and cursor untouched.
pub fn autocomplete(registry: &ConsoleRegistry, buffer: &mut String, cursor: &mut usize) {
    if *cursor != buffer.len() {
        return;
    }

    // Plain space split here; quote grouping does not apply to completion.
    let last_word = buffer.rsplit(' ').next().unwrap_or("");

    if let Some(sigil_at) = last_word.find(SIGIL) {
        let partial = &last_word[sigil_at + SIGIL.len_utf8()..];
        if let Some(name) = registry.var_names().shortest_with_prefix(partial) {
            let keep = buffer.len() - partial.len();
            *cursor += name.len() - partial.len();
            buffer.truncate(keep);
            buffer.push_str(&name);
        }
    } else if !buffer.contains(' ') {
        if let Some(name) = registry.cmd_names().shortest_with_prefix(buffer) {
            *buffer = name;
            *cursor = buffer.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConsoleCommand;

    fn registry() -> ConsoleRegistry {
        let mut registry = ConsoleRegistry::new();
        for name in ["play", "playmp3", "echo"] {
            let (meta, _) = ConsoleCommand::new(name, |_, _| {}).split();
            registry.register_cmd_meta(meta);
        }
        registry.register_var("score", 0i64);
        registry.register_var("scale", 1.0f64);
        registry
    }

    fn complete(registry: &ConsoleRegistry, input: &str) -> (String, usize) {
        let mut buffer = input.to_string();
        let mut cursor = buffer.len();
        autocomplete(registry, &mut buffer, &mut cursor);
        (buffer, cursor)
    }

    #[test]
    fn test_command_shortest_wins() {
        let (buffer, cursor) = complete(&registry(), "pl");
        assert_eq!(buffer, "play");
        assert_eq!(cursor, 4);
    }

    #[test]
    fn test_command_exact_longer_prefix() {
        let (buffer, _) = complete(&registry(), "playm");
        assert_eq!(buffer, "playmp3");
    }

    #[test]
    fn test_variable_completion_splices() {
        let (buffer, cursor) = complete(&registry(), "echo $sco");
        assert_eq!(buffer, "echo $score");
        assert_eq!(cursor, buffer.len());
    }

    #[test]
    fn test_variable_shortest_wins() {
        let mut registry = registry();
        registry.register_var("scoreboard", 0i64);
        let (buffer, _) = complete(&registry, "set $sco");
        assert_eq!(buffer, "set $score");
    }

    #[test]
    fn test_no_command_match_past_first_word() {
        // A buffer containing a space never matches command names
        let (buffer, _) = complete(&registry(), "say pl");
        assert_eq!(buffer, "say pl");
    }

    #[test]
    fn test_no_match_is_noop() {
        let (buffer, cursor) = complete(&registry(), "zz");
        assert_eq!(buffer, "zz");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_cursor_not_at_end_is_noop() {
        let registry = registry();
        let mut buffer = "pl".to_string();
        let mut cursor = 1;
        autocomplete(&registry, &mut buffer, &mut cursor);
        assert_eq!(buffer, "pl");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_sigil_only_completes_shortest_variable() {
        let (buffer, _) = complete(&registry(), "echo $");
        // Empty partial matches every variable; "scale" ties "score" on
        // length and wins byte order
        assert_eq!(buffer, "echo $scale");
    }
}
