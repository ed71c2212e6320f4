//! Recursive expression evaluator.
//!
//! There is no parse tree: an expression reduces to text by tokenizing,
//! recursively reducing each token, flattening the reductions back into a
//! single string, and scanning that string for an operator in three fixed
//! passes (`+ -`, then `* /`, then `= > <`). Each pass splits at the first
//! left-to-right occurrence and reduces both sides independently, so
//! chains of a same-precedence operator group to the right: `2-3-4`
//! evaluates as `2-(3-4)` = `3`. That grouping is load-bearing for
//! existing scripts and must not be "fixed".

use super::tokenizer::tokenize;
use super::value::fmt_number;
use super::{ConsoleLog, ConsoleRegistry, Severity};

/// The variable-reference prefix.
pub const SIGIL: char = '$';

/// Evaluates expressions against a registry, reporting unresolved
/// references to the console log.
pub struct Evaluator<'a> {
    registry: &'a ConsoleRegistry,
    log: &'a mut ConsoleLog,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a ConsoleRegistry, log: &'a mut ConsoleLog) -> Self {
        Self { registry, log }
    }

    /// Evaluate `expr` to its scalar text result.
    ///
    /// Quote characters never survive to the caller; an empty result
    /// signals failure.
    pub fn eval(&mut self, expr: &str) -> String {
        self.reduce(expr).replace('"', "")
    }

    /// Recursive reducer. Quotes are preserved internally so string
    /// literals stay distinguishable from numbers between passes.
    fn reduce(&mut self, expr: &str) -> String {
        let tokens = tokenize(expr);
        let single = tokens.len() == 1;

        let flat = if single {
            let token = &tokens[0].text;
            if let Some(name) = token.strip_prefix(SIGIL) {
                return self.resolve(name);
            }
            // A lone token is itself the flattened string and still goes
            // through the operator scan ("2+3*4" is one token).
            token.clone()
        } else {
            let mut flat = String::new();
            for token in &tokens {
                if token.is_empty() || token.is_paren() {
                    continue;
                }
                let reduced = self.reduce(&token.text);
                if !flat.is_empty() {
                    flat.push(' ');
                }
                flat.push_str(&reduced);
            }
            flat
        };

        if flat.len() == 1 {
            return flat;
        }

        // Pass A: additive. `+` concatenates when either side is not a
        // number; `-` fails to empty.
        if let Some((at, op)) = find_operator(&flat, &['+', '-']) {
            let lhs = self.reduce(&flat[..at]);
            let rhs = self.reduce(&flat[at + 1..]);
            return match (parse_number(&lhs), parse_number(&rhs)) {
                (Some(a), Some(b)) if op == '+' => fmt_number(a + b),
                (Some(a), Some(b)) => fmt_number(a - b),
                _ if op == '+' => format!("{lhs}{rhs}"),
                _ => String::new(),
            };
        }

        // Pass B: multiplicative, numbers only.
        if let Some((at, op)) = find_operator(&flat, &['*', '/']) {
            let lhs = self.reduce(&flat[..at]);
            let rhs = self.reduce(&flat[at + 1..]);
            return match (parse_number(&lhs), parse_number(&rhs)) {
                (Some(a), Some(b)) if op == '*' => fmt_number(a * b),
                (Some(a), Some(b)) => fmt_number(a / b),
                _ => String::new(),
            };
        }

        // Pass C: comparison. Only `=` has a string fallback.
        if let Some((at, op)) = find_operator(&flat, &['=', '>', '<']) {
            let lhs = self.reduce(&flat[..at]);
            let rhs = self.reduce(&flat[at + 1..]);
            return match (parse_number(&lhs), parse_number(&rhs)) {
                (Some(a), Some(b)) => {
                    let holds = match op {
                        '=' => a == b,
                        '>' => a > b,
                        _ => a < b,
                    };
                    bool_text(holds)
                }
                _ if op == '=' => bool_text(lhs == rhs),
                _ => String::new(),
            };
        }

        // No operator: a number canonicalizes, a quoted literal or a lone
        // base literal passes through, anything else is a failure.
        if let Some(n) = parse_number(&flat) {
            return fmt_number(n);
        }
        if flat.starts_with('"') || single {
            return flat;
        }
        String::new()
    }

    /// Resolve a `$name` reference to the variable's stored text.
    fn resolve(&mut self, name: &str) -> String {
        match self.registry.get_text(name) {
            Some(text) => match parse_number(&text) {
                Some(n) => fmt_number(n),
                // Non-numeric values re-enter evaluation as string literals
                None => format!("\"{text}\""),
            },
            None => {
                self.log
                    .print(&format!("variable '{name}' not found."), Severity::Error);
                String::new()
            }
        }
    }
}

/// Find the first occurrence of any of `ops`, skipping spaces and quoted
/// spans. Returns the byte offset and the operator found.
fn find_operator(text: &str, ops: &[char]) -> Option<(usize, char)> {
    let mut in_quote = false;
    for (at, c) in text.char_indices() {
        if c == '"' {
            in_quote = !in_quote;
        }
        if c == ' ' || in_quote {
            continue;
        }
        if ops.contains(&c) {
            return Some((at, c));
        }
    }
    None
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse().ok()
}

fn bool_text(holds: bool) -> String {
    if holds { "1".into() } else { "0".into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_with(registry: &ConsoleRegistry, expr: &str) -> (String, ConsoleLog) {
        let mut log = ConsoleLog::new();
        let result = Evaluator::new(registry, &mut log).eval(expr);
        (result, log)
    }

    fn eval(expr: &str) -> String {
        eval_with(&ConsoleRegistry::new(), expr).0
    }

    #[test]
    fn test_plain_number_canonicalizes() {
        assert_eq!(eval("5"), "5");
        assert_eq!(eval("5.0"), "5");
        assert_eq!(eval("0.5"), "0.5");
    }

    #[test]
    fn test_addition_and_subtraction() {
        assert_eq!(eval("2+3"), "5");
        assert_eq!(eval("2 + 3"), "5");
        assert_eq!(eval("10-4"), "6");
    }

    #[test]
    fn test_standard_precedence() {
        assert_eq!(eval("2+3*4"), "14");
        assert_eq!(eval("2*3+4"), "10");
    }

    #[test]
    fn test_right_grouping_of_subtraction_chains() {
        // Splits at the first '-': 2 - (3 - 4) = 3
        assert_eq!(eval("2-3-4"), "3");
    }

    #[test]
    fn test_division_and_multiplication() {
        assert_eq!(eval("8/2"), "4");
        assert_eq!(eval("3*4"), "12");
        assert_eq!(eval("8/2*2"), "2"); // 8 / (2 * 2), same grouping quirk
    }

    #[test]
    fn test_parens_group_via_flattening() {
        assert_eq!(eval("(2+3) * 4"), "20");
        assert_eq!(eval("2 * (3+4)"), "14");
    }

    #[test]
    fn test_string_concatenation_fallback() {
        assert_eq!(eval(r#""foo" + "bar""#), "foobar");
        assert_eq!(eval(r#""n=" + 3"#), "n=3");
    }

    #[test]
    fn test_subtraction_of_strings_fails_empty() {
        assert_eq!(eval(r#""foo" - "bar""#), "");
        assert_eq!(eval("foo*2"), "");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("3>2"), "1");
        assert_eq!(eval("2>3"), "0");
        assert_eq!(eval("2<3"), "1");
        assert_eq!(eval("3=3"), "1");
        assert_eq!(eval("3=4"), "0");
    }

    #[test]
    fn test_string_equality_fallback() {
        assert_eq!(eval(r#""abc"="abc""#), "1");
        assert_eq!(eval(r#""abc"="abd""#), "0");
        // Ordering comparisons have no string fallback
        assert_eq!(eval(r#""abc">"abd""#), "");
    }

    #[test]
    fn test_quoted_literal_passes_through() {
        assert_eq!(eval(r#""hello world""#), "hello world");
    }

    #[test]
    fn test_lone_base_literal_passes_through() {
        assert_eq!(eval("hello"), "hello");
        assert_eq!(eval("big"), "big");
    }

    #[test]
    fn test_unquoted_words_fail_once_flattened() {
        // Multiple bare words flatten to text that is neither a number
        // nor a quoted literal
        assert_eq!(eval("hello world"), "");
    }

    #[test]
    fn test_leading_minus_is_failure() {
        // "-5" splits into "" and "5"; the empty side does not parse
        assert_eq!(eval("-5"), "");
    }

    #[test]
    fn test_single_char_returned_unscanned() {
        assert_eq!(eval("+"), "+");
        assert_eq!(eval("7"), "7");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(eval(""), "");
    }

    #[test]
    fn test_variable_resolution_numeric() {
        let mut registry = ConsoleRegistry::new();
        registry.set_text("score", "200");
        let (result, log) = eval_with(&registry, "$score");
        assert_eq!(result, "200");
        assert!(log.is_empty());
    }

    #[test]
    fn test_variable_resolution_string() {
        let mut registry = ConsoleRegistry::new();
        registry.set_text("name", "sol");
        assert_eq!(eval_with(&registry, "$name").0, "sol");
        // Strings re-enter as quoted literals, so + concatenates
        assert_eq!(eval_with(&registry, r#"$name + "!""#).0, "sol!");
    }

    #[test]
    fn test_variable_in_arithmetic() {
        let mut registry = ConsoleRegistry::new();
        registry.set_text("score", "200");
        assert_eq!(eval_with(&registry, "$score + 1").0, "201");
        assert_eq!(eval_with(&registry, "$score > 100").0, "1");
        assert_eq!(eval_with(&registry, "$score > 300").0, "0");
    }

    #[test]
    fn test_sigil_token_swallows_operators() {
        // "$score>100" is a single token, so everything after the sigil is
        // looked up as the variable name, which does not exist.
        let mut registry = ConsoleRegistry::new();
        registry.set_text("score", "200");
        let (result, log) = eval_with(&registry, "$score>100");
        assert_eq!(result, "");
        assert!(
            log.iter()
                .next()
                .unwrap()
                .text
                .contains("variable 'score>100' not found")
        );
    }

    #[test]
    fn test_unknown_variable_reports_and_fails() {
        let (result, log) = eval_with(&ConsoleRegistry::new(), "$missing");
        assert_eq!(result, "");
        let line = log.iter().next().expect("an error line");
        assert!(line.text.contains("variable 'missing' not found"));
        assert_eq!(line.severity, Severity::Error);
    }

    #[test]
    fn test_operator_inside_quotes_ignored() {
        assert_eq!(eval(r#""a+b""#), "a+b");
        let mut registry = ConsoleRegistry::new();
        registry.set_text("s", "x+y");
        // The variable's text comes back quoted, so its '+' is not scanned
        assert_eq!(eval_with(&registry, "$s").0, "x+y");
    }

    #[test]
    fn test_variable_equality_condition() {
        let mut registry = ConsoleRegistry::new();
        registry.set_text("name", "bob");
        assert_eq!(eval_with(&registry, r#"$name = "bob""#).0, "1");
        assert_eq!(eval_with(&registry, r#"$name = "alice""#).0, "0");
    }
}
