//! Quote- and parenthesis-aware tokenizer for console expressions.
//!
//! Scans left to right. A double quote toggles quote mode and is kept in
//! the token text. Outside quote mode `(` and `)` become standalone tokens
//! and a space closes the current token. Consecutive delimiters yield empty
//! tokens; consumers skip them.

/// Classification of a produced token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Plain text, including numbers and `$`-references.
    Literal,
    /// A single operator character (`+ - * / = < >`).
    Operator,
    /// A standalone `(` or `)`.
    Paren,
    /// Contains at least one quote character.
    Quoted,
}

/// One token of an expression, ephemeral per evaluation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    fn classify(text: String) -> Self {
        let kind = if text.contains('"') {
            TokenKind::Quoted
        } else if text == "(" || text == ")" {
            TokenKind::Paren
        } else if text.len() == 1 && "+-*/=<>".contains(&text) {
            TokenKind::Operator
        } else {
            TokenKind::Literal
        };
        Token { text, kind }
    }

    /// Empty tokens come from consecutive delimiters and carry no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Parenthesis tokens group visually but are dropped when flattening.
    #[inline]
    pub fn is_paren(&self) -> bool {
        self.kind == TokenKind::Paren
    }
}

/// Split `input` into tokens.
///
/// The scanner always has one open token, so the empty string produces a
/// single empty token rather than none.
///
/// # Examples
///
/// ```
/// use bevy_devcon::core::tokenize;
///
/// let tokens = tokenize(r#"echo "hello world""#);
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1].text, "\"hello world\"");
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in input.chars() {
        if c == '"' {
            in_quote = !in_quote;
        }

        if (c == '(' || c == ')') && !in_quote {
            parts.push(std::mem::take(&mut current));
            parts.push(c.to_string());
        } else if c == ' ' && !in_quote {
            parts.push(std::mem::take(&mut current));
        } else {
            // Quote characters land here too: they stay in the token text.
            current.push(c);
        }
    }
    parts.push(current);

    parts.into_iter().map(Token::classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_spaces_split() {
        assert_eq!(texts("set a 5"), vec!["set", "a", "5"]);
    }

    #[test]
    fn test_quotes_preserve_spaces() {
        let tokens = tokenize(r#"echo "hello world""#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "echo");
        assert_eq!(tokens[1].text, r#""hello world""#);
        assert_eq!(tokens[1].kind, TokenKind::Quoted);
    }

    #[test]
    fn test_parens_stand_alone() {
        let t = texts("(1 + 2)");
        assert_eq!(t, vec!["", "(", "1", "+", "2", ")", ""]);
    }

    #[test]
    fn test_parens_inside_quotes_accumulate() {
        let t = texts(r#""(a b)""#);
        assert_eq!(t, vec![r#""(a b)""#]);
    }

    #[test]
    fn test_empty_input_is_one_empty_token() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_empty());
    }

    #[test]
    fn test_consecutive_spaces_yield_empty_tokens() {
        assert_eq!(texts("a  b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_operator_kind() {
        let tokens = tokenize("1 + 2");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[0].kind, TokenKind::Literal);
    }

    #[test]
    fn test_unbalanced_quote_runs_to_end() {
        assert_eq!(texts(r#"echo "a b c"#), vec!["echo", r#""a b c"#]);
    }
}
