//! Reader/writer for the `.ord` layer-ordering format (§6): blocks `LAYER {
//! n1 n2 ... }`, `#`-to-end-of-line comments, layer numbers consecutive from
//! 0. The first comment line's last whitespace-delimited token, if any, is
//! taken as the graph name. Grounded in the reference implementation's
//! `ord.c`.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Result};

pub struct OrdFile {
    pub name: Option<String>,
    pub layers: Vec<Vec<String>>,
}

/// Output lines are wrapped near this column, matching `ord.c`'s
/// `LINE_LENGTH`.
const LINE_LENGTH: usize = 75;

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    name: Option<String>,
    seen_first_comment: bool,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner {
            chars: input.chars().peekable(),
            line: 1,
            name: None,
            seen_first_comment: false,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    /// Skips whitespace and `#`-to-end-of-line comments. The first comment
    /// encountered in the whole file has its last non-blank token captured
    /// as the graph name, mirroring `ord.c`'s `eatSpaceAndComments`.
    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek().copied() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    self.bump();
                    let mut word = String::new();
                    let mut last_word = String::new();
                    loop {
                        match self.chars.peek().copied() {
                            None => break,
                            Some('\n') => {
                                self.bump();
                                break;
                            }
                            Some(c) if c.is_whitespace() => {
                                if !word.is_empty() {
                                    last_word = std::mem::take(&mut word);
                                }
                                self.bump();
                            }
                            Some(c) => {
                                word.push(c);
                                self.bump();
                            }
                        }
                    }
                    if !word.is_empty() {
                        last_word = word;
                    }
                    if !self.seen_first_comment {
                        self.seen_first_comment = true;
                        if !last_word.is_empty() {
                            self.name = Some(last_word);
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn node_token(&mut self) -> Option<String> {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == '#' || c == '}' {
                break;
            }
            s.push(c);
            self.bump();
        }
        if s.is_empty() { None } else { Some(s) }
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            source: "ord",
            line: self.line,
            message: message.into(),
        }
    }
}

pub fn parse_ord(input: &str) -> Result<OrdFile> {
    let mut sc = Scanner::new(input);
    let mut layers = Vec::new();
    let mut expected_layer = 0usize;

    loop {
        sc.skip_trivia();
        if sc.chars.peek().is_none() {
            break;
        }

        let mut digits = String::new();
        while let Some(&c) = sc.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                sc.bump();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(sc.err("expected a layer number"));
        }
        let layer: usize = digits
            .parse()
            .map_err(|_| sc.err(format!("layer number '{digits}' out of range")))?;
        if layer != expected_layer {
            return Err(Error::LayerDiscontinuity {
                expected: expected_layer,
                found: layer,
            });
        }
        expected_layer += 1;

        sc.skip_trivia();
        match sc.bump() {
            Some('{') => {}
            Some(other) => return Err(sc.err(format!("expected '{{', got '{other}'"))),
            None => return Err(sc.err("premature end of file, expected '{'")),
        }

        let mut nodes = Vec::new();
        loop {
            sc.skip_trivia();
            match sc.chars.peek() {
                Some('}') => {
                    sc.bump();
                    break;
                }
                None => {
                    return Err(sc.err(format!(
                        "unexpected end of file while reading layer {layer}"
                    )));
                }
                _ => {}
            }
            let node = sc
                .node_token()
                .ok_or_else(|| sc.err("expected a node name"))?;
            nodes.push(node);
        }
        layers.push(nodes);
    }

    Ok(OrdFile {
        name: sc.name,
        layers,
    })
}

pub fn write_ord(graph_name: &str, generation_method: &str, layers: &[Vec<&str>]) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    writeln!(out, "# Ordering for graph {graph_name}").unwrap();
    writeln!(out, "# {generation_method}").unwrap();
    out.push('\n');
    for (layer, nodes) in layers.iter().enumerate() {
        writeln!(out, "# Order for layer {layer}: {generation_method}").unwrap();
        write!(out, "{layer} {{\n ").unwrap();
        let mut column = 1usize;
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                if column + node.len() >= LINE_LENGTH {
                    out.push('\n');
                    column = 0;
                } else {
                    out.push(' ');
                    column += 1;
                }
            }
            out.push_str(node);
            column += node.len();
        }
        if !nodes.is_empty() {
            out.push('\n');
        }
        writeln!(out, "}} # end of layer {layer}").unwrap();
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layers_and_name_from_first_comment() {
        let input = "# Ordering for graph widgets\n# bary\n\n0 { a b c }\n1 { d e }\n";
        let ord = parse_ord(input).unwrap();
        assert_eq!(ord.name.as_deref(), Some("widgets"));
        assert_eq!(
            ord.layers,
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string(), "e".to_string()],
            ]
        );
    }

    #[test]
    fn rejects_nonconsecutive_layer_numbers() {
        let err = parse_ord("0 { a }\n2 { b }\n").unwrap_err();
        assert!(matches!(err, Error::LayerDiscontinuity { expected: 1, found: 2 }));
    }

    #[test]
    fn round_trips_through_write_ord() {
        let written = write_ord("widgets", "bary", &[vec!["a", "b"], vec!["c"]]);
        let parsed = parse_ord(&written).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("widgets"));
        assert_eq!(
            parsed.layers,
            vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]
        );
    }

    #[test]
    fn missing_name_comment_yields_no_name() {
        let ord = parse_ord("0 { a }\n").unwrap();
        assert_eq!(ord.name, None);
    }
}
