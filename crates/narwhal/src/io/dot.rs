//! Reader/writer for the `.dot`-like edge list (§6): `digraph NAME { u -> v;
//! ... }` with `/* ... */` and `// ...` comments skippable anywhere.
//! Identifiers are `[A-Za-z0-9_]+`. Grounded in the reference
//! implementation's `dot.c`, which drives the same grammar off a
//! `getc`/`ungetc` state machine; this rewrites it as a small character
//! scanner over an in-memory `&str`.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Result};

/// The edges and graph name recovered from a `.dot` file. Node identity is
/// established entirely by the paired `.ord` file (component A's node set);
/// this module only hands back name pairs for [`super::graph_io::read_graph`]
/// to resolve.
pub struct DotFile {
    pub name: String,
    pub edges: Vec<(String, String)>,
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    /// Skips whitespace and both comment styles. Unterminated `/* ... */`
    /// comments run to end of file rather than erroring, matching `dot.c`'s
    /// lenient state machine.
    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('*') => {
                            self.bump();
                            self.bump();
                            let mut prev = '\0';
                            loop {
                                match self.bump() {
                                    None => break,
                                    Some('/') if prev == '*' => break,
                                    Some(c) => prev = c,
                                }
                            }
                        }
                        Some('/') => {
                            self.bump();
                            self.bump();
                            while !matches!(self.chars.peek(), None | Some('\n')) {
                                self.bump();
                            }
                        }
                        _ => return,
                    }
                }
                _ => return,
            }
        }
    }

    fn read_identifier(&mut self) -> Option<String> {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if s.is_empty() { None } else { Some(s) }
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            source: "dot",
            line: self.line,
            message: message.into(),
        }
    }
}

pub fn parse_dot(input: &str) -> Result<DotFile> {
    let mut sc = Scanner::new(input);
    sc.skip_trivia();
    let keyword = sc
        .read_identifier()
        .ok_or_else(|| sc.err("expected 'digraph'"))?;
    if keyword != "digraph" {
        return Err(sc.err(format!("expected 'digraph', got '{keyword}'")));
    }
    sc.skip_trivia();
    let name = sc
        .read_identifier()
        .ok_or_else(|| sc.err("expected graph name"))?;
    sc.skip_trivia();
    match sc.bump() {
        Some('{') => {}
        Some(other) => return Err(sc.err(format!("expected '{{', got '{other}'"))),
        None => return Err(sc.err("premature end of file, expected '{'")),
    }

    let mut edges = Vec::new();
    loop {
        sc.skip_trivia();
        match sc.chars.peek() {
            None => return Err(sc.err("premature end of file, expected '}'")),
            Some('}') => {
                sc.bump();
                break;
            }
            _ => {}
        }
        let src = sc
            .read_identifier()
            .ok_or_else(|| sc.err("expected node name"))?;
        sc.skip_trivia();
        let dash = sc.bump();
        let arrow_head = sc.bump();
        if dash != Some('-') || arrow_head != Some('>') {
            return Err(sc.err(format!(
                "expected '->', got '{}{}'",
                dash.unwrap_or(' '),
                arrow_head.unwrap_or(' ')
            )));
        }
        sc.skip_trivia();
        let dst = sc
            .read_identifier()
            .ok_or_else(|| sc.err("expected node name"))?;
        sc.skip_trivia();
        match sc.bump() {
            Some(';') => {}
            Some(other) => return Err(sc.err(format!("expected ';', got '{other}'"))),
            None => return Err(sc.err("premature end of file, expected ';'")),
        }
        edges.push((src, dst));
    }
    Ok(DotFile { name, edges })
}

pub fn write_dot(name: &str, header: &str, edges: &[(&str, &str)]) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    writeln!(out, "/* {header} */").unwrap();
    writeln!(out, "digraph {name} {{").unwrap();
    for (src, dst) in edges {
        writeln!(out, " {src} -> {dst};").unwrap();
    }
    writeln!(out, "}}").unwrap();
    out
}
