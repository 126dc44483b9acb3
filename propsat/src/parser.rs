//! Tokenizer and recursive-descent parser for the infix propositional
//! language (spec §6). Grounded in the line-oriented hand-rolled tokenizers
//! of `tomggill-qbf-solver::parse_config` and
//! `taiocean1213-cnf-dpll-2wl`'s DIMACS line reader — no parser-combinator
//! crate is pulled in, matching the rest of the pack's closest propositional
//! parsers.

use crate::ast::Formula;
use crate::error::{SolveError, SourcePos};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Top,
    Bottom,
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
    Eof,
}

struct Token {
    tok: Tok,
    pos: usize,
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Lexer<'a> {
        Lexer { src, bytes: src.as_bytes(), pos: 0 }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, SolveError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let b = match self.peek_byte() {
                None => {
                    tokens.push(Token { tok: Tok::Eof, pos: start });
                    break;
                }
                Some(b) => b,
            };

            let tok = match b {
                b'(' => {
                    self.pos += 1;
                    Tok::LParen
                }
                b')' => {
                    self.pos += 1;
                    Tok::RParen
                }
                b'!' => {
                    self.pos += 1;
                    Tok::Not
                }
                b'&' => {
                    self.pos += 1;
                    Tok::And
                }
                b'|' => {
                    self.pos += 1;
                    Tok::Or
                }
                b'-' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    Tok::Implies
                }
                b'=' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    Tok::Implies
                }
                b'<' if self.matches_at("<->") => {
                    self.pos += 3;
                    Tok::Iff
                }
                b'<' if self.matches_at("<=>") => {
                    self.pos += 3;
                    Tok::Iff
                }
                b if b.is_ascii_alphabetic() => self.word(),
                _ => {
                    return Err(SolveError::Parse(
                        SourcePos(start),
                        format!("unexpected character {:?}", b as char),
                    ))
                }
            };

            tokens.push(Token { tok, pos: start });
        }
        Ok(tokens)
    }

    fn matches_at(&self, s: &str) -> bool {
        self.src[self.pos..].as_bytes().starts_with(s.as_bytes())
    }

    /// Consumes `[A-Za-z][A-Za-z0-9_]*` and classifies it as a keyword or a
    /// plain identifier.
    fn word(&mut self) -> Tok {
        let start = self.pos;
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word = &self.src[start..self.pos];
        match word {
            "top" | "TOP" => Tok::Top,
            "bottom" | "BOTTOM" => Tok::Bottom,
            "not" | "NOT" => Tok::Not,
            "and" | "AND" => Tok::And,
            "or" | "OR" => Tok::Or,
            "implies" | "IMPLIES" => Tok::Implies,
            "iff" | "IFF" => Tok::Iff,
            _ => Tok::Ident(word.to_string()),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.tokens[self.index].tok
    }

    fn pos(&self) -> usize {
        self.tokens[self.index].pos
    }

    fn advance(&mut self) -> Tok {
        let tok = self.tokens[self.index].tok.clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Tok, what: &str) -> Result<(), SolveError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(SolveError::Parse(SourcePos(self.pos()), format!("expected {}", what)))
        }
    }

    // iff := implies (('<->'|'<=>'|'iff'|'IFF') implies)*
    fn parse_iff(&mut self) -> Result<Formula, SolveError> {
        let mut lhs = self.parse_implies()?;
        while *self.peek() == Tok::Iff {
            self.advance();
            let rhs = self.parse_implies()?;
            lhs = Formula::iff(lhs, rhs);
        }
        Ok(lhs)
    }

    // implies := or (('->'|'=>'|'implies'|'IMPLIES') implies)?   -- right associative
    fn parse_implies(&mut self) -> Result<Formula, SolveError> {
        let lhs = self.parse_or()?;
        if *self.peek() == Tok::Implies {
            self.advance();
            let rhs = self.parse_implies()?;
            Ok(Formula::implies(lhs, rhs))
        } else {
            Ok(lhs)
        }
    }

    // or := and (('|'|'or'|'OR') and)*
    fn parse_or(&mut self) -> Result<Formula, SolveError> {
        let mut children = vec![self.parse_and()?];
        while *self.peek() == Tok::Or {
            self.advance();
            children.push(self.parse_and()?);
        }
        Ok(if children.len() == 1 { children.pop().unwrap() } else { Formula::or(children) })
    }

    // and := not (('&'|'and'|'AND') not)*
    fn parse_and(&mut self) -> Result<Formula, SolveError> {
        let mut children = vec![self.parse_not()?];
        while *self.peek() == Tok::And {
            self.advance();
            children.push(self.parse_not()?);
        }
        Ok(if children.len() == 1 { children.pop().unwrap() } else { Formula::and(children) })
    }

    // not := ('!'|'not'|'NOT') not | atomic
    fn parse_not(&mut self) -> Result<Formula, SolveError> {
        if *self.peek() == Tok::Not {
            self.advance();
            let child = self.parse_not()?;
            Ok(Formula::not(child))
        } else {
            self.parse_atomic()
        }
    }

    fn parse_atomic(&mut self) -> Result<Formula, SolveError> {
        match self.peek().clone() {
            Tok::LParen => {
                self.advance();
                let inner = self.parse_iff()?;
                self.expect(&Tok::RParen, "')'")?;
                Ok(inner)
            }
            Tok::Ident(name) => {
                self.advance();
                Ok(Formula::atom(name))
            }
            Tok::Top => {
                self.advance();
                Ok(Formula::True)
            }
            Tok::Bottom => {
                self.advance();
                Ok(Formula::False)
            }
            _ => Err(SolveError::Parse(SourcePos(self.pos()), "expected a formula".to_string())),
        }
    }
}

/// Parses a single infix formula, terminated by end-of-input (spec §6: "A
/// formula is a single expression terminated by end-of-input").
pub fn parse(src: &str) -> Result<Formula, SolveError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser { tokens, index: 0 };
    let formula = parser.parse_iff()?;
    if *parser.peek() != Tok::Eof {
        return Err(SolveError::Parse(
            SourcePos(parser.pos()),
            "trailing input after formula".to_string(),
        ));
    }
    Ok(formula)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_binds_tighter_than_and() {
        // !A & B must parse as (!A) & B, not !(A & B).
        let formula = parse("!A & B").unwrap();
        assert_eq!(formula, Formula::and(vec![Formula::not(Formula::atom("A")), Formula::atom("B")]));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let formula = parse("A | B & C").unwrap();
        assert_eq!(
            formula,
            Formula::or(vec![Formula::atom("A"), Formula::and(vec![Formula::atom("B"), Formula::atom("C")])])
        );
    }

    #[test]
    fn implies_is_right_associative() {
        // A -> B -> C must parse as A -> (B -> C).
        let formula = parse("A -> B -> C").unwrap();
        assert_eq!(
            formula,
            Formula::implies(Formula::atom("A"), Formula::implies(Formula::atom("B"), Formula::atom("C")))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let formula = parse("(A | B) & C").unwrap();
        assert_eq!(
            formula,
            Formula::and(vec![Formula::or(vec![Formula::atom("A"), Formula::atom("B")]), Formula::atom("C")])
        );
    }

    #[test]
    fn word_synonyms_parse_identically_to_symbols() {
        assert_eq!(parse("A and B").unwrap(), parse("A & B").unwrap());
        assert_eq!(parse("A OR B").unwrap(), parse("A | B").unwrap());
        assert_eq!(parse("A implies B").unwrap(), parse("A -> B").unwrap());
        assert_eq!(parse("A IFF B").unwrap(), parse("A <-> B").unwrap());
        assert_eq!(parse("NOT A").unwrap(), parse("!A").unwrap());
        assert_eq!(parse("top").unwrap(), Formula::True);
        assert_eq!(parse("BOTTOM").unwrap(), Formula::False);
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(parse("A&B").unwrap(), parse("  A   &   B  ").unwrap());
    }

    #[test]
    fn trailing_input_is_a_parse_error() {
        assert!(parse("A B").is_err());
    }

    #[test]
    fn unexpected_character_is_a_parse_error_with_position() {
        match parse("A & @") {
            Err(SolveError::Parse(SourcePos(pos), _)) => assert_eq!(pos, 4),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
