//! Tolerant recursive-descent parser for ES|QL pipelines.
//!
//! A query is `command (| command)*`. Each command goes through
//! `Start -> ParsingName -> ParsingOptions/ParsingArguments -> Closed`; when a
//! token cannot be placed the command is closed at the last valid offset,
//! a `syntaxError` message is recorded and parsing resumes at the next pipe.
//! The parser never fails: it always returns a (possibly partial) tree.
mod commands;
mod expression;
mod names;

pub use names::{escape_identifier, needs_quoting, unescape_identifier};
pub(crate) use self::commands::JOIN_TYPES;
pub(crate) use names::is_source_part;

use crate::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub query: Query,
    pub errors: Vec<Message>,
}

/// Tokenize and parse `text`.
pub fn parse(text: &str) -> ParseResult {
    let tokens = tokenize(text);
    parse_tokens(text, &tokens)
}

/// Parse an already tokenized query. `text` must be the string `tokens` came from.
pub fn parse_tokens(text: &str, tokens: &[Token]) -> ParseResult {
    let mut parser = Parser::new(text, tokens);
    let query = parser.pipeline(false);
    trace!(
        "Parsed {} command(s) with {} syntax error(s)",
        query.commands.len(),
        parser.errors.len()
    );
    ParseResult {
        query,
        errors: parser.errors,
    }
}

/// Marker returned by grammar rules once a syntax error has been recorded.
#[derive(Debug)]
pub(crate) struct Stop;

pub(crate) type PResult<T = ()> = std::result::Result<T, Stop>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    Start,
    ParsingName,
    ParsingOptions,
    ParsingArguments,
    Closed,
}

pub(crate) struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
    pub(crate) state: ParseState,
    pub(crate) errors: Vec<Message>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
            state: ParseState::Start,
            errors: Vec::new(),
        }
    }

    // --- token cursor ---

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    pub(crate) fn bump(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    pub(crate) fn at_keyword(&self, kw: Keyword) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> Option<&'a Token> {
        if self.at(kind) { self.bump() } else { None }
    }

    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> Option<&'a Token> {
        if self.at_keyword(kw) { self.bump() } else { None }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// End offset of the last consumed token.
    pub(crate) fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.end)
            .unwrap_or(0)
    }

    /// Start of the next token, or end of input.
    pub(crate) fn next_start(&self) -> usize {
        self.peek().map(|t| t.start).unwrap_or(self.src.len())
    }

    pub(crate) fn slice(&self, location: Location) -> String {
        location.slice(self.src).to_string()
    }

    pub(crate) fn at_command_boundary(&self, nested: bool) -> bool {
        match self.peek() {
            None => true,
            Some(t) => {
                t.kind == TokenKind::Pipe || (nested && t.kind == TokenKind::ParenClose)
            }
        }
    }

    // --- diagnostics ---

    pub(crate) fn error(&mut self, detail: impl Into<String>, location: Location) {
        let detail = detail.into();
        debug!("Syntax error at {location}: {detail}");
        self.errors
            .push(MessageId::SyntaxError.at(location, params! { "detail" => detail }));
    }

    /// Record "expected X, found Y" against the next token (or end of input).
    pub(crate) fn expected(&mut self, what: &str) -> Stop {
        match self.peek() {
            Some(tok) => {
                let detail = format!("expected {what}, found '{}'", tok.text);
                self.error(detail, tok.location());
            }
            None => {
                let end = self.src.len();
                self.error(
                    format!("expected {what}, found end of input"),
                    Location::at(end),
                );
            }
        }
        Stop
    }

    /// Skip to the next command boundary, honouring nested parentheses.
    fn recover(&mut self, nested: bool) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Pipe if depth == 0 => break,
                TokenKind::ParenClose if depth == 0 && nested => break,
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
    }

    fn transition(&mut self, to: ParseState) {
        trace!("Parser state {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    // --- pipeline ---

    pub(crate) fn pipeline(&mut self, nested: bool) -> Query {
        let start = self.next_start();
        let mut commands: Vec<Command> = Vec::new();
        let mut incomplete = false;

        loop {
            if self.at_end() || (nested && self.at(&TokenKind::ParenClose)) {
                if commands.is_empty() && nested {
                    self.expected("a command");
                    incomplete = true;
                }
                break;
            }
            if self.at(&TokenKind::Pipe) {
                let tok = self.bump().map(Token::location).unwrap_or_default();
                self.error("expected a command before '|'", tok);
                continue;
            }

            let first = commands.is_empty() && !nested;
            if let Some(command) = self.command(first, nested) {
                incomplete = command.incomplete;
                commands.push(command);
            }

            if self.eat(&TokenKind::Pipe).is_some() {
                if self.at_end() || (nested && self.at(&TokenKind::ParenClose)) {
                    self.expected("a command after '|'");
                    incomplete = true;
                    break;
                }
                continue;
            }
            if !self.at_command_boundary(nested) {
                // command() always recovers to a boundary; guard against loops.
                self.recover(nested);
            }
            if self.at_end() || (nested && self.at(&TokenKind::ParenClose)) {
                break;
            }
        }

        let end = commands
            .last()
            .map(|c| c.location.end)
            .unwrap_or(start)
            .max(start);
        Query {
            commands,
            location: Location::new(start, end),
            incomplete,
        }
    }

    fn command(&mut self, first: bool, nested: bool) -> Option<Command> {
        self.transition(ParseState::Start);
        self.transition(ParseState::ParsingName);
        let name_tok = self.peek()?;
        if !matches!(name_tok.kind, TokenKind::Ident(_) | TokenKind::Keyword(_)) {
            self.expected("a command name");
            self.recover(nested);
            self.transition(ParseState::Closed);
            return None;
        }
        self.bump();

        let mut name = name_tok.lower();
        let mut command_type = None;
        let mut name_location = name_tok.location();
        if let Some(join) = self.peek().filter(|t| t.is_word("join"))
            && JOIN_TYPES.contains(&name.as_str())
        {
            self.bump();
            command_type = Some(std::mem::replace(&mut name, "join".to_string()));
            name_location = name_location.join(&join.location());
        }

        let mut command = Command {
            name,
            command_type,
            text: String::new(),
            location: name_location,
            name_location,
            args: Vec::new(),
            incomplete: false,
        };

        match command_definition(&command.name) {
            None => {
                let detail = format!("unknown command [{}]", command.display_name());
                self.error(detail, name_location);
                command.incomplete = true;
                self.recover(nested);
            }
            Some(definition) => {
                if first && definition.kind != CommandKind::Source {
                    self.error(
                        format!(
                            "[{}] cannot start a query, expected a source command",
                            command.display_name()
                        ),
                        name_location,
                    );
                } else if !first && definition.kind == CommandKind::Source {
                    self.error(
                        format!(
                            "[{}] is a source command and must be the first command",
                            command.display_name()
                        ),
                        name_location,
                    );
                } else if nested && !definition.allowed_in_fork() {
                    self.error(
                        format!(
                            "[{}] is not allowed inside a FORK branch",
                            command.display_name()
                        ),
                        name_location,
                    );
                }

                self.transition(ParseState::ParsingArguments);
                let outcome = self.arguments(&mut command, nested);
                let valid_end = self.last_end();
                match outcome {
                    Ok(()) if self.at_command_boundary(nested) => {}
                    Ok(()) => {
                        if let Some(tok) = self.peek() {
                            let detail = format!(
                                "extraneous input '{}' after [{}]",
                                tok.text,
                                command.display_name()
                            );
                            self.error(detail, tok.location());
                        }
                        self.recover(nested);
                    }
                    Err(Stop) => {
                        command.incomplete = true;
                        self.recover(nested);
                    }
                }
                command.location.end = valid_end.max(command.location.end);
            }
        }

        if command.location.end < name_location.end {
            command.location.end = name_location.end;
        }
        command.text = self.slice(command.location);
        self.transition(ParseState::Closed);
        Some(command)
    }
}
