//! Pratt expression parser.
//!
//! Binding power, loosest first:
//! `OR` < `AND` < `NOT` < comparisons, `IS [NOT] NULL`, `[NOT] IN`,
//! `[NOT] LIKE`, `[NOT] RLIKE`, `:` < `+ -` < `* / %` < unary `-` < `::`.
//!
//! A missing operand records one syntax error and yields an `incomplete`
//! node that still carries the operands parsed so far.
use super::Parser;
use crate::*;

const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const UNARY: u8 = 7;

#[derive(Debug, Clone, Copy)]
enum InfixShape {
    Binary,
    IsNull,
    In,
    Pattern,
}

#[derive(Debug, Clone, Copy)]
struct Infix {
    name: &'static str,
    power: u8,
    shape: InfixShape,
    /// Tokens forming the operator (`NOT IN` is two).
    width: usize,
}

impl Infix {
    const fn new(name: &'static str, power: u8, shape: InfixShape, width: usize) -> Self {
        Self {
            name,
            power,
            shape,
            width,
        }
    }
}

pub(crate) fn function_node(
    name: &str,
    subtype: FunctionSubtype,
    args: Vec<Node>,
    location: Location,
    src: &str,
    incomplete: bool,
) -> Node {
    Node::Function(Function {
        name: name.to_string(),
        subtype,
        args,
        location,
        text: location.slice(src).to_string(),
        incomplete,
    })
}

pub(crate) fn mark_incomplete(node: &mut Node) {
    match node {
        Node::Command(n) => n.incomplete = true,
        Node::Query(n) => n.incomplete = true,
        Node::Function(n) => n.incomplete = true,
        Node::Column(n) => n.incomplete = true,
        Node::Source(n) => n.incomplete = true,
        Node::Literal(n) => n.incomplete = true,
        Node::Option(n) => n.incomplete = true,
        Node::List(n) => n.incomplete = true,
        Node::InlineCast(n) => n.incomplete = true,
        Node::Order(n) => n.incomplete = true,
        Node::Identifier(_) | Node::TimeInterval(_) => {}
    }
}

impl Parser<'_> {
    pub(crate) fn expression(&mut self) -> Option<Node> {
        self.binary(OR)
    }

    /// Required expression; the error is recorded by the primary rule.
    pub(crate) fn expect_expression(&mut self) -> super::PResult<Node> {
        self.expression().ok_or(super::Stop)
    }

    fn peek_infix(&self) -> Option<Infix> {
        use InfixShape::*;
        let tok = self.peek()?;
        let infix = match &tok.kind {
            TokenKind::Keyword(Keyword::Or) => Infix::new("or", OR, Binary, 1),
            TokenKind::Keyword(Keyword::And) => Infix::new("and", AND, Binary, 1),
            TokenKind::Keyword(Keyword::Is) => Infix::new("is null", COMPARISON, IsNull, 1),
            TokenKind::Keyword(Keyword::In) => Infix::new("in", COMPARISON, In, 1),
            TokenKind::Keyword(Keyword::Like) => Infix::new("like", COMPARISON, Pattern, 1),
            TokenKind::Keyword(Keyword::Rlike) => Infix::new("rlike", COMPARISON, Pattern, 1),
            TokenKind::Keyword(Keyword::Not) => match self.peek_nth(1)?.kind.keyword()? {
                Keyword::In => Infix::new("not in", COMPARISON, In, 2),
                Keyword::Like => Infix::new("not like", COMPARISON, Pattern, 2),
                Keyword::Rlike => Infix::new("not rlike", COMPARISON, Pattern, 2),
                _ => return None,
            },
            kind if kind.is_comparison() || *kind == TokenKind::Colon => {
                Infix::new(kind.operator_symbol()?, COMPARISON, Binary, 1)
            }
            TokenKind::Plus | TokenKind::Minus => {
                Infix::new(tok.kind.operator_symbol()?, ADDITIVE, Binary, 1)
            }
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
                Infix::new(tok.kind.operator_symbol()?, MULTIPLICATIVE, Binary, 1)
            }
            _ => return None,
        };
        Some(infix)
    }

    fn binary(&mut self, min_power: u8) -> Option<Node> {
        let mut left = self.unary()?;
        while !left.incomplete() {
            let Some(infix) = self.peek_infix() else {
                break;
            };
            if infix.power < min_power {
                break;
            }
            for _ in 0..infix.width {
                self.bump();
            }
            left = match infix.shape {
                InfixShape::Binary | InfixShape::Pattern => {
                    let right = self.binary(infix.power + 1);
                    self.binary_node(infix.name, left, right)
                }
                InfixShape::In => {
                    let right = self.in_list();
                    self.binary_node(infix.name, left, right)
                }
                InfixShape::IsNull => self.is_null(left),
            };
        }
        Some(left)
    }

    fn binary_node(&mut self, name: &str, left: Node, right: Option<Node>) -> Node {
        let start = left.location().start;
        let incomplete = right.as_ref().is_none_or(Node::incomplete);
        let mut args = vec![left];
        args.extend(right);
        let location = Location::new(start, self.last_end());
        function_node(name, FunctionSubtype::Binary, args, location, self.src, incomplete)
    }

    fn is_null(&mut self, operand: Node) -> Node {
        let negated = self.eat_keyword(Keyword::Not).is_some();
        let name = if negated { "is not null" } else { "is null" };
        let complete = self.eat_keyword(Keyword::Null).is_some();
        if !complete {
            self.expected("NULL");
        }
        let location = Location::new(operand.location().start, self.last_end());
        function_node(
            name,
            FunctionSubtype::Postfix,
            vec![operand],
            location,
            self.src,
            !complete,
        )
    }

    /// `( expr, ... )` on the right of `IN`.
    fn in_list(&mut self) -> Option<Node> {
        if !self.at(&TokenKind::ParenOpen) {
            self.expected("'('");
            return None;
        }
        let open = self.bump()?;
        let (items, incomplete) = self.comma_separated(&TokenKind::ParenClose);
        let location = Location::new(open.start, self.last_end());
        Some(Node::List(List {
            items,
            location,
            text: self.slice(location),
            incomplete,
        }))
    }

    /// Items up to and including `close`. Returns the items and whether the
    /// list had to be closed early.
    fn comma_separated(&mut self, close: &TokenKind) -> (Vec<Node>, bool) {
        let mut items = Vec::new();
        if self.eat(close).is_some() {
            return (items, false);
        }
        loop {
            let Some(item) = self.expression() else {
                return (items, true);
            };
            let incomplete = item.incomplete();
            items.push(item);
            if incomplete {
                return (items, true);
            }
            if self.eat(&TokenKind::Comma).is_some() {
                continue;
            }
            if self.eat(close).is_some() {
                return (items, false);
            }
            let what = if *close == TokenKind::ParenClose {
                "',' or ')'"
            } else {
                "',' or ']'"
            };
            self.expected(what);
            return (items, true);
        }
    }

    fn unary(&mut self) -> Option<Node> {
        let Some(tok) = self.peek() else {
            self.expected("an expression");
            return None;
        };
        let (name, power) = match tok.kind {
            TokenKind::Keyword(Keyword::Not) => ("not", COMPARISON),
            TokenKind::Minus => ("-", UNARY),
            TokenKind::Plus => ("+", UNARY),
            _ => return self.postfix_cast(),
        };
        self.bump();

        let operand = self.binary(power);
        if name != "not"
            && let Some(Node::Literal(lit)) = &operand
            && lit.is_numeric()
            && lit.location.start == tok.end
        {
            // `-5` is a literal, not an operator applied to one.
            let location = Location::new(tok.start, lit.location.end);
            let value = if name == "-" {
                format!("-{}", lit.value)
            } else {
                lit.value.clone()
            };
            return Some(Node::Literal(Literal {
                kind: lit.kind,
                value,
                location,
                text: self.slice(location),
                incomplete: false,
            }));
        }

        let incomplete = operand.as_ref().is_none_or(Node::incomplete);
        let location = Location::new(tok.start, self.last_end());
        Some(function_node(
            name,
            FunctionSubtype::Unary,
            operand.into_iter().collect(),
            location,
            self.src,
            incomplete,
        ))
    }

    fn postfix_cast(&mut self) -> Option<Node> {
        let mut node = self.primary()?;
        while !node.incomplete() && self.eat(&TokenKind::DoubleColon).is_some() {
            let cast_type = match self.peek().and_then(|t| t.ident().map(str::to_string)) {
                Some(ty) => {
                    self.bump();
                    Some(ty.to_ascii_lowercase())
                }
                None => {
                    self.expected("a type name after '::'");
                    None
                }
            };
            let location = Location::new(node.location().start, self.last_end());
            node = Node::InlineCast(InlineCast {
                incomplete: cast_type.is_none(),
                value: Box::new(node),
                cast_type: cast_type.unwrap_or_default(),
                location,
                text: self.slice(location),
            });
        }
        Some(node)
    }

    fn literal(&mut self, kind: LiteralKind, value: String, incomplete: bool) -> Node {
        let location = self
            .bump()
            .map(Token::location)
            .unwrap_or_else(|| Location::at(self.src.len()));
        Node::Literal(Literal {
            kind,
            value,
            location,
            text: self.slice(location),
            incomplete,
        })
    }

    fn primary(&mut self) -> Option<Node> {
        let Some(tok) = self.peek() else {
            self.expected("an expression");
            return None;
        };
        let node = match &tok.kind {
            TokenKind::Integer => {
                if let Some(unit) = self.peek_nth(1).filter(|u| matches!(u.kind, TokenKind::Ident(_))) {
                    self.bump();
                    self.bump();
                    let location = Location::new(tok.start, unit.end);
                    return Some(Node::TimeInterval(TimeInterval {
                        quantity: tok.text.parse().unwrap_or_default(),
                        unit: unit.lower(),
                        location,
                        text: self.slice(location),
                    }));
                }
                self.literal(LiteralKind::Integer, tok.text.clone(), false)
            }
            TokenKind::Decimal => self.literal(LiteralKind::Decimal, tok.text.clone(), false),
            TokenKind::String { value, terminated } => {
                if !terminated {
                    self.error("unterminated quoted string", tok.location());
                }
                self.literal(LiteralKind::String, value.clone(), !terminated)
            }
            TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.literal(LiteralKind::Boolean, tok.lower(), false)
            }
            TokenKind::Keyword(Keyword::Null) => self.literal(LiteralKind::Null, tok.lower(), false),
            TokenKind::Param(name) => self.literal(LiteralKind::Param, name.clone(), false),
            TokenKind::BracketOpen => {
                self.bump();
                let (items, incomplete) = self.comma_separated(&TokenKind::BracketClose);
                let location = Location::new(tok.start, self.last_end());
                Node::List(List {
                    items,
                    location,
                    text: self.slice(location),
                    incomplete,
                })
            }
            TokenKind::ParenOpen => {
                self.bump();
                let mut inner = self.expression()?;
                if !inner.incomplete() && self.eat(&TokenKind::ParenClose).is_none() {
                    self.expected("')'");
                    mark_incomplete(&mut inner);
                }
                inner
            }
            TokenKind::Ident(_) | TokenKind::QuotedIdent { .. } => {
                let is_call = matches!(tok.kind, TokenKind::Ident(_))
                    && self
                        .peek_nth(1)
                        .is_some_and(|next| next.kind == TokenKind::ParenOpen);
                if is_call {
                    self.call()
                } else {
                    Node::Column(self.qualified_name()?)
                }
            }
            _ => {
                self.expected("an expression");
                return None;
            }
        };
        Some(node)
    }

    /// `name(args)`. The opening parenthesis is known to follow the name.
    fn call(&mut self) -> Node {
        let Some(name_tok) = self.bump() else {
            return function_node("", FunctionSubtype::Call, Vec::new(), Location::default(), self.src, true);
        };
        self.bump();

        let mut args = Vec::new();
        let mut incomplete = false;
        if self.eat(&TokenKind::ParenClose).is_none() {
            loop {
                let arg = match self.peek() {
                    Some(star)
                        if star.kind == TokenKind::Star
                            && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::ParenClose) =>
                    {
                        self.bump();
                        Some(Node::Column(Column {
                            name: "*".into(),
                            parts: vec!["*".into()],
                            quoted: false,
                            location: star.location(),
                            text: star.text.clone(),
                            incomplete: false,
                        }))
                    }
                    _ => self.expression(),
                };
                let Some(arg) = arg else {
                    incomplete = true;
                    break;
                };
                let arg_incomplete = arg.incomplete();
                args.push(arg);
                if arg_incomplete {
                    incomplete = true;
                    break;
                }
                if self.eat(&TokenKind::Comma).is_some() {
                    continue;
                }
                if self.eat(&TokenKind::ParenClose).is_some() {
                    break;
                }
                self.expected("',' or ')'");
                incomplete = true;
                break;
            }
        }

        let location = Location::new(name_tok.start, self.last_end());
        function_node(
            &name_tok.lower(),
            FunctionSubtype::Call,
            args,
            location,
            self.src,
            incomplete,
        )
    }
}
