//! Immutable AST produced fresh on every parse.
//!
//! Ownership is a strict tree: commands own their arguments, functions own
//! their operands. Each node keeps the raw source `text` under its location
//! and an `incomplete` flag set by the parser when it had to close the node
//! early (missing operand, unterminated quote, missing `)`).
use crate::*;

/// A pipeline: `command (| command)*`. Also used for FORK branches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub commands: Vec<Command>,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Lower-case registry name, `join` for `LOOKUP JOIN`.
    pub name: String,
    /// Qualifier written before the name (`lookup` in `LOOKUP JOIN`).
    pub command_type: Option<String>,
    pub text: String,
    pub location: Location,
    /// Location of the command name itself.
    pub name_location: Location,
    pub args: Vec<Node>,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Command(Command),
    Query(Query),
    Function(Function),
    Column(Column),
    Identifier(Identifier),
    Source(Source),
    Literal(Literal),
    Option(CommandOption),
    List(List),
    TimeInterval(TimeInterval),
    InlineCast(InlineCast),
    Order(Order),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionSubtype {
    /// `name(args)`
    Call,
    /// `a + b`, `a AND b`, `a = b`, `a IN (..)`
    Binary,
    /// `-a`, `NOT a`
    Unary,
    /// `a IS NULL`
    Postfix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Lower-case function name or operator symbol (`avg`, `+`, `not in`, `=`).
    pub name: String,
    pub subtype: FunctionSubtype,
    pub args: Vec<Node>,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Unescaped, dot-joined name (`` `a``b`.c `` is ``a`b.c``).
    pub name: String,
    pub parts: Vec<String>,
    /// True if any segment was backtick quoted.
    pub quoted: bool,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Index,
    Policy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Full unquoted name as written, cluster and selector included.
    pub name: String,
    /// Name without cluster prefix and selector suffix.
    pub index: String,
    /// `remote` in `remote:logs`; the mode (`_any`) for enrich policies.
    pub cluster: Option<String>,
    /// `failures` in `logs::failures`.
    pub selector: Option<String>,
    pub kind: SourceKind,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Decimal,
    String,
    Boolean,
    Null,
    Param,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Unquoted value for strings, raw text otherwise.
    pub value: String,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    /// Lower-case option keyword (`metadata`, `by`, `on`, `with`, `as`).
    pub name: String,
    pub args: Vec<Node>,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub items: Vec<Node>,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeInterval {
    pub quantity: i64,
    pub unit: String,
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineCast {
    pub value: Box<Node>,
    pub cast_type: String,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SortDirection {
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NullsOrder {
    #[display("NULLS FIRST")]
    First,
    #[display("NULLS LAST")]
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub expr: Box<Node>,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
    pub location: Location,
    pub text: String,
    pub incomplete: bool,
}

impl Node {
    pub fn location(&self) -> Location {
        match self {
            Node::Command(n) => n.location,
            Node::Query(n) => n.location,
            Node::Function(n) => n.location,
            Node::Column(n) => n.location,
            Node::Identifier(n) => n.location,
            Node::Source(n) => n.location,
            Node::Literal(n) => n.location,
            Node::Option(n) => n.location,
            Node::List(n) => n.location,
            Node::TimeInterval(n) => n.location,
            Node::InlineCast(n) => n.location,
            Node::Order(n) => n.location,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Node::Command(n) => &n.text,
            Node::Query(_) => "",
            Node::Function(n) => &n.text,
            Node::Column(n) => &n.text,
            Node::Identifier(n) => &n.text,
            Node::Source(n) => &n.text,
            Node::Literal(n) => &n.text,
            Node::Option(n) => &n.text,
            Node::List(n) => &n.text,
            Node::TimeInterval(n) => &n.text,
            Node::InlineCast(n) => &n.text,
            Node::Order(n) => &n.text,
        }
    }

    /// True if the parser had to close this node (or the node it wraps) early.
    pub fn incomplete(&self) -> bool {
        match self {
            Node::Command(n) => n.incomplete,
            Node::Query(n) => n.incomplete,
            Node::Function(n) => n.incomplete,
            Node::Column(n) => n.incomplete,
            Node::Identifier(_) | Node::TimeInterval(_) => false,
            Node::Source(n) => n.incomplete,
            Node::Literal(n) => n.incomplete,
            Node::Option(n) => n.incomplete,
            Node::List(n) => n.incomplete,
            Node::InlineCast(n) => n.incomplete,
            Node::Order(n) => n.incomplete,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Command(_) => "command",
            Node::Query(_) => "query",
            Node::Function(_) => "function",
            Node::Column(_) => "column",
            Node::Identifier(_) => "identifier",
            Node::Source(_) => "source",
            Node::Literal(_) => "literal",
            Node::Option(_) => "option",
            Node::List(_) => "list",
            Node::TimeInterval(_) => "timeInterval",
            Node::InlineCast(_) => "inlineCast",
            Node::Order(_) => "order",
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Node::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&Column> {
        match self {
            Node::Column(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<&CommandOption> {
        match self {
            Node::Option(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_source(&self) -> Option<&Source> {
        match self {
            Node::Source(s) => Some(s),
            _ => None,
        }
    }

    /// Literal values, lists of literals and time intervals.
    pub fn is_constant(&self) -> bool {
        match self {
            Node::Literal(_) | Node::TimeInterval(_) => true,
            Node::List(list) => list.items.iter().all(Node::is_constant),
            Node::InlineCast(cast) => cast.value.is_constant(),
            Node::Function(f) if f.subtype == FunctionSubtype::Unary && f.name == "-" => {
                f.args.iter().all(Node::is_constant)
            }
            _ => false,
        }
    }
}

impl Command {
    /// First option with the given lower-case name.
    pub fn option(&self, name: &str) -> Option<&CommandOption> {
        self.args
            .iter()
            .filter_map(Node::as_option)
            .find(|o| o.name == name)
    }

    pub fn options(&self) -> impl Iterator<Item = &CommandOption> {
        self.args.iter().filter_map(Node::as_option)
    }

    /// Arguments that are not options.
    pub fn positional(&self) -> impl Iterator<Item = &Node> {
        self.args.iter().filter(|n| !matches!(n, Node::Option(_)))
    }

    /// Upper-case display name (`LOOKUP JOIN`, `STATS`).
    pub fn display_name(&self) -> String {
        match &self.command_type {
            Some(kind) => format!("{} {}", kind, self.name).to_ascii_uppercase(),
            None => self.name.to_ascii_uppercase(),
        }
    }
}

impl Function {
    pub fn is_assignment(&self) -> bool {
        self.name == "=" && self.subtype == FunctionSubtype::Binary
    }

    pub fn is_operator(&self) -> bool {
        self.subtype != FunctionSubtype::Call
    }
}

impl Literal {
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, LiteralKind::Integer | LiteralKind::Decimal)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.is_numeric().then(|| self.value.parse().ok()).flatten()
    }

    pub fn as_i64(&self) -> Option<i64> {
        (self.kind == LiteralKind::Integer)
            .then(|| self.value.parse().ok())
            .flatten()
    }
}
