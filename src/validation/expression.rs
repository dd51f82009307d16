//! Typing and checking of expressions against the function catalog.
use crate::*;

/// Walks one expression tree, inferring its type and optionally recording
/// diagnostics. Subtrees the parser closed early are skipped.
struct Typer<'a, 'm> {
    context: &'a CommandContext<'a>,
    tag: LocationTag,
    out: Option<&'m mut Vec<Message>>,
    /// Name of the enclosing aggregation, if any.
    agg_parent: Option<&'a str>,
}

impl<'a> Typer<'a, '_> {
    fn report(&mut self, message: Message) {
        if let Some(out) = self.out.as_deref_mut() {
            out.push(message);
        }
    }

    fn node(&mut self, node: &'a Node) -> Option<FieldType> {
        if node.incomplete() {
            return None;
        }
        match node {
            Node::Literal(literal) => literal_type(literal),
            Node::Column(column) => self.column(column),
            Node::TimeInterval(interval) => match interval_type(&interval.unit) {
                Some(ty) => Some(ty),
                None => {
                    self.report(MessageId::UnknownInterval.at(
                        interval.location,
                        params! { "value" => interval.unit },
                    ));
                    None
                }
            },
            Node::List(list) => list
                .items
                .iter()
                .map(|item| self.node(item))
                .fold(None, |acc, ty| acc.or(ty)),
            Node::InlineCast(cast) => {
                self.node(&cast.value);
                cast.cast_type.parse().ok()
            }
            Node::Order(order) => self.node(&order.expr),
            Node::Function(function) => self.function(function),
            Node::Identifier(_)
            | Node::Source(_)
            | Node::Option(_)
            | Node::Command(_)
            | Node::Query(_) => None,
        }
    }

    fn column(&mut self, column: &Column) -> Option<FieldType> {
        match self.context.columns.get(&column.name) {
            Some(field) if field.ty == Some(FieldType::Unsupported) => {
                self.report(MessageId::UnsupportedFieldType.at(
                    column.location,
                    params! { "field" => column.name },
                ));
                None
            }
            Some(field) => field.ty,
            None => {
                if self.context.columns.is_known() {
                    self.report(MessageId::UnknownColumn.at(
                        column.location,
                        params! { "name" => column.name },
                    ));
                }
                None
            }
        }
    }

    fn function(&mut self, function: &'a Function) -> Option<FieldType> {
        match (function.name.as_str(), function.subtype) {
            ("=", FunctionSubtype::Binary) => {
                return function.args.get(1).and_then(|value| self.node(value));
            }
            ("where", FunctionSubtype::Binary) => {
                let ty = function.args.first().and_then(|field| self.node(field));
                if let Some(condition) = function.args.get(1) {
                    let outer = std::mem::replace(&mut self.tag, LocationTag::StatsWhere);
                    self.node(condition);
                    self.tag = outer;
                }
                return ty;
            }
            _ => {}
        }

        let Some(definition) = function_definition(&function.name) else {
            self.report(MessageId::UnknownFunction.at(
                function.location,
                params! { "name" => function.name },
            ));
            for arg in &function.args {
                self.node(arg);
            }
            return None;
        };

        if !definition.locations.contains(&self.tag) {
            let message = match option_keyword(self.tag) {
                Some(option) => MessageId::UnsupportedFunctionForCommandOption.at(
                    function.location,
                    params! {
                        "command" => self.context.command.display_name(),
                        "option" => option,
                        "name" => function.name,
                    },
                ),
                None => MessageId::UnsupportedFunctionForCommand.at(
                    function.location,
                    params! {
                        "command" => self.context.command.display_name(),
                        "name" => function.name,
                    },
                ),
            };
            self.report(message);
        }

        let outer_agg = self.agg_parent;
        if definition.is_agg() {
            if let Some(outer) = outer_agg {
                self.report(MessageId::AggInAggFunction.at(
                    function.location,
                    params! { "nested" => function.text, "outer" => outer },
                ));
            }
            self.agg_parent = Some(function.name.as_str());
        }
        let count_all = function.name == "count";
        let args: Vec<ArgInfo> = function
            .args
            .iter()
            .map(|arg| match arg {
                Node::Column(c) if count_all && c.name == "*" => ArgInfo {
                    ty: None,
                    string_literal: false,
                    constant: false,
                    value: None,
                },
                _ => arg_info(arg, self.node(arg)),
            })
            .collect();
        self.agg_parent = outer_agg;

        match definition.resolve(&args) {
            Resolution::Matched {
                signature,
                return_type,
            } => {
                self.license(definition, signature, function);
                return_type
            }
            Resolution::WrongArity { expected } => {
                self.report(MessageId::WrongArgumentNumber.at(
                    function.location,
                    params! {
                        "fn" => function.name,
                        "expected" => expected,
                        "actual" => args.len(),
                    },
                ));
                None
            }
            Resolution::WrongType {
                position,
                expected,
                ..
            } => {
                if let (Some(arg), Some(given)) =
                    (function.args.get(position), args.get(position).and_then(|a| a.ty))
                {
                    self.report(MessageId::WrongArgumentType.at(
                        arg.location(),
                        params! {
                            "fn" => function.name,
                            "expected" => expected.describe(),
                            "value" => arg.text(),
                            "given" => given,
                        },
                    ));
                }
                None
            }
            Resolution::NotConstant { position } => {
                if let Some(arg) = function.args.get(position) {
                    self.report(MessageId::ExpectedConstant.at(
                        arg.location(),
                        params! { "fn" => function.name, "value" => arg.text() },
                    ));
                }
                None
            }
            Resolution::UnsupportedValue { position, accepted } => {
                if let Some(arg) = function.args.get(position) {
                    let value = args
                        .get(position)
                        .and_then(|a| a.value.clone())
                        .unwrap_or_default();
                    self.report(MessageId::UnsupportedLiteralOption.at(
                        arg.location(),
                        params! {
                            "fn" => function.name,
                            "value" => value,
                            "accepted" => accepted.join(", "),
                        },
                    ));
                }
                None
            }
        }
    }

    fn license(
        &mut self,
        definition: &FunctionDefinition,
        signature: &Signature,
        function: &Function,
    ) {
        let Some(tier) = self.context.license else {
            return;
        };
        let name = function.name.to_ascii_uppercase();
        if let Some(required) = definition.license.filter(|r| !tier.allows(*r)) {
            self.report(MessageId::LicenseRequired.at(
                function.location,
                params! { "name" => name, "requiredLicense" => required },
            ));
        } else if let Some(required) = signature.license.filter(|r| !tier.allows(*r)) {
            self.report(MessageId::LicenseRequiredForSignature.at(
                function.location,
                params! {
                    "name" => name,
                    "signature" => signature.describe(),
                    "requiredLicense" => required,
                },
            ));
        }
    }
}

fn option_keyword(tag: LocationTag) -> Option<&'static str> {
    match tag {
        LocationTag::StatsBy => Some("BY"),
        LocationTag::StatsWhere => Some("WHERE"),
        LocationTag::EnrichWith => Some("WITH"),
        _ => None,
    }
}

pub fn literal_type(literal: &Literal) -> Option<FieldType> {
    match literal.kind {
        LiteralKind::Integer => Some(match literal.value.parse::<i64>() {
            Ok(n) if i32::try_from(n).is_ok() => FieldType::Integer,
            Ok(_) => FieldType::Long,
            Err(_) => FieldType::UnsignedLong,
        }),
        LiteralKind::Decimal => Some(FieldType::Double),
        LiteralKind::String => Some(FieldType::Keyword),
        LiteralKind::Boolean => Some(FieldType::Boolean),
        LiteralKind::Null => Some(FieldType::Null),
        LiteralKind::Param => None,
    }
}

fn arg_info(node: &Node, ty: Option<FieldType>) -> ArgInfo {
    let string = node
        .as_literal()
        .filter(|l| l.kind == LiteralKind::String);
    ArgInfo {
        ty,
        string_literal: string.is_some(),
        constant: node.is_constant() || node.as_literal().is_some(),
        value: string.map(|l| l.value.clone()),
    }
}

impl<'a> CommandContext<'a> {
    /// Check `node` as an expression at `tag`, returning its type when known.
    pub fn check_expression(
        &'a self,
        node: &'a Node,
        tag: LocationTag,
        out: &mut Vec<Message>,
    ) -> Option<FieldType> {
        Typer {
            context: self,
            tag,
            out: Some(out),
            agg_parent: None,
        }
        .node(node)
    }

    /// Type of `node` without reporting anything.
    pub fn type_of(&'a self, node: &'a Node) -> Option<FieldType> {
        Typer {
            context: self,
            tag: LocationTag::Eval,
            out: None,
            agg_parent: None,
        }
        .node(node)
    }

    /// Report `column` when the input is known not to contain it.
    pub fn check_column(&self, column: &Column, out: &mut Vec<Message>) -> bool {
        if self.columns.has(&column.name) == Some(false) {
            out.push(MessageId::UnknownColumn.at(
                column.location,
                params! { "name" => column.name },
            ));
            return false;
        }
        true
    }
}

/// Type of `node` given the columns in scope.
pub fn type_of(node: &Node, command: &Command, columns: &ColumnSet) -> Option<FieldType> {
    let schema = SchemaSnapshot::default();
    let context = CommandContext {
        command,
        columns,
        schema: &schema,
        license: None,
    };
    context.type_of(node)
}

/// True if `node` contains an aggregation call.
pub fn contains_agg(node: &Node) -> bool {
    node.functions()
        .iter()
        .any(|f| function_definition(&f.name).is_some_and(FunctionDefinition::is_agg))
}

/// True if every column reference in `node` sits under an aggregation.
pub fn is_agg_closed(node: &Node) -> bool {
    match node {
        Node::Column(_) => false,
        Node::Function(f)
            if f.subtype == FunctionSubtype::Call
                && function_definition(&f.name).is_some_and(FunctionDefinition::is_agg) =>
        {
            true
        }
        _ => node.children().into_iter().all(is_agg_closed),
    }
}
