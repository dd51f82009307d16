//! Function definitions and signature resolution.
use crate::*;
use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FunctionCategory {
    #[display("scalar")]
    Scalar,
    #[display("agg")]
    Agg,
    #[display("grouping")]
    Grouping,
    #[display("operator")]
    Operator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub ty: ParamType,
    pub optional: bool,
    /// Only literals (or other constant expressions) may be passed.
    pub constant_only: bool,
    /// Closed set of accepted string literal values, upper-cased for display.
    pub accepted_values: Option<&'static [&'static str]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnType {
    Fixed(FieldType),
    /// Same type as the argument at this position.
    SameAs(usize),
    /// Widest numeric type among the arguments.
    WidenNumeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    /// The last parameter may repeat.
    pub variadic: bool,
    pub return_type: ReturnType,
    /// License needed for this overload only.
    pub license: Option<LicenseTier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub category: FunctionCategory,
    pub description: &'static str,
    pub locations: Vec<LocationTag>,
    pub signatures: Vec<Signature>,
    pub license: Option<LicenseTier>,
}

/// What the validator knows about one argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgInfo {
    /// `None` when the type could not be determined (unknown column, parameter).
    pub ty: Option<FieldType>,
    pub string_literal: bool,
    pub constant: bool,
    /// Unquoted literal value, for accepted value checks.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Matched {
        signature: &'a Signature,
        return_type: Option<FieldType>,
    },
    WrongArity {
        /// Rendered arity, e.g. "exactly one argument".
        expected: String,
    },
    WrongType {
        signature: &'a Signature,
        position: usize,
        expected: ParamType,
    },
    NotConstant {
        position: usize,
    },
    UnsupportedValue {
        position: usize,
        accepted: &'static [&'static str],
    },
}

impl Signature {
    pub fn min_args(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }

    /// `None` when variadic.
    pub fn max_args(&self) -> Option<usize> {
        (!self.variadic).then_some(self.params.len())
    }

    pub fn fits_arity(&self, n: usize) -> bool {
        n >= self.min_args() && self.max_args().is_none_or(|max| n <= max)
    }

    /// Distance from `n` to the accepted arity range.
    fn arity_distance(&self, n: usize) -> usize {
        let min = self.min_args();
        if n < min {
            return min - n;
        }
        match self.max_args() {
            Some(max) if n > max => n - max,
            _ => 0,
        }
    }

    /// Parameter describing argument `i`, repeating the last one when variadic.
    pub fn param(&self, i: usize) -> Option<&Param> {
        self.params
            .get(i)
            .or_else(|| self.variadic.then(|| self.params.last()).flatten())
    }

    /// Broadest type this signature can return.
    pub fn possible_return(&self) -> ParamType {
        match self.return_type {
            ReturnType::Fixed(ty) => ParamType::Exact(ty),
            ReturnType::SameAs(i) => self.params.get(i).map(|p| p.ty).unwrap_or(ParamType::Any),
            ReturnType::WidenNumeric => ParamType::Number,
        }
    }

    fn resolve_return(&self, args: &[ArgInfo]) -> Option<FieldType> {
        match self.return_type {
            ReturnType::Fixed(ty) => Some(ty),
            ReturnType::SameAs(i) => args.get(i).and_then(|a| a.ty),
            ReturnType::WidenNumeric => {
                let types: Option<Vec<FieldType>> = args.iter().map(|a| a.ty).collect();
                FieldType::widest(types?)
            }
        }
    }

    /// First argument this signature rejects, if any.
    fn first_mismatch(&self, args: &[ArgInfo]) -> Option<usize> {
        args.iter().enumerate().position(|(i, arg)| match (self.param(i), arg.ty) {
            (Some(param), Some(ty)) => !param.ty.accepts(ty, arg.string_literal),
            _ => false,
        })
    }

    /// Short description for license messages, e.g. `"geo_shape"`.
    pub fn describe(&self) -> String {
        self.params
            .iter()
            .map(|p| p.ty.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn arguments(n: usize) -> String {
    match n {
        1 => "one argument".into(),
        n => format!("{n} arguments"),
    }
}

impl FunctionDefinition {
    pub fn is_agg(&self) -> bool {
        self.category == FunctionCategory::Agg
    }

    pub fn min_args(&self) -> usize {
        self.signatures.iter().map(Signature::min_args).min().unwrap_or(0)
    }

    /// `None` when any overload is variadic.
    pub fn max_args(&self) -> Option<usize> {
        self.signatures
            .iter()
            .map(Signature::max_args)
            .try_fold(0, |acc, max| max.map(|m| acc.max(m)))
    }

    /// "exactly one argument", "at least 2 arguments", "between 1 and 3 arguments".
    pub fn arity_phrase(&self) -> String {
        match (self.min_args(), self.max_args()) {
            (0, Some(0)) => "no arguments".into(),
            (min, Some(max)) if min == max => format!("exactly {}", arguments(min)),
            (0, Some(max)) => format!("no more than {}", arguments(max)),
            (min, Some(max)) => format!("between {min} and {max} arguments"),
            (min, None) => format!("at least {}", arguments(min)),
        }
    }

    /// Pick the signature for `args`.
    ///
    /// Signatures are tried in declaration order; the first that accepts
    /// every argument wins. When none does, the closest signature by arity
    /// explains the failure; among equally close ones the nearest minimum
    /// arity wins, then the earlier declaration.
    pub fn resolve(&self, args: &[ArgInfo]) -> Resolution<'_> {
        let n = args.len();
        if let Some(signature) = self
            .signatures
            .iter()
            .find(|s| s.fits_arity(n) && s.first_mismatch(args).is_none())
        {
            for (i, arg) in args.iter().enumerate() {
                let Some(param) = signature.param(i) else {
                    continue;
                };
                if param.constant_only && !arg.constant {
                    return Resolution::NotConstant { position: i };
                }
                if let (Some(accepted), Some(value)) = (param.accepted_values, &arg.value)
                    && arg.string_literal
                    && !accepted.iter().any(|v| v.eq_ignore_ascii_case(value))
                {
                    return Resolution::UnsupportedValue {
                        position: i,
                        accepted,
                    };
                }
            }
            return Resolution::Matched {
                signature,
                return_type: signature.resolve_return(args),
            };
        }

        let closest = self
            .signatures
            .iter()
            .enumerate()
            .min_by_key(|(order, s)| (s.arity_distance(n), s.min_args().abs_diff(n), *order))
            .map(|(_, s)| s);
        match closest {
            Some(signature) if signature.fits_arity(n) => {
                let position = signature.first_mismatch(args).unwrap_or_default();
                let expected = signature
                    .param(position)
                    .map(|p| p.ty)
                    .unwrap_or(ParamType::Any);
                Resolution::WrongType {
                    signature,
                    position,
                    expected,
                }
            }
            _ => Resolution::WrongArity {
                expected: self.arity_phrase(),
            },
        }
    }

    /// Signature label shown in suggestion details, e.g. `round(number, [decimals])`.
    pub fn label(&self) -> String {
        let Some(signature) = self.signatures.iter().max_by_key(|s| s.params.len()) else {
            return format!("{}()", self.name);
        };
        let params: Vec<String> = signature
            .params
            .iter()
            .map(|p| {
                let base = format!("{}:{}", p.name, p.ty.describe());
                if p.optional { format!("[{base}]") } else { base }
            })
            .collect();
        let ellipsis = if signature.variadic { ", ..." } else { "" };
        format!("{}({}{ellipsis})", self.name, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(ty: FieldType) -> ArgInfo {
        ArgInfo {
            ty: Some(ty),
            string_literal: false,
            constant: false,
            value: None,
        }
    }

    fn constant(ty: FieldType, value: &str) -> ArgInfo {
        ArgInfo {
            ty: Some(ty),
            string_literal: ty == FieldType::Keyword,
            constant: true,
            value: Some(value.into()),
        }
    }

    fn function(name: &str) -> &'static FunctionDefinition {
        function_definition(name).expect("registered function")
    }

    #[test]
    fn arity_phrases() {
        assert_eq!(function("abs").arity_phrase(), "exactly one argument");
        assert_eq!(function("round").arity_phrase(), "between 1 and 2 arguments");
        assert_eq!(function("concat").arity_phrase(), "at least 2 arguments");
        assert_eq!(function("pi").arity_phrase(), "no arguments");
        assert_eq!(function("count").arity_phrase(), "no more than one argument");
    }

    #[test]
    fn first_matching_signature_wins() {
        let log = function("log");
        match log.resolve(&[arg(FieldType::Double)]) {
            Resolution::Matched { signature, .. } => assert_eq!(signature.params.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        match log.resolve(&[arg(FieldType::Integer), arg(FieldType::Long)]) {
            Resolution::Matched { signature, .. } => assert_eq!(signature.params.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_arity_uses_function_range() {
        let abs = function("abs");
        assert_eq!(
            abs.resolve(&[arg(FieldType::Double), arg(FieldType::Double)]),
            Resolution::WrongArity {
                expected: "exactly one argument".into()
            }
        );
    }

    #[test]
    fn wrong_type_reports_closest_signature() {
        let round = function("round");
        match round.resolve(&[arg(FieldType::Keyword), arg(FieldType::Integer)]) {
            Resolution::WrongType { position, expected, .. } => {
                assert_eq!(position, 0);
                assert_eq!(expected, ParamType::Number);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn overloaded(signatures: Vec<Vec<(&'static str, bool)>>) -> FunctionDefinition {
        let param = |(name, optional): (&'static str, bool)| Param {
            name,
            ty: ParamType::Exact(FieldType::Integer),
            optional,
            constant_only: false,
            accepted_values: None,
        };
        FunctionDefinition {
            name: "pick",
            category: FunctionCategory::Scalar,
            description: "",
            locations: vec![LocationTag::Eval],
            signatures: signatures
                .into_iter()
                .map(|params| Signature {
                    params: params.into_iter().map(param).collect(),
                    variadic: false,
                    return_type: ReturnType::Fixed(FieldType::Integer),
                    license: None,
                })
                .collect(),
            license: None,
        }
    }

    #[test]
    fn nearest_minimum_arity_explains_failure() {
        // pick(a, [b], [c]) and pick(x, y)
        let pick = overloaded(vec![
            vec![("a", false), ("b", true), ("c", true)],
            vec![("x", false), ("y", false)],
        ]);
        match pick.resolve(&[arg(FieldType::Integer), arg(FieldType::Keyword)]) {
            Resolution::WrongType { signature, position, .. } => {
                assert_eq!(signature.params[0].name, "x");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected {other:?}"),
        }

        // Equal minimums fall back to declaration order.
        let pick = overloaded(vec![vec![("a", false)], vec![("x", false), ("y", true)]]);
        match pick.resolve(&[arg(FieldType::Keyword)]) {
            Resolution::WrongType { signature, .. } => assert_eq!(signature.params[0].name, "a"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_types_are_accepted() {
        let abs = function("abs");
        let unknown = ArgInfo {
            ty: None,
            string_literal: false,
            constant: false,
            value: None,
        };
        assert!(matches!(
            abs.resolve(&[unknown]),
            Resolution::Matched { return_type: None, .. }
        ));
    }

    #[test]
    fn constant_and_accepted_values() {
        let percentile = function("percentile");
        assert_eq!(
            percentile.resolve(&[arg(FieldType::Double), arg(FieldType::Double)]),
            Resolution::NotConstant { position: 1 }
        );
        let extract = function("date_extract");
        assert!(matches!(
            extract.resolve(&[constant(FieldType::Keyword, "fortnight"), arg(FieldType::Date)]),
            Resolution::UnsupportedValue { position: 0, .. }
        ));
        assert!(matches!(
            extract.resolve(&[constant(FieldType::Keyword, "year"), arg(FieldType::Date)]),
            Resolution::Matched { return_type: Some(FieldType::Long), .. }
        ));
    }

    #[test]
    fn numeric_widening() {
        let plus = function("+");
        assert!(matches!(
            plus.resolve(&[arg(FieldType::Integer), arg(FieldType::Double)]),
            Resolution::Matched { return_type: Some(FieldType::Double), .. }
        ));
    }

    #[test]
    fn labels() {
        assert_eq!(function("round").label(), "round(number:number, [decimals:integer])");
        assert_eq!(function("concat").label(), "concat(first:keyword, rest:keyword, ...)");
    }
}
