use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Column and value types as ES|QL reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[display("boolean")]
    Boolean,
    #[display("integer")]
    Integer,
    #[display("long")]
    Long,
    #[display("unsigned_long")]
    UnsignedLong,
    #[display("double")]
    Double,
    #[display("keyword")]
    Keyword,
    #[display("text")]
    Text,
    #[display("date")]
    Date,
    #[display("date_nanos")]
    DateNanos,
    #[display("ip")]
    Ip,
    #[display("version")]
    Version,
    #[display("geo_point")]
    GeoPoint,
    #[display("geo_shape")]
    GeoShape,
    #[display("cartesian_point")]
    CartesianPoint,
    #[display("cartesian_shape")]
    CartesianShape,
    #[display("time_duration")]
    TimeDuration,
    #[display("date_period")]
    DatePeriod,
    #[display("null")]
    Null,
    #[display("unsupported")]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type [{0}]")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    /// Accepts the Elasticsearch mapping names ES|QL folds into its own types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use FieldType::*;
        let ty = match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Boolean,
            "integer" | "int" | "short" | "byte" => Integer,
            "long" | "counter_long" => Long,
            "unsigned_long" => UnsignedLong,
            "double" | "float" | "half_float" | "scaled_float" | "counter_double" => Double,
            "keyword" | "string" | "constant_keyword" | "wildcard" => Keyword,
            "text" | "match_only_text" | "semantic_text" => Text,
            "date" | "datetime" => Date,
            "date_nanos" => DateNanos,
            "ip" => Ip,
            "version" => Version,
            "geo_point" => GeoPoint,
            "geo_shape" => GeoShape,
            "cartesian_point" => CartesianPoint,
            "cartesian_shape" => CartesianShape,
            "time_duration" => TimeDuration,
            "date_period" => DatePeriod,
            "null" => Null,
            "unsupported" => Unsupported,
            other => return Err(UnknownFieldType(other.to_string())),
        };
        Ok(ty)
    }
}

impl FieldType {
    /// Lenient conversion for collaborator data: unknown mappings become `Unsupported`.
    pub fn from_es(s: &str) -> Self {
        s.parse().unwrap_or(FieldType::Unsupported)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Long | FieldType::UnsignedLong | FieldType::Double
        )
    }

    pub fn is_string(self) -> bool {
        matches!(self, FieldType::Keyword | FieldType::Text)
    }

    pub fn is_date(self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateNanos)
    }

    pub fn is_spatial(self) -> bool {
        matches!(
            self,
            FieldType::GeoPoint
                | FieldType::GeoShape
                | FieldType::CartesianPoint
                | FieldType::CartesianShape
        )
    }

    pub fn is_interval(self) -> bool {
        matches!(self, FieldType::TimeDuration | FieldType::DatePeriod)
    }

    /// Rank used to widen numeric results (`integer + double` is `double`).
    fn numeric_rank(self) -> u8 {
        match self {
            FieldType::Integer => 1,
            FieldType::Long => 2,
            FieldType::UnsignedLong => 3,
            FieldType::Double => 4,
            _ => 0,
        }
    }

    pub fn widest(types: impl IntoIterator<Item = FieldType>) -> Option<FieldType> {
        types
            .into_iter()
            .filter(|t| t.is_numeric())
            .max_by_key(|t| t.numeric_rank())
    }

    pub const SUPPORTED: [FieldType; 15] = [
        FieldType::Boolean,
        FieldType::Integer,
        FieldType::Long,
        FieldType::UnsignedLong,
        FieldType::Double,
        FieldType::Keyword,
        FieldType::Text,
        FieldType::Date,
        FieldType::DateNanos,
        FieldType::Ip,
        FieldType::Version,
        FieldType::GeoPoint,
        FieldType::GeoShape,
        FieldType::CartesianPoint,
        FieldType::CartesianShape,
    ];
}

/// Accepted type of a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Any,
    /// integer, long, unsigned_long or double
    Number,
    /// keyword or text
    String,
    /// date or date_nanos
    Date,
    /// point or shape, geo or cartesian
    Spatial,
    /// geo_point or cartesian_point
    Point,
    /// time_duration or date_period
    Interval,
    Exact(FieldType),
    OneOf(&'static [ParamType]),
}

impl ParamType {
    /// Types that can be compared and sorted.
    pub const COMPARABLE: ParamType = ParamType::OneOf(&[
        ParamType::Number,
        ParamType::String,
        ParamType::Date,
        ParamType::Exact(FieldType::Boolean),
        ParamType::Exact(FieldType::Ip),
        ParamType::Exact(FieldType::Version),
    ]);

    /// True if a value of type `ty` can be passed. `string_literal` marks a
    /// quoted literal, which implicitly casts to date, ip and version.
    pub fn accepts(&self, ty: FieldType, string_literal: bool) -> bool {
        if ty == FieldType::Null {
            return true;
        }
        match self {
            ParamType::Any => ty != FieldType::Unsupported,
            ParamType::Number => ty.is_numeric(),
            ParamType::String => ty.is_string(),
            ParamType::Date => ty.is_date() || string_literal,
            ParamType::Spatial => ty.is_spatial() || string_literal,
            ParamType::Point => {
                matches!(ty, FieldType::GeoPoint | FieldType::CartesianPoint) || string_literal
            }
            ParamType::Interval => ty.is_interval(),
            ParamType::Exact(expected) => {
                *expected == ty
                    || (expected.is_string() && ty.is_string())
                    || (string_literal
                        && matches!(
                            expected,
                            FieldType::Ip
                                | FieldType::Version
                                | FieldType::Date
                                | FieldType::DateNanos
                                | FieldType::GeoPoint
                                | FieldType::GeoShape
                                | FieldType::CartesianPoint
                                | FieldType::CartesianShape
                        ))
            }
            ParamType::OneOf(options) => options.iter().any(|p| p.accepts(ty, string_literal)),
        }
    }

    /// True if some type satisfies both `self` and `other`.
    pub fn intersects(&self, other: &ParamType) -> bool {
        match (self, other) {
            (ParamType::Any, _) | (_, ParamType::Any) => true,
            (ParamType::OneOf(options), other) | (other, ParamType::OneOf(options)) => {
                options.iter().any(|p| p.intersects(other))
            }
            _ => FieldType::SUPPORTED
                .iter()
                .chain([FieldType::TimeDuration, FieldType::DatePeriod].iter())
                .any(|t| self.accepts(*t, false) && other.accepts(*t, false)),
        }
    }

    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            ParamType::Any => "any".into(),
            ParamType::Number => "number".into(),
            ParamType::String => "keyword".into(),
            ParamType::Date => "date".into(),
            ParamType::Spatial => "spatial".into(),
            ParamType::Point => "point".into(),
            ParamType::Interval => "time_literal".into(),
            ParamType::Exact(ty) => ty.to_string(),
            ParamType::OneOf(options) => options
                .iter()
                .map(ParamType::describe)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

/// Units accepted after an integer in a time interval literal.
pub const TIME_UNITS: [&str; 30] = [
    "millisecond", "milliseconds", "ms", "second", "seconds", "sec", "s", "minute", "minutes",
    "min", "hour", "hours", "h", "day", "days", "d", "week", "weeks", "w", "month", "months",
    "mo", "quarter", "quarters", "q", "year", "years", "yr", "y", "nanoseconds",
];

/// Units shown by autocomplete after a number.
pub const SUGGESTED_TIME_UNITS: [&str; 8] = [
    "year", "month", "week", "day", "hour", "minute", "second", "millisecond",
];

/// Interval type for `unit`, or `None` when the unit is unknown.
pub fn interval_type(unit: &str) -> Option<FieldType> {
    let unit = unit.to_ascii_lowercase();
    if !TIME_UNITS.contains(&unit.as_str()) {
        return None;
    }
    let period = matches!(
        unit.as_str(),
        "day" | "days" | "d" | "week" | "weeks" | "w" | "month" | "months" | "mo" | "quarter"
            | "quarters" | "q" | "year" | "years" | "yr" | "y"
    );
    Some(if period {
        FieldType::DatePeriod
    } else {
        FieldType::TimeDuration
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("keyword", FieldType::Keyword)]
    #[case("match_only_text", FieldType::Text)]
    #[case("half_float", FieldType::Double)]
    #[case("LONG", FieldType::Long)]
    fn parses_es_names(#[case] name: &str, #[case] expected: FieldType) {
        assert_eq!(name.parse::<FieldType>(), Ok(expected));
    }

    #[test]
    fn unknown_names() {
        assert_eq!(
            "nested".parse::<FieldType>(),
            Err(UnknownFieldType("nested".into()))
        );
        assert_eq!(FieldType::from_es("object"), FieldType::Unsupported);
        assert_eq!(FieldType::GeoPoint.to_string(), "geo_point");
    }

    #[test]
    fn acceptance() {
        assert!(ParamType::Number.accepts(FieldType::Long, false));
        assert!(!ParamType::Number.accepts(FieldType::Keyword, false));
        assert!(ParamType::Date.accepts(FieldType::Keyword, true));
        assert!(!ParamType::Date.accepts(FieldType::Keyword, false));
        assert!(ParamType::Exact(FieldType::Keyword).accepts(FieldType::Text, false));
        assert!(ParamType::Any.accepts(FieldType::Null, false));
        assert!(!ParamType::Any.accepts(FieldType::Unsupported, false));
        assert!(ParamType::COMPARABLE.accepts(FieldType::Ip, false));
        assert!(!ParamType::COMPARABLE.accepts(FieldType::GeoPoint, false));
    }

    #[test]
    fn intersection() {
        assert!(ParamType::Number.intersects(&ParamType::Exact(FieldType::Double)));
        assert!(!ParamType::Number.intersects(&ParamType::String));
        assert!(ParamType::COMPARABLE.intersects(&ParamType::Date));
        assert!(ParamType::Any.intersects(&ParamType::Spatial));
    }

    #[test]
    fn widening_and_intervals() {
        assert_eq!(
            FieldType::widest([FieldType::Integer, FieldType::Double, FieldType::Long]),
            Some(FieldType::Double)
        );
        assert_eq!(interval_type("Hours"), Some(FieldType::TimeDuration));
        assert_eq!(interval_type("d"), Some(FieldType::DatePeriod));
        assert_eq!(interval_type("fortnight"), None);
    }
}
