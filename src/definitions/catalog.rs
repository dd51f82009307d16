//! Built-in function catalog.
use crate::*;
use FieldType as F;
use FunctionCategory::*;
use ParamType as P;

const DATE_PARTS: &[&str] = &[
    "ALIGNED_DAY_OF_WEEK_IN_MONTH",
    "ALIGNED_DAY_OF_WEEK_IN_YEAR",
    "ALIGNED_WEEK_OF_MONTH",
    "ALIGNED_WEEK_OF_YEAR",
    "AMPM_OF_DAY",
    "CLOCK_HOUR_OF_AMPM",
    "CLOCK_HOUR_OF_DAY",
    "DAY_OF_MONTH",
    "DAY_OF_WEEK",
    "DAY_OF_YEAR",
    "EPOCH_DAY",
    "ERA",
    "HOUR_OF_AMPM",
    "HOUR_OF_DAY",
    "INSTANT_SECONDS",
    "MICRO_OF_DAY",
    "MICRO_OF_SECOND",
    "MILLI_OF_DAY",
    "MILLI_OF_SECOND",
    "MINUTE_OF_DAY",
    "MINUTE_OF_HOUR",
    "MONTH_OF_YEAR",
    "NANO_OF_DAY",
    "NANO_OF_SECOND",
    "OFFSET_SECONDS",
    "PROLEPTIC_MONTH",
    "SECOND_OF_DAY",
    "SECOND_OF_MINUTE",
    "YEAR",
    "YEAR_OF_ERA",
];

const DATE_DIFF_UNITS: &[&str] = &[
    "year", "years", "yy", "yyyy", "quarter", "quarters", "qq", "q", "month", "months", "mm",
    "m", "dayofyear", "dy", "y", "day", "days", "dd", "d", "week", "weeks", "wk", "ww",
    "weekday", "weekdays", "dw", "hour", "hours", "hh", "minute", "minutes", "mi", "n",
    "second", "seconds", "ss", "s", "millisecond", "milliseconds", "ms", "microsecond",
    "microseconds", "mcs", "nanosecond", "nanoseconds", "ns",
];

const SORT_ORDERS: &[&str] = &["ASC", "DESC"];

fn p(name: &'static str, ty: ParamType) -> Param {
    Param {
        name,
        ty,
        optional: false,
        constant_only: false,
        accepted_values: None,
    }
}

fn opt(name: &'static str, ty: ParamType) -> Param {
    Param {
        optional: true,
        ..p(name, ty)
    }
}

fn constant(mut param: Param) -> Param {
    param.constant_only = true;
    param
}

fn one_of(mut param: Param, values: &'static [&'static str]) -> Param {
    param.accepted_values = Some(values);
    param.constant_only = true;
    param
}

fn sig(params: Vec<Param>, return_type: ReturnType) -> Signature {
    Signature {
        params,
        variadic: false,
        return_type,
        license: None,
    }
}

fn variadic(params: Vec<Param>, return_type: ReturnType) -> Signature {
    Signature {
        variadic: true,
        ..sig(params, return_type)
    }
}

fn licensed(mut signature: Signature, tier: LicenseTier) -> Signature {
    signature.license = Some(tier);
    signature
}

fn def(
    name: &'static str,
    category: FunctionCategory,
    description: &'static str,
    signatures: Vec<Signature>,
) -> FunctionDefinition {
    let locations = match category {
        Scalar => LocationTag::EXPRESSIONS.to_vec(),
        Agg => vec![LocationTag::Stats],
        Grouping => vec![LocationTag::StatsBy],
        Operator => {
            let mut all = LocationTag::EXPRESSIONS.to_vec();
            all.push(LocationTag::Join);
            all
        }
    };
    FunctionDefinition {
        name,
        category,
        description,
        locations,
        signatures,
        license: None,
    }
}

fn fixed(ty: FieldType) -> ReturnType {
    ReturnType::Fixed(ty)
}

fn math(name: &'static str, description: &'static str) -> FunctionDefinition {
    def(name, Scalar, description, vec![sig(vec![p("number", P::Number)], fixed(F::Double))])
}

fn string_unary(name: &'static str, description: &'static str) -> FunctionDefinition {
    def(name, Scalar, description, vec![sig(vec![p("string", P::String)], fixed(F::Keyword))])
}

fn conversion(name: &'static str, to: FieldType) -> FunctionDefinition {
    def(
        name,
        Scalar,
        "Converts an input value to another type.",
        vec![sig(vec![p("field", P::Any)], fixed(to))],
    )
}

fn mv(name: &'static str, ty: ParamType, ret: ReturnType, description: &'static str) -> FunctionDefinition {
    def(name, Scalar, description, vec![sig(vec![p("field", ty)], ret)])
}

fn spatial_relation(name: &'static str, description: &'static str) -> FunctionDefinition {
    def(
        name,
        Scalar,
        description,
        vec![sig(vec![p("geomA", P::Spatial), p("geomB", P::Spatial)], fixed(F::Boolean))],
    )
}

fn comparison(name: &'static str) -> FunctionDefinition {
    let mut signatures = vec![
        sig(vec![p("left", P::Number), p("right", P::Number)], fixed(F::Boolean)),
        sig(vec![p("left", P::String), p("right", P::String)], fixed(F::Boolean)),
        sig(vec![p("left", P::Date), p("right", P::Date)], fixed(F::Boolean)),
        sig(
            vec![p("left", P::Exact(F::Ip)), p("right", P::Exact(F::Ip))],
            fixed(F::Boolean),
        ),
        sig(
            vec![p("left", P::Exact(F::Version)), p("right", P::Exact(F::Version))],
            fixed(F::Boolean),
        ),
    ];
    if matches!(name, "==" | "!=") {
        signatures.push(sig(
            vec![p("left", P::Exact(F::Boolean)), p("right", P::Exact(F::Boolean))],
            fixed(F::Boolean),
        ));
        signatures.push(sig(
            vec![p("left", P::Spatial), p("right", P::Spatial)],
            fixed(F::Boolean),
        ));
    }
    def(name, Operator, "Compares two values.", signatures)
}

fn arithmetic(name: &'static str, description: &'static str) -> FunctionDefinition {
    let mut signatures = vec![sig(
        vec![p("left", P::Number), p("right", P::Number)],
        ReturnType::WidenNumeric,
    )];
    if matches!(name, "+" | "-") {
        signatures.push(sig(
            vec![p("left", P::Date), p("right", P::Interval)],
            ReturnType::SameAs(0),
        ));
        signatures.push(sig(
            vec![p("left", P::Interval), p("right", P::Date)],
            ReturnType::SameAs(1),
        ));
        signatures.push(sig(vec![p("value", P::Number)], ReturnType::SameAs(0)));
    }
    def(name, Operator, description, signatures)
}

fn pattern_operator(name: &'static str) -> FunctionDefinition {
    def(
        name,
        Operator,
        "Filters strings against a pattern.",
        vec![sig(vec![p("field", P::String), p("pattern", P::String)], fixed(F::Boolean))],
    )
}

pub(crate) fn builtin_functions() -> Vec<FunctionDefinition> {
    let mut all = aggregations();
    all.extend(grouping());
    all.extend(operators());
    all.extend(scalars());
    all
}

fn aggregations() -> Vec<FunctionDefinition> {
    let comparable_same = |name, description| {
        def(
            name,
            Agg,
            description,
            vec![sig(vec![p("field", P::COMPARABLE)], ReturnType::SameAs(0))],
        )
    };
    let numeric_double = |name, description| {
        def(name, Agg, description, vec![sig(vec![p("number", P::Number)], fixed(F::Double))])
    };
    vec![
        numeric_double("avg", "The average of a numeric field."),
        def(
            "count",
            Agg,
            "Returns the total number (count) of input values.",
            vec![sig(vec![opt("field", P::Any)], fixed(F::Long))],
        ),
        def(
            "count_distinct",
            Agg,
            "Returns the approximate number of distinct values.",
            vec![sig(
                vec![p("field", P::Any), constant(opt("precision", P::Number))],
                fixed(F::Long),
            )],
        ),
        comparable_same("max", "The maximum value of a field."),
        comparable_same("min", "The minimum value of a field."),
        def(
            "sum",
            Agg,
            "The sum of a numeric expression.",
            vec![sig(vec![p("number", P::Number)], ReturnType::WidenNumeric)],
        ),
        numeric_double("median", "The value that is greater than half of all values."),
        numeric_double(
            "median_absolute_deviation",
            "Returns the median absolute deviation, a measure of variability.",
        ),
        def(
            "percentile",
            Agg,
            "Returns the value at which a certain percentage of observed values occur.",
            vec![sig(
                vec![p("number", P::Number), constant(p("percentile", P::Number))],
                fixed(F::Double),
            )],
        ),
        numeric_double("std_dev", "The standard deviation of a numeric field."),
        def(
            "values",
            Agg,
            "Returns all values in a group as a multivalued field.",
            vec![sig(vec![p("field", P::Any)], ReturnType::SameAs(0))],
        ),
        def(
            "top",
            Agg,
            "Collects the top values for a field.",
            vec![sig(
                vec![
                    p("field", P::COMPARABLE),
                    constant(p("limit", P::Exact(F::Integer))),
                    one_of(p("order", P::String), SORT_ORDERS),
                ],
                ReturnType::SameAs(0),
            )],
        ),
        def(
            "weighted_avg",
            Agg,
            "The weighted average of a numeric expression.",
            vec![sig(vec![p("number", P::Number), p("weight", P::Number)], fixed(F::Double))],
        ),
        def(
            "st_centroid_agg",
            Agg,
            "Calculate the spatial centroid over a field with spatial point geometry type.",
            vec![sig(vec![p("field", P::Point)], ReturnType::SameAs(0))],
        ),
        def(
            "st_extent_agg",
            Agg,
            "Calculate the spatial extent over a field with geometry type.",
            vec![
                sig(vec![p("field", P::Exact(F::GeoPoint))], fixed(F::GeoShape)),
                sig(vec![p("field", P::Exact(F::CartesianPoint))], fixed(F::CartesianShape)),
                licensed(
                    sig(vec![p("field", P::Exact(F::GeoShape))], fixed(F::GeoShape)),
                    LicenseTier::Platinum,
                ),
                licensed(
                    sig(vec![p("field", P::Exact(F::CartesianShape))], fixed(F::CartesianShape)),
                    LicenseTier::Platinum,
                ),
            ],
        ),
    ]
}

fn grouping() -> Vec<FunctionDefinition> {
    vec![
        def(
            "bucket",
            Grouping,
            "Creates groups of values out of a datetime or numeric input.",
            vec![
                sig(
                    vec![p("field", P::Date), constant(p("buckets", P::Interval))],
                    ReturnType::SameAs(0),
                ),
                sig(
                    vec![
                        p("field", P::OneOf(&[P::Date, P::Number])),
                        constant(p("buckets", P::Number)),
                        constant(p("from", P::OneOf(&[P::Date, P::Number]))),
                        constant(p("to", P::OneOf(&[P::Date, P::Number]))),
                    ],
                    ReturnType::SameAs(0),
                ),
                sig(
                    vec![p("field", P::Number), constant(p("span", P::Number))],
                    fixed(F::Double),
                ),
            ],
        ),
        def(
            "categorize",
            Grouping,
            "Groups text messages into categories of similarly formatted text values.",
            vec![sig(vec![p("field", P::String)], fixed(F::Keyword))],
        ),
    ]
}

fn operators() -> Vec<FunctionDefinition> {
    let mut ops = vec![
        arithmetic("+", "Add two values together."),
        arithmetic("-", "Subtract one value from another."),
        arithmetic("*", "Multiply two values together."),
        arithmetic("/", "Divide one value by another."),
        arithmetic("%", "Divide one value by another and return the remainder."),
    ];
    ops.extend(["==", "!=", "<", "<=", ">", ">="].map(comparison));
    ops.extend([
        def(
            "and",
            Operator,
            "Logical AND.",
            vec![sig(
                vec![p("left", P::Exact(F::Boolean)), p("right", P::Exact(F::Boolean))],
                fixed(F::Boolean),
            )],
        ),
        def(
            "or",
            Operator,
            "Logical OR.",
            vec![sig(
                vec![p("left", P::Exact(F::Boolean)), p("right", P::Exact(F::Boolean))],
                fixed(F::Boolean),
            )],
        ),
        def(
            "not",
            Operator,
            "Logical NOT.",
            vec![sig(vec![p("value", P::Exact(F::Boolean))], fixed(F::Boolean))],
        ),
        def(
            "is null",
            Operator,
            "Returns true if the value is null.",
            vec![sig(vec![p("value", P::Any)], fixed(F::Boolean))],
        ),
        def(
            "is not null",
            Operator,
            "Returns true if the value is not null.",
            vec![sig(vec![p("value", P::Any)], fixed(F::Boolean))],
        ),
        def(
            "in",
            Operator,
            "Tests whether a value is in a list.",
            vec![sig(vec![p("value", P::Any), p("list", P::Any)], fixed(F::Boolean))],
        ),
        def(
            "not in",
            Operator,
            "Tests whether a value is not in a list.",
            vec![sig(vec![p("value", P::Any), p("list", P::Any)], fixed(F::Boolean))],
        ),
        pattern_operator("like"),
        pattern_operator("not like"),
        pattern_operator("rlike"),
        pattern_operator("not rlike"),
    ]);
    let mut match_op = def(
        ":",
        Operator,
        "Performs a full text match on the field.",
        vec![sig(
            vec![p("field", P::Any), constant(p("query", P::OneOf(&[P::String, P::Number])))],
            fixed(F::Boolean),
        )],
    );
    match_op.locations = vec![LocationTag::Where];
    ops.push(match_op);
    ops
}

fn scalars() -> Vec<FunctionDefinition> {
    vec![
        def(
            "abs",
            Scalar,
            "Returns the absolute value.",
            vec![sig(vec![p("number", P::Number)], ReturnType::SameAs(0))],
        ),
        def(
            "ceil",
            Scalar,
            "Round a number up to the nearest integer.",
            vec![sig(vec![p("number", P::Number)], ReturnType::SameAs(0))],
        ),
        def(
            "floor",
            Scalar,
            "Round a number down to the nearest integer.",
            vec![sig(vec![p("number", P::Number)], ReturnType::SameAs(0))],
        ),
        def(
            "round",
            Scalar,
            "Rounds a number to the specified number of decimal places.",
            vec![sig(
                vec![p("number", P::Number), opt("decimals", P::Exact(F::Integer))],
                ReturnType::SameAs(0),
            )],
        ),
        math("sqrt", "Returns the square root of a number."),
        math("log10", "Returns the logarithm of a value to base 10."),
        math("exp", "Returns the value of e raised to the power of the given number."),
        math("sin", "Returns the sine of an angle."),
        math("cos", "Returns the cosine of an angle."),
        math("tan", "Returns the tangent of an angle."),
        math("signum", "Returns the sign of the given number."),
        def(
            "log",
            Scalar,
            "Returns the logarithm of a value to a base.",
            vec![
                sig(vec![p("number", P::Number)], fixed(F::Double)),
                sig(vec![p("base", P::Number), p("number", P::Number)], fixed(F::Double)),
            ],
        ),
        def(
            "pow",
            Scalar,
            "Returns the value of a base raised to the power of an exponent.",
            vec![sig(vec![p("base", P::Number), p("exponent", P::Number)], fixed(F::Double))],
        ),
        def("pi", Scalar, "Returns Pi.", vec![sig(vec![], fixed(F::Double))]),
        def("e", Scalar, "Returns Euler's number.", vec![sig(vec![], fixed(F::Double))]),
        def(
            "greatest",
            Scalar,
            "Returns the maximum value from multiple columns.",
            vec![variadic(vec![p("first", P::COMPARABLE)], ReturnType::SameAs(0))],
        ),
        def(
            "least",
            Scalar,
            "Returns the minimum value from multiple columns.",
            vec![variadic(vec![p("first", P::COMPARABLE)], ReturnType::SameAs(0))],
        ),
        def(
            "concat",
            Scalar,
            "Concatenates two or more strings.",
            vec![variadic(vec![p("first", P::String), p("rest", P::String)], fixed(F::Keyword))],
        ),
        def(
            "length",
            Scalar,
            "Returns the character length of a string.",
            vec![sig(vec![p("string", P::String)], fixed(F::Integer))],
        ),
        string_unary("to_lower", "Returns a new string converted to lower case."),
        string_unary("to_upper", "Returns a new string converted to upper case."),
        string_unary("trim", "Removes leading and trailing whitespaces from a string."),
        string_unary("ltrim", "Removes leading whitespaces from a string."),
        string_unary("rtrim", "Removes trailing whitespaces from a string."),
        string_unary("reverse", "Returns a new string representing the input string in reverse order."),
        def(
            "substring",
            Scalar,
            "Returns a substring of a string, specified by a start position and an optional length.",
            vec![sig(
                vec![
                    p("string", P::String),
                    p("start", P::Exact(F::Integer)),
                    opt("length", P::Exact(F::Integer)),
                ],
                fixed(F::Keyword),
            )],
        ),
        def(
            "left",
            Scalar,
            "Returns the substring that extracts length chars from string starting from the left.",
            vec![sig(vec![p("string", P::String), p("length", P::Exact(F::Integer))], fixed(F::Keyword))],
        ),
        def(
            "right",
            Scalar,
            "Return the substring that extracts length chars from str starting from the right.",
            vec![sig(vec![p("string", P::String), p("length", P::Exact(F::Integer))], fixed(F::Keyword))],
        ),
        def(
            "replace",
            Scalar,
            "Replaces any match of the regular expression regex in string with newString.",
            vec![sig(
                vec![p("string", P::String), p("regex", P::String), p("newString", P::String)],
                fixed(F::Keyword),
            )],
        ),
        def(
            "starts_with",
            Scalar,
            "Returns a boolean that indicates whether a keyword string starts with another string.",
            vec![sig(vec![p("str", P::String), p("prefix", P::String)], fixed(F::Boolean))],
        ),
        def(
            "ends_with",
            Scalar,
            "Returns a boolean that indicates whether a keyword string ends with another string.",
            vec![sig(vec![p("str", P::String), p("suffix", P::String)], fixed(F::Boolean))],
        ),
        def(
            "split",
            Scalar,
            "Split a single valued string into multiple strings.",
            vec![sig(vec![p("string", P::String), p("delim", P::String)], fixed(F::Keyword))],
        ),
        def(
            "locate",
            Scalar,
            "Returns an integer that indicates the position of a keyword substring within another string.",
            vec![sig(
                vec![p("string", P::String), p("substring", P::String), opt("start", P::Exact(F::Integer))],
                fixed(F::Integer),
            )],
        ),
        def(
            "repeat",
            Scalar,
            "Returns a string constructed by concatenating string with itself the specified number of times.",
            vec![sig(vec![p("string", P::String), p("number", P::Exact(F::Integer))], fixed(F::Keyword))],
        ),
        def("now", Scalar, "Returns current date and time.", vec![sig(vec![], fixed(F::Date))]),
        def(
            "date_extract",
            Scalar,
            "Extracts parts of a date, like year, month, day, hour.",
            vec![sig(
                vec![one_of(p("datePart", P::String), DATE_PARTS), p("date", P::Date)],
                fixed(F::Long),
            )],
        ),
        def(
            "date_format",
            Scalar,
            "Returns a string representation of a date, in the provided format.",
            vec![
                sig(vec![p("date", P::Date)], fixed(F::Keyword)),
                sig(vec![constant(p("dateFormat", P::String)), p("date", P::Date)], fixed(F::Keyword)),
            ],
        ),
        def(
            "date_parse",
            Scalar,
            "Returns a date by parsing the second argument using the format specified in the first argument.",
            vec![
                sig(vec![p("dateString", P::String)], fixed(F::Date)),
                sig(vec![constant(p("datePattern", P::String)), p("dateString", P::String)], fixed(F::Date)),
            ],
        ),
        def(
            "date_trunc",
            Scalar,
            "Rounds down a date to the closest interval.",
            vec![sig(vec![constant(p("interval", P::Interval)), p("date", P::Date)], ReturnType::SameAs(1))],
        ),
        def(
            "date_diff",
            Scalar,
            "Subtracts the startTimestamp from the endTimestamp and returns the difference in multiples of unit.",
            vec![sig(
                vec![
                    one_of(p("unit", P::String), DATE_DIFF_UNITS),
                    p("startTimestamp", P::Date),
                    p("endTimestamp", P::Date),
                ],
                fixed(F::Integer),
            )],
        ),
        conversion("to_string", F::Keyword),
        conversion("to_integer", F::Integer),
        conversion("to_long", F::Long),
        conversion("to_unsigned_long", F::UnsignedLong),
        conversion("to_double", F::Double),
        conversion("to_boolean", F::Boolean),
        conversion("to_datetime", F::Date),
        conversion("to_date_nanos", F::DateNanos),
        conversion("to_ip", F::Ip),
        conversion("to_version", F::Version),
        conversion("to_geopoint", F::GeoPoint),
        conversion("to_geoshape", F::GeoShape),
        conversion("to_cartesianpoint", F::CartesianPoint),
        conversion("to_cartesianshape", F::CartesianShape),
        mv("mv_avg", P::Number, fixed(F::Double), "Converts a multivalued field into a single valued field containing the average of all of the values."),
        mv("mv_count", P::Any, fixed(F::Integer), "Converts a multivalued expression into a single valued column containing a count of the number of values."),
        mv("mv_dedupe", P::Any, ReturnType::SameAs(0), "Remove duplicate values from a multivalued field."),
        mv("mv_first", P::Any, ReturnType::SameAs(0), "Returns the first value of a multivalued field."),
        mv("mv_last", P::Any, ReturnType::SameAs(0), "Returns the last value of a multivalued field."),
        mv("mv_max", P::COMPARABLE, ReturnType::SameAs(0), "Returns the maximum value of a multivalued field."),
        mv("mv_min", P::COMPARABLE, ReturnType::SameAs(0), "Returns the minimum value of a multivalued field."),
        mv("mv_sum", P::Number, ReturnType::SameAs(0), "Returns the sum of all values of a multivalued field."),
        mv("mv_median", P::Number, ReturnType::SameAs(0), "Returns the median of all values of a multivalued field."),
        def(
            "mv_concat",
            Scalar,
            "Converts a multivalued string expression into a single valued column containing the concatenation of all values separated by a delimiter.",
            vec![sig(vec![p("string", P::String), p("delim", P::String)], fixed(F::Keyword))],
        ),
        def(
            "mv_sort",
            Scalar,
            "Sorts a multivalued field in lexicographical order.",
            vec![sig(
                vec![p("field", P::COMPARABLE), one_of(opt("order", P::String), SORT_ORDERS)],
                ReturnType::SameAs(0),
            )],
        ),
        def(
            "mv_slice",
            Scalar,
            "Returns a subset of the multivalued field using the start and end index values.",
            vec![sig(
                vec![p("field", P::Any), p("start", P::Exact(F::Integer)), opt("end", P::Exact(F::Integer))],
                ReturnType::SameAs(0),
            )],
        ),
        def(
            "cidr_match",
            Scalar,
            "Returns true if the provided IP is contained in one of the provided CIDR blocks.",
            vec![variadic(vec![p("ip", P::Exact(F::Ip)), p("blockX", P::String)], fixed(F::Boolean))],
        ),
        def(
            "ip_prefix",
            Scalar,
            "Truncates an IP to a given prefix length.",
            vec![sig(
                vec![
                    p("ip", P::Exact(F::Ip)),
                    p("prefixLengthV4", P::Exact(F::Integer)),
                    p("prefixLengthV6", P::Exact(F::Integer)),
                ],
                fixed(F::Ip),
            )],
        ),
        def(
            "st_distance",
            Scalar,
            "Computes the distance between two points.",
            vec![sig(vec![p("geomA", P::Point), p("geomB", P::Point)], fixed(F::Double))],
        ),
        spatial_relation("st_intersects", "Returns true if two geometries intersect."),
        spatial_relation("st_disjoint", "Returns whether the two geometries or geometry columns are disjoint."),
        spatial_relation("st_contains", "Returns whether the first geometry contains the second geometry."),
        spatial_relation("st_within", "Returns whether the first geometry is within the second geometry."),
        def(
            "st_x",
            Scalar,
            "Extracts the x coordinate from the supplied point.",
            vec![sig(vec![p("point", P::Point)], fixed(F::Double))],
        ),
        def(
            "st_y",
            Scalar,
            "Extracts the y coordinate from the supplied point.",
            vec![sig(vec![p("point", P::Point)], fixed(F::Double))],
        ),
        def(
            "case",
            Scalar,
            "Accepts pairs of conditions and values and returns the value of the first true condition.",
            vec![variadic(
                vec![p("condition", P::Exact(F::Boolean)), p("trueValue", P::Any), opt("elseValue", P::Any)],
                ReturnType::SameAs(1),
            )],
        ),
        def(
            "coalesce",
            Scalar,
            "Returns the first of its arguments that is not null.",
            vec![variadic(vec![p("first", P::Any), opt("rest", P::Any)], ReturnType::SameAs(0))],
        ),
        def(
            "md5",
            Scalar,
            "Computes the MD5 hash of the input.",
            vec![sig(vec![p("input", P::String)], fixed(F::Keyword))],
        ),
        def(
            "sha256",
            Scalar,
            "Computes the SHA256 hash of the input.",
            vec![sig(vec![p("input", P::String)], fixed(F::Keyword))],
        ),
    ]
}
