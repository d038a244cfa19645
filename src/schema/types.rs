//! Mapping of declared column types to C# type names.
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

/// Matches `arr<...>` declarations and captures the element list.
static ARRAY_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^arr<(.*)>$").expect("Hardcode regex pattern"));

/// Suffix turning a scalar type into a list type, e.g. `intslice`.
const SLICE_SUFFIX: &str = "slice";

/// Element type assumed when a slice token carries no base type.
const DEFAULT_SLICE_BASE: &str = "int";

/// Scalar types a column can declare.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScalarType {
    Int,
    Float,
    Double,
    String,
    Bool,
    Long,
    DateTime,
}

impl ScalarType {
    /// Returns the C# spelling of the type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Long => "long",
            Self::DateTime => "DateTime",
        }
    }

    /// Parses a declared scalar type name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            "long" => Some(Self::Long),
            "datetime" => Some(Self::DateTime),
            _ => None,
        }
    }
}

/// C# type a declared column type maps to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetType {
    Scalar(ScalarType),
    /// `List<T>` of the element type
    List(ScalarType),
}

impl TargetType {
    /// Maps a declared type name to its C# type.
    ///
    /// Lookup is case-insensitive over `int`, `float`, `double`, `string`,
    /// `bool`, `long`, `datetime` and their `<type>slice` list variants.
    /// Anything else maps to `string`; this never fails.
    pub fn parse(declared: &str) -> Self {
        let name = declared.to_ascii_lowercase();
        if let Some(scalar) = ScalarType::parse(&name) {
            return Self::Scalar(scalar);
        }
        name.strip_suffix(SLICE_SUFFIX)
            .and_then(ScalarType::parse)
            .map(Self::List)
            .unwrap_or(Self::Scalar(ScalarType::String))
    }

    pub fn is_scalar(&self, scalar: ScalarType) -> bool {
        *self == Self::Scalar(scalar)
    }
}

impl Display for TargetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(scalar) => f.write_str(scalar.as_str()),
            Self::List(element) => write!(f, "List<{}>", element.as_str()),
        }
    }
}

/// Shorthand for [`TargetType::parse`].
pub fn map_type(declared: &str) -> TargetType {
    TargetType::parse(declared)
}

/// Returns true when the declared type has the form `arr<...>` (case-insensitive).
pub fn is_array_type(declared: &str) -> bool {
    ARRAY_TYPE.is_match(declared)
}

/// One positional field of an `arr<...>` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayElement {
    /// Read from the cell at the field's own position
    Scalar(TargetType),
    /// `<type>slice`: a list built by scanning the whole row
    Slice(TargetType),
}

impl ArrayElement {
    /// C# type of the generated field.
    pub fn field_type(&self) -> String {
        match self {
            Self::Scalar(target) => target.to_string(),
            Self::Slice(target) => format!("List<{target}>"),
        }
    }
}

/// Decomposition of an `arr<t1,t2,...>` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArraySchema {
    pub elements: Vec<ArrayElement>,
}

impl ArraySchema {
    /// Splits the payload of an `arr<...>` declaration into its elements.
    ///
    /// Returns `None` when the declaration is not an array type. Tokens are
    /// trimmed; a token ending in `slice` becomes a list element whose base
    /// type defaults to `int` when nothing precedes the suffix.
    pub fn parse(declared: &str) -> Option<Self> {
        let captures = ARRAY_TYPE.captures(declared)?;
        let payload = captures.get(1).map(|matcher| matcher.as_str()).unwrap_or("");
        let elements = payload
            .split(',')
            .map(str::trim)
            .map(|token| match token.strip_suffix(SLICE_SUFFIX) {
                Some(base) => {
                    let base = base.trim();
                    let base = if base.is_empty() { DEFAULT_SLICE_BASE } else { base };
                    ArrayElement::Slice(map_type(base))
                }
                None => ArrayElement::Scalar(map_type(token)),
            })
            .collect();
        Some(Self { elements })
    }
}
