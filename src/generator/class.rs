//! Generation of one C# table class per workbook.
use crate::error::TableError;
use crate::generator::{
    class_name, title_case, write_prelude, write_source, CLASS_PREFIX, INDENT1, INDENT2, INDENT3,
    INDENT4,
};
use crate::schema::types::{ArrayElement, ArraySchema, ScalarType, TargetType};
use crate::schema::{read_schema, ColumnSchema};
use crate::spreadsheet::Workbook;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Name of the static dictionary keyed by row id.
const DATA_MAP: &str = "_dataMap";
/// Name of the cached list of all rows.
const DATA_LIST: &str = "_dataList";
/// Property the id accessor reads.
const ID_PROPERTY: &str = "ID";

/// How a property is typed and loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Converted from the cell at the column index
    Scalar(TargetType),
    /// `arr<...>` column: a list of the named nested record
    Array(String),
}

/// A property of the generated table class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub index: usize,
    pub description: String,
    pub kind: PropertyKind,
}

/// Nested record type generated for an `arr<...>` column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayRecord {
    pub name: String,
    pub elements: Vec<ArrayElement>,
}

/// Body of the generated `GetId()` accessor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdAccessor {
    /// `ID` is an `int` property
    Direct,
    /// `ID` exists with another type and is converted at runtime.
    /// Non-int ids are coerced with `Convert.ToInt32` instead of rejected.
    Converted,
    /// No `ID` property; the accessor throws when called
    Missing,
}

/// Generated table class, built from the client-visible schema columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableClass {
    pub name: String,
    pub properties: Vec<Property>,
    pub records: Vec<ArrayRecord>,
}

impl TableClass {
    /// Builds the class model from already filtered columns.
    pub fn from_columns(name: &str, columns: &[ColumnSchema]) -> Self {
        let mut properties = Vec::with_capacity(columns.len());
        let mut records = Vec::new();
        for column in columns {
            let property_name = title_case(&column.name);
            let kind = match ArraySchema::parse(&column.declared_type) {
                Some(schema) => {
                    let record_name = format!("{CLASS_PREFIX}{property_name}");
                    records.push(ArrayRecord {
                        name: record_name.clone(),
                        elements: schema.elements,
                    });
                    PropertyKind::Array(record_name)
                }
                None => PropertyKind::Scalar(column.target_type()),
            };
            properties.push(Property {
                name: property_name,
                index: column.index,
                description: column.description.clone(),
                kind,
            });
        }
        Self {
            name: name.to_owned(),
            properties,
            records,
        }
    }

    /// Picks the id accessor from the properties the class defines.
    pub fn id_accessor(&self) -> IdAccessor {
        let id = self
            .properties
            .iter()
            .find(|property| property.name == ID_PROPERTY);
        match id.map(|property| &property.kind) {
            Some(PropertyKind::Scalar(target)) if target.is_scalar(ScalarType::Int) => IdAccessor::Direct,
            Some(_) => IdAccessor::Converted,
            None => IdAccessor::Missing,
        }
    }

    /// Renders the complete source file.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut output = String::new();
        write_prelude(&mut output)?;
        self.write_class(&mut output)?;
        if !self.records.is_empty() {
            writeln!(output)?;
            for record in &self.records {
                record.write(&mut output)?;
            }
        }
        writeln!(output, "}}")?;
        Ok(output)
    }

    fn write_class(&self, output: &mut String) -> std::fmt::Result {
        let name = &self.name;
        writeln!(output, "{INDENT1}public partial class {name} : ITable")?;
        writeln!(output, "{INDENT1}{{")?;
        writeln!(
            output,
            "{INDENT2}private static readonly Dictionary<int, {name}> {DATA_MAP} = new Dictionary<int, {name}>();"
        )?;
        writeln!(output, "{INDENT2}private static List<{name}> {DATA_LIST};")?;
        writeln!(output)?;

        for property in &self.properties {
            if !property.description.is_empty() {
                writeln!(output, "{INDENT2}/// <summary>")?;
                writeln!(output, "{INDENT2}/// {}", property.description)?;
                writeln!(output, "{INDENT2}/// </summary>")?;
            }
            let property_type = match &property.kind {
                PropertyKind::Scalar(target) => target.to_string(),
                PropertyKind::Array(record) => format!("List<{record}>"),
            };
            writeln!(output, "{INDENT2}public {property_type} {} {{ get; set; }}", property.name)?;
        }

        writeln!(output)?;
        writeln!(output, "{INDENT2}public static {name} GetById(int id)")?;
        writeln!(output, "{INDENT2}{{")?;
        writeln!(output, "{INDENT3}if ({DATA_MAP}.TryGetValue(id, out var value))")?;
        writeln!(output, "{INDENT3}{{")?;
        writeln!(output, "{INDENT4}return value;")?;
        writeln!(output, "{INDENT3}}}")?;
        writeln!(output, "{INDENT3}return null;")?;
        writeln!(output, "{INDENT2}}}")?;

        writeln!(output)?;
        writeln!(output, "{INDENT2}public static List<{name}> GetAll()")?;
        writeln!(output, "{INDENT2}{{")?;
        writeln!(output, "{INDENT3}if ({DATA_LIST} == null)")?;
        writeln!(output, "{INDENT3}{{")?;
        writeln!(output, "{INDENT4}{DATA_LIST} = new List<{name}>({DATA_MAP}.Values);")?;
        writeln!(output, "{INDENT3}}}")?;
        writeln!(output, "{INDENT3}return {DATA_LIST};")?;
        writeln!(output, "{INDENT2}}}")?;

        writeln!(output)?;
        writeln!(output, "{INDENT2}public void Load(string[] data)")?;
        writeln!(output, "{INDENT2}{{")?;
        for property in &self.properties {
            let index = property.index;
            match &property.kind {
                PropertyKind::Scalar(target) => writeln!(
                    output,
                    "{INDENT3}this.{} = ConvertUtils.Get<{target}>(data[{index}]);",
                    property.name
                )?,
                PropertyKind::Array(record) => writeln!(
                    output,
                    "{INDENT3}this.{} = ConvertUtils.LoadArr<{record}>(data[{index}]);",
                    property.name
                )?,
            }
        }
        writeln!(output, "{INDENT2}}}")?;

        writeln!(output)?;
        write_id_accessor(output, name, &self.id_accessor())?;
        writeln!(output, "{INDENT1}}}")?;
        writeln!(output)
    }
}

impl ArrayRecord {
    fn write(&self, output: &mut String) -> std::fmt::Result {
        writeln!(output, "{INDENT1}public partial class {} : ITable", self.name)?;
        writeln!(output, "{INDENT1}{{")?;
        for (position, element) in self.elements.iter().enumerate() {
            writeln!(output, "{INDENT2}public {} Args{position};", element.field_type())?;
        }

        writeln!(output)?;
        writeln!(output, "{INDENT2}public void Load(string[] data)")?;
        writeln!(output, "{INDENT2}{{")?;
        for (position, element) in self.elements.iter().enumerate() {
            match element {
                // Slices collect from the whole row, not from one cell
                ArrayElement::Slice(target) => writeln!(
                    output,
                    "{INDENT3}this.Args{position} = ConvertUtils.GetList<{target}>(data);"
                )?,
                ArrayElement::Scalar(target) => writeln!(
                    output,
                    "{INDENT3}this.Args{position} = ConvertUtils.Get<{target}>(data[{position}]);"
                )?,
            }
        }
        writeln!(output, "{INDENT2}}}")?;

        writeln!(output)?;
        write_id_accessor(output, &self.name, &IdAccessor::Missing)?;
        writeln!(output, "{INDENT1}}}")?;
        writeln!(output)
    }
}

fn write_id_accessor(output: &mut String, class_name: &str, accessor: &IdAccessor) -> std::fmt::Result {
    writeln!(output, "{INDENT2}public int GetId()")?;
    writeln!(output, "{INDENT2}{{")?;
    match accessor {
        IdAccessor::Direct => writeln!(output, "{INDENT3}return this.{ID_PROPERTY};")?,
        IdAccessor::Converted => {
            writeln!(output, "{INDENT3}return Convert.ToInt32(this.{ID_PROPERTY});")?
        }
        IdAccessor::Missing => writeln!(
            output,
            "{INDENT3}throw new Exception(\"{class_name} does not define an {ID_PROPERTY} property\");"
        )?,
    }
    writeln!(output, "{INDENT2}}}")
}

/// Generates the table class for a workbook and writes it to `output_path`.
///
/// # Returns
///
/// * `Result<String, TableError>` - The generated class name
///
/// # Errors
///
/// Fails with a workbook error when there are fewer than two sheets, with a
/// schema error when the schema sheet has fewer than four rows, and with an
/// I/O error when the file cannot be written. Nothing is written on failure.
pub fn generate_class<W>(workbook: &mut W, table_name: &str, output_path: &Path) -> Result<String, TableError>
where
    W: Workbook + ?Sized,
{
    let columns = read_schema(workbook)?;
    let class = TableClass::from_columns(&class_name(table_name), &columns);
    let source = class.render()?;
    write_source(output_path, &source)?;
    info!(class = %class.name, path = %output_path.display(), "Generated table class");
    Ok(class.name)
}
