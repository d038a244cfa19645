//! Generation of the aggregate `TableDataLoader` class.
use crate::error::TableError;
use crate::generator::{write_prelude, write_source, CLASS_PREFIX, INDENT1, INDENT2, INDENT3};
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Name of the generated loader class.
pub const LOADER_CLASS: &str = "TableDataLoader";

/// Awaitable type used by the generated loader.
const ASYNC_OPERATION: &str = "Task";

/// Logical table name passed to a class's `LoadAll`: the class name minus the prefix.
///
/// Names no longer than the prefix are passed through unchanged.
pub fn table_name(class_name: &str) -> &str {
    match class_name.get(CLASS_PREFIX.len()..) {
        Some(name) if !name.is_empty() => name,
        _ => class_name,
    }
}

/// Renders the loader source for the given classes, in order.
pub fn render_loader(class_names: &[String]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    write_prelude(&mut output)?;
    writeln!(output, "{INDENT1}public class {LOADER_CLASS}")?;
    writeln!(output, "{INDENT1}{{")?;
    writeln!(output, "{INDENT2}public static async {ASYNC_OPERATION} LoadAll()")?;
    writeln!(output, "{INDENT2}{{")?;
    writeln!(output, "{INDENT3}List<{ASYNC_OPERATION}> tasks = new();")?;
    for class_name in class_names {
        writeln!(
            output,
            "{INDENT3}tasks.Add({class_name}.LoadAll(\"{}\"));",
            table_name(class_name)
        )?;
    }
    writeln!(output, "{INDENT3}await {ASYNC_OPERATION}.WhenAll(tasks);")?;
    writeln!(output, "{INDENT2}}}")?;
    writeln!(output, "{INDENT1}}}")?;
    writeln!(output, "}}")?;
    Ok(output)
}

/// Writes `TableDataLoader.cs` into `output_dir`, replacing any previous file.
pub fn generate_loader(output_dir: &Path, class_names: &[String]) -> Result<(), TableError> {
    let source = render_loader(class_names)?;
    let path = output_dir.join(format!("{LOADER_CLASS}.{}", super::SOURCE_EXTENSION));
    write_source(&path, &source)?;
    info!(path = %path.display(), tables = class_names.len(), "Generated table loader");
    Ok(())
}
