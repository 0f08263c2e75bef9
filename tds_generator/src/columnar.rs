use tracing::{error, warn};

use crate::error::TdsGeneratorError;

/// Access to a columnar analytic file, bound to one table.
///
/// Implementations wrap whatever engine can open the file; the crate
/// ships none. Validation failures are reported through the boolean
/// outcomes of the checks below, engine failures through errors.
pub trait ColumnarEngine {
    /// Ordered column names of the bound table.
    fn columns(&self) -> Result<Vec<String>, TdsGeneratorError>;

    /// The engine's type name for a column.
    fn column_type(&self, column: &str) -> Result<String, TdsGeneratorError>;

    /// Distinct values of a column, rendered as text.
    fn distinct_values(&self, column: &str) -> Result<Vec<String>, TdsGeneratorError>;

    /// Minimum and maximum values of a column, rendered as text.
    fn min_max(&self, column: &str) -> Result<(String, String), TdsGeneratorError>;

    /// Renames a column in place.
    fn rename_column(&mut self, from: &str, to: &str) -> Result<(), TdsGeneratorError>;

    /// Drops a column in place.
    fn drop_column(&mut self, column: &str) -> Result<(), TdsGeneratorError>;
}

/// Checks a column's type against the expected type name, `text` by default.
pub fn check_type(
    engine: &dyn ColumnarEngine,
    column_name: &str,
    expected_type: Option<&str>,
) -> Result<bool, TdsGeneratorError> {
    let expected = expected_type.unwrap_or("text");
    let actual = engine.column_type(column_name)?;
    if actual.eq_ignore_ascii_case(expected) {
        Ok(true)
    } else {
        error!(
            "validation error: '{}' is not the expected type ({}) for {}",
            actual.to_lowercase(),
            expected,
            column_name
        );
        Ok(false)
    }
}

/// Checks every data value of a column against a declared domain.
///
/// A data value outside the domain is an error; a declared value absent
/// from the data is only a warning. The asymmetry is deliberate.
pub fn check_domain(
    engine: &dyn ColumnarEngine,
    field: &str,
    domain: &[String],
) -> Result<bool, TdsGeneratorError> {
    let data_domain = engine.distinct_values(field)?;
    for value in &data_domain {
        if !domain.contains(value) {
            error!("validation error: '{}' is not in domain of {}", value, field);
            return Ok(false);
        }
    }
    for value in domain {
        if !data_domain.contains(value) {
            warn!("'{}' is not present in the data for {}", value, field);
        }
    }
    Ok(true)
}

/// Checks a column's data against declared minimum and maximum values.
pub fn check_range(
    engine: &dyn ColumnarEngine,
    field: &str,
    min_value: f64,
    max_value: f64,
) -> Result<bool, TdsGeneratorError> {
    let (min_data, max_data) = engine.min_max(field)?;
    let (Ok(min_data), Ok(max_data)) = (min_data.parse::<f64>(), max_data.parse::<f64>()) else {
        error!("range could not be checked for {}", field);
        return Ok(false);
    };
    if min_data < min_value || max_data > max_value {
        error!(
            "validation error: values out of range in data for {}; data: {} to {}; declared: {} to {}",
            field, min_data, max_data, min_value, max_value
        );
        return Ok(false);
    }
    Ok(true)
}

pub fn check_column_exists(
    engine: &dyn ColumnarEngine,
    column_name: &str,
) -> Result<bool, TdsGeneratorError> {
    Ok(engine.columns()?.iter().any(|column| column == column_name))
}

/// Drops every column of the bound table that is not in the keep list.
///
/// Column names carrying leading or trailing whitespace are renamed to
/// their trimmed form first, so the keep list matches on clean names.
pub fn subset_columns(
    engine: &mut dyn ColumnarEngine,
    columns_to_keep: &[String],
) -> Result<(), TdsGeneratorError> {
    let mut columns = vec![];
    for column in engine.columns()? {
        let trimmed = column.trim();
        if trimmed != column {
            engine.rename_column(&column, trimmed)?;
            warn!("found and fixed an invalid column name '{}'", column);
            columns.push(trimmed.to_string());
        } else {
            columns.push(column);
        }
    }

    for column in columns {
        if !columns_to_keep.contains(&column) {
            engine.drop_column(&column)?;
        }
    }
    Ok(())
}
