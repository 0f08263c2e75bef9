use std::path::{Path, PathBuf};

use calamine::{Reader, open_workbook_auto};
use xml_builder::XMLElement;

use crate::error::TdsGeneratorError;

pub const EXCEL_CLASS: &str = "excel-direct";
pub const CSV_CLASS: &str = "textscan";
pub const HYPER_CLASS: &str = "hyper";

const PACKAGED_DIRECTORY: &str = "Data";

/// The kind of data file backing a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Excel,
    Hyper,
}

fn split_path(file_path: &Path) -> Result<(String, String), TdsGeneratorError> {
    let file_name = file_path
        .file_name()
        .ok_or_else(|| {
            TdsGeneratorError::Configuration(format!(
                "no file name in data file path {}",
                file_path.display()
            ))
        })?
        .to_string_lossy()
        .to_string();
    let directory = file_path
        .parent()
        .map(|parent| parent.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok((directory, file_name))
}

fn join_name(directory: &str, file_name: &str) -> String {
    if directory.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", directory, file_name)
    }
}

/// A physical connection to a single data file.
///
/// Construction is kind specific: every kind has its own table and
/// relation naming convention. When `package` is set the rendered path
/// points into the relative `Data` directory the archive will hold the
/// data file under, instead of the file's own directory.
#[derive(Debug, Clone)]
pub struct Connection {
    file_path: PathBuf,
    class_name: &'static str,
    table_name: String,
    schema_name: Option<String>,
    file_name: String,
    directory: String,
    dbname: Option<String>,
}

impl Connection {
    pub fn csv(file_path: &Path, package: bool) -> Result<Self, TdsGeneratorError> {
        let (directory, file_name) = split_path(file_path)?;
        let directory = if package {
            PACKAGED_DIRECTORY.to_string()
        } else {
            directory
        };
        Ok(Connection {
            file_path: file_path.to_path_buf(),
            class_name: CSV_CLASS,
            table_name: file_name.replace('.', "#"),
            schema_name: None,
            file_name,
            directory,
            dbname: None,
        })
    }

    pub fn excel(
        file_path: &Path,
        sheet_name: Option<&str>,
        package: bool,
    ) -> Result<Self, TdsGeneratorError> {
        let sheet_name = sheet_name.ok_or_else(|| {
            TdsGeneratorError::Configuration("No sheet name has been specified".to_string())
        })?;
        let (directory, file_name) = split_path(file_path)?;
        let directory = if package {
            PACKAGED_DIRECTORY.to_string()
        } else {
            directory
        };
        let file_name = join_name(&directory, &file_name);
        Ok(Connection {
            file_path: file_path.to_path_buf(),
            class_name: EXCEL_CLASS,
            table_name: sheet_name.to_string(),
            schema_name: None,
            file_name,
            directory,
            dbname: None,
        })
    }

    pub fn hyper(
        file_path: &Path,
        table_name: Option<&str>,
        schema_name: &str,
        package: bool,
    ) -> Result<Self, TdsGeneratorError> {
        let table_name = table_name.ok_or_else(|| {
            TdsGeneratorError::Configuration("No table name has been specified".to_string())
        })?;
        let (directory, file_name) = split_path(file_path)?;
        let directory = if package {
            PACKAGED_DIRECTORY.to_string()
        } else {
            directory
        };
        let file_name = join_name(&directory, &file_name);
        Ok(Connection {
            file_path: file_path.to_path_buf(),
            class_name: HYPER_CLASS,
            table_name: table_name.to_string(),
            schema_name: Some(schema_name.to_string()),
            dbname: Some(file_name.clone()),
            file_name,
            directory,
        })
    }

    pub fn class_name(&self) -> &str {
        self.class_name
    }

    /// The table reference, schema qualified for columnar sources.
    pub fn get_table_name(&self) -> String {
        if self.class_name == HYPER_CLASS {
            let schema = self.schema_name.as_deref().unwrap_or("public");
            format!("[{}].[{}]", schema, self.table_name)
        } else {
            format!("[{}]", self.table_name)
        }
    }

    pub fn get_relation_name(&self) -> String {
        match self.class_name {
            CSV_CLASS => format!("[{}]", self.file_name),
            HYPER_CLASS => self.table_name.clone(),
            _ => self.get_table_name(),
        }
    }

    /// Reads the ordered column names from the data file.
    ///
    /// Columnar files are not readable here; their schema comes from the
    /// columnar engine.
    pub fn get_columns(&self) -> Result<Vec<String>, TdsGeneratorError> {
        match self.class_name {
            CSV_CLASS => self.read_csv_headers(),
            EXCEL_CLASS => self.read_sheet_headers(),
            _ => Err(TdsGeneratorError::Configuration(
                "column discovery for columnar sources goes through the columnar engine"
                    .to_string(),
            )),
        }
    }

    fn read_csv_headers(&self) -> Result<Vec<String>, TdsGeneratorError> {
        let mut reader = csv::Reader::from_path(&self.file_path)?;
        let headers = reader.headers()?;
        Ok(headers.iter().map(|header| header.to_string()).collect())
    }

    fn read_sheet_headers(&self) -> Result<Vec<String>, TdsGeneratorError> {
        let mut workbook = open_workbook_auto(&self.file_path)
            .map_err(|err| TdsGeneratorError::Spreadsheet(err.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TdsGeneratorError::Spreadsheet("workbook has no sheets".to_string()))?
            .map_err(|err| TdsGeneratorError::Spreadsheet(err.to_string()))?;
        let Some(header_row) = range.rows().next() else {
            return Ok(vec![]);
        };
        Ok(header_row.iter().map(|cell| cell.to_string()).collect())
    }

    pub fn to_xml(&self) -> XMLElement {
        let mut element = XMLElement::new("connection");
        element.add_attribute("cleaning", "no");
        element.add_attribute("compat", "no");
        element.add_attribute("dataRefreshTime", "");
        element.add_attribute("filename", &self.file_name);
        element.add_attribute("interpretationMode", "0");
        element.add_attribute("password", "");
        element.add_attribute("server", "");
        element.add_attribute("validate", "no");
        element.add_attribute("directory", &self.directory);
        element.add_attribute("class", self.class_name);
        if let Some(dbname) = &self.dbname {
            element.add_attribute("dbname", dbname);
        }
        element
    }
}

/// The document-facing wrapper unifying the physical connection kinds.
///
/// A federation holds exactly one connection; rendering without one is a
/// configuration error.
#[derive(Debug, Clone)]
pub struct Federation {
    caption: String,
    name: String,
    connection: Option<Connection>,
}

impl Federation {
    pub fn new() -> Self {
        Federation {
            caption: "Data".to_string(),
            name: "connection".to_string(),
            connection: None,
        }
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    fn require_connection(&self) -> Result<&Connection, TdsGeneratorError> {
        self.connection.as_ref().ok_or_else(|| {
            TdsGeneratorError::Configuration(
                "No connection is available to render as XML".to_string(),
            )
        })
    }

    pub fn get_columns(&self) -> Result<Vec<String>, TdsGeneratorError> {
        self.require_connection()?.get_columns()
    }

    pub fn connect_to_csv(&mut self, csv_path: &Path, package: bool) -> Result<(), TdsGeneratorError> {
        self.connection = Some(Connection::csv(csv_path, package)?);
        Ok(())
    }

    pub fn connect_to_excel(
        &mut self,
        excel_path: &Path,
        sheet_name: Option<&str>,
        package: bool,
    ) -> Result<(), TdsGeneratorError> {
        let sheet_name = sheet_name.map(|name| format!("{}$", name));
        self.connection = Some(Connection::excel(excel_path, sheet_name.as_deref(), package)?);
        Ok(())
    }

    pub fn connect_to_hyper(
        &mut self,
        hyper_path: &Path,
        table_name: Option<&str>,
        schema_name: &str,
        package: bool,
    ) -> Result<(), TdsGeneratorError> {
        self.connection = Some(Connection::hyper(hyper_path, table_name, schema_name, package)?);
        Ok(())
    }

    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        let connection = self.require_connection()?;
        let mut element = XMLElement::new("connection");
        element.add_attribute("class", "federated");

        let mut named_connections = XMLElement::new("named-connections");
        let mut named_connection = XMLElement::new("named-connection");
        named_connection.add_attribute("caption", &self.caption);
        named_connection.add_attribute("name", &self.name);
        named_connection.add_child(connection.to_xml())?;
        named_connections.add_child(named_connection)?;
        element.add_child(named_connections)?;

        let mut relation = XMLElement::new("relation");
        relation.add_attribute("connection", &self.name);
        relation.add_attribute("name", &connection.get_relation_name());
        relation.add_attribute("table", &connection.get_table_name());
        relation.add_attribute("type", "table");
        element.add_child(relation)?;

        Ok(element)
    }
}

impl Default for Federation {
    fn default() -> Self {
        Federation::new()
    }
}
