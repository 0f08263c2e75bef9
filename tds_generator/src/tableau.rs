use std::fs;
use std::path::Path;

use xml_builder::{XMLBuilder, XMLElement, XMLVersion};

use crate::column::{CalculatedColumn, Column};
use crate::connection::{CSV_CLASS, Federation, SourceKind};
use crate::error::TdsGeneratorError;
use crate::folder::{Folder, FolderItem, Folders};
use crate::hierarchy::Hierarchy;
use crate::metadata;

/// A field registered in the document, plain or calculated.
#[derive(Debug, Clone)]
pub enum Field {
    Column(Column),
    Calculated(CalculatedColumn),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Column(column) => &column.name,
            Field::Calculated(calculated) => &calculated.column.name,
        }
    }

    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        match self {
            Field::Column(column) => column.to_xml(),
            Field::Calculated(calculated) => calculated.to_xml(),
        }
    }
}

/// The data source document under assembly.
///
/// Owns the field list, the hierarchies and the folder set, and renders
/// the complete document. Fields appear in the rendered document in
/// insertion order.
pub struct Tableau {
    pub name: String,
    connection: Option<Federation>,
    columns: Vec<Field>,
    hierarchies: Vec<Hierarchy>,
    folders: Folders,
}

impl Tableau {
    pub fn new(name: &str) -> Self {
        Tableau {
            name: name.to_string(),
            connection: None,
            columns: vec![],
            hierarchies: vec![],
            folders: Folders::new(),
        }
    }

    pub fn set_csv_location(&mut self, file_path: &Path) -> Result<(), TdsGeneratorError> {
        self.create_connection(file_path, None, None, SourceKind::Csv, false)
    }

    pub fn create_connection(
        &mut self,
        file_path: &Path,
        table_name: Option<&str>,
        schema_name: Option<&str>,
        kind: SourceKind,
        package: bool,
    ) -> Result<(), TdsGeneratorError> {
        let mut connection = Federation::new();
        match kind {
            SourceKind::Csv => connection.connect_to_csv(file_path, package)?,
            SourceKind::Excel => connection.connect_to_excel(file_path, table_name, package)?,
            SourceKind::Hyper => connection.connect_to_hyper(
                file_path,
                table_name,
                schema_name.unwrap_or("public"),
                package,
            )?,
        }
        self.connection = Some(connection);
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.columns
    }

    pub fn get_column_by_name(&self, name: &str) -> Option<&Field> {
        self.columns.iter().find(|field| field.name() == name)
    }

    /// Resolves the source hierarchy's members against the registered
    /// fields and appends the resulting drill path. Members that do not
    /// resolve are skipped.
    pub fn add_hierarchy(&mut self, hierarchy: &metadata::Hierarchy) {
        let mut members = vec![];
        for field_name in hierarchy.get_members() {
            if self.get_column_by_name(&field_name).is_some() {
                members.push(field_name);
            }
        }
        self.hierarchies
            .push(Hierarchy::new(&hierarchy.name, members));
    }

    pub fn add_folder<I>(&mut self, name: &str, members: I)
    where
        I: IntoIterator,
        I::Item: Into<FolderItem>,
    {
        let mut folder = Folder::new(name);
        for member in members {
            folder.add_item(member.into());
        }
        self.folders.append(folder);
    }

    pub fn hide_field(&mut self, name: &str) {
        let mut column = Column::new(name);
        column.hidden = true;
        self.columns.push(Field::Column(column));
    }

    /// Adds a hidden string dimension for every data column that has no
    /// descriptor yet, so only the described fields stay visible.
    ///
    /// Column discovery is only available for CSV sources; for other
    /// kinds the document is left unchanged.
    pub fn hide_other_fields(&mut self) -> Result<(), TdsGeneratorError> {
        let columns = {
            let federation = self.connection.as_ref().ok_or_else(|| {
                TdsGeneratorError::Configuration(
                    "no connection has been created for the document".to_string(),
                )
            })?;
            let Some(connection) = federation.connection() else {
                return Err(TdsGeneratorError::Configuration(
                    "No connection is available to render as XML".to_string(),
                ));
            };
            if connection.class_name() != CSV_CLASS {
                return Ok(());
            }
            connection.get_columns()?
        };
        for column in columns {
            if self.get_column_by_name(&column).is_none() {
                self.hide_field(&column);
            }
        }
        Ok(())
    }

    pub fn add_dimension(&mut self, name: &str, description: Option<&str>) {
        self.add_field(name, "string", "dimension", "nominal", description, None, None, None);
    }

    pub fn add_measure(&mut self, name: &str, description: Option<&str>) {
        self.add_field(name, "real", "measure", "quantitative", description, None, None, None);
    }

    /// Appends a field descriptor, calculated when a formula is given.
    ///
    /// Duplicate names are not rejected here; every descriptor added is
    /// emitted.
    pub fn add_field(
        &mut self,
        name: &str,
        datatype: &str,
        role: &str,
        field_type: &str,
        description: Option<&str>,
        semantic_role: Option<&str>,
        default_format: Option<&str>,
        formula: Option<&str>,
    ) {
        let mut column = Column::new(name);
        column.datatype = datatype.to_string();
        column.role = role.to_string();
        column.field_type = field_type.to_string();
        column.description = description.map(|text| text.to_string());
        column.semantic_role = semantic_role.map(|text| text.to_string());
        column.default_format = default_format.map(|text| text.to_string());
        match formula {
            None => self.columns.push(Field::Column(column)),
            Some(formula) => self.columns.push(Field::Calculated(CalculatedColumn {
                caption: column.name.clone(),
                formula: formula.to_string(),
                column,
            })),
        }
    }

    /// Renders the complete document.
    ///
    /// The top-level block order is fixed: format-change manifest,
    /// connection, fields, drill paths, folders, the folders-common
    /// region, layout. Tableau's reader is sensitive to this order.
    pub fn render(&self) -> Result<String, TdsGeneratorError> {
        let connection = self.connection.as_ref().ok_or_else(|| {
            TdsGeneratorError::Configuration(
                "No connection is available to render as XML".to_string(),
            )
        })?;

        let mut root = XMLElement::new("datasource");
        root.add_attribute("inline", "true");
        root.add_attribute("version", "18.1");
        root.add_attribute("source-platform", "win");
        root.add_attribute("formatted-name", &self.name);

        let mut manifest = XMLElement::new("document-format-change-manifest");
        manifest.add_child(XMLElement::new(
            "_.fcp.ObjectModelEncapsulateLegacy.true...ObjectModelEncapsulateLegacy",
        ))?;
        manifest.add_child(XMLElement::new(
            "_.fcp.ObjectModelTableType.true...ObjectModelTableType",
        ))?;
        manifest.add_child(XMLElement::new(
            "_.fcp.SchemaViewerObjectModel.true...SchemaViewerObjectModel",
        ))?;
        root.add_child(manifest)?;

        root.add_child(connection.to_xml()?)?;

        for field in &self.columns {
            root.add_child(field.to_xml()?)?;
        }

        if !self.hierarchies.is_empty() {
            let mut drill_paths = XMLElement::new("drill-paths");
            for hierarchy in &self.hierarchies {
                drill_paths.add_child(hierarchy.to_xml()?)?;
            }
            root.add_child(drill_paths)?;
        }

        for folder in self.folders.folders() {
            root.add_child(folder.to_xml()?)?;
        }
        root.add_child(self.folders.to_xml()?)?;

        let mut layout = XMLElement::new("layout");
        layout.add_attribute("show-structure", "false");
        layout.add_attribute("dim-ordering", "alphabetic");
        layout.add_attribute("measure-ordering", "alphabetic");
        root.add_child(layout)?;

        let mut xml = XMLBuilder::new()
            .version(XMLVersion::XML1_0)
            .encoding("UTF-8".into())
            .build();
        xml.set_root_element(root);

        let mut writer: Vec<u8> = Vec::new();
        xml.generate(&mut writer)?;

        String::from_utf8(writer).map_err(|err| TdsGeneratorError::Xml(err.to_string()))
    }

    pub fn save(&self, file_path: &Path) -> Result<(), TdsGeneratorError> {
        let document = self.render()?;
        fs::write(file_path, document)?;
        Ok(())
    }
}

impl Default for Tableau {
    fn default() -> Self {
        Tableau::new("data source")
    }
}
