use xml_builder::XMLElement;

use crate::error::TdsGeneratorError;

/// A single column of the data source and its schema rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub role: String,
    pub field_type: String,
    pub datatype: String,
    pub semantic_role: Option<String>,
    pub hidden: bool,
    pub description: Option<String>,
    pub default_format: Option<String>,
}

impl Column {
    pub fn new(name: &str) -> Self {
        Column {
            name: name.to_string(),
            role: "dimension".to_string(),
            field_type: "nominal".to_string(),
            datatype: "string".to_string(),
            semantic_role: None,
            hidden: false,
            description: None,
            default_format: None,
        }
    }

    /// Gets the name in its referencable form
    pub fn get_name(&self) -> String {
        format!("[{}]", self.name)
    }

    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        let mut element = self.base_element();
        if let Some(description) = self.description_element()? {
            element.add_child(description)?;
        }
        Ok(element)
    }

    pub(crate) fn base_element(&self) -> XMLElement {
        let mut element = XMLElement::new("column");
        element.add_attribute("datatype", &self.datatype);
        element.add_attribute("name", &self.get_name());
        element.add_attribute("role", &self.role);
        element.add_attribute("type", &self.field_type);
        if let Some(semantic_role) = &self.semantic_role {
            element.add_attribute("semantic-role", semantic_role);
        }
        if self.hidden {
            element.add_attribute("hidden", "true");
        }
        if let Some(default_format) = &self.default_format {
            element.add_attribute("default-format", default_format);
        }
        element
    }

    pub(crate) fn description_element(&self) -> Result<Option<XMLElement>, TdsGeneratorError> {
        let Some(description) = &self.description else {
            return Ok(None);
        };
        if description.is_empty() {
            return Ok(None);
        }
        let mut desc = XMLElement::new("desc");
        let mut formatted_text = XMLElement::new("formatted-text");
        let mut run = XMLElement::new("run");
        run.add_text(description.clone())?;
        formatted_text.add_child(run)?;
        desc.add_child(formatted_text)?;
        Ok(Some(desc))
    }
}

impl Default for Column {
    fn default() -> Self {
        Column::new("field")
    }
}

/// A column whose value is defined by a formula rather than read from the data.
#[derive(Debug, Clone)]
pub struct CalculatedColumn {
    pub column: Column,
    pub caption: String,
    pub formula: String,
}

impl CalculatedColumn {
    pub fn new(name: &str, formula: &str) -> Self {
        let mut column = Column::new(name);
        column.role = "measure".to_string();
        column.field_type = "quantitative".to_string();
        column.datatype = "real".to_string();
        CalculatedColumn {
            column,
            caption: name.to_string(),
            formula: formula.to_string(),
        }
    }

    /// The calculation element must be the first child of the column.
    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        let mut element = self.column.base_element();
        element.add_attribute("caption", &self.caption);
        let mut calculation = XMLElement::new("calculation");
        calculation.add_attribute("formula", &self.formula);
        calculation.add_attribute("class", "tableau");
        element.add_child(calculation)?;
        if let Some(description) = self.column.description_element()? {
            element.add_child(description)?;
        }
        Ok(element)
    }
}

impl Default for CalculatedColumn {
    fn default() -> Self {
        CalculatedColumn::new("calculation", "")
    }
}
