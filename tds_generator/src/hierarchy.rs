use xml_builder::XMLElement;

use crate::error::TdsGeneratorError;

/// An ordered drill-down path of fields in the document.
///
/// Members are the resolved reference names of fields already registered
/// in the owning document, in final drill order.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub name: String,
    pub members: Vec<String>,
}

impl Hierarchy {
    pub fn new(name: &str, members: Vec<String>) -> Self {
        Hierarchy {
            name: name.to_string(),
            members,
        }
    }

    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        let mut element = XMLElement::new("drill-path");
        element.add_attribute("name", &self.name);
        for member in &self.members {
            let mut field = XMLElement::new("field");
            field.add_text(format!("[{}]", member))?;
            element.add_child(field)?;
        }
        Ok(element)
    }
}
