// <_.fcp.SchemaViewerObjectModel.false...folder name='Shipping' role='dimensions'>
//   <folder-item name='[Ship Date]' type='field' />
//   <folder-item name='[Ship Mode]' type='field' />
// </_.fcp.SchemaViewerObjectModel.false...folder>

use xml_builder::XMLElement;

use crate::error::TdsGeneratorError;

const FOLDER_ELEMENT: &str = "_.fcp.SchemaViewerObjectModel.false...folder";
const FOLDERS_COMMON_ELEMENT: &str = "_.fcp.SchemaViewerObjectModel.true...folders-common";

pub const FIELD_ITEM: &str = "field";
pub const DRILL_PATH_ITEM: &str = "drillpath";

fn bracketed(name: &str) -> String {
    if name.starts_with('[') && name.ends_with(']') {
        name.to_string()
    } else {
        format!("[{}]", name)
    }
}

/// A single entry of a folder, a field or a drill path.
#[derive(Debug, Clone)]
pub struct FolderItem {
    pub name: String,
    pub item_type: String,
}

impl FolderItem {
    pub fn new(name: &str, item_type: &str) -> Self {
        FolderItem {
            name: name.to_string(),
            item_type: item_type.to_string(),
        }
    }

    pub fn field(name: &str) -> Self {
        FolderItem::new(name, FIELD_ITEM)
    }

    fn to_xml(&self) -> XMLElement {
        let mut element = XMLElement::new("folder-item");
        element.add_attribute("name", &bracketed(&self.name));
        element.add_attribute("type", &self.item_type);
        element
    }
}

impl From<&str> for FolderItem {
    fn from(name: &str) -> Self {
        FolderItem::field(name)
    }
}

impl From<String> for FolderItem {
    fn from(name: String) -> Self {
        FolderItem::field(&name)
    }
}

/// A named grouping of fields for the schema viewer.
#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub role: String,
    folder_items: Vec<FolderItem>,
}

impl Folder {
    pub fn new(name: &str) -> Self {
        Folder {
            name: name.to_string(),
            role: "dimensions".to_string(),
            folder_items: vec![],
        }
    }

    pub fn add_field(&mut self, field_name: &str) {
        self.folder_items.push(FolderItem::field(field_name));
    }

    pub fn add_item(&mut self, item: FolderItem) {
        self.folder_items.push(item);
    }

    pub fn items(&self) -> &[FolderItem] {
        &self.folder_items
    }

    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        let mut element = XMLElement::new(FOLDER_ELEMENT);
        element.add_attribute("name", &self.name);
        element.add_attribute("role", &self.role);
        for item in &self.folder_items {
            element.add_child(item.to_xml())?;
        }
        Ok(element)
    }
}

/// The folders of a document.
///
/// The document carries two folder regions: one element per folder, and a
/// combined folders-common block repeating every folder's items. This type
/// renders the combined block; `Folder` renders the per-folder elements.
#[derive(Debug, Default)]
pub struct Folders {
    folders: Vec<Folder>,
}

impl Folders {
    pub fn new() -> Self {
        Folders { folders: vec![] }
    }

    pub fn append(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn to_xml(&self) -> Result<XMLElement, TdsGeneratorError> {
        let mut element = XMLElement::new(FOLDERS_COMMON_ELEMENT);
        for folder in &self.folders {
            let mut folder_element = XMLElement::new("folder");
            folder_element.add_attribute("name", &folder.name);
            for item in folder.items() {
                folder_element.add_child(item.to_xml())?;
            }
            element.add_child(folder_element)?;
        }
        Ok(element)
    }
}
