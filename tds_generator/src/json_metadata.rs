use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::TdsGeneratorError;
use crate::metadata::{
    DEFAULT_COLLECTION, HierarchyItem, MetadataRepository, Repository, RepositoryItem,
};

/// A metadata repository read from a JSON file.
///
/// The file must contain a `collection` object with an `items` array.
/// Each item carries a `name` and a `description` and may carry `groups`,
/// `formula`, `default_format`, `semantic_role`, `domain`, `range`,
/// `hierarchies` and `physical_column_name`. Items are registered in the
/// default collection and, when the collection declares a name of its
/// own, in that collection as well.
#[derive(Debug)]
pub struct JsonRepository {
    repository: Repository,
}

#[derive(Deserialize)]
struct RepositoryFile {
    collection: CollectionFile,
}

#[derive(Deserialize)]
struct CollectionFile {
    name: Option<String>,
    items: Vec<ItemFile>,
}

#[derive(Deserialize)]
struct ItemFile {
    name: String,
    description: String,
    #[serde(default)]
    groups: Option<Vec<String>>,
    #[serde(default)]
    formula: Option<String>,
    #[serde(default)]
    default_format: Option<String>,
    #[serde(default)]
    semantic_role: Option<String>,
    #[serde(default)]
    domain: Option<Vec<Value>>,
    #[serde(default)]
    range: Option<(f64, f64)>,
    #[serde(default)]
    hierarchies: Vec<MembershipFile>,
    #[serde(default)]
    physical_column_name: Option<String>,
}

#[derive(Deserialize)]
struct MembershipFile {
    hierarchy: String,
    level: i32,
}

fn domain_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<ItemFile> for RepositoryItem {
    fn from(file: ItemFile) -> Self {
        RepositoryItem {
            name: file.name,
            description: Some(file.description),
            formula: file.formula,
            groups: file.groups,
            default_format: file.default_format,
            semantic_role: file.semantic_role,
            domain: file
                .domain
                .map(|values| values.iter().map(domain_value).collect()),
            range: file.range,
            hierarchies: file
                .hierarchies
                .into_iter()
                .map(|membership| HierarchyItem {
                    name: membership.hierarchy,
                    level: membership.level,
                })
                .collect(),
            physical_column_name: file.physical_column_name,
        }
    }
}

impl JsonRepository {
    pub fn from_file(repository_path: &Path) -> Result<Self, TdsGeneratorError> {
        if !repository_path.exists() {
            return Err(TdsGeneratorError::MissingFile(format!(
                "no repository file at {}",
                repository_path.display()
            )));
        }
        let file = File::open(repository_path)?;
        let metadata: RepositoryFile = serde_json::from_reader(BufReader::new(file))?;

        let mut repository = Repository::new();
        let collection_name = metadata
            .collection
            .name
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        if collection_name != DEFAULT_COLLECTION {
            repository.add_collection(&collection_name);
        }

        for item_file in metadata.collection.items {
            let item = RepositoryItem::from(item_file);
            if collection_name != DEFAULT_COLLECTION {
                repository.add_item(item.clone(), &collection_name)?;
            }
            repository.add_item(item, DEFAULT_COLLECTION)?;
        }

        debug!("json repository initialized");
        Ok(JsonRepository { repository })
    }
}

impl MetadataRepository for JsonRepository {
    fn get_metadata(
        &self,
        name: &str,
        collection: &str,
    ) -> Result<&RepositoryItem, TdsGeneratorError> {
        self.repository.get_metadata(name, collection)
    }
}
