use std::collections::HashMap;

use tracing::debug;

use crate::error::TdsGeneratorError;

/// Name of the collection every repository starts with.
pub const DEFAULT_COLLECTION: &str = "default";

/// A metadata item in a collection
#[derive(Debug, Clone, Default)]
pub struct RepositoryItem {
    pub name: String,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub groups: Option<Vec<String>>,
    pub default_format: Option<String>,
    pub semantic_role: Option<String>,
    pub domain: Option<Vec<String>>,
    pub range: Option<(f64, f64)>,
    pub hierarchies: Vec<HierarchyItem>,
    pub physical_column_name: Option<String>,
}

impl RepositoryItem {
    pub fn new(name: &str) -> Self {
        RepositoryItem {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// An item in a hierarchy
#[derive(Debug, Clone)]
pub struct HierarchyItem {
    pub name: String,
    pub level: i32,
}

/// A hierarchy, or drill-down path, of related items
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub name: String,
    pub items: Vec<HierarchyItem>,
}

impl Hierarchy {
    pub fn new(name: &str) -> Self {
        Hierarchy {
            name: name.to_string(),
            items: vec![],
        }
    }

    /// Assigns the members ascending levels in steps of ten, in declaration order.
    pub fn set_members(&mut self, members: &[String]) {
        debug!("setting members of hierarchy {}", self.name);
        let mut level = 0;
        for member in members {
            level += 10;
            self.items.push(HierarchyItem {
                name: member.clone(),
                level,
            });
        }
    }

    /// Member names sorted ascending by level.
    pub fn get_members(&self) -> Vec<String> {
        let mut items = self.items.clone();
        items.sort_by_key(|item| item.level);
        items.into_iter().map(|item| item.name).collect()
    }
}

/// A collection of related metadata items
#[derive(Debug, Default)]
pub struct Collection {
    name: String,
    items: HashMap<String, RepositoryItem>,
}

impl Collection {
    fn new(name: &str) -> Self {
        Collection {
            name: name.to_string(),
            items: HashMap::new(),
        }
    }

    /// Get a single metadata item by item name
    pub fn get_metadata(&self, name: &str) -> Result<&RepositoryItem, TdsGeneratorError> {
        self.items.get(name).ok_or_else(|| {
            TdsGeneratorError::Configuration(format!(
                "{} not found in collection {}",
                name, self.name
            ))
        })
    }
}

/// External source of field descriptions, keyed by name within named collections.
///
/// Any concrete store satisfies this with the one lookup operation; the
/// hierarchy aggregation is derived from it.
pub trait MetadataRepository {
    /// Get a single metadata item by item name within a collection.
    fn get_metadata(
        &self,
        name: &str,
        collection: &str,
    ) -> Result<&RepositoryItem, TdsGeneratorError>;

    /// Aggregates the hierarchy memberships declared across the named items.
    ///
    /// Memberships are grouped by hierarchy name in first-seen order, each
    /// entry keeping the declaring item's name and declared level.
    fn get_hierarchies_for_items(
        &self,
        names: &[String],
        collection: &str,
    ) -> Result<Vec<Hierarchy>, TdsGeneratorError> {
        let mut hierarchies: Vec<Hierarchy> = vec![];
        for name in names {
            let item = self.get_metadata(name, collection)?;
            for membership in &item.hierarchies {
                let entry = HierarchyItem {
                    name: item.name.clone(),
                    level: membership.level,
                };
                match hierarchies
                    .iter_mut()
                    .find(|hierarchy| hierarchy.name == membership.name)
                {
                    Some(hierarchy) => hierarchy.items.push(entry),
                    None => {
                        let mut hierarchy = Hierarchy::new(&membership.name);
                        hierarchy.items.push(entry);
                        hierarchies.push(hierarchy);
                    }
                }
            }
        }
        Ok(hierarchies)
    }
}

/// An in-memory metadata repository.
#[derive(Debug)]
pub struct Repository {
    collections: HashMap<String, Collection>,
}

impl Repository {
    pub fn new() -> Self {
        let mut repository = Repository {
            collections: HashMap::new(),
        };
        repository.add_collection(DEFAULT_COLLECTION);
        repository
    }

    pub fn add_collection(&mut self, name: &str) {
        debug!("adding collection {}", name);
        self.collections
            .insert(name.to_string(), Collection::new(name));
    }

    fn get_collection(&self, collection: &str) -> Result<&Collection, TdsGeneratorError> {
        self.collections.get(collection).ok_or_else(|| {
            TdsGeneratorError::Configuration(format!("{} not found in repository", collection))
        })
    }

    pub fn add_item(
        &mut self,
        item: RepositoryItem,
        collection: &str,
    ) -> Result<(), TdsGeneratorError> {
        debug!("adding item to collection {}", collection);
        let data_collection = self.collections.get_mut(collection).ok_or_else(|| {
            TdsGeneratorError::Configuration(format!("{} not found in repository", collection))
        })?;
        if data_collection.items.contains_key(&item.name) {
            return Err(TdsGeneratorError::Configuration(format!(
                "{} already exists in repository",
                item.name
            )));
        }
        data_collection.items.insert(item.name.clone(), item);
        Ok(())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Repository::new()
    }
}

impl MetadataRepository for Repository {
    fn get_metadata(
        &self,
        name: &str,
        collection: &str,
    ) -> Result<&RepositoryItem, TdsGeneratorError> {
        self.get_collection(collection)?.get_metadata(name)
    }
}
