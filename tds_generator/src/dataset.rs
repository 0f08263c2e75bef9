use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::connection::SourceKind;
use crate::error::TdsGeneratorError;
use crate::folder::{DRILL_PATH_ITEM, FolderItem};
use crate::metadata;
use crate::metadata::{DEFAULT_COLLECTION, MetadataRepository, RepositoryItem};
use crate::package::package_tds;
use crate::tableau::Tableau;

pub const TABLEAU_DATASOURCE_EXTENSION: &str = "tds";

/// A dataset manifest, the declarative description of the data source.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub dimensions: FieldSet,
    pub measures: FieldSet,
}

/// Either a plain list of field names or an object with a `fields` list
/// plus optional hierarchies and groups.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldSet {
    Names(Vec<String>),
    Detailed {
        fields: Vec<String>,
        #[serde(default)]
        hierarchies: Option<Vec<ManifestHierarchy>>,
        #[serde(default)]
        groups: Option<Vec<ManifestGroup>>,
    },
}

impl FieldSet {
    pub fn fields(&self) -> &[String] {
        match self {
            FieldSet::Names(names) => names,
            FieldSet::Detailed { fields, .. } => fields,
        }
    }

    fn hierarchies(&self) -> Option<&[ManifestHierarchy]> {
        match self {
            FieldSet::Names(_) => None,
            FieldSet::Detailed { hierarchies, .. } => hierarchies.as_deref(),
        }
    }

    fn groups(&self) -> Option<&[ManifestGroup]> {
        match self {
            FieldSet::Names(_) => None,
            FieldSet::Detailed { groups, .. } => groups.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ManifestHierarchy {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// Settings for a manifest-driven build.
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    /// Path to the dataset manifest JSON
    pub dataset_file: PathBuf,
    /// Path to the .csv, .xlsx or .hyper data file
    pub data_file: PathBuf,
    /// Sheet name for spreadsheets, table name for columnar files
    pub table_name: String,
    /// Schema name for columnar files
    pub schema_name: String,
    pub source: SourceKind,
    /// Hide any fields not explicitly included
    pub hide_unused: bool,
    /// Generate folders from repository group memberships
    pub use_metadata_groups: bool,
}

impl DatasetOptions {
    pub fn new(dataset_file: impl Into<PathBuf>, data_file: impl Into<PathBuf>) -> Self {
        DatasetOptions {
            dataset_file: dataset_file.into(),
            data_file: data_file.into(),
            table_name: "Orders".to_string(),
            schema_name: "public".to_string(),
            source: SourceKind::Csv,
            hide_unused: true,
            use_metadata_groups: true,
        }
    }
}

/// Creates a new Tableau data source (.tds) and saves it at `output_file`.
///
/// Every field named by the manifest is resolved through the repository
/// when one is given, propagating description, formula, format and
/// semantic role; a missing repository entry aborts the build. Without a
/// repository a minimal item is synthesized using the name as its own
/// description. Hierarchies declared in the manifest take precedence over
/// repository-derived ones.
pub fn create_tds(
    options: &DatasetOptions,
    repository: Option<&dyn MetadataRepository>,
    output_file: &Path,
    package: bool,
) -> Result<(), TdsGeneratorError> {
    let manifest = read_manifest(&options.dataset_file)?;

    let mut tableau = Tableau::default();
    tableau.create_connection(
        &options.data_file,
        Some(&options.table_name),
        Some(&options.schema_name),
        options.source,
        package,
    )?;

    let dimensions = manifest.dimensions.fields();
    let measures = manifest.measures.fields();

    for dimension in dimensions {
        let item = resolve_item(repository, dimension)?;
        add_field(&mut tableau, &item, "dimension", "string", "nominal");
    }
    for measure in measures {
        let item = resolve_item(repository, measure)?;
        add_field(&mut tableau, &item, "measure", "real", "quantitative");
    }

    let fields: Vec<String> = measures.iter().chain(dimensions).cloned().collect();

    // Hierarchies
    if let Some(declared) = manifest.dimensions.hierarchies() {
        for hierarchy in declared {
            let mut source = metadata::Hierarchy::new(&hierarchy.name);
            source.set_members(&hierarchy.members);
            tableau.add_hierarchy(&source);
        }
    } else if let Some(repository) = repository {
        for hierarchy in repository.get_hierarchies_for_items(&fields, DEFAULT_COLLECTION)? {
            tableau.add_hierarchy(&hierarchy);
        }
    }

    // Folders
    match repository {
        Some(repository) if options.use_metadata_groups => {
            add_metadata_folders(&mut tableau, repository, &fields)?;
        }
        _ => {
            if let Some(groups) = manifest.dimensions.groups() {
                for group in groups {
                    tableau.add_folder(&group.name, group.members.iter().map(String::as_str));
                }
            }
        }
    }

    if options.hide_unused {
        tableau.hide_other_fields()?;
    }

    tableau.save(output_file)
}

/// Creates a packaged data source (.tdsx) at `output_file`, which should
/// not include the extension as it is added automatically.
///
/// The intermediate document is written into a temporary directory which
/// is removed again on every path out of this function.
pub fn create_tdsx(
    options: &DatasetOptions,
    repository: Option<&dyn MetadataRepository>,
    output_file: &Path,
) -> Result<(), TdsGeneratorError> {
    let staging = tempfile::tempdir()?;
    let tds_path = staging.path().join(document_name(output_file)?);
    create_tds(options, repository, &tds_path, true)?;
    package_tds(&tds_path, &options.data_file, output_file)
}

/// Creates a minimal packaged data source from a CSV file alone.
///
/// Both paths are required and the data file must exist before any build
/// work starts.
pub fn create_tdsx_from_csv(data_file: &Path, output_file: &Path) -> Result<(), TdsGeneratorError> {
    check_data_file(data_file)?;
    let staging = tempfile::tempdir()?;
    let tds_path = staging.path().join(document_name(output_file)?);
    let mut tableau = Tableau::default();
    tableau.create_connection(data_file, None, None, SourceKind::Csv, true)?;
    tableau.save(&tds_path)?;
    package_tds(&tds_path, data_file, output_file)
}

/// Creates a minimal packaged data source from a spreadsheet sheet.
pub fn create_tdsx_from_excel(
    data_file: &Path,
    output_file: &Path,
    sheet_name: &str,
) -> Result<(), TdsGeneratorError> {
    check_data_file(data_file)?;
    let staging = tempfile::tempdir()?;
    let tds_path = staging.path().join(document_name(output_file)?);
    let mut tableau = Tableau::default();
    tableau.create_connection(data_file, Some(sheet_name), None, SourceKind::Excel, true)?;
    tableau.save(&tds_path)?;
    package_tds(&tds_path, data_file, output_file)
}

/// Creates a minimal packaged data source from a columnar analytic file.
pub fn create_tdsx_from_hyper(
    data_file: &Path,
    output_file: &Path,
    table_name: &str,
    schema: &str,
) -> Result<(), TdsGeneratorError> {
    check_data_file(data_file)?;
    let staging = tempfile::tempdir()?;
    let tds_path = staging.path().join(document_name(output_file)?);
    let mut tableau = Tableau::default();
    tableau.create_connection(
        data_file,
        Some(table_name),
        Some(schema),
        SourceKind::Hyper,
        true,
    )?;
    tableau.save(&tds_path)?;
    package_tds(&tds_path, data_file, output_file)
}

fn read_manifest(dataset_file: &Path) -> Result<Manifest, TdsGeneratorError> {
    let file = File::open(dataset_file)?;
    let manifest = serde_json::from_reader(BufReader::new(file))?;
    Ok(manifest)
}

fn resolve_item(
    repository: Option<&dyn MetadataRepository>,
    name: &str,
) -> Result<RepositoryItem, TdsGeneratorError> {
    match repository {
        Some(repository) => {
            debug!("resolving {} through the metadata repository", name);
            repository.get_metadata(name, DEFAULT_COLLECTION).cloned()
        }
        None => {
            let mut item = RepositoryItem::new(name);
            item.description = Some(name.to_string());
            Ok(item)
        }
    }
}

fn add_field(
    tableau: &mut Tableau,
    field: &RepositoryItem,
    role: &str,
    datatype: &str,
    field_type: &str,
) {
    tableau.add_field(
        &field.name,
        datatype,
        role,
        field_type,
        field.description.as_deref(),
        field.semantic_role.as_deref(),
        field.default_format.as_deref(),
        field.formula.as_deref(),
    );
}

fn add_metadata_folders(
    tableau: &mut Tableau,
    repository: &dyn MetadataRepository,
    fields: &[String],
) -> Result<(), TdsGeneratorError> {
    let mut groups: Vec<(String, Vec<FolderItem>)> = vec![];
    for field in fields {
        let item = repository.get_metadata(field, DEFAULT_COLLECTION)?;
        let Some(member_groups) = &item.groups else {
            continue;
        };
        // A field inside a hierarchy contributes its drill path, not itself.
        let item_to_add = match item.hierarchies.first() {
            Some(membership) => FolderItem::new(&membership.name, DRILL_PATH_ITEM),
            None => FolderItem::field(&item.name),
        };
        for group in member_groups {
            match groups.iter_mut().find(|(name, _)| name == group) {
                Some((_, members)) => {
                    if !members.iter().any(|member| member.name == item_to_add.name) {
                        members.push(item_to_add.clone());
                    }
                }
                None => groups.push((group.clone(), vec![item_to_add.clone()])),
            }
        }
    }
    for (name, members) in groups {
        tableau.add_folder(&name, members);
    }
    Ok(())
}

fn document_name(output_file: &Path) -> Result<OsString, TdsGeneratorError> {
    let mut name = output_file
        .file_name()
        .ok_or_else(|| {
            TdsGeneratorError::Configuration(format!(
                "no file name in output path {}",
                output_file.display()
            ))
        })?
        .to_os_string();
    name.push(".");
    name.push(TABLEAU_DATASOURCE_EXTENSION);
    Ok(name)
}

fn check_data_file(data_file: &Path) -> Result<(), TdsGeneratorError> {
    if !data_file.exists() {
        return Err(TdsGeneratorError::MissingFile(format!(
            "cannot find the data file {}",
            data_file.display()
        )));
    }
    Ok(())
}
