use std::fs::File;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::TdsGeneratorError;

pub const DATA_FOLDER: &str = "Data";
pub const TABLEAU_PACKAGED_DATASOURCE_EXTENSION: &str = "tdsx";

/// Creates a packaged data source (.tdsx) from a document (.tds) and its
/// data file, saving it at `output_file` with the extension appended.
///
/// The archive holds the document at its root and the data file under
/// `Data/`. It is assembled in a temporary file and moved into place, so
/// a failed build leaves no output behind.
pub fn package_tds(
    tds_file: &Path,
    data_file: &Path,
    output_file: &Path,
) -> Result<(), TdsGeneratorError> {
    let tds_name = file_name(tds_file)?;
    let data_name = file_name(data_file)?;

    let mut output_path = output_file.as_os_str().to_os_string();
    output_path.push(".");
    output_path.push(TABLEAU_PACKAGED_DATASOURCE_EXTENSION);

    let directory = output_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty());
    let mut archive = match directory {
        Some(directory) => NamedTempFile::new_in(directory)?,
        None => NamedTempFile::new_in(".")?,
    };

    {
        let mut writer = ZipWriter::new(archive.as_file_mut());
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(tds_name, options)?;
        io::copy(&mut File::open(tds_file)?, &mut writer)?;
        writer.start_file(format!("{}/{}", DATA_FOLDER, data_name), options)?;
        io::copy(&mut File::open(data_file)?, &mut writer)?;
        writer.finish()?;
    }

    archive
        .persist(&output_path)
        .map_err(|err| TdsGeneratorError::Io(err.error))?;
    Ok(())
}

fn file_name(path: &Path) -> Result<String, TdsGeneratorError> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            TdsGeneratorError::Configuration(format!("no file name in path {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}
