#![allow(dead_code)]

use chrono::Local;
use linkfix::application::services::RunSettings;
use linkfix::domain::entities::FieldNames;
use linkfix::infrastructure::clients::MemoryClient;
use linkfix::infrastructure::logging::RunLogger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const LIBRARY: &str = "/Shared Documents";
pub const TEMPLATE: &str = "test.aspx";
pub const HIDDEN_FOLDER: &str = "_template";

pub fn hidden_template_path() -> String {
    format!("{}/{}/{}", LIBRARY, HIDDEN_FOLDER, TEMPLATE)
}

pub fn root_template_path() -> String {
    format!("{}/{}", LIBRARY, TEMPLATE)
}

/// Library whose template still sits in the library root.
pub fn library_with_root_template() -> Arc<MemoryClient> {
    let client = MemoryClient::new();
    client.add_folder(LIBRARY);
    client.add_file(&root_template_path());
    client.set_schema(&["URL", "OriginalUrl"]);
    Arc::new(client)
}

/// Library whose template was already moved into the hidden folder.
pub fn library_with_hidden_template() -> Arc<MemoryClient> {
    let client = MemoryClient::new();
    client.add_folder(LIBRARY);
    client.add_file(&hidden_template_path());
    client.set_schema(&["URL", "OriginalUrl"]);
    Arc::new(client)
}

pub fn write_input(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("links.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn settings(input_path: PathBuf) -> RunSettings {
    RunSettings {
        library: LIBRARY.to_string(),
        template_name: TEMPLATE.to_string(),
        hidden_folder: HIDDEN_FOLDER.to_string(),
        input_path,
        field_names: FieldNames::default(),
    }
}

pub fn open_logger(dir: &TempDir) -> RunLogger {
    RunLogger::open(&dir.path().join("logs"), Local::now()).unwrap()
}

pub fn read_error_log(logger: &RunLogger) -> String {
    logger.close().unwrap();
    std::fs::read_to_string(logger.error_log_path()).unwrap()
}
