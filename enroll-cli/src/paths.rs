//! Platform-specific paths.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "enroll";
const APPLICATION: &str = "enroll";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Default location of the registration store.
///
/// - Linux: `$XDG_DATA_HOME/enroll/registrations.json`
/// - macOS: `~/Library/Application Support/dev.enroll.enroll/registrations.json`
/// - Windows: `C:\Users\<User>\AppData\Roaming\enroll\enroll\data\registrations.json`
pub fn default_store() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("registrations.json"))
}
