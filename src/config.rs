// Config validation: the first gate of the pipeline. Reads the `[API]`
// table from a TOML file, bootstraps a placeholder file when none exists
// and refuses to hand out placeholder credentials.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineResult, UploadError};

/// Base URL written into a freshly bootstrapped config file.
pub const PLACEHOLDER_URL: &str = "http://your-snippets-api.com";
/// Username written into a freshly bootstrapped config file.
pub const PLACEHOLDER_USER: &str = "username";
/// Password written into a freshly bootstrapped config file.
pub const PLACEHOLDER_PASS: &str = "password";

const TEMPLATE_HEADER: &str = "# Details for your Your Snippets API.\n\
# Replace the values below before uploading.\n\n";

/// On-disk layout of the config file.
#[derive(Serialize, Deserialize, Debug)]
struct ConfigFile {
    #[serde(rename = "API")]
    api: ApiSection,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
struct ApiSection {
    url: String,
    user: String,
    pass: String,
}

impl ApiSection {
    fn placeholder() -> Self {
        ApiSection {
            url: PLACEHOLDER_URL.to_string(),
            user: PLACEHOLDER_USER.to_string(),
            pass: PLACEHOLDER_PASS.to_string(),
        }
    }
}

/// Validated API settings for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub api_base_url: String,
    pub username: String,
    pub password: String,
}

impl Configuration {
    pub fn new(
        api_base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Configuration {
            api_base_url: api_base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// `POST` target of the token endpoint.
    pub fn token_url(&self) -> String {
        self.endpoint("token/")
    }

    /// `POST` target of the image upload endpoint.
    pub fn images_url(&self) -> String {
        self.endpoint("add/images/")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path)
    }
}

// Keeps the password out of logs and debug output.
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("api_base_url", &self.api_base_url)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Load and validate the config file at `path`.
///
/// When no file exists a placeholder one is written and `ConfigMissing` is
/// returned, so a second run against the same path fails with
/// `ConfigNotConfigured` until the user edits it.
pub fn validate(path: &Path) -> PipelineResult<Configuration> {
    if !path.is_file() {
        write_placeholder(path)?;
        info!("Wrote placeholder config file to {}", path.display());
        return Err(UploadError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }

    let unreadable = |reason: String| UploadError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    let file: ConfigFile = toml::from_str(&content).map_err(|e| unreadable(e.to_string()))?;

    if file.api == ApiSection::placeholder() {
        return Err(UploadError::ConfigNotConfigured {
            path: path.to_path_buf(),
        });
    }

    let config = Configuration::new(file.api.url, file.api.user, file.api.pass);
    debug!("Loaded {:?} from {}", config, path.display());
    Ok(config)
}

fn write_placeholder(path: &Path) -> PipelineResult<()> {
    let unwritable = |reason: String| UploadError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let body = toml::to_string(&ConfigFile {
        api: ApiSection::placeholder(),
    })
    .map_err(|e| unwritable(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| unwritable(e.to_string()))?;
    }
    fs::write(path, format!("{TEMPLATE_HEADER}{body}")).map_err(|e| unwritable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_bootstraps_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let err = validate(&path).unwrap_err();
        assert!(matches!(err, UploadError::ConfigMissing { .. }));
        assert!(path.is_file());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[API]"));
        assert!(written.contains(PLACEHOLDER_URL));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_second_run_reports_not_configured() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        assert!(matches!(
            validate(&path).unwrap_err(),
            UploadError::ConfigMissing { .. }
        ));
        assert!(matches!(
            validate(&path).unwrap_err(),
            UploadError::ConfigNotConfigured { .. }
        ));
    }

    #[test]
    fn test_bootstrap_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.toml");

        let err = validate(&path).unwrap_err();
        assert!(matches!(err, UploadError::ConfigMissing { .. }));
        assert!(path.is_file());
    }

    #[test]
    fn test_valid_config_loads() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[API]\nurl = \"https://api.example.com/\"\nuser = \"bob\"\npass = \"secret\"\n",
        );

        let config = validate(&path).unwrap();
        assert_eq!(config, Configuration::new("https://api.example.com/", "bob", "secret"));
    }

    #[test]
    fn test_partially_placeholder_config_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[API]\nurl = \"https://api.example.com\"\nuser = \"username\"\npass = \"password\"\n",
        );

        assert!(validate(&path).is_ok());
    }

    #[test]
    fn test_missing_key_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[API]\nurl = \"https://api.example.com\"\nuser = \"bob\"\n");

        let err = validate(&path).unwrap_err();
        assert!(matches!(err, UploadError::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_malformed_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "this is = = not toml");

        let err = validate(&path).unwrap_err();
        assert!(matches!(err, UploadError::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_missing_section_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "url = \"https://api.example.com\"\n");

        let err = validate(&path).unwrap_err();
        assert!(matches!(err, UploadError::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_endpoint_urls_join_with_single_slash() {
        let with_slash = Configuration::new("https://api.example.com/", "bob", "secret");
        let without_slash = Configuration::new("https://api.example.com", "bob", "secret");

        assert_eq!(with_slash.token_url(), "https://api.example.com/token/");
        assert_eq!(without_slash.token_url(), "https://api.example.com/token/");
        assert_eq!(with_slash.images_url(), "https://api.example.com/add/images/");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Configuration::new("https://api.example.com", "bob", "hunter2");
        let printed = format!("{:?}", config);
        assert!(printed.contains("bob"));
        assert!(!printed.contains("hunter2"));
    }

    proptest! {
        #[test]
        fn prop_placeholder_in_any_order_is_not_configured(order in Just(vec![0usize, 1, 2]).prop_shuffle()) {
            let lines = [
                format!("url = \"{PLACEHOLDER_URL}\""),
                format!("user = \"{PLACEHOLDER_USER}\""),
                format!("pass = \"{PLACEHOLDER_PASS}\""),
            ];
            let mut content = String::from("[API]\n");
            for i in order {
                content.push_str(&lines[i]);
                content.push('\n');
            }

            let dir = TempDir::new().unwrap();
            let path = write_config(&dir, &content);
            let not_configured = matches!(validate(&path), Err(UploadError::ConfigNotConfigured { .. }));
            prop_assert!(not_configured);
        }
    }
}
