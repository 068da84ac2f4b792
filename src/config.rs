//! Loads the project configuration from `gazette.yaml`, with environment
//! overrides.

use crate::archive::DatePolicy;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "gazette.yaml";

/// Overrides `site_root` when set.
pub const SITE_URL_VAR: &str = "SITE_URL";

/// Switches the date policy to [`DatePolicy::Lenient`] when truthy (see
/// [`env_flag`]).
pub const LENIENT_DATES_VAR: &str = "GAZETTE_LENIENT_DATES";

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    site_root: Option<Url>,

    #[serde(default = "default_content_directory")]
    content_directory: PathBuf,

    #[serde(default)]
    date_policy: DatePolicy,
}

fn default_content_directory() -> PathBuf {
    PathBuf::from("content")
}

#[derive(Debug, PartialEq)]
pub struct Config {
    /// The base URL of the site, always ending in a slash.
    pub site_root: Url,

    /// The directory holding posts and pages.
    pub content_directory: PathBuf,

    pub date_policy: DatePolicy,
}

impl Config {
    /// Searches `dir` and then each of its parents for [`PROJECT_FILE`] and
    /// loads the first one found, applying overrides from the process
    /// environment.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, |name| std::env::var(name).ok())
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the project file at `path`. `env` looks up environment
    /// variables; see [`SITE_URL_VAR`] and [`LENIENT_DATES_VAR`].
    pub fn from_project_file<E>(path: &Path, env: E) -> Result<Config>
    where
        E: Fn(&str) -> Option<String>,
    {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)
            .with_context(|| format!("Loading configuration `{}`", path.display()))?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let site_root = match env(SITE_URL_VAR).filter(|v| !v.is_empty()) {
            Some(value) => Url::parse(&value)
                .with_context(|| format!("Parsing `{}` from the environment", SITE_URL_VAR))?,
            None => project.site_root.ok_or_else(|| {
                anyhow!(
                    "`site_root` is not set in `{}` and `{}` is not set",
                    path.display(),
                    SITE_URL_VAR
                )
            })?,
        };

        let date_policy = match env_flag(env(LENIENT_DATES_VAR).as_deref(), false) {
            true => DatePolicy::Lenient,
            false => project.date_policy,
        };

        Ok(Config {
            site_root: with_trailing_slash(site_root),
            content_directory: project_root.join(project.content_directory),
            date_policy,
        })
    }
}

/// Evaluates an environment variable as a boolean. Unset or empty values
/// yield `default`; `true`, `t`, `y`, `yes` and `1` (in any case) are true;
/// anything else is false.
pub fn env_flag(value: Option<&str>, default: bool) -> bool {
    const TRUE_VALUES: &[&str] = &["true", "t", "y", "yes", "1"];
    match value {
        None | Some("") => default,
        Some(value) => TRUE_VALUES.contains(&value.to_lowercase().as_str()),
    }
}

// Url::join treats the last segment of a base without a trailing slash as a
// file name and drops it.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn project(contents: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(PROJECT_FILE);
        std::fs::write(&path, contents)?;
        Ok((dir, path))
    }

    #[test]
    fn test_from_project_file_defaults() -> Result<()> {
        let (dir, path) = project("site_root: https://example.org\n")?;
        let config = Config::from_project_file(&path, no_env)?;
        assert_eq!(
            Config {
                site_root: Url::parse("https://example.org/")?,
                content_directory: dir.path().join("content"),
                date_policy: DatePolicy::Strict,
            },
            config
        );
        Ok(())
    }

    #[test]
    fn test_from_project_file() -> Result<()> {
        let (dir, path) = project(
            "site_root: https://example.org/blog\n\
             content_directory: content/blog\n\
             date_policy: lenient\n",
        )?;
        let config = Config::from_project_file(&path, no_env)?;
        assert_eq!("https://example.org/blog/", config.site_root.as_str());
        assert_eq!(dir.path().join("content/blog"), config.content_directory);
        assert_eq!(DatePolicy::Lenient, config.date_policy);
        Ok(())
    }

    #[test]
    fn test_from_project_file_env_overrides() -> Result<()> {
        let (_dir, path) = project("site_root: https://example.org/\n")?;
        let env: HashMap<&str, &str> = vec![
            (SITE_URL_VAR, "https://www.spacejam.com/1996/"),
            (LENIENT_DATES_VAR, "Yes"),
        ]
        .into_iter()
        .collect();
        let config =
            Config::from_project_file(&path, |name| env.get(name).map(|v| v.to_string()))?;
        assert_eq!("https://www.spacejam.com/1996/", config.site_root.as_str());
        assert_eq!(DatePolicy::Lenient, config.date_policy);
        Ok(())
    }

    #[test]
    fn test_from_project_file_requires_site_root() -> Result<()> {
        let (_dir, path) = project("date_policy: strict\n")?;
        let err = Config::from_project_file(&path, no_env).unwrap_err();
        assert!(err.to_string().contains(SITE_URL_VAR));
        Ok(())
    }

    #[test]
    fn test_from_directory_searches_parents() -> Result<()> {
        let (dir, _path) = project("site_root: https://example.org/\n")?;
        let nested = dir.path().join("content").join("blog");
        std::fs::create_dir_all(&nested)?;
        let config = Config::from_directory(&nested)?;
        assert_eq!(dir.path().join("content"), config.content_directory);
        Ok(())
    }

    #[test]
    fn test_env_flag() {
        for value in &["true", "T", "y", "YES", "1"] {
            assert!(env_flag(Some(*value), false), "{}", value);
        }
        for value in &["false", "f", "no", "0", "nope"] {
            assert!(!env_flag(Some(*value), true), "{}", value);
        }
        assert!(!env_flag(None, false));
        assert!(env_flag(None, true));
        assert!(env_flag(Some(""), true));
    }
}
