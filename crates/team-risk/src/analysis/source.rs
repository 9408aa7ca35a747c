use super::domain::{Issue, Meeting, PullRequest, TeamActivity};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub const GITHUB_FILE: &str = "github.json";
pub const MEETINGS_FILE: &str = "meetings.json";

#[derive(Debug, thiserror::Error)]
pub enum ActivityLoadError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid {source_name} payload: {source}")]
    Json {
        source_name: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GithubExport {
    #[serde(default)]
    pull_requests: Vec<PullRequest>,
    #[serde(default)]
    issues: Vec<Issue>,
}

/// Loads a GitHub export (`{"pullRequests": [...], "issues": [...]}`) and a
/// meeting log (`[{"date": ..., "hasActionItems": ...}]`).
pub struct ActivitySource;

impl ActivitySource {
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<TeamActivity, ActivityLoadError> {
        let dir = dir.as_ref();
        Self::from_paths(dir.join(GITHUB_FILE), dir.join(MEETINGS_FILE))
    }

    pub fn from_paths(
        github: impl AsRef<Path>,
        meetings: impl AsRef<Path>,
    ) -> Result<TeamActivity, ActivityLoadError> {
        let github = open(github.as_ref())?;
        let meetings = open(meetings.as_ref())?;
        Self::from_readers(github, meetings)
    }

    pub fn from_readers<G: Read, M: Read>(
        github: G,
        meetings: M,
    ) -> Result<TeamActivity, ActivityLoadError> {
        let export: GithubExport =
            serde_json::from_reader(github).map_err(|source| ActivityLoadError::Json {
                source_name: GITHUB_FILE.to_string(),
                source,
            })?;
        let meetings: Vec<Meeting> =
            serde_json::from_reader(meetings).map_err(|source| ActivityLoadError::Json {
                source_name: MEETINGS_FILE.to_string(),
                source,
            })?;

        Ok(TeamActivity::new(export.pull_requests, export.issues, meetings))
    }
}

fn open(path: &Path) -> Result<BufReader<File>, ActivityLoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ActivityLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}
