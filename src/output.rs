use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;

/// Where the exported CSV ends up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputSink {
    Stdout,
    File(PathBuf),
}

impl OutputSink {
    /// `-` means stdout, anything else a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            OutputSink::Stdout
        } else {
            OutputSink::File(PathBuf::from(arg))
        }
    }

    /// A timestamped file inside `dir`, e.g. `alicante_accessibility_20260101T120000Z.csv`.
    pub fn timestamped(dir: &Path, area: &str, now: DateTime<Utc>) -> Self {
        let name = format!(
            "{}_accessibility_{}.csv",
            slug(area),
            now.format("%Y%m%dT%H%M%SZ")
        );
        OutputSink::File(dir.join(name))
    }

    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        match self {
            OutputSink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(bytes)?;
                stdout.flush()?;
            }
            OutputSink::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(path, bytes)?;
                info!("Wrote {} bytes to {}", bytes.len(), path.display());
            }
        }
        Ok(())
    }
}

fn slug(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-').to_string();
    if out.is_empty() { "area".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn dash_means_stdout() {
        assert_eq!(OutputSink::from_arg("-"), OutputSink::Stdout);
        assert_eq!(
            OutputSink::from_arg("out/a.csv"),
            OutputSink::File(PathBuf::from("out/a.csv"))
        );
    }

    #[test]
    fn timestamped_name_uses_area_slug() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let sink = OutputSink::timestamped(Path::new("exports"), "Alacant / Alicante", now);
        assert_eq!(
            sink,
            OutputSink::File(PathBuf::from(
                "exports/alacant-alicante_accessibility_20260301T093000Z.csv"
            ))
        );
    }

    #[test]
    fn file_sink_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("alicante.csv");
        OutputSink::File(path.clone())
            .write(b"id,type\n")
            .unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "id,type\n");
    }
}
