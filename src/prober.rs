use crate::error::ProbeError;
use crate::types::Minutes;
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".mkv", ".avi"];

/// Reports the play length of a media file in minutes.
pub trait DurationProbe {
    fn probe(&self, path: &Path) -> Result<f64, ProbeError>;
}

/// Probes durations by running `ffprobe` on each file.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        // output() waits for the child and drops every pipe, on success or error
        let output = Command::new(&self.program)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.display().to_string(),
                path: path.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                msg => msg.to_string(),
            };
            return Err(ProbeError::Rejected {
                path: path.to_path_buf(),
                reason,
            });
        }

        let seconds = parse_duration_seconds(&output.stdout, path)?;
        Ok(seconds / 60.0)
    }
}

fn parse_duration_seconds(stdout: &[u8], path: &Path) -> Result<f64, ProbeError> {
    let parsed: FfprobeOutput =
        serde_json::from_slice(stdout).map_err(|source| ProbeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .ok_or_else(|| ProbeError::MissingDuration {
            path: path.to_path_buf(),
        })
}

/// Probe one file, turning any failure into a missing duration.
pub fn probe_minutes(probe: &dyn DurationProbe, path: &Path) -> Minutes {
    match probe.probe(path) {
        Ok(minutes) => {
            debug!("{}: {minutes:.3} min", path.display());
            Some(minutes)
        }
        Err(e) => {
            warn!("Error processing {}: {e}", path.display());
            None
        }
    }
}

#[must_use]
pub fn is_video_file(name: &str) -> bool {
    VIDEO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
