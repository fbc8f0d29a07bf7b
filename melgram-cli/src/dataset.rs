//! Dataset traversal and batch conversion.
//!
//! Each immediate subdirectory of the input root is a session. Audio files
//! are collected recursively in sorted order. A root with no subdirectories
//! is a single session.

use anyhow::{Context, Result};
use melgram::storage::{ImageSink, NpyArchiveWriter, PngDirectorySink};
use melgram::SpectrogramTransformer;
use std::path::{Path, PathBuf};

pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "ogg", "mp3", "m4a", "aac"];

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub name: String,
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub sessions: usize,
    pub processed: usize,
    pub failed: usize,
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|e| e.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("listing {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

fn collect_audio(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for path in sorted_entries(dir)? {
        if path.is_dir() {
            collect_audio(&path, out)?;
        } else if is_audio(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

/// Group the audio files under `root` into sessions.
///
/// Loose audio files directly in `root` form a session named after `root`,
/// listed before the subdirectory sessions.
pub fn discover_sessions(root: &Path) -> Result<Vec<Session>> {
    let entries = sorted_entries(root)?;
    let subdirs: Vec<&PathBuf> = entries.iter().filter(|p| p.is_dir()).collect();

    if subdirs.is_empty() {
        let mut files = Vec::new();
        collect_audio(root, &mut files)?;
        return Ok(vec![Session {
            name: dir_name(root),
            files,
        }]);
    }

    let mut sessions = Vec::new();
    let loose: Vec<PathBuf> = entries
        .iter()
        .filter(|p| p.is_file() && is_audio(p))
        .cloned()
        .collect();
    if !loose.is_empty() {
        sessions.push(Session {
            name: dir_name(root),
            files: loose,
        });
    }
    for dir in subdirs {
        let mut files = Vec::new();
        collect_audio(dir, &mut files)?;
        sessions.push(Session {
            name: dir_name(dir),
            files,
        });
    }
    Ok(sessions)
}

/// Convert every file, writing PNGs (and optionally one archive per session)
/// as it goes. A file that fails is logged and counted, never fatal.
pub fn run_batch(
    transformer: &SpectrogramTransformer,
    sessions: &[Session],
    png_sink: &mut PngDirectorySink,
    archive_dir: Option<&Path>,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let (width, height) = (transformer.config().width, transformer.config().height);

    for session in sessions {
        let mut archive = match archive_dir {
            Some(dir) => {
                let path = dir.join(format!("{}_images.npy", session.name));
                Some(
                    NpyArchiveWriter::create(&path, width, height)
                        .with_context(|| format!("creating archive {}", path.display()))?,
                )
            }
            None => None,
        };

        for file in &session.files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let result = transformer.transform_file(file).and_then(|image| {
                png_sink.persist(&name, &image)?;
                if let Some(archive) = archive.as_mut() {
                    archive.persist(&name, &image)?;
                }
                Ok(())
            });

            match result {
                Ok(()) => {
                    report.processed += 1;
                    log::info!("{name} successfully processed");
                }
                Err(e) => {
                    report.failed += 1;
                    log::warn!("{}: {e}", file.display());
                }
            }
        }

        if let Some(archive) = archive {
            let path = archive.path().to_path_buf();
            let count = archive
                .finish()
                .with_context(|| format!("finalizing archive {}", path.display()))?;
            log::info!("wrote {count} images to {}", path.display());
        }
        report.sessions += 1;
        log::info!("session {} has been completed", session.name);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use melgram::SpectrogramConfig;

    fn write_tone(path: &Path, secs: f64) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(16000.0 * secs) as usize {
            let s = (0.3 * (i as f64 * 0.2).sin() * 32767.0) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_discover_sessions_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for (session, sub, file) in [
            ("Session2", "Ses02F", "b.wav"),
            ("Session1", "Ses01M", "z.wav"),
            ("Session1", "Ses01F", "a.wav"),
            ("Session1", "Ses01F", "notes.txt"),
        ] {
            let d = root.join(session).join(sub);
            std::fs::create_dir_all(&d).unwrap();
            std::fs::write(d.join(file), b"").unwrap();
        }

        let sessions = discover_sessions(root).unwrap();
        let names: Vec<&str> = sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Session1", "Session2"]);
        let files: Vec<String> = sessions[0]
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec!["a.wav", "z.wav"]);
    }

    #[test]
    fn test_flat_directory_is_one_session() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.WAV"), b"").unwrap();
        std::fs::write(dir.path().join("y.flac"), b"").unwrap();
        let sessions = discover_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].files.len(), 2);
    }

    #[test]
    fn test_batch_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        let s1 = input.join("Session1");
        std::fs::create_dir_all(&s1).unwrap();
        write_tone(&s1.join("a.wav"), 0.5);
        std::fs::write(s1.join("b.wav"), b"not audio at all").unwrap();
        write_tone(&s1.join("c.wav"), 0.3);

        let transformer = SpectrogramTransformer::new(SpectrogramConfig::default()).unwrap();
        let sessions = discover_sessions(&input).unwrap();
        let mut sink = PngDirectorySink::new(dir.path().join("png")).unwrap();
        let archives = dir.path().join("npy");
        let report = run_batch(&transformer, &sessions, &mut sink, Some(&archives)).unwrap();

        assert_eq!(
            report,
            BatchReport {
                sessions: 1,
                processed: 2,
                failed: 1
            }
        );
        assert!(sink.path_for("a.wav").exists());
        assert!(!sink.path_for("b.wav").exists());
        assert!(sink.path_for("c.wav").exists());

        let archive = std::fs::metadata(archives.join("Session1_images.npy")).unwrap();
        assert_eq!(archive.len(), 128 + 2 * 128 * 128 * 3);
    }
}
