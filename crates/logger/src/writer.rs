//! Writer implementations

// Standard library
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// External dependencies
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};

// Internal crates
use crate::config::RotationConfig;
use crate::core::{LogIoResultExt, LogResult};

/// Boxed writer handed to a sink
pub type BoxWriter = Box<dyn Write + Send>;

/// Append-only log file with size-based rotation
///
/// Every `write` call is treated as one record: rotation happens before a
/// record that would push the file past the size cap, never in the middle of
/// one. A record larger than the cap still lands in a file of its own.
#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    file: File,
    written: u64,
    policy: RotationConfig,
}

impl RollingFile {
    /// Open (or create) `path` in append mode
    pub fn open(path: impl Into<PathBuf>, policy: RotationConfig) -> LogResult<Self> {
        let path = path.into();
        let file = open_append(&path)
            .with_log_context(|| format!("opening log file '{}'", path.display()))?;
        let written = file
            .metadata()
            .with_log_context(|| format!("reading metadata of '{}'", path.display()))?
            .len();

        Ok(Self {
            path,
            file,
            written,
            policy,
        })
    }

    /// Path of the current file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the current file
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the `index`-th rotated file (1 is the most recent)
    pub fn rotated_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        if self.policy.compress {
            name.push(".gz");
        }
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.policy.max_files == 0 {
            self.file = File::create(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        remove_if_exists(&self.rotated_path(self.policy.max_files))?;
        for index in (1..self.policy.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }

        let target = self.rotated_path(1);
        if self.policy.compress {
            compress_into(&self.path, &target)?;
            fs::remove_file(&self.path)?;
        } else {
            fs::rename(&self.path, &target)?;
        }

        self.file = open_append(&self.path)?;
        self.written = 0;

        tracing::debug!(
            path = %self.path.display(),
            rotated = %target.display(),
            "log file rotated"
        );
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.policy.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Create the file writer of a sink
///
/// With `non_blocking`, writes are queued to a background worker that drains
/// them in order; the returned guard flushes the queue when dropped.
pub fn make_file_writer(
    path: &Path,
    policy: RotationConfig,
    non_blocking: bool,
) -> LogResult<(BoxWriter, Option<WorkerGuard>)> {
    let file = RollingFile::open(path, policy)?;

    if non_blocking {
        let (writer, guard) = NonBlockingBuilder::default()
            .lossy(false)
            .thread_name("nebula-logger-file")
            .finish(file);
        Ok((Box::new(writer), Some(guard)))
    } else {
        Ok((Box::new(file), None))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(feature = "compress")]
fn compress_into(source: &Path, target: &Path) -> io::Result<()> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut input = File::open(source)?;
    let mut encoder = GzEncoder::new(File::create(target)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.sync_all()
}

#[cfg(not(feature = "compress"))]
fn compress_into(_source: &Path, _target: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "log compression requires the `compress` feature",
    ))
}
