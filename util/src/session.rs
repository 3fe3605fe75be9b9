//! Session management
//!
//! A session is a single execution of one of the guidance executables. Each
//! session gets its own timestamped directory holding the log file, the
//! archives, and any data saved through [`Session::save`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use erased_serde::Serialize;
use log::{info, warn};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

/// Time the first session of this process was started.
static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Format of the timestamp in session directory names, see
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A session-relative path and the data to write to it.
type SaveItem = (PathBuf, Box<dyn Serialize + Send>);

/// Directories and background saving for one execution.
pub struct Session {
    /// Directory holding everything written by this session
    pub session_root: PathBuf,

    /// Directory for CSV archives, `{session_root}/arch`
    pub arch_root: PathBuf,

    /// Path of the session's log file
    pub log_file_path: PathBuf,

    save_sender: Option<Sender<SaveItem>>,

    save_thread: Option<JoinHandle<()>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("GUID_SW_ROOT is not set, cannot find the sessions directory")]
    SwRootNotSet,

    #[error("Could not create a session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("A session has already been started in this process ({0})")]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("The session epoch was not set")]
    CannotGetEpoch,
}

/// Reasons a background save can fail.
#[derive(Error, Debug)]
enum SaveError {
    #[error("only .json paths can be saved, got extension {0:?}")]
    UnsupportedExtension(Option<String>),

    #[error("could not create the parent directory: {0}")]
    CreateDir(std::io::Error),

    #[error("could not create the file: {0}")]
    CreateFile(std::io::Error),

    #[error("could not serialise the data: {0}")]
    Serialise(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session under the software root.
    ///
    /// The session directory is `$GUID_SW_ROOT/{sessions_dir}/{exec_name}_{timestamp}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_guid_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        Self::new_in(exec_name, root.join(sessions_dir))
    }

    /// Start a new session inside an explicit parent directory.
    ///
    /// Only one session may be started per process.
    pub fn new_in<P: AsRef<Path>>(exec_name: &str, parent: P) -> Result<Self, SessionError> {
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        let timestamp = get_epoch()
            .ok_or(SessionError::CannotGetEpoch)?
            .format(TIMESTAMP_FORMAT);

        let session_root = parent
            .as_ref()
            .join(format!("{}_{}", exec_name, timestamp));
        let arch_root = session_root.join("arch");
        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        let log_file_path = session_root.join(format!("{}.log", exec_name));

        let (tx, rx) = channel();
        let thread_root = session_root.clone();
        let handle = thread::spawn(move || save_thread(thread_root, rx));

        Ok(Session {
            session_root,
            arch_root,
            log_file_path,
            save_sender: Some(tx),
            save_thread: Some(handle),
        })
    }

    /// End the session, blocking until every queued save has been written.
    pub fn exit(mut self) {
        info!("Waiting for pending saves");

        // The save thread's loop ends once the queue is empty and the sender
        // is gone
        self.save_sender.take();

        if let Some(h) = self.save_thread.take() {
            if h.join().is_err() {
                warn!("Save thread panicked");
            }
        }

        info!("Session ended");
    }

    /// Queue `data` to be written as JSON to `path`, relative to the session
    /// root.
    ///
    /// Failures are logged by the save thread, not returned.
    pub fn save<P: AsRef<Path>, T: serde::Serialize + Send + 'static>(&self, path: P, data: T) {
        let path = path.as_ref().to_path_buf();

        let sender = match self.save_sender {
            Some(ref s) => s,
            None => {
                warn!("Cannot save {:?}, the session has ended", path);
                return;
            }
        };

        let boxed: Box<dyn Serialize + Send> = Box::new(data);
        if sender.send((path.clone(), boxed)).is_err() {
            warn!("Save thread has stopped, {:?} will not be written", path);
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Seconds elapsed since the session epoch, or NaN if no session has been
/// started.
pub fn get_elapsed_seconds() -> f64 {
    get_epoch()
        .and_then(|e| time::duration_to_seconds(Utc::now() - *e))
        .unwrap_or(std::f64::NAN)
}

/// The session epoch, if a session has been started.
pub fn get_epoch() -> Option<&'static DateTime<Utc>> {
    SESSION_EPOCH.get()
}

// -----------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn save_thread(session_root: PathBuf, receiver: Receiver<SaveItem>) {
    for (path, data) in receiver {
        let full_path = session_root.join(path);

        if let Err(e) = write_json(&full_path, &*data) {
            warn!("Could not save {:?}: {}", full_path, e);
        }
    }
}

fn write_json(full_path: &Path, data: &(dyn Serialize + Send)) -> Result<(), SaveError> {
    match full_path.extension().and_then(|s| s.to_str()) {
        Some("json") => (),
        ext => {
            return Err(SaveError::UnsupportedExtension(ext.map(String::from)));
        }
    }

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).map_err(SaveError::CreateDir)?;
    }

    let file = File::create(full_path).map_err(SaveError::CreateFile)?;

    serde_json::to_writer_pretty(file, data).map_err(SaveError::Serialise)
}
