//! Sessions
//!
//! Every run of an executable is a session, stored in its own timestamped
//! directory:
//!
//! ```text
//! $HEXAPOD_SW_ROOT/sessions/hexapod_exec_20260101_120000/
//!     hexapod_exec.log
//!     arch/
//!         leg_ctrl/poses.csv
//! ```
//!
//! Starting a session also starts the session clock, which stamps log
//! records, archive rows and script timings.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::{host, time};

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// chrono format of the timestamp in session directory names.
const DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the archive directory inside a session.
const ARCH_DIR_NAME: &str = "arch";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Locations belonging to the current session.
#[derive(Clone, Debug)]
pub struct Session {
    /// Name of the executable which started the session
    pub exec_name: String,

    pub session_root: PathBuf,

    /// Directory holding all archive files
    pub arch_root: PathBuf,

    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("HEXAPOD_SW_ROOT is not set, cannot locate the sessions directory")]
    SwRootNotSet,

    #[error("Could not create the session directory {0:?}: {1}")]
    CannotCreateDir(PathBuf, std::io::Error),

    #[error("A session has already been started by this process")]
    AlreadyStarted,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start the session in `$HEXAPOD_SW_ROOT/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = host::get_hexapod_sw_root()
            .map_err(|_| SessionError::SwRootNotSet)?;

        Self::in_dir(root.join(sessions_dir), exec_name)
    }

    /// Start the session in the given directory.
    ///
    /// Only one session may be started per process.
    pub fn in_dir<P: AsRef<Path>>(parent: P, exec_name: &str) -> Result<Self, SessionError> {
        let epoch = start_clock()?;

        let session_root = parent.as_ref().join(format!(
            "{}_{}",
            exec_name,
            epoch.format(DIR_TIMESTAMP_FORMAT)
        ));
        let arch_root = session_root.join(ARCH_DIR_NAME);

        fs::create_dir_all(&arch_root)
            .map_err(|e| SessionError::CannotCreateDir(arch_root.clone(), e))?;

        Ok(Self {
            exec_name: exec_name.to_string(),
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
            arch_root,
        })
    }

    /// Full path of a file inside the archive directory. Missing parent
    /// directories are created.
    pub fn archive_path<P: AsRef<Path>>(&self, relative: P) -> std::io::Result<PathBuf> {
        let path = self.arch_root.join(relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Time at which the session clock was started, `None` if no session has been
/// started.
pub fn get_epoch() -> Option<&'static DateTime<Utc>> {
    SESSION_EPOCH.get()
}

/// Seconds on the session clock. Reads zero until a session is started.
pub fn get_elapsed_seconds() -> f64 {
    get_epoch()
        .and_then(|e| time::duration_to_seconds(Utc::now() - *e))
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn start_clock() -> Result<DateTime<Utc>, SessionError> {
    let now = Utc::now();

    SESSION_EPOCH
        .try_init_once(|| now)
        .map_err(|_| SessionError::AlreadyStarted)?;

    Ok(now)
}
