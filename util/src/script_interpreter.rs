//! # Script interpreter module
//!
//! This module provides an interpreter for timed command scripts, allowing
//! telecommands to be executed from a file rather than typed in live.
//!
//! A script is a sequence of entries of the form `<time_s>: <json>;`, where
//! the JSON payload deserialises into the command type of the interpreter.
//! Lines which do not match (for example `#` comments) are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
struct Command<T> {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The command to run
    tc: T
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_tcs` to acquire a list of telecommands that need executing.
pub struct ScriptInterpreter<T> {
    cmds: VecDeque<Command<T>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid TC at {0} s: {1}")]
    InvalidTc(f64, serde_json::Error)
}

/// Telecommands that are due for execution.
#[derive(Debug)]
pub enum PendingTcs<T> {
    None,
    Some(Vec<T>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> ScriptInterpreter<T>
where
    T: DeserializeOwned
{

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(path)
            .map_err(ScriptError::ScriptLoadError)?;

        Self::parse(&script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn parse(script: &str) -> Result<Self, ScriptError> {
        let mut tc_queue: VecDeque<Command<T>> = VecDeque::new();

        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("Script regex is invalid");

        for cap in re.captures_iter(script) {
            // Groups 1 and 3 always participate in a match
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // The scripts contain JSON only.
            let tc = serde_json::from_str(&cap[3])
                .map_err(|e| ScriptError::InvalidTc(exec_time_s, e))?;

            tc_queue.push_back(Command {
                exec_time_s,
                tc
            });
        }

        if tc_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            cmds: tc_queue
        })
    }

    /// Return the TCs which are due at the current session time.
    pub fn get_pending_tcs(&mut self) -> PendingTcs<T> {
        self.get_pending_tcs_at(get_elapsed_seconds())
    }

    /// Return the TCs which are due at the given time.
    pub fn get_pending_tcs_at(&mut self, current_time_s: f64) -> PendingTcs<T> {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript
        }

        let mut tc_vec: Vec<T> = vec![];

        // Pop items from the queue while the head's exec time has passed
        while self.cmds.front()
            .map_or(false, |c| c.exec_time_s <= current_time_s)
        {
            if let Some(cmd) = self.cmds.pop_front() {
                tc_vec.push(cmd.tc);
            }
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        }
        else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Get the number of TCs remaining in the script
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    enum TestTc {
        Go { speed: f64 },
        Stop,
    }

    const SCRIPT: &str = "\
        # A comment line\n\
        0.0: {\"Go\": {\"speed\": 1.0}};\n\
        1.5: \"Stop\";\n\
        1.5: {\"Go\": {\"speed\": -1.0}};\n";

    #[test]
    fn test_script_timing() {
        let mut si: ScriptInterpreter<TestTc> = ScriptInterpreter::parse(SCRIPT)
            .unwrap();

        assert_eq!(si.get_num_tcs(), 3);
        assert_eq!(si.get_duration(), 1.5);

        match si.get_pending_tcs_at(0.1) {
            PendingTcs::Some(tcs) => assert_eq!(tcs, vec![TestTc::Go { speed: 1.0 }]),
            p => panic!("Expected one pending TC, got {:?}", p)
        }

        assert!(matches!(si.get_pending_tcs_at(1.0), PendingTcs::None));

        match si.get_pending_tcs_at(2.0) {
            PendingTcs::Some(tcs) => assert_eq!(
                tcs,
                vec![TestTc::Stop, TestTc::Go { speed: -1.0 }]
            ),
            p => panic!("Expected two pending TCs, got {:?}", p)
        }

        assert!(matches!(si.get_pending_tcs_at(3.0), PendingTcs::EndOfScript));
    }

    #[test]
    fn test_script_errors() {
        assert!(matches!(
            ScriptInterpreter::<TestTc>::parse("# nothing here\n"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::<TestTc>::parse("2.0: {\"Jump\": 1};\n"),
            Err(ScriptError::InvalidTc(t, _)) if t == 2.0
        ));
        assert!(matches!(
            ScriptInterpreter::<TestTc>::new("/no/such/script.hxs"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
