//! Main hexapod executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand acquisition, from a script or the console
//!         - Telecommand processing, updating the control panel
//!         - Leg control processing
//!         - Archiving
//!
//! # Modules
//!
//! All modules (e.g. `leg_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use structopt::StructOpt;

// Internal
use hexapod_lib::{
    data_store::DataStore,
    params::HexapodExecParams,
    tc::Tc,
    tc_processor,
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Prompt shown by the console.
const PROMPT: &str = "hexapod $ ";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexapod_exec", about = "Hexapod leg control executable")]
struct Opts {
    /// Path to a TC script to run. If not given TCs are read from the console.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Minimum level of log messages, must be at least `info`.
    #[structopt(short, long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the telecommands incoming to the exec.
enum TcSource {
    Console(DefaultEditor),
    Script(ScriptInterpreter<Tc>),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "hexapod_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    logger_init(opts.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Hexapod Leg Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: HexapodExecParams = util::params::load(
        "hexapod_exec.toml"
    ).wrap_err("Could not load exec params")?;

    let cycle_period = exec_params.cycle_period()
        .wrap_err("Invalid exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    let mut tc_source = match opts.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path)
                .wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            TcSource::Script(si)
        },
        None => {
            info!("No script provided, TCs will be read from the console\n");

            TcSource::Console(
                DefaultEditor::new().wrap_err("Failed to start the console")?
            )
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.leg_ctrl.init("leg_ctrl.toml")
        .wrap_err("Failed to initialise LegCtrl")?;
    info!("LegCtrl init complete");

    if exec_params.archive_poses {
        ds.leg_ctrl.init_archive(&session)
            .wrap_err("Failed to initialise the LegCtrl archive")?;
        info!("LegCtrl archive initialised");
    }

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        let cycle_start_instant = Instant::now();

        // ---- TELECOMMAND PROCESSING ----

        match tc_source {
            TcSource::Console(ref mut rl) => match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();

                    match Tc::from_line(&line) {
                        Ok(tc) => tc_processor::exec(&mut ds, &tc),
                        Err(e) => {
                            println!("{}", e.message);
                            continue;
                        }
                    }
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    info!("Console closed, stopping");
                    break
                },
                Err(e) => return Err(e).wrap_err("Failed to read from the console")
            },

            TcSource::Script(ref mut si) => match si.get_pending_tcs() {
                PendingTcs::None => (),
                PendingTcs::Some(tc_vec) => {
                    for tc in tc_vec.iter() {
                        tc_processor::exec(&mut ds, tc);
                    }
                },
                PendingTcs::EndOfScript => {
                    info!("End of TC script reached, stopping");
                    break
                }
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        ds.cycle();

        // ---- WRITE ARCHIVES ----

        if exec_params.archive_poses {
            if let Err(e) = ds.leg_ctrl.write() {
                warn!("Could not archive LegCtrl poses: {}", e);
            }
        }

        if ds.exit_requested {
            info!("Exit requested, stopping");
            break
        }

        // ---- CYCLE MANAGEMENT ----

        // The console blocks waiting for input so only scripts are paced
        if let TcSource::Script(_) = tc_source {
            let cycle_dur = Instant::now() - cycle_start_instant;

            match cycle_period.checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => debug!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                )
            }
        }
    }

    // ---- SHUTDOWN ----

    ds.print_status();

    info!("End of execution after {} cycles", ds.num_cycles);

    Ok(())
}
