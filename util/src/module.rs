//! Control module interface
//!
//! A control module is initialised once, then stepped once per cycle by the
//! executable's main loop. Each step takes the module's input for that cycle
//! and hands back its output together with a status report. Nothing else
//! passes between the main loop and a module.

/// Cyclic state of a control module.
pub trait State {
    /// What `init` needs, typically the name of a parameter file.
    type InitData;
    type InitError;

    type InputData;
    type OutputData;

    /// Non-fatal problems found while stepping, e.g. commands that could only
    /// be partially executed.
    type StatusReport;

    /// Fatal problems for this step. The module state is left unchanged when
    /// one is returned.
    type ProcError;

    /// Initialise the module, replacing any previous state.
    fn init(&mut self, init_data: Self::InitData)
        -> Result<(), Self::InitError>;

    /// Step the module once.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
