use super::STACK_MAX;

/// Runtime limits and diagnostics switches.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum value stack depth.
    pub stack_max: usize,

    /// Log every executed instruction at TRACE level.
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stack_max: STACK_MAX,
            trace: false,
        }
    }
}
