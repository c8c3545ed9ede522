//! Evaluation Context

/// Default number of decimals used when presenting unit conversion results
pub const DEFAULT_DECIMALS: u32 = 6;

/// Evaluation context passed to plugins
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Decimal places used for `display` fields; formulas never round
    pub decimals: u32,
}

impl EvalContext {
    pub fn new() -> Self {
        Self { decimals: DEFAULT_DECIMALS }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
