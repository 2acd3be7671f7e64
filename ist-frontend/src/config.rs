/// How a [`Frontend`](crate::Frontend) runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    pub(crate) recover: bool,
    pub(crate) error_limit: usize,
    pub(crate) timings: bool,
}

impl Config {
    /// Errors collected per source unit before a recovering run gives up.
    pub const DEFAULT_ERROR_LIMIT: usize = 32;

    pub fn new(recover: bool, error_limit: usize, timings: bool) -> Self {
        Self {
            recover,
            error_limit: error_limit.max(1),
            timings,
        }
    }

    /// Keep going after errors and report as many as `error_limit` of them.
    pub fn recover(&self) -> bool {
        self.recover
    }

    pub fn error_limit(&self) -> usize {
        self.error_limit
    }

    /// Log how long each phase takes.
    pub fn timings(&self) -> bool {
        self.timings
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(false, Self::DEFAULT_ERROR_LIMIT, false)
    }
}
