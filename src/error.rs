//! Process exit codes.

/// Exit codes for the treedupe process.
///
/// A completed run exits successfully even when some groups stayed
/// unresolved or some sink actions failed; those are warnings, not
/// failures. Non-zero codes are reserved for configuration errors and for
/// runs that could not scan anything at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run completed; warnings may have been reported.
    Success = 0,
    /// An unexpected failure, including a run where no source was scannable.
    GeneralError = 1,
    /// Invalid arguments or a malformed configuration file.
    ConfigError = 2,
    /// The user aborted the run from an interactive prompt.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::ConfigError.as_i32(), 2);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }
}
