use std::process;

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }

    /// Exit status for a finished run. Per-file failures only count when
    /// `strict` is set; directory errors never reach this point.
    pub fn for_run(has_failures: bool, strict: bool) -> Self {
        if strict && has_failures {
            ExitCode::GeneralError
        } else {
            ExitCode::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_run() {
        assert_eq!(ExitCode::for_run(false, false), ExitCode::Success);
        assert_eq!(ExitCode::for_run(true, false), ExitCode::Success);
        assert_eq!(ExitCode::for_run(true, true), ExitCode::GeneralError);
        assert_eq!(ExitCode::InvalidUsage as i32, 2);
    }
}
