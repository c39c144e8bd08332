use stderrlog::{LogLevelNum, Timestamp};

/// Logging arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    quiet: bool,

    /// More log output (-v, -vv, -vvv); replaces the command's default level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prefix log lines with timestamps.
    #[clap(short, long)]
    ts: bool,
}

/// Map a verbosity count to a level; 0 keeps the command default.
fn level_for(
    verbose: u8,
    default: u8,
) -> LogLevelNum {
    match if verbose > 0 { verbose } else { default } {
        0 => LogLevelNum::Off,
        1 => LogLevelNum::Error,
        2 => LogLevelNum::Warn,
        3 => LogLevelNum::Info,
        4 => LogLevelNum::Debug,
        _ => LogLevelNum::Trace,
    }
}

impl LogArgs {
    /// Install the stderr logger for this crate and `wordembed`.
    pub fn setup_logging(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        stderrlog::new()
            .module("wordembed")
            .module(env!("CARGO_CRATE_NAME"))
            .quiet(self.quiet)
            .verbosity(level_for(self.verbose, default))
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert!(matches!(level_for(0, 2), LogLevelNum::Warn));
        assert!(matches!(level_for(0, 0), LogLevelNum::Off));
        assert!(matches!(level_for(1, 3), LogLevelNum::Error));
        assert!(matches!(level_for(4, 2), LogLevelNum::Debug));
        assert!(matches!(level_for(9, 2), LogLevelNum::Trace));
    }
}
