//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::TimerConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A state-managed HTTP server for a Pomodoro interval timer and focus dashboard")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work session length in minutes (1-60)
    #[arg(short, long, default_value = "25")]
    pub work: u32,

    /// Short break length in minutes (1-30)
    #[arg(short, long, default_value = "5")]
    pub short_break: u32,

    /// Long break length in minutes (1-60)
    #[arg(short, long, default_value = "15")]
    pub long_break: u32,

    /// Work sessions before a long break (1-10)
    #[arg(short = 'i', long, default_value = "4")]
    pub long_break_interval: u32,

    /// Start the next phase automatically when one ends
    #[arg(short, long)]
    pub auto_start: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial timer configuration, not yet validated
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::new(
            self.work,
            self.short_break,
            self.long_break,
            self.long_break_interval,
            self.auto_start,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let config = Config::try_parse_from(["focus-timer"]).unwrap();
        assert_eq!(config.timer_config(), TimerConfig::default());
        assert_eq!(config.address(), "127.0.0.1:20553");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn timer_flags_are_parsed() {
        let config = Config::try_parse_from([
            "focus-timer", "-w", "50", "-s", "10", "-l", "30", "-i", "2", "--auto-start", "-v",
        ])
        .unwrap();
        assert_eq!(config.timer_config(), TimerConfig::new(50, 10, 30, 2, true));
        assert_eq!(config.log_level(), "debug");
    }
}
