//! Command line: host options first, then everything else verbatim for the engine.

use std::path::PathBuf;

use clap::Parser;

const PATH_FLAG: &str = "--path";
const MAIN_PACK_FLAG: &str = "--main-pack";

#[derive(Parser, Debug, Clone)]
#[command(name = "ehost")]
#[command(about = "Hosts an embedded engine inside a native window", long_about = None)]
pub struct Cli {
    /// Host configuration file (JSON). Defaults to ./ehost.json when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Engine dynamic library to load
    #[arg(long = "engine-library")]
    pub engine_library: Option<PathBuf>,

    /// Render area width in logical points
    #[arg(long)]
    pub width: Option<u32>,

    /// Render area height in logical points
    #[arg(long)]
    pub height: Option<u32>,

    /// Wait for the Start button instead of loading the project immediately
    #[arg(long = "no-autostart", default_value = "false")]
    pub no_autostart: bool,

    /// Log filter, e.g. "info" or "ehost_platform=trace"
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Project source (`--path <dir>`, `--main-pack <file>` or `<dir>`) and extra engine arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Project location named by the engine arguments, if any.
///
/// `--path <dir>` or `--main-pack <file>` anywhere wins; otherwise a leading
/// positional argument is taken as the project directory.
pub fn project_source(args: &[String]) -> Option<PathBuf> {
    let flagged = args
        .windows(2)
        .find(|pair| pair[0] == PATH_FLAG || pair[0] == MAIN_PACK_FLAG)
        .map(|pair| PathBuf::from(&pair[1]));
    if flagged.is_some() {
        return flagged;
    }
    args.first()
        .filter(|first| *first != PATH_FLAG && *first != MAIN_PACK_FLAG && !first.starts_with('-'))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_path_flag_anywhere_is_used() {
        let args = strings(&["--verbose", "--path", "/games/demo", "--fullscreen"]);
        assert_eq!(project_source(&args), Some(PathBuf::from("/games/demo")));
    }

    #[test]
    fn test_main_pack_flag_is_used() {
        let args = strings(&["--main-pack", "demo.pck"]);
        assert_eq!(project_source(&args), Some(PathBuf::from("demo.pck")));
    }

    #[test]
    fn test_leading_positional_is_the_project() {
        let args = strings(&["./demo", "--verbose"]);
        assert_eq!(project_source(&args), Some(PathBuf::from("./demo")));
    }

    #[test]
    fn test_flags_alone_name_no_project() {
        assert_eq!(project_source(&strings(&["--verbose"])), None);
        assert_eq!(project_source(&strings(&["--path"])), None);
        assert_eq!(project_source(&[]), None);
    }

    #[test]
    fn test_host_options_precede_passthrough() {
        let cli = Cli::parse_from([
            "ehost",
            "--width",
            "800",
            "--no-autostart",
            "--path",
            "/games/demo",
            "--verbose",
        ]);
        assert_eq!(cli.width, Some(800));
        assert!(cli.no_autostart);
        assert_eq!(cli.args, strings(&["--path", "/games/demo", "--verbose"]));
    }

    #[test]
    fn test_positional_project_is_passed_through() {
        let cli = Cli::parse_from(["ehost", "demo", "--fullscreen"]);
        assert_eq!(cli.args, strings(&["demo", "--fullscreen"]));
        assert_eq!(project_source(&cli.args), Some(PathBuf::from("demo")));
    }
}
