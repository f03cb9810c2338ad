//! Engine command line: host-injected driver flags followed by the user's arguments.

/// Selects the host-provided display server instead of a native one.
pub const DISPLAY_DRIVER_FLAGS: [&str; 2] = ["--display-driver", "embedded"];

/// macOS renders through Metal on the exported layer.
#[cfg(target_os = "macos")]
pub const RENDERING_DRIVER_FLAGS: &[&str] = &["--rendering-driver", "metal"];
#[cfg(not(target_os = "macos"))]
pub const RENDERING_DRIVER_FLAGS: &[&str] = &[];

/// Builds the engine argv: program name, injected flags, then `passthrough` unchanged.
pub fn engine_argv(program: &str, passthrough: &[String]) -> Vec<String> {
    let mut argv = Vec::with_capacity(1 + DISPLAY_DRIVER_FLAGS.len() + passthrough.len() + 2);
    argv.push(program.to_string());
    argv.extend(DISPLAY_DRIVER_FLAGS.iter().map(|s| s.to_string()));
    argv.extend(RENDERING_DRIVER_FLAGS.iter().map(|s| s.to_string()));
    argv.extend(passthrough.iter().cloned());
    argv
}

/// Platform file name of the engine library, e.g. `libengine.so` or `engine.dll`.
pub fn default_library_name() -> String {
    format!(
        "{}engine{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_flags_precede_passthrough() {
        let passthrough = vec![
            "--path".to_string(),
            "demo".to_string(),
            "--verbose".to_string(),
        ];
        let argv = engine_argv("ehost", &passthrough);
        assert_eq!(argv[0], "ehost");
        assert_eq!(&argv[1..3], &["--display-driver", "embedded"]);
        assert_eq!(&argv[argv.len() - 3..], passthrough.as_slice());
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn macos_selects_metal() {
        let argv = engine_argv("ehost", &[]);
        assert_eq!(argv, ["ehost", "--display-driver", "embedded", "--rendering-driver", "metal"]);
    }

    #[test]
    #[cfg(not(target_os = "macos"))]
    fn other_platforms_inject_display_driver_only() {
        let argv = engine_argv("ehost", &[]);
        assert_eq!(argv, ["ehost", "--display-driver", "embedded"]);
    }

    #[test]
    fn test_library_name_contains_engine() {
        let name = default_library_name();
        assert!(name.contains("engine"));
        assert!(name.ends_with(std::env::consts::DLL_SUFFIX));
    }
}
