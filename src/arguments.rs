/// Centralized argument handling for intentbot
///
/// Consolidates command-line argument parsing and debug flag checking:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking per module (--debug-<module>, --verbose)
/// - Positional argument extraction for the subcommand surface
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Debug keys enabled via --debug-<module> flags, filled once by scan_debug_flags
static DEBUG_MODULES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
    scan_debug_flags();
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args()
        .iter()
        .any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

/// Flags that consume the following argument as their value
const VALUE_FLAGS: [&str; 1] = ["--configs"];

/// Positional (non-flag) arguments after the program name, in order
pub fn positional_args() -> Vec<String> {
    let args = get_cmd_args();
    let mut positional = Vec::new();
    let mut skip_next = false;
    for arg in args.into_iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with("--") {
            skip_next = VALUE_FLAGS.contains(&arg.as_str());
            continue;
        }
        positional.push(arg);
    }
    positional
}

/// Scan arguments for --debug-<module> flags and remember the enabled modules
pub fn scan_debug_flags() {
    let mut enabled = HashSet::new();
    for arg in get_cmd_args() {
        if let Some(module) = arg.strip_prefix("--debug-") {
            enabled.insert(module.to_string());
        }
    }
    if let Ok(mut modules) = DEBUG_MODULES.lock() {
        *modules = enabled;
    }
}

/// Whether debug output is enabled for a module key
/// --verbose enables debug output for every module
pub fn is_debug_enabled(module: &str) -> bool {
    if has_arg("--verbose") {
        return true;
    }
    match DEBUG_MODULES.lock() {
        Ok(modules) => modules.contains(module),
        Err(_) => false,
    }
}

/// Whether --quiet was passed (suppresses info/warning output)
pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

/// Whether help was requested
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h") || has_arg("help")
}

/// Path of the configs file, overridable with --configs <path>
pub fn configs_path() -> String {
    get_arg_value("--configs").unwrap_or_else(|| "configs.json".to_string())
}
