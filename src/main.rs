use intentbot::{ arguments, logger::{ self, LogTag }, paths, run };

/// Main entry point for intentbot
///
/// Thin glue: ensure directories exist before the logger initializes, then
/// dispatch the requested mode. Everything interesting lives in the library.
fn main() {
    // Ensure all directories exist BEFORE logger initialization
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if arguments::is_help_requested() {
        run::print_help();
        return;
    }

    if let Err(e) = run::run() {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}
