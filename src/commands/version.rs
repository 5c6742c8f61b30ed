//! Command: print version information.

/// Print the bootstrap version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("bootstrap {}", super::version_string());
}
