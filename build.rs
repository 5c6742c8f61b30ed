use std::process::Command;

fn main() {
    // Prefer BOOTSTRAP_VERSION env var if set (e.g., by a release build),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("BOOTSTRAP_VERSION") {
        println!("cargo:rustc-env=BOOTSTRAP_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=BOOTSTRAP_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=BOOTSTRAP_VERSION");
}
