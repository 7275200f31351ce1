//! Build script: embeds version information into the binary.

use std::process::Command;

fn main() {
    // Release builds may pin the version; local builds describe the checkout.
    if let Ok(version) = std::env::var("DOTFILES_SETUP_VERSION") {
        println!("cargo:rustc-env=DOTFILES_SETUP_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=DOTFILES_SETUP_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DOTFILES_SETUP_VERSION");
}
