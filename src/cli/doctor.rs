//! Environment readiness check.

use anyhow::Result;

use crate::renderer::chromium::find_chromium;

/// Check Chromium availability and output-directory writability.
pub async fn run() -> Result<()> {
    println!("Sitegrab Doctor");
    println!("===============");
    println!();

    // OS and architecture
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    println!("OS:   {os}");
    println!("Arch: {arch}");
    println!();

    // Check Chromium
    let chromium_path = find_chromium();
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome/Chromium or set SITEGRAB_CHROMIUM_PATH."
        ),
    }

    // Check that clone output can be created in the working directory
    let writable = probe_working_directory();
    match std::env::current_dir() {
        Ok(cwd) if writable => println!("[OK] Working directory {} is writable", cwd.display()),
        Ok(cwd) => println!("[!!] Working directory {} is not writable", cwd.display()),
        Err(_) => println!("[??] Could not determine the working directory"),
    }

    println!();
    let ready = chromium_path.is_some() && writable;
    if ready {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
        if chromium_path.is_none() {
            println!("  Install Chrome/Chromium or point SITEGRAB_CHROMIUM_PATH at a binary.");
        }
        if !writable {
            println!("  Run sitegrab from a directory you can write to, or pass --output.");
        }
    }

    Ok(())
}

/// Clones land in the working directory by default, so probe it with a
/// throwaway file.
fn probe_working_directory() -> bool {
    let probe = std::path::Path::new(".sitegrab-doctor-probe");
    match std::fs::write(probe, b"probe") {
        Ok(()) => {
            let _ = std::fs::remove_file(probe);
            true
        }
        Err(_) => false,
    }
}
