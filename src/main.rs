//! Vitrine CLI - native 3D model showcase.

use vitrine::viewer::{self, InputMode, ViewerOptions};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut options = ViewerOptions::default();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            "-V" | "--version" => {
                println!(
                    "vitrine {} (built {} {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("VITRINE_BUILD_DATE"),
                    env!("VITRINE_BUILD_TIME")
                );
                return Ok(());
            }
            "-e" | "--env" => match iter.next() {
                Some(value) => options.environment = Some(value.clone()),
                None => {
                    eprintln!("--env needs a URL or file path");
                    std::process::exit(1);
                }
            },
            "--orbit" => options.input_mode = Some(InputMode::Orbit),
            other if !other.starts_with('-') => options.model = Some(other.to_string()),
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
    }

    viewer::run(options)
}

fn print_usage(prog: &str) {
    println!("Vitrine - 3D model showcase");
    println!();
    println!("Usage: {} [options] [model.gltf|model.glb]", prog);
    println!();
    println!("Options:");
    println!("  -e, --env <url|path>  Equirectangular HDR environment map");
    println!("      --orbit           Drag-to-orbit camera instead of pointer follow");
    println!("  -h, --help            Show this help");
    println!("  -V, --version         Show version and build date");
    println!();
    println!("Logging is controlled with RUST_LOG (e.g. RUST_LOG=info).");
}
