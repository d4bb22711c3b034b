//! Host-side helper: `cargo run` compiles the site with wasm-pack into
//! `static/pkg`, then serves `static/` locally. Pass `--share` to also open
//! an ngrok tunnel.

use std::process::{exit, Command, Stdio};
use std::{env, thread, time::Duration};

const DEFAULT_PORT: &str = "8000";

fn main() {
    let share = env::args().any(|arg| arg == "--share");
    let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    println!("Serving portfolio at http://127.0.0.1:{port} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(err) = server {
        eprintln!("failed to start http server: {err}");
        exit(1);
    }

    if share {
        match Command::new("ngrok")
            .args(["http", &port])
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(_) => println!("ngrok tunnel starting …"),
            Err(_) => eprintln!("ngrok not found. Install it to expose the site over the internet."),
        }
    }

    // Keep process alive
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
