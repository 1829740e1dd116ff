use connection_check::{load_env_file, run_check};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // before logging so RUST_LOG may come from .env
    let env_file = load_env_file();

    let default_filter = env_file
        .as_ref()
        .ok()
        .and_then(|f| f.as_ref())
        .and_then(|f| f.get("RUST_LOG"))
        .unwrap_or("warn")
        .to_string();

    // logs go to stderr, stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let env_file = match env_file {
        Ok(Some(f)) => {
            debug!("Loaded {} variables from {}", f.len(), f.path.display());
            for line in &f.skipped {
                warn!("⚠️ Skipped malformed line in {}: {}", f.path.display(), line);
            }
            Some(f)
        }
        Ok(None) => {
            debug!("No .env file found, using process environment");
            None
        }
        Err(e) => {
            warn!("⚠️ Ignoring .env file: {:#}", e);
            None
        }
    };

    let outcome = run_check(env_file.as_ref()).await;
    println!("{}", outcome);
}
