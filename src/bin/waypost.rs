//! Waypost server binary.

use std::net::IpAddr;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use waypost::logging::init_logging;
use waypost::server::{serve, ServerOptions};

#[derive(Debug, Parser)]
#[command(name = "waypost", version, about = "Sale-point routing service")]
struct Args {
    /// SQLite database file, created if missing.
    #[arg(long, env = "WAYPOST_DB", default_value = "waypost.db")]
    db: PathBuf,

    /// Interface to bind.
    #[arg(long, env = "WAYPOST_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Listening port.
    #[arg(long, env = "WAYPOST_PORT", default_value_t = 8080)]
    port: u16,

    /// Log filter, in tracing env-filter syntax.
    #[arg(long, env = "WAYPOST_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(err) = run(args).await {
        eprintln!("waypost: {err}");
        process::exit(1);
    }
}

async fn run(args: Args) -> waypost::Result<()> {
    init_logging(&args.log)?;
    serve(ServerOptions {
        db_path: args.db,
        host: args.host,
        port: args.port,
    })
    .await
}
