//! kubectl-tree - show the objects a Kubernetes object owns
//!
//! Walks ownerReferences across every list-capable resource type the API
//! server advertises and prints the result as a tree.

use clap::Parser;
use kubetree::cli::{self, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = cli::init_logging(args.verbose, args.log_file.as_deref()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli::run(args).await {
        tracing::debug!(error = ?e, "run failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
