//! Bakecost
//!
//! An MCP server for bakery ingredient and recipe costing.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use bakecost::build_info;
use bakecost::mcp::BakecostService;
use bakecost::snapshot::{get_snapshot_path, Snapshot};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bakecost=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let snapshot_path = get_snapshot_path();
    eprintln!("Snapshot path: {}", snapshot_path.display());

    let snapshot = Snapshot::load(&snapshot_path)?;
    eprintln!(
        "Snapshot loaded: {} ingredients, {} recipes",
        snapshot.ingredient_count(),
        snapshot.recipe_count()
    );

    // Create the Bakecost service
    let service = BakecostService::new(snapshot_path, snapshot);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
