use assistant_roster::config::SolverConfig;
use assistant_roster::display::{print_roster, write_roster_to_file};
use assistant_roster::parser::load_request;
use assistant_roster::service::solve_request;
use assistant_roster::web;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SolverConfig::from_env()?;
    let args: Vec<String> = std::env::args().collect();

    // Check if we should run in web mode
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        println!("Starting web server on port {}...", port);
        println!("Access the API at http://localhost:{}/api/schedule", port);

        web::start_server(port, config).await?;
        return Ok(());
    }

    let Some(request_path) = args.get(1) else {
        eprintln!("Usage: {} web [port]", args[0]);
        eprintln!("       {} <request.json> [swaps]", args[0]);
        std::process::exit(2);
    };

    let mut request = load_request(request_path)?;
    if let Some(swaps) = args.get(2) {
        request.swaps = Some(swaps.parse()?);
    }
    info!(path = %request_path, staff = request.staff.len(), "Loaded schedule request");

    let export = solve_request(&request, &config)?;
    print_roster(&export);

    println!("\n=== Writing Roster to Files ===");
    write_roster_to_file(&export, "roster.txt")?;
    export.save_json("roster.json")?;
    export.save_csv("roster.csv")?;
    println!("Roster saved to:");
    println!("  - roster.txt");
    println!("  - roster.json");
    println!("  - roster.csv");

    Ok(())
}
