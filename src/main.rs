use anyhow::{Context, Result};
use clap::Parser;

use tilecheck::checks;
use tilecheck::core::config::Config;
use tilecheck::client::session::Session;
use tilecheck::{report, runner};

#[derive(Parser, Debug)]
#[command(name = "tilecheck")]
#[command(about = "Black-box validation of the tile shop management app over HTTP")]
struct Args {
    /// Override TILECHECK_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override TILECHECK_PATH_PREFIX (e.g. "/public" or "")
    #[arg(long)]
    prefix: Option<String>,

    /// Run a single suite: auth, inventory, purchases, quotations, invoices, reports
    #[arg(long)]
    suite: Option<String>,

    /// Skip scenarios that create server-side records
    #[arg(long)]
    skip_mutating: bool,

    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    std::fs::create_dir_all("logs").context("Failed to create logs directory")?;
    let log_file_path = format!("logs/tilecheck-{}.log", chrono::Utc::now().format("%Y-%m-%d"));
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .chain(fern::log_file(&log_file_path)?)
        .apply()
        .context("Failed to initialize logger")?;

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(prefix) = args.prefix {
        config.path_prefix = prefix;
    }

    println!("Tile Shop Management App Validation");
    println!("{}", "=".repeat(80));
    println!();
    println!("Target: {}{}", config.base_url, config.path_prefix);
    println!("This run validates:");
    println!("  - Login form and session handling");
    println!("  - Inventory pages (stock columns, vendor filter, stock adjustment, QR)");
    println!("  - Purchase entries (tiles and other items, damage and field validation)");
    println!("  - Quotations (creation, validation, list filters, discounts)");
    println!("  - Invoices (creation page, discounts, mark-as-paid)");
    println!("  - Reports (dashboard, sales, daily business, commission)");
    println!();
    println!("{}", "=".repeat(80));
    println!();

    let suite = args.suite.clone();
    let wants = |name: &str| suite.as_deref().map_or(true, |s| s.eq_ignore_ascii_case(name));

    let mut session = Session::new(&config).context("Failed to create session")?;
    let mut results = Vec::new();

    if wants("auth") {
        println!("1) Checking Authentication...");
        println!("{}", "-".repeat(80));
        results.extend(runner::run_flow("Authentication", checks::auth::check_login(&mut session)).await);
        results
            .extend(runner::run_flow("Rejected Login", checks::auth::check_rejected_login(&config)).await);
        println!();
    }

    if wants("inventory") {
        println!("2) Checking Inventory Pages...");
        println!("{}", "-".repeat(80));
        results.extend(
            runner::run_all(&mut session, &checks::inventory::scenarios(), args.skip_mutating).await,
        );
        println!();
    }

    if wants("purchases") {
        println!("3) Checking Purchase Entries...");
        println!("{}", "-".repeat(80));
        results.extend(
            runner::run_all(&mut session, &checks::purchases::scenarios(), args.skip_mutating).await,
        );
        if args.skip_mutating {
            log::info!("Skipping mutating scenario: Purchase Entries");
        } else {
            results.extend(
                runner::run_flow(
                    "Purchase Entries",
                    checks::purchases::check_purchase_entries(&mut session),
                )
                .await,
            );
        }
        println!();
    }

    if wants("quotations") {
        println!("4) Checking Quotations...");
        println!("{}", "-".repeat(80));
        results.extend(
            runner::run_all(&mut session, &checks::quotations::scenarios(), args.skip_mutating).await,
        );
        if args.skip_mutating {
            log::info!("Skipping mutating scenario: Quotation Creation");
        } else {
            results.extend(
                runner::run_flow(
                    "Quotation Lifecycle",
                    checks::quotations::check_quotation_lifecycle(&mut session),
                )
                .await,
            );
        }
        println!();
    }

    if wants("invoices") {
        println!("5) Checking Invoices...");
        println!("{}", "-".repeat(80));
        results.extend(
            runner::run_all(&mut session, &checks::invoices::scenarios(), args.skip_mutating).await,
        );
        println!();
    }

    if wants("reports") {
        println!("6) Checking Reports...");
        println!("{}", "-".repeat(80));
        results
            .extend(runner::run_flow("Reports Dashboard", checks::reports::check_dashboard(&mut session)).await);
        results.extend(
            runner::run_all(&mut session, &checks::reports::scenarios(), args.skip_mutating).await,
        );
        println!();
    }

    report::print_summary(&results, args.verbose);

    let code = report::exit_code(&results);
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
