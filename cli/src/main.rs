use channel_common::db::core::{ChannelDB, PairTable};
use channel_common::db::parser::pairs;
use channel_common::db::route::{Grid, Routing, track_spans};
use channel_common::error::RouteError;
use channel_common::util::config::Config;
use channel_common::util::{check, generator, logger, visualization};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Route {
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    Generate {
        #[arg(long, default_value_t = 12)]
        columns: usize,
        #[arg(long, default_value_t = 8)]
        nets: usize,
        #[arg(long, default_value = "inputs/pairs.txt")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Route { input: None });

    match command {
        Commands::Generate {
            columns,
            nets,
            output,
        } => {
            prepare_output_dir(&output)?;
            log::info!(
                "Generating random channel ({} columns, {} nets)...",
                columns,
                nets
            );
            let table = generator::random_pairs_default(columns, nets);
            generator::write_pairs_file(&output, &table)?;
            log::info!("Generated: {} ({})", output, pairs::format_pairs(&table));
        }
        Commands::Route { input } => {
            let pairs_file = input
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| config.input.pairs_file.clone());
            if !Path::new(&pairs_file).exists() {
                return Err(anyhow::anyhow!(
                    "Input contact list missing: '{}'. Run 'generate' or point --input at one.",
                    pairs_file
                ));
            }
            prepare_output_dir(&config.input.output_report)?;
            prepare_output_dir(&config.input.output_image)?;

            if run_route(&config, &pairs_file).is_err() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn run_route(config: &Config, pairs_file: &str) -> anyhow::Result<()> {
    log::info!("Reading contact list: {}", pairs_file);
    let text = std::fs::read_to_string(pairs_file)?;
    let table = pairs::parse(text.trim())
        .map_err(|e| anyhow::anyhow!("Invalid contact list in '{}': {}", pairs_file, e))?;

    let mut db = ChannelDB::from_table(&table)?;

    log::info!("Starting channel routing...");
    let routing = match channel_router::route(&mut db) {
        Ok(routing) => routing,
        Err(RouteError::UnresolvableCycle) => {
            log::error!(
                "Routing infeasible: a vertical constraint cycle cannot be broken. \
                 Alter the contact list and retry."
            );
            return Err(RouteError::UnresolvableCycle.into());
        }
        Err(e) => return Err(e.into()),
    };

    print_channel(&routing.grid, &table);

    if config.routing.verify {
        check::run(&db, &routing).map_err(|e| anyhow::anyhow!("Verification failed: {}", e))?;
    }

    write_report(&config.input.output_report, &db, &routing)?;
    log::info!("Wrote route report to {}", config.input.output_report);

    visualization::draw_channel(
        &routing.grid,
        &config.input.output_image,
        config.render.cell_size,
        config.render.margin,
    );
    log::info!("Wrote channel image to {}", config.input.output_image);

    Ok(())
}

fn print_channel(grid: &Grid, table: &PairTable) {
    let labels = |row: &[u32]| {
        row.iter()
            .map(|l| format!("{:>3}", l))
            .collect::<String>()
    };

    println!("     {}", labels(&table.top));
    for (i, row) in grid.iter().enumerate() {
        let header = if i % 2 == 1 {
            format!("{:>3}", (i - 1) / 2)
        } else {
            "   ".to_string()
        };
        let cells = row
            .iter()
            .map(|c| format!("{:>3}", if c.is_empty() { "." } else { c.as_str() }))
            .collect::<String>();
        println!("{} |{}", header, cells);
    }
    println!("     {}", labels(&table.bottom));
}

fn write_report(path: &str, db: &ChannelDB, routing: &Routing) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for (track, spans) in track_spans(db, &routing.assignment).iter().enumerate() {
        writeln!(file, "{}:", track)?;
        let mut line = String::new();
        for span in spans {
            line.push_str(&format!("{}({},{}); ", span.net, span.left, span.right));
        }
        writeln!(file, "{}", line)?;
    }
    Ok(())
}
