use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use creator_auction_bids::{
    monitoring,
    replay,
    session::BidSession,
    types::{AppConfig, BidAmount, Dollars},
    valuation::{self, BidContext, BidParams},
};

#[derive(Parser, Debug)]
#[command(name = "creator-auction-bids")]
#[command(about = "Bid valuation and sealed-bid session tooling for creator auctions", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the floor, opening amount and quick-add targets for an item
    Quote {
        /// Current (hidden) leading bid on the item
        #[arg(short, long, default_value_t = 0)]
        leading_bid: Dollars,
    },
    /// Validate and grade a typed bid amount
    Classify {
        /// Amount as typed, e.g. "$1,234.50"
        amount: String,
        #[arg(short, long, default_value_t = 0)]
        leading_bid: Dollars,
    },
    /// Replay scripted bidding sessions
    Replay {
        /// Optional path to replay configuration
        #[arg(short, long)]
        script: Option<String>,
    },
}

#[derive(Serialize)]
struct Quote {
    dynamic_minimum: Dollars,
    maximum_bid: Dollars,
    opening_amount: BidAmount,
    opening_quality: &'static str,
    quick_add: Vec<BidAmount>,
}

#[derive(Serialize)]
struct Classification {
    amount: BidAmount,
    dynamic_minimum: Dollars,
    quality: &'static str,
    color: &'static str,
    submittable: bool,
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "creator_auction_bids=info,bid=info,metrics=info,replay=info,warn");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    tracing::debug!(target: "bid", config = %cli.config, "loading config");

    let settings = AppConfig::from_file(&cli.config)?;
    monitoring::logger::log_startup(&settings);
    let params = BidParams::from(&settings.bidding);

    match cli.command {
        Commands::Quote { leading_bid } => {
            let context = BidContext::new(&params, leading_bid);
            let session = BidSession::open(context, &params, settings.slider.track_extent)?;
            let quick_add = params
                .quick_increments
                .iter()
                .filter_map(|&inc| {
                    valuation::apply_quick_increment(session.amount(), inc, params.maximum_bid).ok()
                })
                .collect();

            let quote = Quote {
                dynamic_minimum: session.dynamic_minimum(),
                maximum_bid: params.maximum_bid,
                opening_amount: session.amount(),
                opening_quality: session.quality().label(),
                quick_add,
            };
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Commands::Classify {
            amount,
            leading_bid,
        } => {
            let context = BidContext::new(&params, leading_bid);
            let dynamic_minimum = context.dynamic_minimum();
            let parsed = valuation::parse_custom_amount(&amount)?;
            let quality = valuation::classify_bid(parsed, dynamic_minimum);
            let verdict = valuation::validate_amount(parsed, dynamic_minimum, context.maximum_bid);

            let classification = Classification {
                amount: parsed,
                dynamic_minimum,
                quality: quality.label(),
                color: quality.color(),
                submittable: verdict.is_ok(),
                error: verdict.err().map(|e| e.to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Commands::Replay { script } => {
            let script_path = script.unwrap_or_else(|| "config/replay.toml".to_string());
            let replay_cfg = replay::ReplayConfig::from_file(&script_path)?;
            replay::runner::run_replay(replay_cfg)?;
        }
    }

    Ok(())
}
