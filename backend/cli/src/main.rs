use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use quota::{Buyer, GenerationRequest, Generated, RngDraw};
use rifa_cli::{
    Session, Source,
    config::Config,
    load_raffle,
    models::Hold,
    remote::Remote,
    report,
    utils::{format_time_left, parse_quota_list},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Raffle id to fetch from the backend
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    raffle: Option<u64>,

    /// Raffle record stored as JSON
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Availability, limits and package prices
    Summary,

    /// Draw random quotas
    Random {
        #[arg(long)]
        count: u32,
    },

    /// Draw a catalog package (p5, p10, p50)
    Package {
        #[arg(long)]
        id: String,
    },

    /// Preview every open quota in a range
    Interval {
        #[arg(long)]
        from: u32,

        #[arg(long)]
        to: u32,
    },

    /// Reserve hand-picked quotas, e.g. `--quotas 1,2,10-14`
    Reserve {
        #[arg(long)]
        quotas: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        cpf: String,

        #[arg(long)]
        phone: String,

        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = Config::load()?;
    let remote = Remote::new(&config)?;

    let source = match (args.raffle, args.file) {
        (Some(id), _) => Source::Remote(id),
        (None, Some(path)) => Source::File(path),
        (None, None) => anyhow::bail!("Either --raffle or --file is required"),
    };

    let mut session = Session::new(load_raffle(&remote, &source).await?)?;
    let ratio = config.quotas_per_ebook;
    let mut draw = RngDraw::thread();

    match args.command {
        Command::Summary => {
            print!(
                "{}",
                report::overview(
                    &session.raffle,
                    &session.engine,
                    &session.catalog,
                    session.unit_price
                )
            );
        }
        Command::Random { count } => {
            session.generate(&GenerationRequest::Random { count }, &mut draw)?;
            print!("{}", report::selection(&session.engine, session.unit_price, ratio));
        }
        Command::Package { id } => {
            let request = session.package_request(&id)?;
            session.generate(&request, &mut draw)?;
            print!("{}", report::selection(&session.engine, session.unit_price, ratio));
        }
        Command::Interval { from, to } => {
            if let Generated::Preview(preview) =
                session.generate(&GenerationRequest::Interval { from, to }, &mut draw)?
            {
                print!(
                    "{}",
                    report::preview(&preview, session.engine.universe().total())
                );
            }
        }
        Command::Reserve {
            quotas,
            name,
            email,
            cpf,
            phone,
            dry_run,
        } => {
            let numbers = parse_quota_list(&quotas, session.engine.universe().total())?;
            let skipped = session.select(&numbers)?;
            for number in skipped {
                println!("Quota {number} is not available, skipped.");
            }

            if let Source::Remote(id) = &source {
                let evicted = session.refresh(remote.raffle(*id).await?)?;
                for number in evicted {
                    println!("Quota {number} was just taken by someone else.");
                }
            }

            print!("{}", report::selection(&session.engine, session.unit_price, ratio));

            let reservation = session.reservation(Buyer::new(&name, &email, &cpf, &phone))?;

            if dry_run {
                println!("{}", serde_json::to_string_pretty(&reservation)?);
                return Ok(());
            }

            let receipt = remote.reserve(&reservation).await?;
            info!(id = receipt.id, "Reservation accepted");

            println!("Reservation {}", receipt.id);
            if let Some(status) = &receipt.status {
                println!("Status: {status}");
            }
            match receipt.hold(Utc::now()) {
                Hold::Remaining(left) => println!("Hold expires in {}", format_time_left(left)),
                Hold::Expired => println!("Hold expired"),
                Hold::Unknown => println!("Hold expiration unavailable"),
            }
        }
    }

    Ok(())
}
