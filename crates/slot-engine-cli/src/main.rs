//! `slots` CLI: query availability and book appointments against a shop snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Free slot starts for a provider on a date
//! slots -i shop.json availability --provider alex --date 2026-03-16
//!
//! # Only starts where a given service fits
//! slots -i shop.json availability --provider alex --date 2026-03-16 --service fade
//!
//! # Would this booking be accepted?
//! slots -i shop.json check --provider alex --date 2026-03-16 --time 10:30 --service cut
//!
//! # Book it and save the updated snapshot
//! slots -i shop.json book --provider alex --date 2026-03-16 --time 11:00 \
//!     --service cut --customer sam -o shop.json
//!
//! # Busy/free view for the customer-facing page
//! slots -i shop.json day --provider alex --date 2026-03-16 --opaque
//!
//! # Look for double bookings
//! slots -i shop.json audit
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use serde_json::json;
use slot_engine::clock::{format_time, parse_time};
use slot_engine::{
    BookingDesk, BookingRequest, BookingStatus, Role, ShopSnapshot, SlotConfig, Visibility,
};
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment availability and booking for barbershop schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Shop snapshot JSON (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Minutes between candidate slot starts (overrides the snapshot config)
    #[arg(long, global = true)]
    granularity: Option<u32>,

    /// Ignore provider buffer time between appointments
    #[arg(long, global = true)]
    no_buffer: bool,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slot starts for a provider on a date
    Availability {
        #[arg(long)]
        provider: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Only list starts where this service fits entirely
        #[arg(long)]
        service: Option<String>,
    },
    /// Check whether a booking would be accepted, without saving it
    Check {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        date: String,
        /// Start time as HH:MM
        #[arg(long)]
        time: String,
        #[arg(long)]
        service: String,
    },
    /// Book an appointment
    Book {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        service: String,
        #[arg(long)]
        customer: String,
        /// Current local time as YYYY-MM-DDTHH:MM (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// Write the updated snapshot here
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Cancel a booking
    Cancel {
        #[arg(long)]
        booking: String,
        /// Who is cancelling: admin, provider:<id> or customer:<id>
        #[arg(long = "as")]
        role: String,
        #[arg(long)]
        now: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check in, complete or mark a no-show
    Status {
        #[arg(long)]
        booking: String,
        /// One of: checked-in, completed, no-show
        #[arg(long)]
        to: String,
        #[arg(long = "as")]
        role: String,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show busy and free windows for a provider on a date
    Day {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        date: String,
        /// Hide why each block is busy
        #[arg(long)]
        opaque: bool,
    },
    /// Report overlapping active bookings
    Audit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let raw = read_input(cli.input.as_deref())?;
    let snapshot = ShopSnapshot::from_json(&raw).context("Failed to load shop snapshot")?;
    let config = effective_config(snapshot.config, cli.granularity, cli.no_buffer);
    let desk = BookingDesk::from_snapshot(snapshot)
        .and_then(|d| d.with_config(config))
        .context("Invalid shop snapshot")?;

    match cli.command {
        Commands::Availability {
            provider,
            date,
            service,
        } => {
            let date = parse_date(&date)?;
            let slots = match service {
                Some(service) => desk.availability_for_service(&provider, date, &service),
                None => desk.availability(&provider, date),
            }
            .context("Failed to compute availability")?;
            let formatted: Vec<String> = slots.into_iter().map(format_time).collect();
            print_json(&formatted)?;
        }
        Commands::Check {
            provider,
            date,
            time,
            service,
        } => {
            let request = booking_request(provider, service, String::new(), &date, &time)?;
            let verdict = desk.check(&request).context("Failed to check booking")?;
            print_json(&verdict)?;
        }
        Commands::Book {
            provider,
            date,
            time,
            service,
            customer,
            now,
            output,
        } => {
            let request = booking_request(provider, service, customer, &date, &time)?;
            let outcome = desk
                .book(&request, parse_now(now.as_deref())?)
                .context("Failed to book")?;
            print_json(&outcome)?;
            if outcome.booking().is_some() {
                save_snapshot(&desk, output.as_deref())?;
            }
        }
        Commands::Cancel {
            booking,
            role,
            now,
            output,
        } => {
            let role: Role = role.parse().context("Invalid --as role")?;
            let cancelled = desk
                .cancel(&role, &booking, parse_now(now.as_deref())?)
                .context("Failed to cancel booking")?;
            print_json(&cancelled)?;
            save_snapshot(&desk, output.as_deref())?;
        }
        Commands::Status {
            booking,
            to,
            role,
            output,
        } => {
            let role: Role = role.parse().context("Invalid --as role")?;
            let next = parse_status(&to)?;
            let updated = desk
                .update_status(&role, &booking, next)
                .context("Failed to update booking")?;
            print_json(&updated)?;
            save_snapshot(&desk, output.as_deref())?;
        }
        Commands::Day {
            provider,
            date,
            opaque,
        } => {
            let visibility = if opaque {
                Visibility::Opaque
            } else {
                Visibility::Detailed
            };
            let view = desk
                .day_view(&provider, parse_date(&date)?, visibility)
                .context("Failed to build day view")?;
            print_json(&view)?;
        }
        Commands::Audit => {
            let found = desk.audit().context("Failed to audit bookings")?;
            print_json(&json!({ "doubleBookings": found }))?;
            if !found.is_empty() {
                process::exit(2);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "slot_engine_cli=debug,slot_engine=debug"
    } else {
        "slot_engine_cli=info,slot_engine=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Apply command-line overrides on top of the snapshot's config.
fn effective_config(base: SlotConfig, granularity: Option<u32>, no_buffer: bool) -> SlotConfig {
    let mut config = base;
    if let Some(minutes) = granularity {
        config = config.with_granularity(minutes);
    }
    if no_buffer {
        config = config.without_buffer();
    }
    config
}

fn booking_request(
    provider: String,
    service: String,
    customer: String,
    date: &str,
    time: &str,
) -> Result<BookingRequest> {
    Ok(BookingRequest {
        provider_id: provider,
        service_id: service,
        customer_id: customer,
        date: parse_date(date)?,
        start_time: parse_clock(time)?,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_clock(s: &str) -> Result<NaiveTime> {
    parse_time(s).with_context(|| format!("Invalid time '{}', expected HH:MM", s))
}

fn parse_now(s: Option<&str>) -> Result<NaiveDateTime> {
    match s {
        Some(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .with_context(|| format!("Invalid --now '{}', expected YYYY-MM-DDTHH:MM", s)),
        None => Ok(Local::now().naive_local()),
    }
}

fn parse_status(s: &str) -> Result<BookingStatus> {
    match s {
        "checked-in" => Ok(BookingStatus::CheckedIn),
        "completed" => Ok(BookingStatus::Completed),
        "no-show" => Ok(BookingStatus::NoShow),
        other => anyhow::bail!(
            "Unknown status: '{}'. Available: checked-in, completed, no-show",
            other
        ),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", pretty);
    Ok(())
}

fn save_snapshot(desk: &BookingDesk, path: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = desk
        .snapshot()
        .and_then(|s| s.to_json_pretty())
        .context("Failed to serialize snapshot")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write file: {}", path))?;
    tracing::info!(path, "snapshot saved");
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
