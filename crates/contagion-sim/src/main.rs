//! Contagion Simulator
//!
//! Reads a roster (one classroom per line, teacher first), then runs:
//! - a total infection from one user
//! - a limited infection over whole classrooms
//! - an exact infection of a fixed headcount
//!
//! and prints every user with the version it ends up on.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use contagion_core::{read_roster, InfectionConfig, RegistryConfig, UserId, VersionLabel};
use contagion_diffusion::{Infection, UserRegistry};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "contagion-sim")]
#[command(about = "Simulate a version rollout across coaching classrooms", long_about = None)]
#[command(version)]
struct Cli {
    /// Roster file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Seed user for the total infection
    #[arg(long, default_value = "I")]
    seed_user: String,

    /// Version spread by the total infection
    #[arg(long, default_value = "V2")]
    total_version: String,

    /// Headcount target for the limited infection
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    limit: i64,

    /// Version spread by the limited infection
    #[arg(long, default_value = "V3")]
    limit_version: String,

    /// Exact headcount for the exact infection
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    exact: i64,

    /// Version spread by the exact infection
    #[arg(long, default_value = "V4")]
    exact_version: String,

    /// Never overshoot the limit, even when no classroom fits
    #[arg(long)]
    strict: bool,

    /// Version every user starts on
    #[arg(long, default_value = VersionLabel::INITIAL)]
    initial_version: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let roster = match &cli.input {
        Some(path) => read_roster(File::open(path)?)?,
        None => read_roster(io::stdin().lock())?,
    };
    let registry_config =
        RegistryConfig::default().with_initial_version(cli.initial_version.as_str());
    let registry = UserRegistry::build(roster, &registry_config)?;
    info!(
        users = registry.len(),
        classrooms = registry.component_count(),
        "roster loaded"
    );

    let infection_config = if cli.strict {
        InfectionConfig::strict()
    } else {
        InfectionConfig::default()
    };
    let mut infection = Infection::with_config(registry, infection_config);

    let seed = resolve_seed(infection.registry(), &cli.seed_user);
    infection.total_infection(seed, &VersionLabel::from(cli.total_version));
    infection.limited_infection(cli.limit, &VersionLabel::from(cli.limit_version));
    let exact_ok =
        infection.limited_infection_exact(cli.exact, &VersionLabel::from(cli.exact_version));

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if !exact_ok {
        writeln!(out, "exact infection of {} users was not possible", cli.exact)?;
    }
    report(infection.registry(), &mut out)?;
    out.flush()?;

    Ok(())
}

/// Seed user for the total infection; unknown names skip it
fn resolve_seed(registry: &UserRegistry, name: &str) -> Option<UserId> {
    match registry.require(name) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("total infection skipped: {}", e);
            None
        }
    }
}

/// One line per user in registration order, then a per-version tally
fn report(registry: &UserRegistry, out: &mut impl Write) -> io::Result<()> {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, user) in registry.users() {
        writeln!(out, "{} {} {}", user.name(), user.version(), user.infected())?;
        *tally.entry(user.version().as_str()).or_insert(0) += 1;
    }

    writeln!(out)?;
    for (version, count) in tally {
        writeln!(out, "{}: {} users", version, count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_users_and_tally() {
        let registry = UserRegistry::from_roster("A,B\nC\n", &RegistryConfig::default()).unwrap();
        let mut infection = Infection::new(registry);
        infection.total_infection_by_name("B", &VersionLabel::from("V2"));

        let mut buf = Vec::new();
        report(infection.registry(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "A V2 true\nB V2 true\nC V1 false\n\nV1: 1 users\nV2: 2 users\n"
        );
    }

    #[test]
    fn test_resolve_seed() {
        let registry = UserRegistry::from_roster("A,B\nI,J\n", &RegistryConfig::default()).unwrap();

        assert_eq!(resolve_seed(&registry, "I"), registry.lookup("I"));
        assert!(resolve_seed(&registry, "I").is_some());
        assert_eq!(resolve_seed(&registry, "nobody"), None);
    }

    #[test]
    fn test_unknown_seed_leaves_population_alone() {
        let registry = UserRegistry::from_roster("A,B\n", &RegistryConfig::default()).unwrap();
        let mut infection = Infection::new(registry);

        let seed = resolve_seed(infection.registry(), "Z");
        let stats = infection.total_infection(seed, &VersionLabel::from("V2"));

        assert_eq!(stats.reached, 0);
        assert_eq!(infection.registry().count_on_version(&VersionLabel::initial()), 2);
    }

    #[test]
    fn test_cli_defaults_match_scenario() {
        let cli = Cli::parse_from(["contagion-sim"]);
        assert_eq!(cli.seed_user, "I");
        assert_eq!(cli.limit, 10);
        assert_eq!(cli.exact, 4);
        assert_eq!(cli.initial_version, "V1");
        assert!(!cli.strict);
    }
}
