//! # dotnet-reflect
//!
//! Declared-member lookup caches for the reflection layer of a .NET runtime.
//!
//! ## Core Types
//!
//! - **[`Dispenser`](dispenser::Dispenser)**: a concurrent memoizing factory.
//! - **[`DeclaredMemberCache`](cache::DeclaredMemberCache)**: per-type method, field,
//!   property and event lookup by exact name.
//! - **[`MemberCacheRegistry`](registry::MemberCacheRegistry)**: one cache per queried
//!   type, reclaimed by generation.
//! - **[`RuntimeTypeInfo`](types::runtime::RuntimeTypeInfo)**: a queried type backed by
//!   `dotnetdll` metadata.
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub mod cache;
pub mod config;
pub mod dispenser;
pub mod error;
pub mod interop;
pub mod registry;
pub mod resolution;
pub mod types;

use cache::{MemberInfo, MemberKind};
use config::ReflectionConfig;
use error::{MetadataError, ReflectionError};
use registry::{MemberCacheRegistry, TypeMemberCache};
use resolution::static_res_from_file;
use types::{members::DeclaredMember, runtime::RuntimeTypeInfo};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Look up members declared on a .NET type by name"
)]
pub struct Args {
    /// The assembly to load (path to a DLL)
    #[arg(value_name = "DLL")]
    pub assembly: String,
    /// The full name of the type to query (e.g. System.String)
    #[arg(value_name = "TYPE")]
    pub type_name: String,
    #[arg(short, long = "method", value_name = "NAME")]
    pub methods: Vec<String>,
    #[arg(short, long = "field", value_name = "NAME")]
    pub fields: Vec<String>,
    #[arg(short, long = "property", value_name = "NAME")]
    pub properties: Vec<String>,
    #[arg(short, long = "event", value_name = "NAME")]
    pub events: Vec<String>,
    /// Overrides DOTNET_RS_REFLECTION_CACHE_LIMIT
    #[arg(long, value_name = "N")]
    pub cache_limit: Option<usize>,
    /// Print cache hit/miss counters when done
    #[arg(long)]
    pub stats: bool,
}

impl Args {
    fn lookups(&self) -> impl Iterator<Item = (MemberKind, &str)> {
        [
            (MemberKind::Method, &self.methods),
            (MemberKind::Field, &self.fields),
            (MemberKind::Property, &self.properties),
            (MemberKind::Event, &self.events),
        ]
        .into_iter()
        .flat_map(|(kind, names)| names.iter().map(move |n| (kind, n.as_str())))
    }

    pub fn config(&self) -> ReflectionConfig {
        let mut config = ReflectionConfig::global().clone();
        if let Some(limit) = self.cache_limit {
            config.cache_limit = limit;
        }
        config.stats |= self.stats;
        config
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn describe(
    kind: MemberKind,
    name: &str,
    result: &Result<Option<DeclaredMember>, ReflectionError>,
) -> String {
    match result {
        Ok(Some(member)) => format!("{} {}: {:?}", member.kind(), member.name(), member),
        Ok(None) => format!("{kind} {name}: not found"),
        Err(e) => format!("{kind} {name}: {e}"),
    }
}

#[derive(Debug, Default)]
struct Report {
    lines: Vec<String>,
    ambiguous: bool,
}

/// Runs every lookup against one cache. Metadata errors stop the run; ambiguous names
/// are reported and flagged.
fn run_lookups<'a>(
    cache: &TypeMemberCache,
    lookups: impl IntoIterator<Item = (MemberKind, &'a str)>,
) -> Result<Report, MetadataError> {
    let mut report = Report::default();
    for (kind, name) in lookups {
        let result = cache.get_declared_member(kind, name);
        match &result {
            Err(ReflectionError::Metadata(e)) => return Err(e.clone()),
            Err(ReflectionError::AmbiguousMember { .. }) => report.ambiguous = true,
            Ok(_) => {}
        }
        report.lines.push(describe(kind, name, &result));
    }
    Ok(report)
}

pub fn run_cli() -> ExitCode {
    let args = Args::parse();
    init_logging();
    let config = args.config();

    let resolution = match static_res_from_file(&args.assembly) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading assembly: {}", e);
            return ExitCode::from(1);
        }
    };
    let ty = match resolution.find_type(&args.type_name) {
        Ok(t) => RuntimeTypeInfo::from(t),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    let registry: MemberCacheRegistry = MemberCacheRegistry::new(&config);
    let cache = registry.cache_for(&ty);
    let report = match run_lookups(&cache, args.lookups()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading {}: {}", ty.full_name(), e);
            return ExitCode::from(1);
        }
    };
    for line in &report.lines {
        println!("{}", line);
    }

    if config.stats {
        let stats = cache.stats().total();
        println!(
            "cache: {} entries, {} hits, {} misses",
            stats.entries, stats.hits, stats.misses
        );
    }

    if report.ambiguous {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}
