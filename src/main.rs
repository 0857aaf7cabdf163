//! Domain Scout - conversational domain name suggestions
//!
//! Describe a project and get brandable domain names, each checked for
//! availability against the registrar or DNS.

use domain_scout::{
    config,
    types::{AvailabilityStatus, DomainStatusRecord, SuggestionConfig},
    AvailabilityResolver, DomainScout, Result, ScoutError, ScoutReply, SuggestionGenerator,
};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::env;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const RANDOM_PROMPTS: &[&str] = &[
    "innovative tech startup",
    "creative digital agency",
    "modern e-commerce platform",
    "AI-powered productivity tool",
    "sustainable lifestyle brand",
    "next-generation mobile app",
    "independent coffee roastery",
    "online learning community",
];

/// Parsed command line
#[derive(Debug, Default)]
struct CliArgs {
    help: bool,
    check: bool,
    json: bool,
    verbose: bool,
    words: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--check" | "-c" => cli.check = true,
            "--json" => cli.json = true,
            "--verbose" | "-v" => cli.verbose = true,
            flag if flag.starts_with('-') => {
                return Err(ScoutError::validation(format!("Unknown option '{}'", flag)));
            }
            _ => cli.words.push(arg.clone()),
        }
    }
    Ok(cli)
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = domain_scout::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(2);
        }
    };

    if cli.help {
        print_help();
        return;
    }

    init_tracing(cli.verbose);

    let outcome = if cli.check {
        run_check(&cli).await
    } else {
        run_suggest(&cli).await
    };

    if let Err(e) = outcome {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Check the given domains without asking the LLM
async fn run_check(cli: &CliArgs) -> Result<()> {
    if cli.words.is_empty() {
        return Err(ScoutError::validation("--check needs at least one domain"));
    }

    let resolver_config = config::resolver_config_from_env();
    let resolver = AvailabilityResolver::new(&resolver_config);

    let spinner = spinner(cli.json, format!("Checking {} domain(s)...", cli.words.len()));
    let records = resolver.resolve(&cli.words).await;
    spinner.finish_and_clear();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        display_records(&records);
    }

    Ok(())
}

/// Ask the LLM for names and check every suggestion
async fn run_suggest(cli: &CliArgs) -> Result<()> {
    let resolver_config = config::resolver_config_from_env();
    let generator = SuggestionGenerator::new(SuggestionConfig::default());
    for llm_config in config::llm_configs_from_env() {
        generator.add_provider(&llm_config)?;
    }

    if !generator.is_ready() {
        return Err(ScoutError::config(
            "No LLM providers configured. Set OPENROUTER_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY, or use --check.",
        ));
    }

    let description = if cli.words.is_empty() {
        let prompt = RANDOM_PROMPTS[rand::thread_rng().gen_range(0..RANDOM_PROMPTS.len())];
        if !cli.json {
            println!("🎲 No description given, brainstorming for: \"{}\"", prompt);
        }
        format!("Suggest domain names for a {}", prompt)
    } else {
        cli.words.join(" ")
    };

    let resolver = AvailabilityResolver::new(&resolver_config);
    let scout = DomainScout::new(generator, resolver, &resolver_config);

    let spinner = spinner(cli.json, "Thinking up names and checking availability...".to_string());
    let reply = scout.suggest_and_check(&description, &[]).await;
    spinner.finish_and_clear();
    let reply = reply?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        display_reply(&reply);
    }

    Ok(())
}

fn spinner(hidden: bool, message: String) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn display_reply(reply: &ScoutReply) {
    println!();
    println!("💬 {}", reply.response.assistant_reply);
    println!();

    if reply.domains.is_empty() {
        if reply.response.needs_more_info {
            println!("💡 Tell me a bit more about your project to get suggestions.");
        }
        return;
    }

    println!("🎨 Suggestions ({}):", reply.domains.len());
    println!("═══════════════════");
    for (index, item) in reply.domains.iter().enumerate() {
        println!("{:2}. {}", index + 1, status_line(&item.availability));
        if !item.suggestion.explanation.is_empty() {
            println!("    💭 {}", item.suggestion.explanation);
        }
        println!("    🔗 {}", item.availability.register_url);
    }
    println!();
    print_summary(reply.domains.iter().map(|d| &d.availability));
}

fn display_records(records: &[DomainStatusRecord]) {
    println!("🔍 Availability");
    println!("═══════════════");
    for record in records {
        println!("{}", status_line(record));
        println!("   {}", record.summary);
        println!("   🔗 {}", record.register_url);
    }
    println!();
    print_summary(records.iter());
}

fn status_line(record: &DomainStatusRecord) -> String {
    let mut line = match record.status {
        AvailabilityStatus::Available => format!("✅ {} - AVAILABLE", record.domain),
        AvailabilityStatus::Taken => format!("❌ {} - TAKEN", record.domain),
        AvailabilityStatus::Unknown => format!("⚠️  {} - UNKNOWN", record.domain),
    };
    if let Some(price) = record.display_price() {
        line.push_str(&format!(" ({}", price));
        if let Some(period) = record.period {
            line.push_str(&format!(" / {} yr", period));
        }
        line.push(')');
    }
    line
}

fn print_summary<'a>(records: impl Iterator<Item = &'a DomainStatusRecord>) {
    let (mut available, mut taken, mut unknown) = (0, 0, 0);
    for record in records {
        match record.status {
            AvailabilityStatus::Available => available += 1,
            AvailabilityStatus::Taken => taken += 1,
            AvailabilityStatus::Unknown => unknown += 1,
        }
    }

    println!("📈 Summary:");
    println!("   ✅ Available: {}", available);
    println!("   ❌ Taken: {}", taken);
    if unknown > 0 {
        println!("   ⚠️  Unknown: {}", unknown);
    }
}

/// Print help information
fn print_help() {
    println!("🔎 Domain Scout - conversational domain name suggestions");
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    domain-scout [OPTIONS] [DESCRIPTION...]");
    println!("    domain-scout --check <DOMAIN>...");
    println!();
    println!("OPTIONS:");
    println!("    -c, --check      Check the given domains without asking the LLM");
    println!("        --json       Print results as JSON");
    println!("    -v, --verbose    Enable info logging (RUST_LOG overrides)");
    println!("    -h, --help       Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    domain-scout                               # Brainstorm for a random idea");
    println!("    domain-scout \"AI productivity app\"         # Suggest names for a description");
    println!("    domain-scout --check getflow.com example.com");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    OPENROUTER_API_KEY          OpenRouter API key (preferred LLM)");
    println!("    OPENAI_API_KEY              OpenAI API key");
    println!("    ANTHROPIC_API_KEY           Anthropic API key");
    println!("    GODADDY_API_KEY             Registrar API key (with GODADDY_API_SECRET)");
    println!("    GODADDY_API_SECRET          Registrar API secret");
    println!("    DOMAIN_SCOUT_DOH_URL        DNS-over-HTTPS base URL (default: https://dns.google)");
    println!("    DOMAIN_SCOUT_PACING_MS      Delay between registrar calls (default: 150)");
    println!("    DOMAIN_SCOUT_TIMEOUT_SECS   HTTP timeout for availability checks (default: 10)");
    println!();
    println!("Without registrar credentials every domain is checked over DNS.");
}
