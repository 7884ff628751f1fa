use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use assessment_oracle::assessment::progress::compute_progress;
use assessment_oracle::assessment::sections::compute_scores;
use assessment_oracle::assessment::visibility::visible_questions;
use assessment_oracle::assessment::Assessment;
use assessment_oracle::catalog::Catalog;
use assessment_oracle::config::{Config, ConfigOverrides};
use assessment_oracle::eligibility::{eligibility_check, EligibilityResult};
use assessment_oracle::graph::build_graph;
use assessment_oracle::instruments::{
    audit_table, match_rule, Band, ScorePoint, TableAudit, INSTRUMENT_TABLE,
};
use assessment_oracle::output::csv::{
    eligibility_to_csv, instruments_to_csv, progress_to_csv, scores_to_csv,
};
use assessment_oracle::output::json::render_json;
use assessment_oracle::output::table::{
    render_audit_table, render_eligibility_table, render_graph_table, render_instruments_table,
    render_progress_table, render_scores_table, render_visible_table, render_warnings_table,
};
use assessment_oracle::snapshot::{ResultStore, SnapshotStore};
use assessment_oracle::submit::submit;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "assessment-oracle",
    about = "Impact, risk and return assessment scoring"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    db: Option<String>,
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
struct Inputs {
    /// Catalog JSON: sections, questions and eligibility rules.
    #[arg(long)]
    catalog: PathBuf,
    /// Assessment JSON: id, sector and answers.
    #[arg(long)]
    assessment: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Progress {
        #[command(flatten)]
        inputs: Inputs,
    },
    Visible {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        section: String,
    },
    Score {
        #[command(flatten)]
        inputs: Inputs,
    },
    Eligibility {
        #[command(flatten)]
        inputs: Inputs,
    },
    Submit {
        #[command(flatten)]
        inputs: Inputs,
    },
    Graph {
        #[command(flatten)]
        inputs: Inputs,
    },
    Instruments {
        #[command(subcommand)]
        action: InstrumentCommand,
    },
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Subcommand)]
enum InstrumentCommand {
    List,
    Audit,
    Match {
        #[arg(long)]
        impact: i64,
        #[arg(long)]
        risk: i64,
        #[arg(long = "return")]
        returns: i64,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    Check {
        #[arg(long)]
        catalog: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        db_path: cli.db.clone(),
        overall_threshold: cli.threshold,
    });

    match &cli.command {
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)?;
        }
        Commands::Progress { inputs } => {
            let (catalog, assessment) = load_inputs(inputs)?;
            let progress = compute_progress(&catalog, &assessment);
            match cli.output {
                OutputFormat::Table => println!("{}", render_progress_table(&progress)),
                OutputFormat::Json => println!("{}", render_json(&progress)?),
                OutputFormat::Csv => println!("{}", progress_to_csv(&progress)?),
            }
        }
        Commands::Visible { inputs, section } => {
            let (catalog, assessment) = load_inputs(inputs)?;
            if catalog.section(section).is_none() {
                return Err(anyhow!("unknown section: {section}"));
            }
            let questions = visible_questions(
                &catalog,
                section,
                &assessment.answers,
                assessment.sector.as_deref(),
            );
            match cli.output {
                OutputFormat::Table => println!("{}", render_visible_table(&questions)),
                OutputFormat::Json => println!("{}", render_json(&questions)?),
                OutputFormat::Csv => {
                    warn!("CSV output for visible not implemented, using JSON");
                    println!("{}", render_json(&questions)?);
                }
            }
        }
        Commands::Score { inputs } => {
            let (catalog, assessment) = load_inputs(inputs)?;
            let (scores, breakdown) = compute_scores(&catalog, &assessment, &config.scoring);
            match cli.output {
                OutputFormat::Table => println!("{}", render_scores_table(&scores, &breakdown)),
                OutputFormat::Json => println!(
                    "{}",
                    render_json(&serde_json::json!({
                        "scores": scores,
                        "breakdown": breakdown,
                    }))?
                ),
                OutputFormat::Csv => println!("{}", scores_to_csv(&breakdown)?),
            }
        }
        Commands::Eligibility { inputs } => {
            let (catalog, mut assessment) = load_inputs(inputs)?;
            let mut store = open_store(&config)?;
            if assessment.scores.is_none() {
                assessment.scores = store.load_scores(&assessment.id)?;
            }
            let result = eligibility_check(
                &assessment,
                &catalog,
                &mut store,
                config.eligibility.threshold(),
            )?;
            print_eligibility(&result, cli.output)?;
        }
        Commands::Submit { inputs } => {
            let (catalog, mut assessment) = load_inputs(inputs)?;
            let mut store = open_store(&config)?;
            let submission = submit(&catalog, &mut assessment, &config, &mut store)?;
            match cli.output {
                OutputFormat::Json => println!("{}", render_json(&submission)?),
                _ => print_eligibility(&submission.eligibility, cli.output)?,
            }
        }
        Commands::Graph { inputs } => {
            let (catalog, assessment) = load_inputs(inputs)?;
            let scores = match assessment.scores.clone() {
                Some(scores) => scores,
                None => compute_scores(&catalog, &assessment, &config.scoring).0,
            };
            let store = open_store(&config)?;
            let instrument = store
                .load_result(&assessment.id)?
                .and_then(|result| result.matched_instrument);
            let graph = build_graph(
                Some(&scores),
                instrument.as_deref(),
                &assessment.version,
                &config.graph,
            );
            match cli.output {
                OutputFormat::Table => println!("{}", render_graph_table(&graph)),
                _ => println!("{}", render_json(&graph)?),
            }
        }
        Commands::Instruments { action } => match action {
            InstrumentCommand::List => match cli.output {
                OutputFormat::Table => println!("{}", render_instruments_table(INSTRUMENT_TABLE)),
                OutputFormat::Json => println!("{}", render_json(INSTRUMENT_TABLE)?),
                OutputFormat::Csv => println!("{}", instruments_to_csv(INSTRUMENT_TABLE)?),
            },
            InstrumentCommand::Audit => {
                let audit = audit_table(INSTRUMENT_TABLE, Band::SCORE_DOMAIN);
                print_audit(&audit, cli.output)?;
                if !audit.is_clean() {
                    return Err(anyhow!(
                        "instrument table has {} overlaps and {} gaps",
                        audit.overlaps.len(),
                        audit.gaps.len()
                    ));
                }
            }
            InstrumentCommand::Match {
                impact,
                risk,
                returns,
            } => {
                let point = ScorePoint {
                    impact: *impact,
                    risk: *risk,
                    returns: *returns,
                };
                let matched = match_rule(INSTRUMENT_TABLE, &point);
                match cli.output {
                    OutputFormat::Table => match matched {
                        Some(rule) => println!("{}\n{}", rule.name, rule.narrative),
                        None => println!("no instrument matches {impact}/{risk}/{returns}"),
                    },
                    _ => println!("{}", render_json(&matched)?),
                }
            }
        },
        Commands::Catalog { action } => match action {
            CatalogCommand::Check { catalog } => {
                let catalog = Catalog::load(catalog)?;
                let warnings = catalog.validate();
                for warning in &warnings {
                    warn!(%warning, "catalog warning");
                }
                match cli.output {
                    OutputFormat::Table => println!("{}", render_warnings_table(&warnings)),
                    _ => println!("{}", render_json(&warnings)?),
                }
            }
        },
    }

    Ok(())
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &Path,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn load_inputs(inputs: &Inputs) -> Result<(Catalog, Assessment)> {
    let catalog = Catalog::load(&inputs.catalog)?;
    for warning in catalog.validate() {
        warn!(%warning, "catalog warning");
    }
    let assessment = Assessment::load(&inputs.assessment)?;
    Ok((catalog, assessment))
}

fn open_store(config: &Config) -> Result<SnapshotStore> {
    SnapshotStore::open(&config.resolved_db_path())
}

fn print_eligibility(result: &EligibilityResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_eligibility_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", eligibility_to_csv(result)?),
    }
    Ok(())
}

fn print_audit(audit: &TableAudit, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_audit_table(audit)),
        OutputFormat::Json => println!("{}", render_json(audit)?),
        OutputFormat::Csv => {
            warn!("CSV output for audit not implemented, using JSON");
            println!("{}", render_json(audit)?);
        }
    }
    Ok(())
}
