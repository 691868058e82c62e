use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use student_risk_engine::config::{EngineSettings, RiskModel};
use student_risk_engine::db::{self, PgMetricsSource};
use student_risk_engine::store::InMemoryProfileStore;
use student_risk_engine::{logging, report, RiskEngine};

#[derive(Parser)]
#[command(name = "risk-engine")]
#[command(about = "Student risk scoring and early-intervention engine", long_about = None)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
    /// JSON engine settings (window, grade level, logging)
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    /// JSON risk model overriding the built-in table
    #[arg(long)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import metric snapshots from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Analyze a single student
    Analyze {
        #[arg(long)]
        student: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Analyze every student in a cohort
    Cohort {
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long)]
        json: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Generate a markdown cohort report
    Report {
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = EngineSettings::load(&cli.settings)?;
    logging::init(&settings.log);

    let model = match &cli.model {
        Some(path) => RiskModel::load(path)?,
        None => RiskModel::default(),
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let engine = RiskEngine::new(
        model,
        PgMetricsSource::new(pool.clone()),
        InMemoryProfileStore::new(),
        settings,
    )
    .context("risk model failed validation")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} snapshots from {}.", csv.display());
        }
        Commands::Analyze { student, json } => {
            let analysis = engine.fetch_and_analyze(student).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            println!(
                "Student {} scored {:.1} ({}), confidence {:.2}",
                student,
                analysis.risk_score,
                analysis.risk_level.as_str(),
                analysis.confidence
            );
            if analysis.data_degraded {
                println!("No metrics were available; this is a conservative default.");
            }
            for factor in &analysis.risk_factors {
                println!(
                    "- {} {:.1}: {}",
                    factor.category.as_str(),
                    factor.score,
                    factor.description
                );
            }
            for warning in &analysis.early_warnings {
                println!("! {} ({})", warning.message, warning.recommendation);
            }
            for strategy in &analysis.interventions {
                println!(
                    "> [{:?}] {} by {}",
                    strategy.priority,
                    strategy.title,
                    strategy.implement_by.date_naive()
                );
            }
        }
        Commands::Cohort {
            cohort,
            json,
            limit,
        } => {
            let ids = db::list_student_ids(&pool, cohort.as_deref()).await?;
            let report = engine.monitor_cohort(&ids).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if report.total_students == 0 {
                println!("No students found for this cohort.");
                return Ok(());
            }

            println!(
                "{} students, {} at risk, average score {:.1}",
                report.total_students, report.at_risk, report.average_risk_score
            );
            let mut ranked = report.analyses.clone();
            ranked.sort_by(|a, b| a.risk_score.total_cmp(&b.risk_score));
            for analysis in ranked.iter().take(limit) {
                println!(
                    "- {} score {:.1} ({}) with {} warnings",
                    analysis.student_id,
                    analysis.risk_score,
                    analysis.risk_level.as_str(),
                    analysis.early_warnings.len()
                );
            }
        }
        Commands::Report { cohort, out } => {
            let ids = db::list_student_ids(&pool, cohort.as_deref()).await?;
            let cohort_report = engine.monitor_cohort(&ids).await;
            let roster = db::fetch_roster(&pool, &ids).await?;
            let text = report::build_report(cohort.as_deref(), &cohort_report, &roster);
            std::fs::write(&out, text)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
