//! Voxhire — AI-administered technical interviews
//!
//! - `voxhire serve` — start the interview API server
//! - `voxhire sessions` — list interviews in the local database
//! - `voxhire report <id>` — print one interview's transcript and verdict

use anyhow::Result;
use clap::{Parser, Subcommand};

use voxhire_core::paths;
use voxhire_core::storage::Database;
use voxhire_core::{InterviewStatus, InterviewStore};

mod serve;

/// Voxhire - AI Interview Platform
#[derive(Parser)]
#[command(name = "voxhire")]
#[command(about = "AI-administered technical interviews", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Voxhire API server
    ///
    /// Requires an API key in VOXHIRE_API_KEY, OPENAI_API_KEY, or
    /// GROQ_API_KEY. A `gsk_`-prefixed key selects the Groq backend;
    /// anything else selects OpenAI.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },

    /// List interviews in the local database
    Sessions,

    /// Print the transcript and verdict for one interview
    Report {
        /// Interview id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match cli.command {
        Commands::Serve { port } => serve::run(port).await,
        Commands::Sessions => list_sessions(),
        Commands::Report { id } => print_report(&id),
    }
}

fn open_store() -> Result<InterviewStore> {
    let db = Database::new(&paths::db_path())?;
    Ok(InterviewStore::new(db))
}

fn list_sessions() -> Result<()> {
    let store = open_store()?;
    let interviews = store.list_interviews()?;

    if interviews.is_empty() {
        println!("No interviews yet.");
        return Ok(());
    }

    for info in interviews {
        let status = match info.status {
            InterviewStatus::InProgress => "in progress".to_string(),
            InterviewStatus::Completed => match info.final_score {
                Some(score) => format!("completed ({score:.0}/100)"),
                None => "completed".to_string(),
            },
        };
        println!(
            "{}  {}  {}  {}",
            info.id,
            info.updated_at.format("%Y-%m-%d %H:%M"),
            info.candidate_name,
            status
        );
    }

    Ok(())
}

fn print_report(id: &str) -> Result<()> {
    let store = open_store()?;

    let info = store
        .get_interview(id)?
        .ok_or_else(|| anyhow::anyhow!("interview {id} not found"))?;
    let transcript = store.load_transcript(id)?;

    println!("Candidate: {}", info.candidate_name);
    if let Some(email) = &info.candidate_email {
        println!("Email:     {email}");
    }
    println!("Skills:    {}", info.skills);
    println!();

    for record in &transcript {
        println!(
            "Q{} [{} / {}]: {}",
            record.question_number, record.topic, record.difficulty, record.question
        );
        println!("A: {}", record.answer);
        println!(
            "   technical {:.1}  clarity {:.1}  confidence {:.1}",
            record.technical_score, record.clarity_score, record.confidence_score
        );
        println!("   {}", record.feedback);
        println!();
    }

    match (info.final_score, &info.justification) {
        (Some(score), Some(justification)) => {
            println!("Final score: {score:.0}/100");
            println!("{justification}");
        }
        _ => println!(
            "Interview in progress ({} of {} answers recorded).",
            transcript.len(),
            voxhire_core::constants::interview::TOTAL_ROUNDS
        ),
    }

    Ok(())
}
