mod api;
mod config;
mod dedup;
mod errors;
mod filters;
mod interview_prep;
mod models;
mod recommendations;
mod state;
mod store;
mod views;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::applications::ApplicationCheck;
use crate::api::auth::RegisterRequest;
use crate::api::interview::application_id_from_prep_url;
use crate::config::Config;
use crate::errors::ClientError;
use crate::filters::filter_by_text;
use crate::models::{ApplicationStatus, Role};
use crate::recommendations::{fetch_recommendations, reconcile, RecalcOutcome};
use crate::state::AppState;
use crate::views::{
    progress_line, AnalysisView, ApplicationRow, CandidateRow, Dashboard, GuideView,
    HirerJobRow, JobCard, JobDetail, RecommendationView,
};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board client - browse jobs, apply, and prepare for interviews")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        password: String,
    },

    /// Create an account (logs in immediately)
    Register {
        name: String,
        email: String,
        /// At least 6 characters
        password: String,
        #[arg(short, long, value_enum, default_value = "jobseeker")]
        role: RoleArg,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Browse the job listing
    Jobs {
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Match title or company
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one job
    Job {
        id: String,
    },

    /// Job listing annotated with your fit scores
    Recommended {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Your top matches
    Dashboard,

    /// Ask the backend to rescore every job against your resume
    Recalc,

    /// Apply to a job
    Apply {
        job_id: String,
    },

    /// Check whether you applied to a job
    Check {
        job_id: String,
    },

    /// List your applications
    Applications {
        /// Match job title or company
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Upload a resume (PDF, DOC, DOCX or TXT) and rescore jobs
    UploadResume {
        path: PathBuf,

        /// Skip the follow-up recalculation
        #[arg(long)]
        no_recalc: bool,
    },

    /// Generate an interview preparation guide for an application
    Prep {
        /// Application id or interview-prep URL
        application: String,
    },

    /// Hirer commands
    Hirer {
        #[command(subcommand)]
        command: HirerCommands,
    },
}

#[derive(Subcommand)]
enum HirerCommands {
    /// List your job postings
    Jobs {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List candidates for one of your jobs
    Candidates {
        job_id: String,
    },

    /// ATS and project analysis of a candidate's resume
    Analyze {
        application_id: String,
    },

    /// AI hiring recommendation for a candidate
    Recommend {
        application_id: String,
    },

    /// Shortlist a candidate
    Accept {
        application_id: String,
    },

    /// Reject a candidate
    Reject {
        application_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Jobseeker,
    Hirer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Jobseeker => Role::JobSeeker,
            RoleArg::Hirer => Role::Hirer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("jobboard v{} using {}", env!("CARGO_PKG_VERSION"), config.api_base_url);

    let cli = Cli::parse();

    let result = match AppState::new(config) {
        Ok(state) => run(cli.command, &state).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        debug!("Command failed: {e:?}");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, state: &AppState) -> Result<(), ClientError> {
    let api = &state.api;
    match command {
        Commands::Login { email, password } => {
            let user = api.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.name, user.role.label());
        }

        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let user = api
                .register(&RegisterRequest {
                    name: &name,
                    email: &email,
                    password: &password,
                    role: role.into(),
                })
                .await?;
            println!("Welcome, {}! Registered as a {}.", user.name, user.role.label());
        }

        Commands::Logout => {
            api.logout();
            println!("Logged out.");
        }

        Commands::Whoami => {
            if !state.viewer().is_logged_in() {
                println!("Not logged in.");
                return Ok(());
            }
            let user = api.me().await?;
            println!("{} <{}>", user.name, user.email);
            println!("role: {}", user.role.label());
            if user.role == Role::JobSeeker {
                let resume = if user.has_resume() { "uploaded" } else { "missing" };
                println!("resume: {resume}");
            }
        }

        Commands::Jobs { page, search } => {
            let page = api.list_jobs(page, search.as_deref()).await?;
            let viewer = state.viewer();
            if page.jobs.is_empty() {
                println!("No jobs found.");
            }
            for job in &page.jobs {
                println!("{}\n", JobCard::from_job(job, &viewer));
            }
            println!(
                "Page {} of {} ({} jobs)",
                page.pagination.page, page.pagination.pages, page.pagination.total
            );
        }

        Commands::Job { id } => {
            let job = api.get_job(&id).await?;
            let viewer = state.viewer();
            println!("{}", JobDetail::new(&job, &viewer));
            if viewer.role == Some(Role::JobSeeker) {
                if let ApplicationCheck {
                    applied: true,
                    application: Some(application),
                } = api.check_application(&id).await?
                {
                    println!("\nYou applied to this job (application {}).", application.id);
                }
            }
        }

        Commands::Recommended { page } => {
            state.store.require_role(Role::JobSeeker)?;
            let page = api.recommended_jobs(page).await?;
            let viewer = state.viewer();
            for job in &reconcile(page.jobs) {
                println!("{}\n", JobCard::from_job(job, &viewer));
            }
            println!(
                "Page {} of {} ({} jobs)",
                page.pagination.page, page.pagination.pages, page.pagination.total
            );
        }

        Commands::Dashboard => {
            state.store.require_role(Role::JobSeeker)?;
            let viewer = state.viewer();
            let set = if viewer.has_resume {
                fetch_recommendations(api).await
            } else {
                Default::default()
            };
            println!("{}", Dashboard::new(&set, &viewer));
        }

        Commands::Recalc => {
            state.store.require_resume()?;
            recalculate(state).await?;
        }

        Commands::Apply { job_id } => {
            state.store.require_resume()?;
            let application = api.apply(&job_id).await?;
            println!("Applied. Application id: {}", application.id);
            if let Some(url) = application.interview_prep_url {
                println!("Interview prep: {url}");
                println!("Run `jobboard prep {}` to generate your guide.", application.id);
            }
        }

        Commands::Check { job_id } => {
            state.store.require_role(Role::JobSeeker)?;
            match api.check_application(&job_id).await? {
                ApplicationCheck {
                    applied: true,
                    application,
                } => match application {
                    Some(a) => println!("Applied (application {}).", a.id),
                    None => println!("Applied."),
                },
                _ => println!("Not applied."),
            }
        }

        Commands::Applications { search } => {
            state.store.require_role(Role::JobSeeker)?;
            let applications = api.my_applications().await?;
            let shown = filter_by_text(&applications, search.as_deref().unwrap_or(""));
            if shown.is_empty() {
                println!("No applications.");
            }
            for application in shown {
                println!("{}", ApplicationRow(application));
            }
        }

        Commands::UploadResume { path, no_recalc } => {
            state.store.require_role(Role::JobSeeker)?;
            let resume_id = api.upload_resume(&path).await?;
            println!("Resume uploaded ({resume_id}).");
            if !no_recalc {
                recalculate(state).await?;
            }
        }

        Commands::Prep { application } => {
            state.store.require_role(Role::JobSeeker)?;
            let application_id = application_id_from_prep_url(&application).ok_or_else(|| {
                ClientError::Validation("Expected an application id or prep URL.".to_string())
            })?;
            prepare_interview(state, application_id).await?;
        }

        Commands::Hirer { command } => {
            state.store.require_role(Role::Hirer)?;
            run_hirer(command, state).await?;
        }
    }
    Ok(())
}

async fn run_hirer(command: HirerCommands, state: &AppState) -> Result<(), ClientError> {
    let api = &state.api;
    match command {
        HirerCommands::Jobs { search } => {
            let jobs = api.hirer_jobs().await?;
            let shown = filter_by_text(&jobs, search.as_deref().unwrap_or(""));
            if shown.is_empty() {
                println!("No job postings.");
            }
            for job in shown {
                println!("{}", HirerJobRow(job));
            }
        }

        HirerCommands::Candidates { job_id } => {
            let candidates = api.job_candidates(&job_id).await?;
            if candidates.is_empty() {
                println!("No candidates yet.");
            }
            for candidate in &candidates {
                println!("{}", CandidateRow(candidate));
            }
        }

        HirerCommands::Analyze { application_id } => {
            let analysis = api.analyze_resume(&application_id).await?;
            println!("{}", AnalysisView(&analysis));
        }

        HirerCommands::Recommend { application_id } => {
            let recommendation = api.ai_recommendation(&application_id).await?;
            println!("{}", RecommendationView(&recommendation));
        }

        HirerCommands::Accept { application_id } => {
            api.set_application_status(&application_id, ApplicationStatus::Shortlisted)
                .await?;
            println!("Application {application_id} shortlisted.");
        }

        HirerCommands::Reject { application_id } => {
            api.set_application_status(&application_id, ApplicationStatus::Rejected)
                .await?;
            println!("Application {application_id} rejected.");
        }
    }
    Ok(())
}

async fn recalculate(state: &AppState) -> Result<(), ClientError> {
    println!("Recalculating fit scores...");
    match state
        .recalculation()
        .trigger(&state.api, state.api.in_flight())
        .await?
    {
        RecalcOutcome::Refreshed(set) => {
            println!("{}", Dashboard::new(&set, &state.viewer()));
        }
        RecalcOutcome::AlreadyRunning => println!("A recalculation is already running."),
    }
    Ok(())
}

/// Runs the prep request while a watcher task prints the simulated steps to stderr.
async fn prepare_interview(state: &AppState, application_id: &str) -> Result<(), ClientError> {
    let simulator = state.prep_simulator();
    let mut progress = simulator.subscribe();

    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let current = progress.borrow_and_update().clone();
            if let Some(line) = progress_line(&current) {
                eprintln!("{line}");
            }
            if current.is_terminal() {
                break;
            }
        }
    });

    let result = simulator.run(&state.api, application_id).await;
    // Dropping the sender ends the printer if no terminal state was published.
    drop(simulator);
    join_printer(printer).await;

    let guide = result?;
    info!("Interview guide ready for application {application_id}");
    println!("{}", GuideView(&guide));
    Ok(())
}

/// Waits for the progress printer. A panicked or cancelled printer only loses output.
async fn join_printer(printer: tokio::task::JoinHandle<()>) {
    if let Err(e) = printer.await {
        debug!("Progress printer stopped abnormally: {e}");
    }
}
