use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use sleepsurvey::{
    api::HttpSubmitter,
    cli::{Cli, Commands},
    config::Config,
    form::SurveyForm,
    questions::render_questionnaire,
    survey_tui::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "sleepsurvey=info");
    }

    let config = Config::from_env()?.with_api_url(cli.api_url.clone());
    let command = cli.selected_command();

    // The TUI owns the terminal, so it only logs to file
    init_logging(&config, command != Commands::Tui);
    config.validate()?;

    match command {
        Commands::Tui => run_tui(config).await,
        Commands::Questions => {
            print!("{}", render_questionnaire());
            Ok(())
        }
        Commands::Submit { from } => submit_answer_sheet(&from, &config).await,
    }
}

fn init_logging(config: &Config, to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let (dir, file) = config.log_location();
    let file_appender = tracing_appender::rolling::never(dir, file);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

async fn run_tui(config: Config) -> Result<()> {
    info!("Starting survey TUI...");
    let submitter = Arc::new(HttpSubmitter::new(&config)?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, submitter);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("Survey TUI exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("Survey TUI encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle CLI mode submission - print the outcome and exit
async fn submit_answer_sheet(path: &Path, config: &Config) -> Result<()> {
    let sheet = Commands::load_answer_sheet(path)?;
    let submitter = HttpSubmitter::new(config)?;

    let mut form = SurveyForm::new();
    form.apply_sheet(&sheet)?;
    info!(
        "Loaded answer sheet {} ({} questions answered)",
        path.display(),
        form.answered_questions()
    );

    match form.submit(&submitter).await {
        Ok(result) => {
            println!("Thank you for taking our survey!");
            println!(
                "Your survey response has been successfully submitted for {}.",
                result.name.as_deref().unwrap_or_default()
            );
            Ok(())
        }
        Err(e) => {
            error!("Submission to {} failed: {}", submitter.api_url(), e);
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}
