use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::models::AnswerSheet;

#[derive(Parser)]
#[command(name = "sleepsurvey")]
#[command(about = "Survey on technology usage and its impact on sleep patterns")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Endpoint responses are posted to (overrides SURVEY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Fill in the survey in the terminal (default)
    Tui,

    /// Print the questionnaire and exit
    Questions,

    /// Submit a prepared answer sheet without the interactive form
    Submit {
        /// JSON answer sheet; answers are keyed by question number
        #[arg(short, long)]
        from: PathBuf,
    },
}

impl Cli {
    /// The command to run, the interactive form when none was given
    pub fn selected_command(&self) -> Commands {
        match &self.command {
            Some(Commands::Questions) => Commands::Questions,
            Some(Commands::Submit { from }) => Commands::Submit { from: from.clone() },
            Some(Commands::Tui) | None => Commands::Tui,
        }
    }
}

impl Commands {
    pub fn load_answer_sheet(path: &Path) -> Result<AnswerSheet> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read answer sheet: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid answer sheet: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::parse_from(["sleepsurvey"]);
        assert_eq!(cli.selected_command(), Commands::Tui);
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_submit_with_global_api_url() {
        let cli = Cli::parse_from([
            "sleepsurvey",
            "submit",
            "--from",
            "answers.json",
            "--api-url",
            "https://survey.example.com/api/responses",
        ]);
        assert_eq!(
            cli.selected_command(),
            Commands::Submit {
                from: PathBuf::from("answers.json")
            }
        );
        assert_eq!(
            cli.api_url.as_deref(),
            Some("https://survey.example.com/api/responses")
        );
    }

    #[test]
    fn test_load_answer_sheet() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "Jane Doe",
                "email": "jane@example.com",
                "age": "25-34",
                "education": "Bachelor's degree",
                "answers": {{ "3": "2-4 hours", "5": "Yes" }}
            }}"#
        )
        .unwrap();

        let sheet = Commands::load_answer_sheet(file.path()).unwrap();
        assert_eq!(sheet.name, "Jane Doe");
        assert_eq!(sheet.answers.len(), 2);
        assert_eq!(sheet.answers[&5], "Yes");
    }

    #[test]
    fn test_load_answer_sheet_reports_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Commands::load_answer_sheet(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid answer sheet"));

        let missing = Commands::load_answer_sheet(Path::new("/nonexistent/answers.json"));
        assert!(missing.is_err());
    }
}
