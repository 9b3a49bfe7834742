use clap::Parser;
use std::path::PathBuf;

/// Video used when no identifier is given
pub const DEFAULT_IDENTIFIER: &str = "KuPc06JgI_A";

#[derive(Parser, Debug)]
#[command(
    name = "youtube-to-docs",
    about = "Turn YouTube videos, playlists and channels into a CSV of metadata, transcripts and summaries",
    version,
    long_about = "Fetches metadata and transcripts for a YouTube video, a comma separated list of videos, a playlist (PL.../UU...) or a channel (@handle), optionally summarizes each transcript with an LLM, and writes everything to a CSV file with one transcript and one summary file per video."
)]
pub struct Cli {
    /// Video ID, comma separated video IDs, playlist ID or @channel handle
    #[arg(value_name = "IDENTIFIER", default_value = DEFAULT_IDENTIFIER)]
    pub identifier: String,

    /// Output CSV file
    #[arg(short, long, value_name = "FILE", default_value = "youtube-docs.csv")]
    pub outfile: PathBuf,

    /// Summarization model as <provider>-<model>, e.g. gemini-3-flash-preview,
    /// vertex-claude-haiku-4-5@20251001, bedrock-nova-2-lite-v1 or foundry-gpt-5-mini
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Settings file (defaults to ./config.yaml, then the user config directory)
    #[arg(short, long, value_name = "FILE", env = "YOUTUBE_TO_DOCS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["youtube-to-docs"]).unwrap();
        assert_eq!(cli.identifier, "KuPc06JgI_A");
        assert_eq!(cli.outfile, PathBuf::from("youtube-docs.csv"));
        assert!(cli.model.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "youtube-to-docs",
            "@mga-othercommittee6625",
            "-o",
            "out/docs.csv",
            "-m",
            "vertex-claude-haiku-4-5@20251001",
            "--config",
            "settings.yaml",
            "-v",
            "-q",
        ])
        .unwrap();

        assert_eq!(cli.identifier, "@mga-othercommittee6625");
        assert_eq!(cli.outfile, PathBuf::from("out/docs.csv"));
        assert_eq!(cli.model.as_deref(), Some("vertex-claude-haiku-4-5@20251001"));
        assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
        assert!(cli.verbose);
        assert!(cli.quiet);
    }
}
