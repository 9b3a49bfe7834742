use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::OutputSettings;

/// Table columns preceding the summary column
pub const BASE_COLUMNS: [&str; 10] = [
    "URL",
    "Title",
    "Description",
    "Data Published",
    "Channel",
    "Tags",
    "Duration",
    "Transcript characters",
    "Transcript File",
    "Summary File",
];

/// Name of the summary column; qualified with the model when one is used
pub fn summary_column(model: Option<&str>) -> String {
    match model {
        Some(model) => format!("Summary Text {}", model),
        None => "Summary Text".to_string(),
    }
}

/// One processed video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_title: String,
    pub tags: String,
    pub duration: String,
    pub transcript_characters: usize,
    pub transcript_file: String,
    pub summary_file: String,
    pub summary_text: String,
}

impl VideoRecord {
    fn to_row(&self) -> [String; 11] {
        [
            self.url.clone(),
            self.title.clone(),
            self.description.clone(),
            self.published_at.clone(),
            self.channel_title.clone(),
            self.tags.clone(),
            self.duration.clone(),
            self.transcript_characters.to_string(),
            self.transcript_file.clone(),
            self.summary_file.clone(),
            self.summary_text.clone(),
        ]
    }
}

/// Rows collected during a run, written once at the end
#[derive(Debug, Clone)]
pub struct DocsTable {
    summary_column: String,
    records: Vec<VideoRecord>,
}

impl DocsTable {
    pub fn new(model: Option<&str>) -> Self {
        Self {
            summary_column: summary_column(model),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: VideoRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn headers(&self) -> Vec<&str> {
        BASE_COLUMNS
            .iter()
            .copied()
            .chain(std::iter::once(self.summary_column.as_str()))
            .collect()
    }

    /// Serialize the table as CSV
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = fs_err::File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record(self.headers())?;
        for record in &self.records {
            writer.write_record(record.to_row())?;
        }
        writer.flush().context("Failed to flush CSV output")?;

        Ok(())
    }
}

/// Where the table and the per-video files go
#[derive(Debug, Clone)]
pub struct OutputLayout {
    table_path: PathBuf,
    transcripts_dir: Option<PathBuf>,
    summaries_dir: Option<PathBuf>,
}

impl OutputLayout {
    /// Create the output directories
    ///
    /// Per-video files are only written when the table is a `.csv` file; they
    /// go to sibling directories of the table.
    pub fn prepare(outfile: &Path, settings: &OutputSettings) -> Result<Self> {
        let is_csv = outfile
            .extension()
            .map(|ext| ext == "csv")
            .unwrap_or(false);

        if !is_csv {
            tracing::warn!(
                "{} is not a .csv path; transcript and summary files will not be written",
                outfile.display()
            );
            return Ok(Self {
                table_path: outfile.to_path_buf(),
                transcripts_dir: None,
                summaries_dir: None,
            });
        }

        let base_dir = match outfile.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let transcripts_dir = base_dir.join(&settings.transcript_dir);
        let summaries_dir = base_dir.join(&settings.summary_dir);
        fs_err::create_dir_all(&transcripts_dir)
            .context("Failed to create transcript directory")?;
        fs_err::create_dir_all(&summaries_dir).context("Failed to create summary directory")?;

        Ok(Self {
            table_path: outfile.to_path_buf(),
            transcripts_dir: Some(transcripts_dir),
            summaries_dir: Some(summaries_dir),
        })
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Save a transcript as `{video_id} - {safe_title}.txt`
    pub fn write_transcript(&self, video_id: &str, safe_title: &str, text: &str) -> Option<PathBuf> {
        let dir = self.transcripts_dir.as_ref()?;
        let filename = format!("{} - {}.txt", video_id, safe_title);
        write_text(dir, &filename, text, "transcript")
    }

    /// Save a summary as `{model} - {video_id} - {safe_title} - summary.md`
    pub fn write_summary(
        &self,
        model: &str,
        video_id: &str,
        safe_title: &str,
        text: &str,
    ) -> Option<PathBuf> {
        let dir = self.summaries_dir.as_ref()?;
        let filename = format!("{} - {} - {} - summary.md", model, video_id, safe_title);
        write_text(dir, &filename, text, "summary")
    }
}

/// Write a file and return its absolute path; failures are logged, not raised
fn write_text(dir: &Path, filename: &str, text: &str, kind: &str) -> Option<PathBuf> {
    let path = dir.join(filename);
    let path = std::path::absolute(&path).unwrap_or(path);

    match fs_err::write(&path, text) {
        Ok(()) => {
            tracing::info!("Saved {}: {}", kind, filename);
            Some(path)
        }
        Err(e) => {
            tracing::error!("Error writing {}: {}", kind, e);
            None
        }
    }
}

/// Render an optional path for a table cell
pub fn path_cell(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, summary: &str) -> VideoRecord {
        VideoRecord {
            url: crate::utils::watch_url(id),
            title: format!("Title, \"{}\"", id),
            description: "line one\nline two".to_string(),
            transcript_characters: 42,
            summary_text: summary.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_column() {
        assert_eq!(summary_column(None), "Summary Text");
        assert_eq!(
            summary_column(Some("bedrock-nova-2-lite-v1")),
            "Summary Text bedrock-nova-2-lite-v1"
        );
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.csv");

        let mut table = DocsTable::new(Some("gemini-3-flash-preview"));
        table.push(record("aaaaaaaaaaa", "first summary"));
        table.push(record("bbbbbbbbbbb", ""));
        table.push(record("ccccccccccc", "third, with comma"));
        table.write_csv(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let mut expected: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        expected.push("Summary Text gemini-3-flash-preview".to_string());
        assert_eq!(headers, expected);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "https://www.youtube.com/watch?v=aaaaaaaaaaa");
        assert_eq!(&rows[0][1], "Title, \"aaaaaaaaaaa\"");
        assert_eq!(&rows[0][2], "line one\nline two");
        assert_eq!(&rows[0][7], "42");
        assert_eq!(&rows[2][10], "third, with comma");
    }

    #[test]
    fn test_empty_table_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        DocsTable::new(None).write_csv(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 11);
        assert_eq!(reader.records().count(), 0);
    }

    #[test]
    fn test_layout_creates_sibling_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let outfile = dir.path().join("nested").join("docs.csv");

        let layout = OutputLayout::prepare(&outfile, &OutputSettings::default()).unwrap();
        assert!(dir.path().join("nested/transcript-files").is_dir());
        assert!(dir.path().join("nested/summary-files").is_dir());
        assert_eq!(layout.table_path(), outfile.as_path());

        let transcript = layout
            .write_transcript("aaaaaaaaaaa", "My_Video_Title_", "hello world")
            .unwrap();
        assert!(transcript.is_absolute());
        assert!(transcript.ends_with("transcript-files/aaaaaaaaaaa - My_Video_Title_.txt"));
        assert_eq!(fs_err::read_to_string(&transcript).unwrap(), "hello world");

        let summary = layout
            .write_summary("foundry-gpt-5-mini", "aaaaaaaaaaa", "My_Video_Title_", "# Summary")
            .unwrap();
        assert!(summary
            .ends_with("summary-files/foundry-gpt-5-mini - aaaaaaaaaaa - My_Video_Title_ - summary.md"));
    }

    #[test]
    fn test_non_csv_output_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout =
            OutputLayout::prepare(&dir.path().join("docs.tsv"), &OutputSettings::default()).unwrap();

        assert!(layout.write_transcript("aaaaaaaaaaa", "t", "text").is_none());
        assert!(layout.write_summary("m-x", "aaaaaaaaaaa", "t", "text").is_none());
        assert!(!dir.path().join("transcript-files").exists());
    }

    #[test]
    fn test_path_cell() {
        assert_eq!(path_cell(None), "");
        assert_eq!(path_cell(Some(Path::new("/tmp/a.txt"))), "/tmp/a.txt");
    }
}
