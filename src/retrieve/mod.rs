//! Batch PDF retrieval.
//!
//! Drives the resolver over a list of DOIs: each DOI is resolved to a PDF
//! URL, named from a CrossRef title lookup, downloaded into the output
//! directory, and recorded in one of two append-only logs. A per-DOI
//! failure never aborts the run; the loop records the outcome and moves
//! on. Log files are opened, written and closed per entry, so no handle
//! is held across iterations.

use rand::Rng;
use regex::Regex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::DownloadConfig;
use crate::resolver::MirrorResolver;
use crate::sources::{CrossRefClient, SourceError};
use crate::utils::HttpClient;

const PDF_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum filename length, matching the sanitizer's truncation.
const MAX_FILENAME_LEN: usize = 100;

/// Outcome of retrieving a single DOI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// PDF resolved, downloaded and written
    Saved { filename: String, bytes: u64 },
    /// No mirror yielded an embedded document
    NotFound,
    /// Resolved but the download or file write failed
    Failed(String),
}

/// A DOI paired with its retrieval outcome.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub doi: String,
    pub result: FetchResult,
}

/// Summary of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Per-DOI outcomes in input order
    pub outcomes: Vec<FetchOutcome>,

    /// Number of PDFs written
    pub saved: usize,

    /// Number of DOIs no mirror could resolve
    pub not_found: usize,

    /// Number of resolved DOIs whose download or write failed
    pub failed: usize,
}

impl BatchReport {
    pub fn new(outcomes: Vec<FetchOutcome>) -> Self {
        let saved = outcomes
            .iter()
            .filter(|o| matches!(o.result, FetchResult::Saved { .. }))
            .count();
        let not_found = outcomes
            .iter()
            .filter(|o| o.result == FetchResult::NotFound)
            .count();
        let failed = outcomes.len() - saved - not_found;

        Self {
            outcomes,
            saved,
            not_found,
            failed,
        }
    }
}

/// Batch retrieval driver.
#[derive(Debug)]
pub struct Retriever {
    resolver: MirrorResolver,
    crossref: CrossRefClient,
    client: HttpClient,
    downloads: DownloadConfig,
}

impl Retriever {
    pub fn new(
        resolver: MirrorResolver,
        crossref: CrossRefClient,
        client: HttpClient,
        downloads: DownloadConfig,
    ) -> Self {
        Self {
            resolver,
            crossref,
            client,
            downloads,
        }
    }

    /// Retrieve every DOI in the list, with a randomized delay between
    /// consecutive DOIs to avoid hammering the mirror service.
    pub async fn fetch_all(&self, dois: &[String]) -> BatchReport {
        let mut outcomes = Vec::with_capacity(dois.len());

        for (index, doi) in dois.iter().enumerate() {
            let result = self.fetch_one(doi).await;
            outcomes.push(FetchOutcome {
                doi: doi.clone(),
                result,
            });

            if index + 1 < dois.len() {
                self.delay_between_dois().await;
            }
        }

        BatchReport::new(outcomes)
    }

    /// Retrieve a single DOI: resolve, name, download, write, log.
    pub async fn fetch_one(&self, doi: &str) -> FetchResult {
        let pdf_url = match self.resolver.resolve(doi).await {
            Some(url) => url,
            None => {
                tracing::warn!(%doi, "no mirror yielded a PDF");
                self.log_failure(doi);
                return FetchResult::NotFound;
            }
        };

        let title = self.crossref.lookup_title(doi).await;
        let filename = format!("{}.pdf", sanitize_filename(&title));

        match self.download_to(&pdf_url, &filename).await {
            Ok(bytes) => {
                self.log_success(doi, &filename);
                tracing::info!(%doi, %filename, bytes, "saved");
                FetchResult::Saved { filename, bytes }
            }
            Err(e) => {
                tracing::warn!(%doi, "download failed: {}", e);
                self.log_failure(doi);
                FetchResult::Failed(e.to_string())
            }
        }
    }

    async fn download_to(&self, pdf_url: &str, filename: &str) -> Result<u64, SourceError> {
        let response = self
            .client
            .get(pdf_url)
            .timeout(PDF_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PDF host returned status {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;

        std::fs::create_dir_all(&self.downloads.dir)?;
        let path = self.downloads.dir.join(filename);
        std::fs::write(&path, bytes.as_ref())?;

        Ok(bytes.len() as u64)
    }

    fn log_success(&self, doi: &str, filename: &str) {
        if let Err(e) = append_line(&self.downloads.success_log, &format!("{} -> {}", doi, filename))
        {
            tracing::warn!("could not append to success log: {}", e);
        }
    }

    fn log_failure(&self, doi: &str) {
        if let Err(e) = append_line(&self.downloads.failed_log, doi) {
            tracing::warn!("could not append to failure log: {}", e);
        }
    }

    async fn delay_between_dois(&self) {
        let min = self.downloads.delay_min_secs.max(0.0);
        let max = self.downloads.delay_max_secs.max(min);
        if max <= 0.0 {
            return;
        }

        let secs = if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        };

        tracing::debug!("sleeping {:.1}s before next DOI", secs);
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}

/// Append one line to an append-only log, creating the file if needed.
/// The handle is closed when this returns.
fn append_line(path: &PathBuf, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

/// Read a batch input file: one DOI per line, blank lines ignored.
pub fn read_doi_file(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Strip characters that are invalid in filenames and truncate to 100
/// characters. Pure; deterministic.
pub fn sanitize_filename(name: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let re = INVALID.get_or_init(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("static pattern"));
    re.replace_all(name, "_")
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect()
}
