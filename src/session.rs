//! Console session: read text, render it, save it, repeat.
//!
//! Two front ends share the same [`Pipeline`]:
//!
//! - [`Session::run`] is the interactive prompt loop. Each input line becomes
//!   one numbered image; the exact word `exit` (or end of input) stops it.
//! - [`Session::run_json`] reads one JSON job per line and answers with one
//!   JSON result per line, for driving the renderer from scripts.
//!
//! Per-request failures are reported and the loop continues. Only failures of
//! the console streams themselves end a session early.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Input that ends the interactive loop
pub const EXIT_COMMAND: &str = "exit";

/// What one successful render produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub line_count: usize,
    pub width: u32,
    pub height: u32,
}

/// Renders a piece of text to an image file.
pub trait Pipeline {
    /// Render `text` and write the image to `path`
    fn render_to_file(&self, text: &str, path: &Path) -> Result<RenderSummary>;

    /// Path of the `n`-th numbered output
    fn output_path(&self, n: u32) -> PathBuf;
}

impl<P: Pipeline + ?Sized> Pipeline for &P {
    fn render_to_file(&self, text: &str, path: &Path) -> Result<RenderSummary> {
        (**self).render_to_file(text, path)
    }

    fn output_path(&self, n: u32) -> PathBuf {
        (**self).output_path(n)
    }
}

/// Result of handling one line of interactive input
#[derive(Debug)]
pub enum Outcome {
    Exit,
    Empty,
    Saved(RenderSummary),
    Failed(crate::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub saved: u32,
    pub failed: u32,
    pub skipped: u32,
}

pub struct Session<P> {
    pipeline: P,
    next_index: u32,
    stats: SessionStats,
}

/// One line read from the console
enum ConsoleLine {
    Text(String),
    NotUtf8,
    Eof,
}

/// Read up to the next newline without requiring the bytes to be UTF-8.
fn read_console_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<ConsoleLine> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(ConsoleLine::Eof);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(match std::str::from_utf8(buf) {
        Ok(text) => ConsoleLine::Text(text.to_string()),
        Err(_) => ConsoleLine::NotUtf8,
    })
}

#[derive(Deserialize)]
struct Job {
    id: u64,
    text: String,
    #[serde(default)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct JobResult {
    id: u64,
    path: Option<String>,
    lines: usize,
    width: u32,
    height: u32,
    is_error: bool,
    message: Option<String>,
}

impl<P: Pipeline> Session<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            next_index: 1,
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Index the next successful image will be saved under
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Handle one line of interactive input.
    ///
    /// The input is trimmed first. `exit` must match exactly.
    pub fn submit(&mut self, raw: &str) -> Outcome {
        let text = raw.trim();
        if text == EXIT_COMMAND {
            return Outcome::Exit;
        }
        if text.is_empty() {
            self.stats.skipped += 1;
            return Outcome::Empty;
        }
        let path = self.pipeline.output_path(self.next_index);
        match self.render_counted(text, &path) {
            Ok(summary) => Outcome::Saved(summary),
            Err(e) => Outcome::Failed(e),
        }
    }

    fn render_counted(&mut self, text: &str, path: &Path) -> Result<RenderSummary> {
        match self.pipeline.render_to_file(text, path) {
            Ok(summary) => {
                self.stats.saved += 1;
                self.next_index += 1;
                Ok(summary)
            }
            Err(e) => {
                log::warn!("render to {} failed: {}", path.display(), e);
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    /// Interactive prompt loop over arbitrary console streams.
    ///
    /// A line that is not valid UTF-8 is reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<SessionStats> {
        writeln!(out, "Dynamic Text Image Generator")?;
        writeln!(out, "Type '{}' to stop the program.", EXIT_COMMAND)?;
        writeln!(out)?;

        let mut buf = Vec::new();
        loop {
            write!(out, "Enter your text (or type '{}' to quit): ", EXIT_COMMAND)?;
            out.flush()?;

            let line = match read_console_line(&mut input, &mut buf)? {
                ConsoleLine::Text(line) => line,
                ConsoleLine::NotUtf8 => {
                    log::warn!("skipping input line that is not valid UTF-8");
                    self.stats.skipped += 1;
                    writeln!(out, "Input is not valid UTF-8. Please try again.")?;
                    continue;
                }
                ConsoleLine::Eof => {
                    writeln!(out)?;
                    break;
                }
            };
            match self.submit(&line) {
                Outcome::Exit => {
                    writeln!(out, "Exiting the program. Goodbye!")?;
                    break;
                }
                Outcome::Empty => writeln!(out, "Text cannot be empty. Please try again.")?,
                Outcome::Saved(summary) => {
                    writeln!(out, "Image saved as '{}'", summary.path.display())?
                }
                Outcome::Failed(e) => writeln!(out, "Error: {}", e)?,
            }
        }

        Ok(self.stats)
    }

    /// JSON lines mode: one job per input line, one result per output line.
    ///
    /// Blank, malformed and non-UTF-8 lines are skipped. Jobs without an
    /// explicit `output` use the same numbering as the interactive loop.
    pub fn run_json<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<SessionStats> {
        let mut buf = Vec::new();
        loop {
            let line = match read_console_line(&mut input, &mut buf)? {
                ConsoleLine::Text(line) => line,
                ConsoleLine::NotUtf8 => {
                    log::warn!("skipping job line that is not valid UTF-8");
                    self.stats.skipped += 1;
                    continue;
                }
                ConsoleLine::Eof => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            let job = match serde_json::from_str::<Job>(&line) {
                Ok(job) => job,
                Err(e) => {
                    log::warn!("skipping malformed job line: {}", e);
                    self.stats.skipped += 1;
                    continue;
                }
            };

            let res = self.run_job(job);
            let js = serde_json::to_string(&res).unwrap_or_else(|_| {
                format!(
                    "{{\"id\":{},\"message\":\"serialization failed\",\"is_error\":true}}",
                    res.id
                )
            });
            writeln!(out, "{}", js)?;
            out.flush()?;
        }
        Ok(self.stats)
    }

    fn run_job(&mut self, job: Job) -> JobResult {
        let failed = |id, message: String| JobResult {
            id,
            path: None,
            lines: 0,
            width: 0,
            height: 0,
            is_error: true,
            message: Some(message),
        };

        let text = job.text.trim();
        if text.is_empty() {
            self.stats.skipped += 1;
            return failed(job.id, "text cannot be empty".to_string());
        }

        let rendered = match job.output {
            Some(path) => {
                let res = self.pipeline.render_to_file(text, &path);
                match &res {
                    Ok(_) => self.stats.saved += 1,
                    Err(e) => {
                        log::warn!("job {} failed: {}", job.id, e);
                        self.stats.failed += 1;
                    }
                }
                res
            }
            None => {
                let path = self.pipeline.output_path(self.next_index);
                self.render_counted(text, &path)
            }
        };

        match rendered {
            Ok(s) => JobResult {
                id: job.id,
                path: Some(s.path.display().to_string()),
                lines: s.line_count,
                width: s.width,
                height: s.height,
                is_error: false,
                message: None,
            },
            Err(e) => failed(job.id, e.to_string()),
        }
    }
}
