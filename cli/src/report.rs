use std::path::PathBuf;

use image_batcher_core::format::OutputFormat;

/// One rendition written to disk.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub format: OutputFormat,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of converting a single source image.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub original_size: u64,
    pub outputs: Vec<WrittenFile>,
    pub error: Option<String>,
}

impl FileResult {
    pub fn failed(path: PathBuf, error: String) -> Self {
        Self {
            path,
            original_size: 0,
            outputs: Vec::new(),
            error: Some(error),
        }
    }

    pub fn written_size(&self) -> u64 {
        self.outputs.iter().map(|o| o.size).sum()
    }
}

/// Aggregate report for a batch run.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_none()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn total_original(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.error.is_none())
            .map(|r| r.original_size)
            .sum()
    }

    pub fn total_written(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.error.is_none())
            .map(|r| r.written_size())
            .sum()
    }

    /// Bytes written per output format, in first-seen order.
    pub fn written_by_format(&self) -> Vec<(OutputFormat, u64)> {
        let mut totals: Vec<(OutputFormat, u64)> = Vec::new();
        for out in self
            .results
            .iter()
            .filter(|r| r.error.is_none())
            .flat_map(|r| &r.outputs)
        {
            match totals.iter_mut().find(|(f, _)| *f == out.format) {
                Some((_, total)) => *total += out.size,
                None => totals.push((out.format, out.size)),
            }
        }
        totals
    }

    pub fn print_summary(&self) {
        println!("\n--- Summary ---");
        println!(
            "{} image(s) processed and optimized | Errors: {}",
            self.success_count(),
            self.error_count()
        );

        if self.success_count() > 0 {
            println!(
                "Sources: {} → outputs: {}",
                format_size(self.total_original()),
                format_size(self.total_written())
            );
            for (format, size) in self.written_by_format() {
                println!("  {:<5} {}", format.as_str(), format_size(size));
            }
        }

        for r in &self.results {
            if let Some(ref err) = r.error {
                println!("  ERROR {}: {}", r.path.display(), err);
            }
        }
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
