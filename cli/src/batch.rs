use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use image_batcher_core::config::FailurePolicy;
use image_batcher_core::pipeline::Pipeline;

use crate::error::BatchError;
use crate::io::{collect_images, ensure_dir, output_path, read_file, write_file};
use crate::report::{FileResult, Report, WrittenFile};

/// Converts every PNG/JPEG in a directory into each configured output format.
pub struct BatchConverter {
    pipeline: Pipeline,
    policy: FailurePolicy,
    progress: ProgressBar,
}

impl BatchConverter {
    pub fn new(pipeline: Pipeline, policy: FailurePolicy) -> Self {
        Self {
            pipeline,
            policy,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-file progress on `progress`. Its length is set by `convert`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Source files and the outputs each one would produce, without touching anything.
    pub fn plan(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<Vec<(PathBuf, Vec<PathBuf>)>, BatchError> {
        let files = collect_images(input_dir)?;
        let formats = self.pipeline.formats();
        Ok(files
            .into_iter()
            .map(|source| {
                let outputs = formats
                    .iter()
                    .map(|&f| output_path(output_dir, &source, f))
                    .collect();
                (source, outputs)
            })
            .collect())
    }

    /// Convert every image in `input_dir`, writing renditions into `output_dir`.
    ///
    /// Files run one at a time in name order. Under [`FailurePolicy::Abort`] the
    /// first failure is returned and outputs already written stay in place;
    /// under [`FailurePolicy::Continue`] it is logged and recorded in the report.
    pub fn convert(&self, input_dir: &Path, output_dir: &Path) -> Result<Report, BatchError> {
        ensure_dir(output_dir)?;

        let files = collect_images(input_dir)?;
        log::info!(
            "Found {} image(s) in {}",
            files.len(),
            input_dir.display()
        );
        warn_duplicate_stems(&files);

        self.progress.set_length(files.len() as u64);
        let mut report = Report::new();

        for source in &files {
            let name = source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();
            self.progress.set_message(name.clone());

            match self.convert_file(source, output_dir) {
                Ok(result) => {
                    self.progress
                        .suspend(|| println!("Processed and optimized: {}", name));
                    report.add(result);
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => {
                        self.progress.abandon();
                        return Err(e);
                    }
                    FailurePolicy::Continue => {
                        log::error!("Error processing {}: {}", source.display(), e);
                        report.add(FileResult::failed(source.clone(), e.to_string()));
                    }
                },
            }

            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        println!(
            "{} image(s) have been processed and optimized.",
            report.success_count()
        );

        Ok(report)
    }

    /// All renditions are encoded before the first one is written.
    fn convert_file(&self, source: &Path, output_dir: &Path) -> Result<FileResult, BatchError> {
        let data = read_file(source)?;
        let original_size = data.len() as u64;

        let encoded = self
            .pipeline
            .process(source, &data)
            .map_err(|e| BatchError::Processing {
                path: source.to_path_buf(),
                source: e,
            })?;

        let mut outputs = Vec::with_capacity(encoded.len());
        for image in encoded {
            let path = output_path(output_dir, source, image.format);
            write_file(&path, &image.data)?;
            log::debug!(
                "Wrote {} ({}x{}, {} bytes)",
                path.display(),
                image.width,
                image.height,
                image.data.len()
            );
            outputs.push(WrittenFile {
                format: image.format,
                path,
                size: image.data.len() as u64,
            });
        }

        Ok(FileResult {
            path: source.to_path_buf(),
            original_size,
            outputs,
            error: None,
        })
    }
}

/// `a.png` and `a.jpg` both map to `a.*`; the later file wins.
fn warn_duplicate_stems(files: &[PathBuf]) {
    let mut seen: HashMap<OsString, &Path> = HashMap::new();
    for file in files {
        let stem = file.file_stem().unwrap_or_default().to_os_string();
        if let Some(previous) = seen.insert(stem, file.as_path()) {
            log::warn!(
                "{} and {} share a base name; outputs of the first will be overwritten",
                previous.display(),
                file.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    use image::GenericImageView;
    use image_batcher_core::config::ConversionConfig;
    use image_batcher_core::format::OutputFormat;
    use tempfile::TempDir;

    fn converter(config: &ConversionConfig) -> BatchConverter {
        let pipeline = Pipeline::from_config(config).unwrap();
        BatchConverter::new(pipeline, config.failure_policy)
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 120, 255])
        });
        img.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    fn write_jpeg(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, 60, (y % 256) as u8])
        });
        img.save_with_format(path, image::ImageFormat::Jpeg).unwrap();
    }

    fn names(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Default table at a small width so tests encode tiny images.
    fn config_at(width: u32) -> ConversionConfig {
        let mut config = ConversionConfig::default();
        config.width = width;
        config
    }

    /// Width and height from the first `ispe` property of an AVIF file.
    fn avif_dimensions(data: &[u8]) -> (u32, u32) {
        let pos = data.windows(4).position(|w| w == b"ispe").unwrap();
        let field = |at: usize| u32::from_be_bytes(data[at..at + 4].try_into().unwrap());
        // box type, then version/flags, then width and height
        (field(pos + 8), field(pos + 12))
    }

    #[test]
    fn test_single_png_produces_four_outputs() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("a.png"), 32, 24);

        let report = converter(&config_at(32))
            .convert(input.path(), output.path())
            .unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.error_count(), 0);
        assert_eq!(names(output.path()), set(&["a.jpg", "a.png", "a.webp", "a.avif"]));
        for written in &report.results[0].outputs {
            assert!(written.size > 0);
            assert_eq!(fs::metadata(&written.path).unwrap().len(), written.size);
        }
    }

    #[test]
    fn test_outputs_are_resized_to_target_width() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("wide.png"), 120, 90);
        write_jpeg(&input.path().join("narrow.jpg"), 40, 30);

        converter(&config_at(60)).convert(input.path(), output.path()).unwrap();

        for ext in ["jpg", "png", "webp"] {
            let wide = image::open(output.path().join(format!("wide.{ext}"))).unwrap();
            assert_eq!(wide.dimensions(), (60, 45), "wide.{ext}");

            // narrower sources are enlarged to the target width
            let narrow = image::open(output.path().join(format!("narrow.{ext}"))).unwrap();
            assert_eq!(narrow.dimensions(), (60, 45), "narrow.{ext}");
        }

        let wide = fs::read(output.path().join("wide.avif")).unwrap();
        assert_eq!(avif_dimensions(&wide), (60, 45));
        let narrow = fs::read(output.path().join("narrow.avif")).unwrap();
        assert_eq!(avif_dimensions(&narrow), (60, 45));
    }

    #[test]
    fn test_other_extensions_are_ignored() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("keep.PNG"), 8, 8);
        fs::write(input.path().join("anim.gif"), b"GIF89a").unwrap();
        fs::write(input.path().join("readme.txt"), b"hello").unwrap();
        fs::create_dir(input.path().join("sub")).unwrap();
        write_png(&input.path().join("sub").join("nested.png"), 8, 8);

        let config = config_at(16).with_formats(&[OutputFormat::Png]);
        let report = converter(&config).convert(input.path(), output.path()).unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(names(output.path()), set(&["keep.png"]));
    }

    #[test]
    fn test_second_run_produces_same_file_set() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("a.png"), 16, 16);
        write_jpeg(&input.path().join("b.jpeg"), 16, 16);

        let config = config_at(16).with_formats(&[OutputFormat::Jpeg, OutputFormat::Png]);
        let batch = converter(&config);

        batch.convert(input.path(), output.path()).unwrap();
        let first = names(output.path());
        batch.convert(input.path(), output.path()).unwrap();
        assert_eq!(names(output.path()), first);
        assert_eq!(first, set(&["a.jpg", "a.png", "b.jpg", "b.png"]));
    }

    #[test]
    fn test_missing_output_dir_is_created() {
        let input = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let output = root.path().join("public").join("img").join("type_d");
        write_png(&input.path().join("a.png"), 8, 8);

        let config = config_at(16).with_formats(&[OutputFormat::Png]);
        converter(&config).convert(input.path(), &output).unwrap();

        assert!(output.is_dir());
        assert!(output.join("a.png").is_file());
    }

    #[test]
    fn test_corrupt_file_continue_policy() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a_broken.png"), b"not really a png").unwrap();
        write_png(&input.path().join("b_good.png"), 8, 8);

        let mut config = config_at(16);
        config.failure_policy = FailurePolicy::Continue;
        let report = converter(&config)
            .convert(input.path(), output.path())
            .unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert!(report.results[0].error.is_some());
        assert!(names(output.path()).iter().all(|n| n.starts_with("b_good.")));
        assert_eq!(names(output.path()).len(), 4);
    }

    #[test]
    fn test_corrupt_file_stops_batch_by_default() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a_bad.png"), b"junk bytes").unwrap();
        write_png(&input.path().join("b_ok.png"), 8, 8);

        let err = converter(&config_at(16))
            .convert(input.path(), output.path())
            .unwrap_err();

        assert!(matches!(err, BatchError::Processing { .. }));
        assert!(names(output.path()).is_empty());
    }

    #[test]
    fn test_corrupt_file_abort_policy() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("a_good.png"), 8, 8);
        fs::write(input.path().join("b_broken.jpg"), b"\xFF\xD8 truncated").unwrap();
        write_png(&input.path().join("c_never.png"), 8, 8);

        let mut config = config_at(16).with_formats(&[OutputFormat::Png]);
        config.failure_policy = FailurePolicy::Abort;
        let err = converter(&config)
            .convert(input.path(), output.path())
            .unwrap_err();

        assert!(matches!(err, BatchError::Processing { .. }));
        // earlier outputs stay, nothing for the broken or later files
        assert_eq!(names(output.path()), set(&["a_good.png"]));
    }

    #[test]
    fn test_missing_input_dir_is_an_error() {
        let root = TempDir::new().unwrap();
        let output = root.path().join("out");
        let err = converter(&ConversionConfig::default())
            .convert(&root.path().join("nope"), &output)
            .unwrap_err();

        assert!(matches!(err, BatchError::ReadFile { .. }));
        // output dir is created before the input is listed
        assert!(output.is_dir());
    }

    #[test]
    fn test_plan_lists_outputs_without_writing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("a.png"), 8, 8);
        let out_dir = output.path().join("not_yet");

        let plan = converter(&ConversionConfig::default())
            .plan(input.path(), &out_dir)
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].1.len(), 4);
        assert_eq!(plan[0].1[3], out_dir.join("a.avif"));
        assert!(!out_dir.exists());
    }
}
