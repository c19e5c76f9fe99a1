use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::cli::{NormalizeArgs, ProfileArgs, ProfileSource, RenderArgs};
use crate::document::build_document;
use crate::formats::{JobRecord, RawJobForm};
use crate::layout::layout;
use crate::normalize::normalize;
use crate::pdf::write_pdf;
use crate::profile::DocumentProfile;

pub const PDF_FILENAME: &str = "RAMS.pdf";

/// Normalizes `raw` and renders it to PDF bytes.
pub fn build_pdf(
    raw: &RawJobForm,
    profile: &DocumentProfile,
    today: NaiveDate,
) -> anyhow::Result<Vec<u8>> {
    let record = normalize(raw, &profile.defaults, today);
    render_record(&record, profile)
}

pub fn render_record(record: &JobRecord, profile: &DocumentProfile) -> anyhow::Result<Vec<u8>> {
    let started = Instant::now();
    let document = build_document(record, profile);
    let pages = layout(&document);
    let bytes = write_pdf(&pages, &document.title).context("build rams document")?;

    tracing::debug!(
        variant = profile.variant.as_str(),
        blocks = document.blocks.len(),
        pages = pages.len(),
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered rams pdf"
    );
    Ok(bytes)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let out_path = PathBuf::from(&args.out);
    if out_path.exists() && !args.force {
        anyhow::bail!("render output already exists: {}", out_path.display());
    }
    let profile = args.profile.load()?;
    let raw = read_form(Path::new(&args.input))?;
    let date = args.date.unwrap_or_else(today);

    tracing::info!(
        input = %args.input,
        out = %out_path.display(),
        variant = profile.variant.as_str(),
        "render rams"
    );
    let bytes = build_pdf(&raw, &profile, date)?;

    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create render output dir: {}", parent.display()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if args.force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options
        .open(&out_path)
        .with_context(|| format!("open output: {}", out_path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("write output: {}", out_path.display()))?;
    file.flush()
        .with_context(|| format!("flush output: {}", out_path.display()))?;

    tracing::info!(bytes = bytes.len(), "wrote {}", out_path.display());
    Ok(())
}

pub fn run_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let profile = args.profile.load()?;
    let raw = read_form(Path::new(&args.input))?;
    let record = normalize(&raw, &profile.defaults, args.date.unwrap_or_else(today));

    let json = serde_json::to_string_pretty(&record).context("serialize job record")?;
    println!("{json}");
    Ok(())
}

pub fn run_profile(args: ProfileArgs) -> anyhow::Result<()> {
    let profile = args.profile.load()?;
    print!("{}", profile.to_yaml()?);
    Ok(())
}

/// Reads a form from YAML or JSON (JSON being a subset of YAML).
pub fn read_form(path: &Path) -> anyhow::Result<RawJobForm> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read input: {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(RawJobForm::default());
    }
    serde_yaml::from_str(&contents).with_context(|| format!("parse input: {}", path.display()))
}

impl ProfileSource {
    pub fn load(&self) -> anyhow::Result<DocumentProfile> {
        let base = DocumentProfile::for_variant(self.variant);
        let mut profile = match &self.profile {
            Some(path) => DocumentProfile::load(Path::new(path), &base)?,
            None => base,
        };
        profile.apply_env();
        Ok(profile)
    }
}
