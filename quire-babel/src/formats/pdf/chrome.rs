//! Headless Chrome rasterizer
//!
//! Chrome's `--screenshot` only captures the viewport, so rendering takes two
//! runs against the same temporary directory:
//!
//! 1. `--dump-dom` on a measuring copy of the print page. A small script
//!    stamps the laid-out height onto `<body data-measured-height>`, which we
//!    read back from the dumped DOM.
//! 2. `--screenshot` of the print page with the window sized to that height
//!    and `--force-device-scale-factor` set to the layout scale.
//!
//! The temporary directory is dropped on every return path.

use super::raster::{print_page_html, PrintLayout, RasterImage, Rasterizer};
use crate::error::FormatError;
use crate::markup::SanitizedMarkup;
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;
use url::Url;
use which::which;

pub const CHROME_BIN_ENV: &str = "QUIRE_CHROME_BIN";

const MEASURE_SCRIPT: &str = "<script>document.body.setAttribute('data-measured-height', \
     Math.ceil(document.documentElement.scrollHeight));</script>";

static MEASURED_HEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-measured-height="(\d+)""#).expect("valid regex"));

/// Rasterizes print pages with a local Chrome/Chromium binary.
#[derive(Debug, Clone, Default)]
pub struct ChromeRasterizer {
    binary: Option<PathBuf>,
    layout: PrintLayout,
}

impl ChromeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this binary instead of searching for one.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    pub fn with_layout(mut self, layout: PrintLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &PrintLayout {
        &self.layout
    }

    fn chrome(&self) -> Result<PathBuf, FormatError> {
        match &self.binary {
            Some(path) => Ok(path.clone()),
            None => resolve_chrome_binary(),
        }
    }
}

impl Rasterizer for ChromeRasterizer {
    fn rasterize(&self, markup: &SanitizedMarkup) -> Result<RasterImage, FormatError> {
        let chrome = self.chrome()?;
        let page = print_page_html(markup, &self.layout);
        let width = self.layout.viewport_width();

        let temp_dir =
            tempdir().map_err(|e| FormatError::RenderError(format!("Temp dir error: {e}")))?;

        let measure_path = temp_dir.path().join("quire-measure.html");
        write_page(&measure_path, &with_measure_script(&page))?;
        let output = run_chrome(
            &chrome,
            &[
                "--dump-dom".to_string(),
                format!("--window-size={width},800"),
            ],
            &measure_path,
        )?;
        let height = parse_measured_height(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(width, height, "measured print page");

        let page_path = temp_dir.path().join("quire-print.html");
        write_page(&page_path, &page)?;
        let png_path = temp_dir.path().join("quire-print.png");
        run_chrome(
            &chrome,
            &[
                "--hide-scrollbars".to_string(),
                format!("--force-device-scale-factor={}", self.layout.scale),
                format!("--window-size={width},{height}"),
                format!("--screenshot={}", png_path.display()),
            ],
            &page_path,
        )?;

        let png = fs::read(&png_path).map_err(|e| {
            FormatError::RenderError(format!("Chrome did not produce a screenshot: {e}"))
        })?;
        RasterImage::from_png(&png)
    }
}

fn write_page(path: &Path, html: &str) -> Result<(), FormatError> {
    fs::write(path, html).map_err(|e| FormatError::RenderError(e.to_string()))
}

fn with_measure_script(page: &str) -> String {
    match page.rfind("</body>") {
        Some(idx) => format!("{}{MEASURE_SCRIPT}{}", &page[..idx], &page[idx..]),
        None => format!("{page}{MEASURE_SCRIPT}"),
    }
}

fn parse_measured_height(dom: &str) -> Result<u32, FormatError> {
    MEASURED_HEIGHT
        .captures(dom)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|height| *height > 0)
        .ok_or_else(|| {
            FormatError::RenderError("Chrome did not report the page height".to_string())
        })
}

fn run_chrome(chrome: &Path, args: &[String], page: &Path) -> Result<Output, FormatError> {
    let file_url = Url::from_file_path(page).map_err(|_| {
        FormatError::RenderError("Failed to construct file:// URL for HTML input".to_string())
    })?;

    let output = Command::new(chrome)
        .arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .args(args)
        .arg(file_url.as_str())
        .output()
        .map_err(|e| {
            FormatError::RenderError(format!(
                "Failed to launch Chrome ({}): {}",
                chrome.display(),
                e
            ))
        })?;

    if !output.status.success() {
        return Err(FormatError::RenderError(format!(
            "Chrome exited with status {}",
            output.status
        )));
    }
    Ok(output)
}

/// Find a Chrome/Chromium binary: environment overrides, then `PATH`, then
/// the usual install locations.
pub fn resolve_chrome_binary() -> Result<PathBuf, FormatError> {
    for var in [CHROME_BIN_ENV, "GOOGLE_CHROME_BIN", "CHROME_BIN"] {
        if let Some(path) = env::var_os(var) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
    }

    for candidate in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
        "msedge",
    ] {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }

    let defaults: &[&str] = if cfg!(target_os = "macos") {
        &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium-browser",
            "/usr/bin/chromium",
        ]
    };
    if let Some(path) = defaults.iter().map(PathBuf::from).find(|p| p.exists()) {
        return Ok(path);
    }

    Err(FormatError::RenderError(format!(
        "Unable to locate a Chrome/Chromium binary. Set {CHROME_BIN_ENV} to override the detection."
    )))
}
