// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Print surfaces
//!
//! A [`PrintHost`] is whatever can show a rendered document and print it.
//! [`export_to_printable`] drives one through open, inject, settle, print and
//! returns without waiting for the user to finish with the print dialog.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use super::composer::RenderedDocument;
use crate::error::{ReportError, Result};

/// Opens the browser print dialog once the page has loaded
const PRINT_ON_LOAD: &str =
    "<script>window.addEventListener('load', function () { window.focus(); window.print(); });</script>\n";

/// Something that can display a document and print it
pub trait PrintHost {
    /// Prepare a fresh surface titled `title`. Fails with
    /// [`ReportError::SurfaceBlocked`] when the surface cannot be opened.
    fn open_surface(&mut self, title: &str) -> Result<()>;

    /// Place the document on the opened surface
    fn inject(&mut self, document: &RenderedDocument) -> Result<()>;

    /// Trigger printing. Returns once the print has been requested.
    fn print(&mut self) -> Result<()>;
}

/// Open a surface, inject the document, let it settle, then print.
///
/// A blocked surface is reported to the caller and never retried.
pub fn export_to_printable(
    document: &RenderedDocument,
    host: &mut dyn PrintHost,
    settle_delay: Duration,
) -> Result<()> {
    host.open_surface(&document.pdf_file_name())?;
    host.inject(document)?;

    if !settle_delay.is_zero() {
        log::debug!("Waiting {} ms for the document to settle", settle_delay.as_millis());
        std::thread::sleep(settle_delay);
    }

    host.print()?;
    log::info!("Print requested for {}", document.pdf_file_name());
    Ok(())
}

/// Path a document is written to inside `dir`
pub fn html_path(dir: &Path, document: &RenderedDocument) -> PathBuf {
    dir.join(format!("{}.html", document.file_stem))
}

fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        ReportError::SurfaceBlocked(format!("cannot create {}: {}", dir.display(), e))
    })
}

// ============================================================================
// File Host
// ============================================================================

/// Writes the document to disk and stops there
#[derive(Debug, Clone)]
pub struct FileHost {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl FileHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: None,
        }
    }

    /// File written by the last `inject`
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl PrintHost for FileHost {
    fn open_surface(&mut self, _title: &str) -> Result<()> {
        prepare_dir(&self.dir)
    }

    fn inject(&mut self, document: &RenderedDocument) -> Result<()> {
        let path = html_path(&self.dir, document);
        fs::write(&path, &document.html)?;
        self.written = Some(path);
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        if let Some(path) = &self.written {
            log::debug!("Report left at {} without opening it", path.display());
        }
        Ok(())
    }
}

// ============================================================================
// Browser Host
// ============================================================================

/// Writes a self-printing copy of the document and hands it to a browser
#[derive(Debug, Clone)]
pub struct BrowserHost {
    dir: PathBuf,
    /// Command line replacing the platform opener, e.g. `firefox --new-window`
    browser: Option<String>,
    written: Option<PathBuf>,
}

impl BrowserHost {
    pub fn new(dir: impl Into<PathBuf>, browser: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            browser,
            written: None,
        }
    }

    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    fn opener(&self, target: &Path) -> Result<Command> {
        if let Some(browser) = &self.browser {
            let mut parts = browser.split_whitespace();
            let program = parts.next().ok_or_else(|| {
                ReportError::SurfaceBlocked("the configured browser command is empty".to_string())
            })?;
            let mut cmd = Command::new(program);
            cmd.args(parts).arg(target);
            return Ok(cmd);
        }

        #[cfg(target_os = "windows")]
        let cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(target);
            cmd
        };

        #[cfg(target_os = "macos")]
        let cmd = {
            let mut cmd = Command::new("open");
            cmd.arg(target);
            cmd
        };

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let cmd = {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(target);
            cmd
        };

        Ok(cmd)
    }
}

impl PrintHost for BrowserHost {
    fn open_surface(&mut self, _title: &str) -> Result<()> {
        if self.browser.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(ReportError::SurfaceBlocked(
                "the configured browser command is empty".to_string(),
            ));
        }
        prepare_dir(&self.dir)
    }

    fn inject(&mut self, document: &RenderedDocument) -> Result<()> {
        let path = html_path(&self.dir, document);
        let html = match document.html.rfind("</body>") {
            Some(idx) => format!("{}{}{}", &document.html[..idx], PRINT_ON_LOAD, &document.html[idx..]),
            None => format!("{}{}", document.html, PRINT_ON_LOAD),
        };
        fs::write(&path, html)?;
        self.written = Some(path);
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        let target = self
            .written
            .clone()
            .ok_or_else(|| ReportError::SurfaceBlocked("no document was injected".to_string()))?;

        let mut cmd = self.opener(&target)?;
        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        // The child is not waited on; the browser owns the print dialog.
        cmd.spawn().map_err(|e| {
            ReportError::SurfaceBlocked(format!("cannot launch {:?}: {}", cmd.get_program(), e))
        })?;
        log::debug!("Opened {} for printing", target.display());
        Ok(())
    }
}
