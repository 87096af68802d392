use crate::dissect::DissectResult;
use anyhow::{Context, Result};
use log::debug;
use std::collections::HashSet;
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;
use tokio::sync::mpsc;

/// Domain names and translations seen so far, deduplicated by exact string
/// match and kept in order of first appearance.
#[derive(Debug, Default)]
pub struct NameCatalog {
    domains: Vec<String>,
    domain_index: HashSet<String>,
    translations: Vec<String>,
    translation_index: HashSet<String>,
}

impl NameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the name was new.
    pub fn on_domain(&mut self, name: &str) -> bool {
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty() {
            return false;
        }
        insert_unique(&mut self.domains, &mut self.domain_index, name.to_string())
    }

    /// Stores `"name addr"`. Returns true if the pair was new.
    pub fn on_translation(&mut self, name: &str, addr: IpAddr) -> bool {
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty() {
            return false;
        }
        insert_unique(
            &mut self.translations,
            &mut self.translation_index,
            format!("{name} {addr}"),
        )
    }

    pub fn absorb(&mut self, result: &DissectResult) {
        for event in &result.domain_events {
            self.on_domain(&event.name);
        }
        for event in &result.translation_events {
            self.on_translation(&event.name, event.addr);
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn translations(&self) -> &[String] {
        &self.translations
    }

    pub fn write_domains(&self, path: &Path) -> Result<()> {
        write_lines(path, &self.domains)
            .with_context(|| format!("Failed to write domain names to {}", path.display()))
    }

    pub fn write_translations(&self, path: &Path) -> Result<()> {
        write_lines(path, &self.translations)
            .with_context(|| format!("Failed to write translations to {}", path.display()))
    }
}

fn insert_unique(list: &mut Vec<String>, index: &mut HashSet<String>, entry: String) -> bool {
    if index.contains(&entry) {
        return false;
    }
    index.insert(entry.clone());
    list.push(entry);
    true
}

fn write_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    std::fs::write(path, contents)
}

/// Drains dissection results from the capture task, printing their text and
/// folding their events into a [`NameCatalog`].
pub struct DnsCollector<W> {
    catalog: NameCatalog,
    rx: mpsc::Receiver<DissectResult>,
    out: W,
}

impl<W: Write> DnsCollector<W> {
    pub fn new(rx: mpsc::Receiver<DissectResult>, out: W) -> Self {
        Self {
            catalog: NameCatalog::new(),
            rx,
            out,
        }
    }

    /// Runs until every sender is gone.
    pub async fn run(mut self) -> Result<NameCatalog> {
        while let Some(result) = self.rx.recv().await {
            if let Some(err) = &result.error {
                debug!("Frame dissection stopped: {err}");
            }
            self.out
                .write_all(result.formatted_text.as_bytes())
                .context("Failed to write report")?;
            self.catalog.absorb(&result);
        }
        self.out.flush().context("Failed to flush report output")?;
        Ok(self.catalog)
    }
}
