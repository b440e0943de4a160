use anyhow::{Context, Result, bail};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub trait Browser {
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn wait_until_visible(&mut self, selector: &str, timeout: Duration) -> Result<bool>;
    fn locate_all(&mut self, selector: &str) -> Result<Vec<String>>;
    fn click(&mut self, selector: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    pub blocks: Vec<String>,
    pub loads: bool,
}

impl ScriptedPage {
    pub fn loaded(blocks: Vec<String>) -> Self {
        Self {
            blocks,
            loads: true,
        }
    }

    pub fn timing_out() -> Self {
        Self {
            blocks: Vec::new(),
            loads: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScriptedBrowser {
    pages: VecDeque<ScriptedPage>,
    current: Option<ScriptedPage>,
    pub visited: Vec<String>,
}

impl ScriptedBrowser {
    pub fn new(pages: Vec<ScriptedPage>) -> Self {
        Self {
            pages: pages.into(),
            current: None,
            visited: Vec::new(),
        }
    }
}

impl Browser for ScriptedBrowser {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.visited.push(url.to_string());
        self.current = self.pages.pop_front();
        if self.current.is_none() {
            bail!("no scripted page left for {url}");
        }
        Ok(())
    }

    fn wait_until_visible(&mut self, _selector: &str, _timeout: Duration) -> Result<bool> {
        Ok(self.current.as_ref().is_some_and(|page| page.loads))
    }

    fn locate_all(&mut self, _selector: &str) -> Result<Vec<String>> {
        Ok(self
            .current
            .as_ref()
            .map(|page| page.blocks.clone())
            .unwrap_or_default())
    }

    fn click(&mut self, _selector: &str) -> Result<()> {
        Ok(())
    }
}

// Serves captured page files in sorted order, one per navigation; blocks
// within a file are separated by blank lines.
#[derive(Debug)]
pub struct ReplayBrowser {
    pages: VecDeque<PathBuf>,
    current: Option<Vec<String>>,
}

impl ReplayBrowser {
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            bail!("pages dir does not exist: {}", dir.display());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("failed to read pages dir {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") {
                files.push(path);
            }
        }
        files.sort();

        info!(dir = %dir.display(), pages = files.len(), "replay pages loaded");

        Ok(Self {
            pages: files.into(),
            current: None,
        })
    }
}

impl Browser for ReplayBrowser {
    fn navigate(&mut self, url: &str) -> Result<()> {
        let Some(path) = self.pages.pop_front() else {
            debug!(%url, "no captured page left; query will time out");
            self.current = None;
            return Ok(());
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read captured page {}", path.display()))?;
        let blocks = text
            .split("\n\n")
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(ToString::to_string)
            .collect();

        debug!(%url, page = %path.display(), "replaying captured page");
        self.current = Some(blocks);
        Ok(())
    }

    fn wait_until_visible(&mut self, _selector: &str, _timeout: Duration) -> Result<bool> {
        Ok(self.current.as_ref().is_some_and(|blocks| !blocks.is_empty()))
    }

    fn locate_all(&mut self, _selector: &str) -> Result<Vec<String>> {
        Ok(self.current.clone().unwrap_or_default())
    }

    fn click(&mut self, _selector: &str) -> Result<()> {
        Ok(())
    }
}
