use std::io;

use termcolor::{ColorSpec, WriteColor};

/// Page navigation bar, only shown when there is more than one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self { page, total_pages }
    }

    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn next(&self) -> u32 {
        self.page.saturating_add(1).min(self.total_pages.max(1))
    }

    pub fn prev(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }

    pub fn render(&self, out: &mut impl WriteColor) -> io::Result<()> {
        if !self.is_visible() {
            return Ok(());
        }

        let prev = if self.page > 1 { "‹ prev (p)" } else { "" };
        let next = if self.page < self.total_pages {
            "next (n) ›"
        } else {
            ""
        };

        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "{:<12}", prev)?;
        out.reset()?;
        write!(out, "Page {} of {}", self.page, self.total_pages)?;
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "{:>12}", next)?;
        out.reset()
    }
}
