//! Page selection expressions
//!
//! A page expression is either one of the keywords `all`, `first`, `last`,
//! `odd`, `even`, or a comma-separated list of 1-based page numbers and
//! closed ranges like `1-5,10,15-20`. A skip expression uses only the
//! list/range grammar and is subtracted from the selection.
//!
//! Expressions are parsed at configuration time, before any document I/O,
//! so malformed input never reaches the signing loop.

use std::collections::BTreeSet;

use crate::types::{Result, StampError};

/// Resolved page selection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    /// Every page
    All,
    /// Page 1 only
    First,
    /// The final page only
    Last,
    /// Pages 1, 3, 5, …
    Odd,
    /// Pages 2, 4, 6, …
    Even,
    /// An explicit set of 1-based page numbers
    Explicit(BTreeSet<usize>),
}

impl PageSelector {
    /// Parse a page expression.
    ///
    /// Keywords are matched first; anything else must satisfy the
    /// list/range grammar.
    pub fn parse(expr: &str) -> Result<Self> {
        match expr.trim() {
            "all" => Ok(PageSelector::All),
            "first" => Ok(PageSelector::First),
            "last" => Ok(PageSelector::Last),
            "odd" => Ok(PageSelector::Odd),
            "even" => Ok(PageSelector::Even),
            other => Ok(PageSelector::Explicit(parse_page_set(other)?)),
        }
    }

    /// Whether `page` (1-based) is selected in a document of `total_pages`.
    pub fn matches(&self, page: usize, total_pages: usize) -> bool {
        match self {
            PageSelector::All => true,
            PageSelector::First => page == 1,
            PageSelector::Last => page == total_pages,
            PageSelector::Odd => page % 2 == 1,
            PageSelector::Even => page % 2 == 0,
            PageSelector::Explicit(set) => set.contains(&page),
        }
    }
}

/// Combined selection rule: a page selector minus an optional skip set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFilter {
    selector: PageSelector,
    skip: Option<BTreeSet<usize>>,
}

impl PageFilter {
    /// Build a filter from a page expression and a skip expression.
    ///
    /// An empty skip expression means nothing is skipped. Skip expressions
    /// accept only the list/range grammar, not the keywords.
    pub fn new(pages: &str, skip_pages: &str) -> Result<Self> {
        let selector = PageSelector::parse(pages)?;
        let skip = if skip_pages.trim().is_empty() {
            None
        } else {
            Some(parse_page_set(skip_pages)?)
        };
        Ok(Self { selector, skip })
    }

    /// Final inclusion decision for a page: selected and not skipped.
    pub fn should_sign(&self, page: usize, total_pages: usize) -> bool {
        if !self.selector.matches(page, total_pages) {
            return false;
        }
        match &self.skip {
            Some(skip) => !skip.contains(&page),
            None => true,
        }
    }
}

/// Parse a comma-separated list of page numbers and `start-end` ranges.
fn parse_page_set(expr: &str) -> Result<BTreeSet<usize>> {
    if let Some(c) = expr
        .chars()
        .find(|c| !c.is_ascii_digit() && *c != ',' && *c != '-' && !c.is_whitespace())
    {
        return Err(StampError::Config(format!(
            "Invalid page expression {:?}: unexpected character {:?}. \
             Use 'all', 'first', 'last', 'odd', 'even', or ranges like '1-5,10,15-20'",
            expr, c
        )));
    }

    let mut set = BTreeSet::new();
    for part in expr.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(StampError::Config(format!(
                "Invalid page expression {:?}: empty entry",
                expr
            )));
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_page_number(start, expr)?;
                let end = parse_page_number(end, expr)?;
                if start > end {
                    return Err(StampError::Config(format!(
                        "Invalid page range {}-{}: start must not exceed end",
                        start, end
                    )));
                }
                set.extend(start..=end);
            }
            None => {
                set.insert(parse_page_number(part, expr)?);
            }
        }
    }
    Ok(set)
}

fn parse_page_number(token: &str, expr: &str) -> Result<usize> {
    let page = token.trim().parse::<usize>().map_err(|_| {
        StampError::Config(format!(
            "Invalid page expression {:?}: {:?} is not a page number",
            expr, token
        ))
    })?;
    if page == 0 {
        return Err(StampError::Config(format!(
            "Invalid page expression {:?}: page numbers start at 1",
            expr
        )));
    }
    Ok(page)
}
