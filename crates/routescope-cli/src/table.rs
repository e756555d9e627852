//! The route table printed by `proutes`.
//!
//! Column selection comes either from the `[proutes] format` setting or from
//! `--format`; [`validate_columns`] turns the requested names into
//! [`Column`]s. [`render_table`] prints a header row, a dashed row, and one
//! line per [`RouteRow`], every cell left-justified to the widest value in
//! its column plus [`PAD`].

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use routescope_core::{RoutescopeError, RoutescopeResult};
use routescope_routes::RouteRow;

/// Extra spaces added to every column width.
pub const PAD: usize = 3;

static FORMAT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,|\s]+").expect("format separator regex should be valid"));

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// The route name.
    Name,
    /// The route pattern.
    Pattern,
    /// The view identity.
    View,
    /// The allowed methods.
    Method,
}

impl Column {
    /// Every column, in default display order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Pattern, Self::View, Self::Method];

    /// The name used to select this column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Pattern => "pattern",
            Self::View => "view",
            Self::Method => "method",
        }
    }

    /// The header label.
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Pattern => "Pattern",
            Self::View => "View",
            Self::Method => "Method",
        }
    }

    /// The cell of `row` shown in this column.
    pub fn value(self, row: &RouteRow) -> &str {
        match self {
            Self::Name => &row.name,
            Self::Pattern => &row.pattern,
            Self::View => &row.view,
            Self::Method => &row.method,
        }
    }

    /// Names of every column, as listed in error messages.
    pub fn available() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Splits the `[proutes] format` setting on commas, pipes and whitespace.
///
/// The value is trimmed of whitespace first. A leading or trailing comma or
/// pipe still yields an empty name, which [`validate_columns`] rejects.
pub fn parse_format_setting(format: &str) -> Vec<String> {
    FORMAT_SEPARATOR
        .split(format.trim())
        .map(|s| s.trim().to_string())
        .collect()
}

/// Splits a `--format` argument on commas.
pub fn parse_format_arg(format: &str) -> Vec<String> {
    format.split(',').map(|s| s.trim().to_string()).collect()
}

/// Resolves requested column names, in the order given.
///
/// Names are matched exactly, so an empty name left by a stray separator
/// (`-f name,`) is reported like any other unknown column.
///
/// # Errors
///
/// Returns [`RoutescopeError::InvalidColumns`] listing every unknown name.
pub fn validate_columns(names: &[String]) -> RoutescopeResult<Vec<Column>> {
    let mut columns = Vec::with_capacity(names.len());
    let mut invalid = Vec::new();
    for name in names {
        match name.parse::<Column>() {
            Ok(column) => columns.push(column),
            Err(name) => invalid.push(name),
        }
    }

    if invalid.is_empty() {
        Ok(columns)
    } else {
        Err(RoutescopeError::InvalidColumns {
            invalid,
            available: Column::available(),
        })
    }
}

/// Writes the table for `rows`, showing `columns` in the given order.
///
/// Widths start at the header labels and grow with the rows passed in, so
/// callers filter before rendering.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_table(rows: &[RouteRow], columns: &[Column], out: &mut impl Write) -> io::Result<()> {
    let widths: Vec<usize> = columns
        .iter()
        .map(|&column| {
            rows.iter()
                .map(|row| column.value(row).chars().count())
                .fold(column.header().len(), usize::max)
                + PAD
        })
        .collect();

    let dashes: Vec<String> = columns.iter().map(|c| "-".repeat(c.header().len())).collect();

    write_line(out, &widths, columns.iter().map(|c| c.header()))?;
    write_line(out, &widths, dashes.iter().map(String::as_str))?;
    for row in rows {
        write_line(out, &widths, columns.iter().map(|c| c.value(row)))?;
    }
    Ok(())
}

fn write_line<'a>(
    out: &mut impl Write,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        line.push_str(&format!("{cell:<width$} "));
    }
    writeln!(out, "{line}")
}
