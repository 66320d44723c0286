//! A small builder for Graphviz HTML-like labels.
//!
//! Tables are composed from rows of cells and serialized in one pass, so escaping and column spans stay consistent.

use std::fmt::{self, Display, Write};

//-----------------------------------------------------------------------------

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// How the content of a cell is decorated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStyle {
    Bold,
    /// Bold, underlined, and blue, for cells with a `href`.
    Link,
}

/// A single `<td>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    attributes: Vec<(&'static str, String)>,
    content: String,
    style: CellStyle,
}

impl Cell {
    pub fn new(content: impl Into<String>, style: CellStyle) -> Self {
        Cell {
            attributes: Vec::new(),
            content: content.into(),
            style,
        }
    }

    pub fn bold(content: impl Into<String>) -> Self {
        Self::new(content, CellStyle::Bold)
    }

    /// A clickable cell pointing to `href`.
    pub fn link(content: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(content, CellStyle::Link).attribute("href", href)
    }

    /// Adds an attribute. Attributes are written in insertion order.
    pub fn attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn colspan(self, columns: usize) -> Self {
        self.attribute("colspan", columns.to_string())
    }

    pub fn align(self, align: &str) -> Self {
        self.attribute("align", align)
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attribute("id", id)
    }

    pub fn tooltip(self, tooltip: impl Into<String>) -> Self {
        self.attribute("tooltip", tooltip)
    }

    /// Returns the number of columns this cell occupies.
    pub fn span(&self) -> usize {
        self.attributes.iter()
            .find(|(name, _)| *name == "colspan")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(1)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("<td")?;
        write_attributes(f, &self.attributes)?;
        f.write_char('>')?;
        let content = escape_xml(&self.content);
        match self.style {
            CellStyle::Bold => write!(f, "<b>{}</b>", content)?,
            CellStyle::Link => write!(f, "<font color=\"blue\"><b><u>{}</u></b></font>", content)?,
        }
        f.write_str("</td>")
    }
}

fn write_attributes(f: &mut fmt::Formatter, attributes: &[(&'static str, String)]) -> fmt::Result {
    for (name, value) in attributes {
        write!(f, " {}=\"{}\"", name, escape_xml(value))?;
    }
    Ok(())
}

//-----------------------------------------------------------------------------

/// A `<table>` with a fixed number of logical columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    columns: usize,
    attributes: Vec<(&'static str, String)>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Table {
            columns,
            attributes: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        debug_assert!(
            cells.iter().map(Cell::span).sum::<usize>() <= self.columns,
            "Too many cells in a table row"
        );
        self.rows.push(cells);
    }

    /// Adds a row with a single cell spanning all columns.
    pub fn push_spanning(&mut self, cell: Cell) {
        let columns = self.columns;
        self.push_row(vec![cell.colspan(columns)]);
    }

    /// Adds a row with a left-aligned title spanning `title_columns` and a bold value cell.
    pub fn push_titled(&mut self, title: impl Into<String>, title_columns: usize, value: Cell) {
        self.push_row(vec![
            Cell::bold(title).colspan(title_columns).align("left"),
            value,
        ]);
    }

    /// Returns the table as an HTML-like label, including the outer angle brackets.
    pub fn to_label(&self, font_color: Option<&str>) -> String {
        match font_color {
            Some(color) => format!("<<font color=\"{}\">{}</font>>", escape_xml(color), self),
            None => format!("<<font>{}</font>>", self),
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("<table")?;
        write_attributes(f, &self.attributes)?;
        f.write_char('>')?;
        for row in self.rows.iter() {
            f.write_str("<tr>")?;
            for cell in row.iter() {
                write!(f, "{}", cell)?;
            }
            f.write_str("</tr>")?;
        }
        f.write_str("</table>")
    }
}

//-----------------------------------------------------------------------------
