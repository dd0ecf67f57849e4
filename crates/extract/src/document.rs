/// A table detected on a statement page, as rows of cell text.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Table { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Seam to the PDF-extraction collaborator: page text and page tables are
/// produced elsewhere; the pipeline only consumes them through this trait.
pub trait StatementDocument {
    fn page_count(&self) -> usize;
    fn page_text(&self, page: usize) -> String;
    fn page_tables(&self, page: usize) -> Vec<Table>;
}

/// In-memory statement backed by pre-extracted page text and tables. This is
/// both the production path for text uploads and the test double.
#[derive(Debug, Clone, Default)]
pub struct TextStatement {
    pages: Vec<String>,
    tables: Vec<Vec<Table>>,
}

impl TextStatement {
    /// Single-page statement from one blob of text.
    pub fn from_text(text: impl Into<String>) -> Self {
        TextStatement {
            pages: vec![text.into()],
            tables: vec![Vec::new()],
        }
    }

    pub fn from_pages(pages: Vec<String>) -> Self {
        let tables = vec![Vec::new(); pages.len()];
        TextStatement { pages, tables }
    }

    pub fn with_tables(mut self, page: usize, tables: Vec<Table>) -> Self {
        if page < self.tables.len() {
            self.tables[page] = tables;
        }
        self
    }
}

impl StatementDocument for TextStatement {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> String {
        self.pages.get(page).cloned().unwrap_or_default()
    }

    fn page_tables(&self, page: usize) -> Vec<Table> {
        self.tables.get(page).cloned().unwrap_or_default()
    }
}
