//! In-memory word-processing document built from rendered chat HTML.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Decimal,
}

impl ListKind {
    /// `w:numId` of the matching definition in `word/numbering.xml`.
    pub(crate) fn num_id(self) -> u32 {
        match self {
            ListKind::Bullet => 1,
            ListKind::Decimal => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Heading { level: u8, text: String },
    Paragraph(String),
    Code(String),
    ListItem { kind: ListKind, level: u32, text: String },
    Table(Table),
}

/// A table with a fixed column count.
///
/// Every row holds exactly `columns` cells: short rows are padded with blank
/// cells and long rows are cut at the column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: usize,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn with_columns(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut row: Vec<String> = cells.into_iter().take(self.columns).collect();
        row.resize(self.columns, String::new());
        self.rows.push(row);
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    blocks: Vec<Block>,
}

impl Document {
    /// Starts a document whose first block is the title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: vec![Block::Title(title.to_string())],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub(crate) fn needs_numbering(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b, Block::ListItem { .. }))
    }
}
