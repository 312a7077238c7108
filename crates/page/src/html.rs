//! Extraction of tables and metric cards from rendered page HTML.

use evtrack_core::{MetricCards, SubJobId, TableKind, TableSnapshot};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Everything the resolver reads from one rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDocument {
    /// Tables in document order
    pub tables: Vec<TableSnapshot>,

    /// Metric cards in document order
    pub cards: MetricCards,
}

impl PageDocument {
    /// Parse rendered HTML. Malformed markup yields whatever could be read.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let doc = Self {
            tables: tables_in(&document),
            cards: cards_in(&document),
        };
        debug!(tables = doc.tables.len(), cards = doc.cards.len(), "parsed page");
        doc
    }

    /// First table carrying the header signature of `kind`.
    pub fn find_table(&self, kind: TableKind) -> Option<&TableSnapshot> {
        find_table(&self.tables, kind)
    }
}

/// All tables in the HTML, as snapshots.
pub fn extract_tables(html: &str) -> Vec<TableSnapshot> {
    tables_in(&Html::parse_document(html))
}

/// All `.metric-card` title/value pairs in the HTML.
pub fn extract_metric_cards(html: &str) -> MetricCards {
    cards_in(&Html::parse_document(html))
}

/// First table carrying the header signature of `kind`.
pub fn find_table(tables: &[TableSnapshot], kind: TableKind) -> Option<&TableSnapshot> {
    tables.iter().find(|t| t.is_kind(kind))
}

/// Sub job named in the first cell of a table's first row.
pub fn first_sub_job_id(table: &TableSnapshot) -> Option<SubJobId> {
    table.cell(0, 0).and_then(SubJobId::from_cell)
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector should parse")
}

fn tables_in(document: &Html) -> Vec<TableSnapshot> {
    let table_sel = selector("table");
    document.select(&table_sel).map(snapshot_of).collect()
}

fn snapshot_of(table: ElementRef<'_>) -> TableSnapshot {
    let head_sel = selector("thead th");
    let body_row_sel = selector("tbody tr");
    let row_sel = selector("tr");
    let th_sel = selector("th");
    let td_sel = selector("td");

    let mut headers: Vec<String> = table.select(&head_sel).map(text_of).collect();
    if headers.is_empty() {
        // No thead: take the first row made of header cells.
        if let Some(first) = table
            .select(&row_sel)
            .find(|row| row.select(&th_sel).next().is_some())
        {
            headers = first.select(&th_sel).map(text_of).collect();
        }
    }

    let mut body_rows: Vec<ElementRef<'_>> = table.select(&body_row_sel).collect();
    if body_rows.is_empty() {
        body_rows = table.select(&row_sel).collect();
    }
    let rows = body_rows
        .into_iter()
        .map(|row| row.select(&td_sel).map(text_of).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    TableSnapshot { headers, rows }
}

fn cards_in(document: &Html) -> MetricCards {
    let card_sel = selector(".metric-card");
    let title_sel = selector(".title");
    let value_sel = selector(".value");

    let mut cards = MetricCards::default();
    for card in document.select(&card_sel) {
        let Some(title) = card.select(&title_sel).next() else {
            continue;
        };
        let value = card.select(&value_sel).next().map(text_of).unwrap_or_default();
        cards.push(text_of(title), value);
    }
    cards
}

/// Visible text with runs of whitespace collapsed.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUB_JOB_PAGE: &str = r#"
        <html><body>
          <div class="metrics-grid">
            <div class="metric-card"><div class="title">Overall Progress</div><div class="value"> 41% </div></div>
            <div class="metric-card"><div class="title">Earned Hours</div><div class="value">120</div></div>
          </div>
          <table>
            <thead><tr><th>Cost Code</th><th>Work Item</th><th>Budgeted Quantity</th><th>Earned Quantity</th></tr></thead>
            <tbody>
              <tr><td>100</td><td>Excavate</td><td>100 CYD</td><td>25
                CYD</td></tr>
              <tr><td>200</td><td>Backfill</td><td>50 CYD</td><td>25 CYD</td></tr>
            </tbody>
          </table>
        </body></html>"#;

    #[test]
    fn test_table_snapshot_from_html() {
        let tables = extract_tables(SUB_JOB_PAGE);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.headers[2], "Budgeted Quantity");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][3], "25 CYD");
        assert!(table.is_kind(TableKind::WorkItems));
    }

    #[test]
    fn test_metric_cards() {
        let cards = extract_metric_cards(SUB_JOB_PAGE);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards.overall_progress(), Some(41.0));
    }

    #[test]
    fn test_table_without_thead() {
        let html = r#"<table>
            <tr><th>Sub Job</th><th>Progress</th></tr>
            <tr><td>SJ-7 Paving</td><td>40%</td></tr>
        </table>"#;
        let doc = PageDocument::parse(html);
        let table = doc.find_table(TableKind::SubJobs).unwrap();
        assert_eq!(table.headers, vec!["Sub Job", "Progress"]);
        assert_eq!(table.rows, vec![vec!["SJ-7 Paving".to_string(), "40%".to_string()]]);
        assert_eq!(first_sub_job_id(table).unwrap().as_str(), "SJ-7");
    }

    #[test]
    fn test_find_table_skips_unrelated() {
        let html = r#"
            <table><thead><tr><th>Name</th></tr></thead><tbody><tr><td>x</td></tr></tbody></table>
            <table><thead><tr><th>Work Item</th><th>Progress</th></tr></thead><tbody></tbody></table>"#;
        let doc = PageDocument::parse(html);
        assert_eq!(doc.tables.len(), 2);
        let table = doc.find_table(TableKind::WorkItems).unwrap();
        assert_eq!(table.headers[0], "Work Item");
        assert!(table.is_empty());
    }

    #[test]
    fn test_garbage_html_is_empty() {
        let doc = PageDocument::parse("<<<not html");
        assert!(doc.tables.is_empty());
        assert!(doc.cards.is_empty());
    }
}
