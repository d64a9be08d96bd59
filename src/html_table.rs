use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn lowercase_columns(&mut self) {
        for col in &mut self.columns {
            *col = col.to_lowercase();
        }
    }
}

fn selector(css: &str) -> Selector {
    // Only called with literal selectors below.
    Selector::parse(css).expect("static selector should parse")
}

pub fn find_table_by_title(html: &str, title: &str) -> Option<RawTable> {
    let document = Html::parse_document(html);
    let table_sel = selector("table");
    let needle = title.to_lowercase();

    document
        .select(&table_sel)
        .find(|table| table_title(table).is_some_and(|t| t.to_lowercase().contains(&needle)))
        .map(extract_table)
}

pub fn links_within(html: &str, container_css: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let container_sel = selector(container_css);
    let link_sel = selector("a[href]");

    let mut out = Vec::new();
    for container in document.select(&container_sel) {
        for link in container.select(&link_sel) {
            if let Some(href) = link.value().attr("href") {
                out.push(href.trim().to_string());
            }
        }
    }
    out
}

fn table_title(table: &ElementRef<'_>) -> Option<String> {
    let caption_sel = selector("caption");
    if let Some(caption) = table.select(&caption_sel).next() {
        return Some(cell_text(&caption));
    }
    // Otherwise the closest heading before the table among its siblings.
    let mut node = table.prev_sibling();
    while let Some(current) = node {
        if let Some(el) = ElementRef::wrap(current) {
            let name = el.value().name();
            if matches!(name, "h1" | "h2" | "h3" | "h4") {
                return Some(cell_text(&el));
            }
        }
        node = current.prev_sibling();
    }
    None
}

fn extract_table(table: ElementRef<'_>) -> RawTable {
    let header_row_sel = selector("thead tr");
    let row_sel = selector("tbody tr");
    let any_row_sel = selector("tr");
    let cell_sel = selector("th, td");

    let header_rows: Vec<ElementRef<'_>> = table.select(&header_row_sel).collect();
    let (columns, body): (Vec<String>, Vec<ElementRef<'_>>) = match header_rows.last() {
        Some(row) => (row_cells(row, &cell_sel), table.select(&row_sel).collect()),
        // No <thead>: the first row is the header.
        None => {
            let mut all = table.select(&any_row_sel);
            let columns = all
                .next()
                .map(|row| row_cells(&row, &cell_sel))
                .unwrap_or_default();
            (columns, all.collect())
        }
    };

    let rows = body
        .iter()
        .filter(|row| !is_repeated_header(row))
        .map(|row| row_cells(row, &cell_sel))
        .filter(|cells| !cells.is_empty())
        .collect();

    RawTable { columns, rows }
}

fn is_repeated_header(row: &ElementRef<'_>) -> bool {
    row.value()
        .attr("class")
        .is_some_and(|class| class.split_whitespace().any(|c| c == "thead"))
}

fn row_cells(row: &ElementRef<'_>, cell_sel: &Selector) -> Vec<String> {
    row.select(cell_sel).map(|cell| cell_text(&cell)).collect()
}

fn cell_text(el: &ElementRef<'_>) -> String {
    let joined: String = el.text().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
