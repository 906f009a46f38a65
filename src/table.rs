use crate::editor::CategoryEditor;
use crate::models::{Category, SortKey};
use crate::view::{CategoryListView, CategoryRow};
use std::fmt::Write;

const NAME_WIDTH: usize = 28;
const DESCRIPTION_WIDTH: usize = 36;
const STATUS_WIDTH: usize = 10;
const STOCK_WIDTH: usize = 12;

/// Plain-text rendering of the list view
pub fn render_list(view: &CategoryListView) -> String {
    let mut out = String::new();

    let _ = write!(out, "Categories ({} total)", view.total_count());
    let selected = view.store().selection_count();
    if selected > 0 {
        let _ = write!(out, "   [Delete Selected ({})]", selected);
    }
    out.push('\n');

    if !view.search_term().is_empty() {
        let _ = writeln!(out, "Search: {}", view.search_term());
    }

    if let Some(error) = view.error() {
        let _ = writeln!(out, "! {}", error);
    }

    if view.is_loading() {
        out.push_str("Loading categories...\n");
        return out;
    }

    out.push_str(&render_header(view));

    let rows = view.rows();
    if rows.is_empty() {
        out.push_str("  No categories found\n");
        out.push_str("  Try adjusting your search or filters\n");
        return out;
    }

    for row in &rows {
        out.push_str(&render_row(row));
    }

    if let Some(synced) = view.last_synced() {
        let _ = writeln!(out, "Last synced {}", synced.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    out
}

fn render_header(view: &CategoryListView) -> String {
    let sort = view.sort();
    let check = if view.all_visible_selected() { "[x]" } else { "[ ]" };
    let column = |key: SortKey| format!("{} {}", key.heading(), sort.indicator(key));

    let mut line = format!(
        "{} {} {} {} {} {}",
        check,
        pad(&column(SortKey::Name), NAME_WIDTH + 2),
        pad(&column(SortKey::Description), DESCRIPTION_WIDTH),
        pad(&column(SortKey::Status), STATUS_WIDTH),
        pad(&column(SortKey::StockAvailability), STOCK_WIDTH),
        "ID",
    );
    line.push('\n');
    line
}

fn render_row(row: &CategoryRow) -> String {
    let check = match (row.selectable, row.selected) {
        (false, _) => "   ",
        (true, true) => "[x]",
        (true, false) => "[ ]",
    };
    let disclosure = match (row.has_children, row.expanded) {
        (false, _) => ' ',
        (true, true) => '▾',
        (true, false) => '›',
    };
    let name = format!("{}{} {}", "  ".repeat(row.depth), disclosure, row.name);
    let status = row.status.map(|s| s.as_str()).unwrap_or("-");

    format!(
        "{} {} {} {} {} {}\n",
        check,
        pad(&name, NAME_WIDTH + 2),
        pad(&row.description, DESCRIPTION_WIDTH),
        pad(status, STATUS_WIDTH),
        pad(row.stock_label, STOCK_WIDTH),
        row.id,
    )
}

/// Detail block for a single category
pub fn render_category(category: &Category) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", category.name(), category.id);
    let _ = writeln!(out, "  Description: {}", category.description());
    let _ = writeln!(
        out,
        "  Status:      {}",
        category.status.map(|s| s.as_str()).unwrap_or("-")
    );
    let _ = writeln!(out, "  Stock:       {}", category.stock_label());
    let _ = writeln!(
        out,
        "  Parent:      {}",
        category.parent_id.as_deref().unwrap_or("No Parent")
    );
    if category.has_children() {
        let _ = writeln!(out, "  Children:");
        for child in &category.children {
            let _ = writeln!(out, "    - {} ({})", child.name(), child.id);
        }
    }
    out
}

/// Summary of an editor after open/submit
pub fn render_editor(editor: &CategoryEditor) -> String {
    let mut out = String::new();
    if let Some(error) = editor.error() {
        let _ = writeln!(out, "! {}", error);
    }
    let form = &editor.form;
    let _ = writeln!(out, "Name:        {}", form.name);
    let _ = writeln!(out, "Description: {}", form.description);
    let parent = editor
        .parent_options()
        .iter()
        .find(|o| o.id == form.parent_id)
        .map(|o| o.name.as_str())
        .unwrap_or(if form.parent_id.is_empty() { "No Parent" } else { form.parent_id.as_str() });
    let _ = writeln!(out, "Parent:      {}", parent);
    let _ = writeln!(out, "Status:      {}", form.status);
    let _ = writeln!(
        out,
        "Stock:       {}",
        if form.stock_availability { "In Stock" } else { "Out of Stock" }
    );
    out
}

/// Truncate or right-pad to exactly `width` characters
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}
