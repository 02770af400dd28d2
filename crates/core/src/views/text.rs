//! Plain-text renderers for both views.

use proftree_protocol::{BottomsUpRow, FlameView, format_time};

/// Render the flame tree depth-first, one `-` per level.
///
/// Frames named `idle_marker` are not printed, but their children are.
pub fn render_flame_text(view: &FlameView, idle_marker: &str) -> String {
    let mut out = String::with_capacity(view.frame_count() * 32);
    write_flame(&mut out, view, 0, idle_marker);
    out
}

fn write_flame(out: &mut String, view: &FlameView, depth: usize, idle_marker: &str) {
    if view.name != idle_marker {
        let dashes = "-".repeat(depth + 1);
        out.push_str(&format!(
            "{dashes} {} {}",
            view.name,
            format_time(view.execution_time)
        ));
        if let Some(module) = &view.node_module {
            out.push_str(&format!(" [{module}]"));
        }
        out.push('\n');
    }
    for child in &view.children {
        write_flame(out, child, depth + 1, idle_marker);
    }
}

/// Render ranked rows as an aligned table.
///
/// ```text
/// * work | 12.0ms | file:///app.js:10:4
///  < run
///  << main
///  - helper
/// ```
pub fn render_bottoms_up_text(rows: &[BottomsUpRow]) -> String {
    let longest = rows
        .iter()
        .map(|r| r.function_name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::with_capacity(rows.len() * 64);
    for row in rows {
        out.push_str(&format!(
            "* {:<longest$} | {} | {}\n",
            row.function_name,
            format_time(row.total_time),
            row.source_location,
        ));
        for caller in &row.callers {
            let arrows = "<".repeat(caller.depth + 1);
            out.push_str(&format!(" {arrows} {}\n", caller.name));
        }
        for child in &row.immediate_children {
            out.push_str(&format!(" - {child}\n"));
        }
    }
    out
}
