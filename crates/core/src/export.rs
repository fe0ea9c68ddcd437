use crate::error::ExportError;
use crate::tree::VisibleNode;

const PDF_ROWS_PER_PAGE: usize = 60;

fn manager_field(node: &VisibleNode<'_>) -> String {
    node.employee
        .reports_to
        .map(|m| m.to_string())
        .unwrap_or_default()
}

pub fn to_csv<'a>(
    nodes: impl IntoIterator<Item = VisibleNode<'a>>,
    mut w: impl std::io::Write,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record([
        "id",
        "name",
        "department",
        "depth",
        "reports_to",
        "direct_reports",
        "has_hidden_children",
    ])?;
    for n in nodes {
        writer.write_record([
            n.employee.id.to_string(),
            n.employee.name.clone(),
            n.employee.department.clone(),
            n.depth.to_string(),
            manager_field(&n),
            n.employee.direct_reports.to_string(),
            n.has_hidden_children.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json<'a>(nodes: impl IntoIterator<Item = VisibleNode<'a>>) -> serde_json::Value {
    serde_json::json!({
        "generatedAt": chrono::Local::now().to_rfc3339(),
        "nodes": nodes.into_iter().map(|n| serde_json::json!({
            "id": n.employee.id,
            "name": n.employee.name,
            "department": n.employee.department,
            "division": n.employee.division,
            "depth": n.depth,
            "reportsTo": n.employee.reports_to,
            "directReports": n.employee.direct_reports,
            "hasHiddenChildren": n.has_hidden_children,
        })).collect::<Vec<_>>()
    })
}

/// Indented outline, one employee per line. Collapsed managers get a `+`.
pub fn to_text<'a>(nodes: impl IntoIterator<Item = VisibleNode<'a>>) -> String {
    let mut out = String::new();
    for n in nodes {
        let marker = if n.has_hidden_children { "+" } else { "-" };
        out.push_str(&"  ".repeat(n.depth as usize));
        out.push_str(marker);
        out.push(' ');
        out.push_str(&n.employee.name);
        if !n.employee.department.is_empty() {
            out.push_str(" (");
            out.push_str(&n.employee.department);
            out.push(')');
        }
        out.push_str(&format!(" #{}\n", n.employee.id));
    }
    out
}

pub fn to_pdf<'a>(
    nodes: impl IntoIterator<Item = VisibleNode<'a>>,
    out: &std::path::Path,
) -> Result<(), ExportError> {
    use printpdf::*;

    let lines: Vec<(u32, String)> = nodes
        .into_iter()
        .map(|n| {
            let suffix = if n.has_hidden_children {
                format!(" (+{})", n.employee.direct_reports)
            } else {
                String::new()
            };
            (n.depth, format!("{} - {}{}", n.employee.name, n.employee.department, suffix))
        })
        .collect();

    let (doc, page1, layer1) = PdfDocument::new("Org Chart", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let title = format!("Org Chart - {}", chrono::Local::now().format("%Y-%m-%d"));
    let mut layer = doc.get_page(page1).get_layer(layer1);
    layer.use_text(title, 14.0, Mm(15.0), Mm(280.0), &font);

    for (i, chunk) in lines.chunks(PDF_ROWS_PER_PAGE).enumerate() {
        if i > 0 {
            let (page, page_layer) = doc.add_page(Mm(210.0), Mm(297.0), format!("Layer {}", i + 1));
            layer = doc.get_page(page).get_layer(page_layer);
        }
        for (row, (depth, text)) in chunk.iter().enumerate() {
            let x = 15.0 + 6.0 * (*depth as f32);
            let y = 270.0 - 4.2 * row as f32;
            layer.use_text(text.as_str(), 10.0, Mm(x), Mm(y), &font);
        }
    }

    let file = std::fs::File::create(out)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf).map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(())
}
