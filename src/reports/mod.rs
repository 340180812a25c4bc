use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use relevance_lens::analysis::{DocumentExplanation, ScoreBreakdown};
use relevance_lens::config::Heuristics;
use relevance_lens::response::{ResultDocument, SearchResponse};
use relevance_lens::tree::ExplanationForest;

const DESCRIPTION_WIDTH: usize = 60;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn num(h: &Heuristics, value: f64) -> String {
    format!("{:.*}", h.display_decimals as usize, h.round(value))
}

fn shorten(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_WIDTH {
        text.to_string()
    } else {
        let head: String = text.chars().take(DESCRIPTION_WIDTH - 3).collect();
        format!("{}...", head)
    }
}

pub fn print_document(
    index: usize,
    doc: Option<&ResultDocument>,
    explanation: &DocumentExplanation,
    h: &Heuristics,
) {
    match doc {
        Some(d) => println!("\n=== #{} {} ({}) ===", index, d.name, d.id),
        None => println!("\n=== #{} (no such document) ===", index),
    }

    match explanation {
        DocumentExplanation::Analyzed(b) if b.is_empty() => {
            print_overview(b, h);
            println!("No scoring factors recognized in this explanation.");
        }
        DocumentExplanation::Analyzed(b) => {
            print_overview(b, h);
            print_lexical_groups(b, h);
            print_attributes(b, h);
            print_queries(b, h);
            print_boosts(b, h);
        }
        missing => print_absence(missing),
    }
}

pub fn print_absence(explanation: &DocumentExplanation) {
    let text = match explanation {
        DocumentExplanation::NoDebugData => "Response carries no debug data.",
        DocumentExplanation::NoExplainData => "Debug data present, but no explain payload.",
        DocumentExplanation::NotFound => "No explanation found for this document.",
        DocumentExplanation::Analyzed(_) => return,
    };
    println!("{}", text);
}

pub fn print_overview(b: &ScoreBreakdown, h: &Heuristics) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new("First Pass"),
        Cell::new("Second Pass"),
        Cell::new("Threshold"),
    ]);
    align_right(&mut table, 0..=3);
    table.add_row(vec![
        Cell::new(num(h, b.total_score))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(num(h, b.first_pass_score)),
        Cell::new(num(h, b.second_pass_score)),
        Cell::new(num(h, b.threshold_score)),
    ]);
    println!("{}", table);
}

pub fn print_lexical_groups(b: &ScoreBreakdown, h: &Heuristics) {
    for group in &b.lexical_groups {
        println!(
            "\nLexical group: {} [{}]  engine {} / calculated {}",
            group.description,
            group.origin,
            num(h, group.total_score),
            num(h, group.calculated_total)
        );

        if group.fields.is_empty() {
            println!("  (no field weights)");
            continue;
        }

        let mut table = new_table();
        table.add_row(vec![
            Cell::new("Field").add_attribute(Attribute::Bold),
            Cell::new("Term"),
            Cell::new("Role"),
            Cell::new("Raw"),
            Cell::new("Weighted"),
            Cell::new("%"),
        ]);
        align_right(&mut table, 3..=5);

        for field in &group.fields {
            let (role, color) = if field.is_max {
                ("MAX".to_string(), Color::Green)
            } else {
                (format!("x{}", group.multiplier), Color::Reset)
            };
            table.add_row(vec![
                Cell::new(h.display_field_name(&field.field)),
                Cell::new(&field.term),
                Cell::new(role).fg(color),
                Cell::new(num(h, field.raw_score)),
                Cell::new(num(h, field.weighted_score)),
                Cell::new(num(h, field.contribution_percent)),
            ]);
        }
        table.add_row(vec![
            Cell::new("max + k*others").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            Cell::new(format!(
                "{} + {}",
                num(h, group.max_score),
                num(h, group.others_sum)
            )),
            Cell::new(num(h, group.calculated_total)).add_attribute(Attribute::Bold),
            Cell::new(""),
        ]);
        println!("{}", table);
    }
}

pub fn print_attributes(b: &ScoreBreakdown, h: &Heuristics) {
    let mut attributes = b.product_attributes().peekable();
    if attributes.peek().is_none() {
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("Attribute"),
        Cell::new("Value"),
        Cell::new("Boost"),
        Cell::new("Score"),
    ]);
    align_right(&mut table, 3..=4);

    for a in attributes {
        table.add_row(vec![
            Cell::new(a.kind.to_string()),
            Cell::new(&a.attribute),
            Cell::new(&a.value),
            Cell::new(num(h, a.boost)),
            Cell::new(num(h, a.score)).fg(Color::Cyan),
        ]);
    }
    println!("\nProduct attributes\n{}", table);
}

pub fn print_queries(b: &ScoreBreakdown, h: &Heuristics) {
    if b.function_queries.is_empty() && b.range_queries.is_empty() {
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Query").add_attribute(Attribute::Bold),
        Cell::new("Expression"),
        Cell::new("Boost"),
        Cell::new("Score"),
    ]);
    align_right(&mut table, 2..=3);

    for f in &b.function_queries {
        table.add_row(vec![
            Cell::new("function"),
            Cell::new(shorten(&f.function_expression)),
            Cell::new("-"),
            Cell::new(num(h, f.score)),
        ]);
    }
    for r in &b.range_queries {
        table.add_row(vec![
            Cell::new("range"),
            Cell::new(format!("{}:[{}]", r.field, r.range_expression)),
            Cell::new(num(h, r.boost)),
            Cell::new(num(h, r.score)),
        ]);
    }
    println!("\nQueries\n{}", table);
}

pub fn print_boosts(b: &ScoreBreakdown, h: &Heuristics) {
    if b.category_boosts.is_empty() && b.brand_boosts.is_empty() {
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Boost").add_attribute(Attribute::Bold),
        Cell::new("Target"),
        Cell::new("Factor"),
        Cell::new("Applied"),
        Cell::new("Score"),
    ]);
    align_right(&mut table, 2..=4);

    for c in &b.category_boosts {
        table.add_row(vec![
            Cell::new("category"),
            Cell::new(&c.category_id),
            Cell::new(num(h, c.boost_value)),
            Cell::new(if c.applied { "yes" } else { "no" }),
            Cell::new(num(h, c.score)).fg(Color::Green),
        ]);
    }
    for brand in &b.brand_boosts {
        table.add_row(vec![
            Cell::new("brand"),
            Cell::new(&brand.brand),
            Cell::new("-"),
            Cell::new(if brand.applied { "yes" } else { "no" }),
            Cell::new(num(h, brand.score)).fg(Color::Green),
        ]);
    }
    println!("\nBoosts\n{}", table);
}

pub fn print_documents(response: &SearchResponse) {
    println!(
        "\n{} documents returned, {} found",
        response.docs.len(),
        response.num_found
    );

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Id"),
        Cell::new("Name"),
        Cell::new("Score"),
    ]);
    align_right(&mut table, 3..=3);

    for (i, d) in response.docs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&d.id),
            Cell::new(&d.name),
            Cell::new(d.score.map(|s| s.to_string()).unwrap_or_else(|| "-".into())),
        ]);
    }
    println!("{}", table);
}

pub fn print_forest(forest: &ExplanationForest, docs: &[ResultDocument]) {
    println!("\n{} explain entries", forest.len());

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Id"),
        Cell::new("Doc"),
        Cell::new("Value"),
        Cell::new("Nodes"),
        Cell::new("Depth"),
        Cell::new("Description"),
    ]);
    align_right(&mut table, 3..=5);

    for (i, (id, node)) in forest.iter().enumerate() {
        let doc_position = docs
            .iter()
            .position(|d| d.id == id)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        let id_cell = if docs.get(i).is_some_and(|d| d.id == id) {
            Cell::new(id).fg(Color::Green)
        } else {
            Cell::new(id).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(i),
            id_cell,
            Cell::new(doc_position),
            Cell::new(node.value),
            Cell::new(node.node_count()),
            Cell::new(node.depth()),
            Cell::new(shorten(&node.description)),
        ]);
    }
    println!("{}", table);
}
