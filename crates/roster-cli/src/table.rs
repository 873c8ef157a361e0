use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use roster::Student;

pub fn students_table(students: &[Student]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["ID", "Name", "Age", "Marks"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for s in students {
        table.add_row(vec![
            Cell::new(s.id).set_alignment(CellAlignment::Right),
            Cell::new(&s.name),
            Cell::new(s.age).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", s.marks)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}
