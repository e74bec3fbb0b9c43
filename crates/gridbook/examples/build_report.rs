//! Example: Build a report, save it as xlsx and read it back

use gridbook::prelude::*;

fn main() -> Result<()> {
    let mut sales = Sheet::new("Sales");
    sales.add_headers([Header::new("Item"), Header::new("Units"), Header::new("Price")]);

    for (item, units, price) in [("Widget", 12, 2.5), ("Gadget", 0, 10.0), ("Gizmo", 3, 7.25)] {
        let mut row = Row::new();
        row.add_cells([Cell::new(item), Cell::new(units), Cell::new(price)]);
        sales.add_row(row);
    }

    // No rows, so no sheet in the output
    let mut notes = Sheet::new("Notes");
    notes.add_header(Header::new("Text"));

    let mut document = Document::new("report");
    document.add_sheet(sales);
    document.add_sheet(notes);

    // Save the file
    let path = document.save(std::env::temp_dir())?;
    println!("Created {}", path.display());

    // Read it back
    let imported = DocumentReader::default().read_file(&path)?;
    for sheet in imported.sheets() {
        let headers: Vec<&str> = sheet.headers().iter().map(Header::name).collect();
        println!("\n{} {:?}", sheet.name(), headers);
        for row in sheet.rows() {
            for cell in row.cells() {
                println!("  {}: {}", cell.name().unwrap_or("?"), cell.value());
            }
        }
    }

    Ok(())
}
