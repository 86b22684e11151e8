//! # Menu Handler
//!
//! Console interaction for the Stockline inventory.
//!
//! ## Responsibilities
//! - Capture user input from stdin
//! - Convert text to typed values (numbers, dates, barcode kinds)
//! - Invoke the services and print their results
//! - Render service errors as user-facing messages
//!
//! NO business logic here. Validation and FK sequencing live in the service
//! layer; an invalid entity typed at the console comes back as a
//! `ServiceError` and is printed, never silently fixed up.

use std::io::{self, Write};

use chrono::NaiveDate;

use stockline_core::{Barcode, BarcodeKind, Product};
use stockline_db::Database;

/// Controller for the console menu operations.
pub struct MenuHandler {
    db: Database,
}

impl MenuHandler {
    /// Creates a new MenuHandler over an open database.
    pub fn new(db: Database) -> Self {
        MenuHandler { db }
    }

    /// Runs the menu loop until the user exits.
    pub async fn run(&self) -> io::Result<()> {
        loop {
            println!();
            println!("=== Stockline ===");
            println!(" 1. Create product");
            println!(" 2. List products");
            println!(" 3. Search products by name/brand");
            println!(" 4. Update product");
            println!(" 5. Delete product (soft)");
            println!(" 6. Create barcode");
            println!(" 7. List barcodes");
            println!(" 8. Update barcode");
            println!(" 9. Delete barcode by id (UNSAFE: ignores product references)");
            println!("10. Remove barcode from product (safe)");
            println!(" 0. Exit");

            let choice = prompt("Option")?;
            match choice.as_str() {
                "1" => self.create_product().await?,
                "2" => self.list_products().await,
                "3" => self.search_products().await?,
                "4" => self.update_product().await?,
                "5" => self.delete_product().await?,
                "6" => self.create_barcode().await?,
                "7" => self.list_barcodes().await,
                "8" => self.update_barcode().await?,
                "9" => self.delete_barcode().await?,
                "10" => self.remove_barcode_from_product().await?,
                "0" => {
                    println!("Bye.");
                    return Ok(());
                }
                other => println!("Unknown option: {other}"),
            }
        }
    }

    // =========================================================================
    // Product operations
    // =========================================================================

    async fn create_product(&self) -> io::Result<()> {
        let name = prompt("Name")?;
        let brand = prompt("Brand")?;
        let category = prompt("Category")?;

        let Some(price) = read_f64(&prompt("Price")?) else {
            println!("Invalid price");
            return Ok(());
        };

        let mut product = Product::new(name, brand, category, price);

        let weight_input = prompt("Weight in kg (blank for none)")?;
        if !weight_input.is_empty() {
            let Some(weight) = read_f64(&weight_input) else {
                println!("Invalid weight");
                return Ok(());
            };
            product = product.weight(weight);
        }

        if prompt("Attach a barcode? (y/n)")?.eq_ignore_ascii_case("y") {
            match self.read_barcode()? {
                Some(barcode) => product = product.barcode(barcode),
                None => return Ok(()),
            }
        }

        match self.db.product_service().create(product).await {
            Ok(created) => {
                println!("Product created with id {}", created.id);
                if let Some(barcode) = &created.barcode {
                    println!("Barcode stored with id {}", barcode.id);
                }
            }
            Err(e) => println!("Error creating product: {e}"),
        }
        Ok(())
    }

    async fn list_products(&self) {
        match self.db.product_service().list().await {
            Ok(products) if products.is_empty() => println!("No products found"),
            Ok(products) => {
                for product in &products {
                    println!("{}", format_product(product));
                }
            }
            Err(e) => println!("Error listing products: {e}"),
        }
    }

    async fn search_products(&self) -> io::Result<()> {
        let filter = prompt("Filter (name or brand)")?;
        match self.db.product_service().search(&filter).await {
            Ok(products) if products.is_empty() => println!("No products match '{filter}'"),
            Ok(products) => {
                for product in &products {
                    println!("{}", format_product(product));
                }
            }
            Err(e) => println!("Error searching products: {e}"),
        }
        Ok(())
    }

    async fn update_product(&self) -> io::Result<()> {
        let Some(id) = read_i64(&prompt("Product id")?) else {
            println!("Invalid id");
            return Ok(());
        };

        let mut product = match self.db.product_service().get(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                println!("Product not found: {id}");
                return Ok(());
            }
            Err(e) => {
                println!("Error: {e}");
                return Ok(());
            }
        };
        println!("Editing: {}", format_product(&product));
        println!("(blank keeps the current value)");

        let name = prompt("Name")?;
        if !name.is_empty() {
            product.name = name;
        }
        let brand = prompt("Brand")?;
        if !brand.is_empty() {
            product.brand = brand;
        }
        let category = prompt("Category")?;
        if !category.is_empty() {
            product.category = category;
        }
        let price = prompt("Price")?;
        if !price.is_empty() {
            let Some(price) = read_f64(&price) else {
                println!("Invalid price");
                return Ok(());
            };
            product.price = price;
        }
        let weight = prompt("Weight in kg")?;
        if !weight.is_empty() {
            let Some(weight) = read_f64(&weight) else {
                println!("Invalid weight");
                return Ok(());
            };
            product.weight = Some(weight);
        }

        if product.barcode.is_some()
            && prompt("Detach barcode? (y/n)")?.eq_ignore_ascii_case("y")
        {
            // Only clears the FK; the barcode row stays. Option 10 is the
            // path that also deletes the barcode.
            product.barcode = None;
        }

        match self.db.product_service().update(product).await {
            Ok(_) => println!("Product updated"),
            Err(e) => println!("Error updating product: {e}"),
        }
        Ok(())
    }

    async fn delete_product(&self) -> io::Result<()> {
        let Some(id) = read_i64(&prompt("Product id")?) else {
            println!("Invalid id");
            return Ok(());
        };

        match self.db.product_service().delete(id).await {
            Ok(()) => println!("Product {id} deleted (its barcode, if any, was kept)"),
            Err(e) => println!("Error deleting product: {e}"),
        }
        Ok(())
    }

    // =========================================================================
    // Barcode operations
    // =========================================================================

    async fn create_barcode(&self) -> io::Result<()> {
        let Some(barcode) = self.read_barcode()? else {
            return Ok(());
        };

        match self.db.barcode_service().create(barcode).await {
            Ok(created) => println!("Barcode created with id {}", created.id),
            Err(e) => println!("Error creating barcode: {e}"),
        }
        Ok(())
    }

    async fn list_barcodes(&self) {
        match self.db.barcode_service().list().await {
            Ok(barcodes) if barcodes.is_empty() => println!("No barcodes found"),
            Ok(barcodes) => {
                for barcode in &barcodes {
                    println!("{}", format_barcode(barcode));
                }
            }
            Err(e) => println!("Error listing barcodes: {e}"),
        }
    }

    async fn update_barcode(&self) -> io::Result<()> {
        let Some(id) = read_i64(&prompt("Barcode id")?) else {
            println!("Invalid id");
            return Ok(());
        };

        let mut barcode = match self.db.barcode_service().get(id).await {
            Ok(Some(barcode)) => barcode,
            Ok(None) => {
                println!("Barcode not found: {id}");
                return Ok(());
            }
            Err(e) => {
                println!("Error: {e}");
                return Ok(());
            }
        };
        println!("Editing: {}", format_barcode(&barcode));
        println!("(blank keeps the current value)");

        let kind = prompt("Kind (EAN13/EAN8/UPC)")?;
        if !kind.is_empty() {
            match kind.parse::<BarcodeKind>() {
                Ok(kind) => barcode.kind = kind,
                Err(e) => {
                    println!("{e}");
                    return Ok(());
                }
            }
        }
        let value = prompt("Value")?;
        if !value.is_empty() {
            barcode.value = value;
        }
        let date = prompt("Assignment date (YYYY-MM-DD)")?;
        if !date.is_empty() {
            let Some(date) = read_date(&date) else {
                println!("Invalid date, expected YYYY-MM-DD");
                return Ok(());
            };
            barcode.assigned_on = Some(date);
        }
        let notes = prompt("Notes")?;
        if !notes.is_empty() {
            barcode.notes = Some(notes);
        }

        match self.db.barcode_service().update(barcode).await {
            Ok(_) => println!("Barcode updated (any product referencing it sees the change)"),
            Err(e) => println!("Error updating barcode: {e}"),
        }
        Ok(())
    }

    async fn delete_barcode(&self) -> io::Result<()> {
        println!("WARNING: this does not check whether a product references the barcode.");
        println!("A referencing product would be left with a dangling reference.");
        println!("Use option 10 to remove a barcode that belongs to a product.");

        let Some(id) = read_i64(&prompt("Barcode id")?) else {
            println!("Invalid id");
            return Ok(());
        };

        match self.db.barcode_service().delete(id).await {
            Ok(()) => println!("Barcode {id} deleted"),
            Err(e) => println!("Error deleting barcode: {e}"),
        }
        Ok(())
    }

    async fn remove_barcode_from_product(&self) -> io::Result<()> {
        let Some(product_id) = read_i64(&prompt("Product id")?) else {
            println!("Invalid id");
            return Ok(());
        };
        let Some(barcode_id) = read_i64(&prompt("Barcode id")?) else {
            println!("Invalid id");
            return Ok(());
        };

        match self
            .db
            .product_service()
            .remove_barcode(product_id, barcode_id)
            .await
        {
            Ok(()) => println!("Barcode removed from product and deleted"),
            Err(e) => println!("Error removing barcode: {e}"),
        }
        Ok(())
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// Reads a complete barcode from the console.
    ///
    /// Returns `Ok(None)` when the typed kind/date doesn't parse; the caller
    /// aborts the operation in that case.
    fn read_barcode(&self) -> io::Result<Option<Barcode>> {
        let kind = match prompt("Kind (EAN13/EAN8/UPC)")?.parse::<BarcodeKind>() {
            Ok(kind) => kind,
            Err(e) => {
                println!("{e}");
                return Ok(None);
            }
        };

        let value = prompt("Value")?;
        let mut barcode = Barcode::new(kind, value);

        let date = prompt("Assignment date (YYYY-MM-DD, blank for none)")?;
        if !date.is_empty() {
            let Some(date) = read_date(&date) else {
                println!("Invalid date, expected YYYY-MM-DD");
                return Ok(None);
            };
            barcode = barcode.assigned_on(date);
        }

        let notes = prompt("Notes (blank for none)")?;
        if !notes.is_empty() {
            barcode = barcode.notes(notes);
        }

        Ok(Some(barcode))
    }
}

// =============================================================================
// Free helpers (parse + format)
// =============================================================================

/// Prints a prompt and reads one trimmed line from stdin.
fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn read_i64(input: &str) -> Option<i64> {
    input.parse().ok()
}

fn read_f64(input: &str) -> Option<f64> {
    input.parse().ok()
}

fn read_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// One-line rendering of a product for list output.
fn format_product(product: &Product) -> String {
    let weight = product
        .weight
        .map(|w| format!(", {w} kg"))
        .unwrap_or_default();

    let barcode = match &product.barcode {
        None => "no barcode".to_string(),
        Some(b) if b.deleted => format!("barcode {} [{}] {} (DELETED, dangling)", b.id, b.kind, b.value),
        Some(b) => format!("barcode {} [{}] {}", b.id, b.kind, b.value),
    };

    format!(
        "#{} {} ({} / {}) ${:.2}{} - {}",
        product.id, product.name, product.brand, product.category, product.price, weight, barcode
    )
}

/// One-line rendering of a barcode for list output.
fn format_barcode(barcode: &Barcode) -> String {
    let date = barcode
        .assigned_on
        .map(|d| format!(", assigned {d}"))
        .unwrap_or_default();
    let notes = barcode
        .notes
        .as_deref()
        .map(|n| format!(" - {n}"))
        .unwrap_or_default();

    format!("#{} [{}] {}{}{}", barcode.id, barcode.kind, barcode.value, date, notes)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_helpers() {
        assert_eq!(read_i64("42"), Some(42));
        assert_eq!(read_i64("x"), None);
        assert_eq!(read_f64("1500.50"), Some(1500.5));
        assert_eq!(read_f64(""), None);
        assert_eq!(
            read_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(read_date("01/03/2024"), None);
    }

    #[test]
    fn test_format_product_variants() {
        let bare = Product::new("Yerba Mate", "Taragüi", "Almacén", 1500.0);
        let mut bare = bare;
        bare.id = 3;
        let line = format_product(&bare);
        assert!(line.contains("#3 Yerba Mate"));
        assert!(line.contains("no barcode"));

        let mut tagged = bare.clone().barcode(Barcode::new(BarcodeKind::Ean13, "779"));
        tagged.barcode.as_mut().unwrap().id = 9;
        assert!(format_product(&tagged).contains("barcode 9 [EAN13] 779"));

        tagged.barcode.as_mut().unwrap().deleted = true;
        assert!(format_product(&tagged).contains("DELETED, dangling"));
    }

    #[test]
    fn test_format_barcode() {
        let mut barcode = Barcode::new(BarcodeKind::Upc, "123456789012")
            .notes("shelf A");
        barcode.id = 5;
        let line = format_barcode(&barcode);
        assert_eq!(line, "#5 [UPC] 123456789012 - shelf A");
    }
}
