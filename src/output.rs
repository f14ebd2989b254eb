//! Terminal rendering for the pages.

use serde::Serialize;

use globetrans_fleet::dtos::{Assignment, Driver, Truck};
use globetrans_fleet::nav::{self, Page};
use globetrans_fleet::session::Role;

const COMPANY: &str = "GlobeTrans Logistics";
const NOT_SET: &str = "N/A";

/// One-line summary used in list views.
pub trait Row {
    fn row(&self) -> String;
}

impl Row for Driver {
    fn row(&self) -> String {
        format!(
            "ID: {} | Name: {} | License: {} | Contact: {} | Assigned Truck: {}",
            self.id,
            self.name,
            self.license_number,
            self.contact_info,
            or_not_set(self.assigned_truck_id),
        )
    }
}

impl Row for Truck {
    fn row(&self) -> String {
        format!(
            "ID: {} | Plate: {} | Model: {} | Status: {} | Driver ID: {}",
            self.id,
            self.plate_number,
            self.model,
            self.status,
            or_not_set(self.current_driver_id),
        )
    }
}

impl Row for Assignment {
    fn row(&self) -> String {
        let end = self
            .end_date
            .as_ref()
            .map(globetrans_fleet::dtos::timestamp::format)
            .unwrap_or_else(|| NOT_SET.to_string());
        format!(
            "ID: {} | Start: {} | End: {} | Status: {} | Driver ID: {} | Truck ID: {}",
            self.id,
            globetrans_fleet::dtos::timestamp::format(&self.start_date),
            end,
            self.status,
            self.driver_id,
            self.truck_id,
        )
    }
}

fn or_not_set(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| NOT_SET.to_string())
}

pub fn print_list<R: Row + Serialize>(title: &str, items: &[R], json: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    println!("{title}");
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("  {}", item.row());
    }
    Ok(())
}

pub fn print_detail<R: Serialize>(item: &R) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

pub fn print_menu(role: Option<&Role>) {
    let items: Vec<&str> = nav::menu(role).iter().map(Page::title).collect();
    println!("[ {} ]", items.join(" | "));
}

pub fn print_home(role: Option<&Role>) {
    print_menu(role);
    println!();
    println!("Welcome to {COMPANY}");
    println!("Your trusted reliable partner");
    println!();
    println!(
        "Established in 2010, {COMPANY} has grown into a leading name in the \
         transportation and logistics industry."
    );
    println!("+254 700 123 456 | Nairobi, Kenya");
    match role {
        Some(role) => println!("\nSigned in as {role}"),
        None => println!("\nNot signed in. Run `fleet login` to continue."),
    }
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globetrans_fleet::dtos::TruckStatus;

    #[test]
    fn rows_show_not_set_for_missing_links() {
        let truck = Truck {
            id: 2,
            plate_number: "KDA 123X".into(),
            model: "Isuzu FVZ".into(),
            status: TruckStatus::InUse,
            current_driver_id: None,
            created_at: None,
        };
        assert_eq!(
            truck.row(),
            "ID: 2 | Plate: KDA 123X | Model: Isuzu FVZ | Status: In Use | Driver ID: N/A"
        );
    }

    #[test]
    fn capitalizes_labels() {
        assert_eq!(capitalize("driver"), "Driver");
        assert_eq!(capitalize(""), "");
    }
}
