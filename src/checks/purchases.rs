//! Purchase entry checks for tiles and other items.
//!
//! The form-schema and validation scenarios are declarative; the entry
//! scenarios are flows because a valid submission needs a real item id read
//! from the rendered dropdown first.

use anyhow::{Context, Result};
use chrono::{Local, Utc};

use crate::client::session::Session;
use crate::core::types::CheckResult;
use crate::runner::{Expect, Scenario};

const SUCCESS_MSG: &str = "Purchase entry added successfully";
const DAMAGE_MSG: &str = "Damage percentage must be between 0 and 100";
const REQUIRED_MSG: &str = "Please fill in all required fields";

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::get("Tiles Purchase Form Schema", "tiles_purchase.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::select("tile_id"))
            .expect(Expect::input("purchase_date"))
            .expect(Expect::input("total_boxes"))
            .expect(Expect::input("damage_percentage"))
            .expect(Expect::input("cost_per_box")),
        Scenario::get("Other Purchase Form Schema", "other_purchase.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::select("item_id"))
            .expect(Expect::input("purchase_date"))
            .expect(Expect::input("total_quantity"))
            .expect(Expect::input("damage_percentage"))
            .expect(Expect::input("cost_per_unit")),
        // Submitting an empty form must be rejected before anything is stored.
        Scenario::post("Required Field Validation", "tiles_purchase.php")
            .authenticated()
            .form("add_purchase", "1")
            .form("tile_id", "")
            .form("purchase_date", "")
            .form("total_boxes", "")
            .form("cost_per_box", "")
            .expect(Expect::contains(REQUIRED_MSG)),
        Scenario::get("Tiles Purchase History", "tiles_purchase.php")
            .authenticated()
            .query("view", "history")
            .expect(Expect::status(200))
            .expect(Expect::contains_ci("purchase")),
        Scenario::get("Other Purchase History", "other_purchase.php")
            .authenticated()
            .query("view", "history")
            .expect(Expect::status(200))
            .expect(Expect::contains_ci("purchase")),
    ]
}

/// Create one tiles purchase entry and one other-items purchase entry, then
/// verify the damage-percentage bound check with an out-of-range value.
///
/// These submissions mutate server-side state; the harness does no cleanup.
pub async fn check_purchase_entries(session: &mut Session) -> Result<Vec<CheckResult>> {
    let mut results = Vec::new();

    if !session.login().await.context("Login for purchase entry")? {
        results.push(CheckResult::fail(
            "Purchase Entries",
            "Skipped: authentication failed",
        ));
        return Ok(results);
    }

    let today = Local::now().format("%Y-%m-%d").to_string();
    let stamp = Utc::now().timestamp();

    // Tiles purchase entry against the first real tile option.
    let form_page = session.get("tiles_purchase.php").await?;
    match form_page.select_option_values("tile_id").first() {
        None => {
            results.push(CheckResult::fail(
                "Tiles Purchase Entry",
                "No tiles available for purchase entry",
            ));
        }
        Some(tile_id) => {
            let form = vec![
                ("add_purchase".to_string(), "1".to_string()),
                ("tile_id".to_string(), tile_id.clone()),
                ("purchase_date".to_string(), today.clone()),
                ("supplier_name".to_string(), "Test Supplier Ltd".to_string()),
                ("invoice_number".to_string(), format!("INV-{}", stamp)),
                ("total_boxes".to_string(), "100".to_string()),
                ("damage_percentage".to_string(), "5.5".to_string()),
                ("cost_per_box".to_string(), "250.00".to_string()),
                ("transport_cost".to_string(), "500.00".to_string()),
                ("notes".to_string(), "Harness purchase entry".to_string()),
            ];
            let page = session.post_form_followed("tiles_purchase.php", &form).await?;
            if page.contains(SUCCESS_MSG) {
                results.push(CheckResult::pass(
                    "Tiles Purchase Entry",
                    &format!("Added purchase entry for tile id {}", tile_id),
                ));
            } else if page.contains(REQUIRED_MSG) {
                results.push(CheckResult::fail(
                    "Tiles Purchase Entry",
                    "Form rejected a complete submission as incomplete",
                ));
            } else {
                results.push(CheckResult::fail_with_details(
                    "Tiles Purchase Entry",
                    "No success message found",
                    page.snippet(),
                ));
            }

            // Out-of-range damage percentage must be rejected.
            let mut bad_form = form.clone();
            for field in bad_form.iter_mut() {
                match field.0.as_str() {
                    "damage_percentage" => field.1 = "150".to_string(),
                    "invoice_number" => field.1 = format!("TEST-{}", stamp),
                    "total_boxes" => field.1 = "10".to_string(),
                    _ => {}
                }
            }
            let page = session
                .post_form_followed("tiles_purchase.php", &bad_form)
                .await?;
            if page.contains(DAMAGE_MSG) {
                results.push(CheckResult::pass(
                    "Damage Percentage Validation",
                    "Out-of-range damage percentage rejected",
                ));
            } else {
                results.push(CheckResult::fail_with_details(
                    "Damage Percentage Validation",
                    "Damage percentage over 100 was not rejected",
                    page.snippet(),
                ));
            }
        }
    }

    // Other-items purchase entry.
    let form_page = session.get("other_purchase.php").await?;
    match form_page.select_option_values("item_id").first() {
        None => {
            results.push(CheckResult::fail(
                "Other Purchase Entry",
                "No items available for purchase entry",
            ));
        }
        Some(item_id) => {
            let form = vec![
                ("add_purchase".to_string(), "1".to_string()),
                ("item_id".to_string(), item_id.clone()),
                ("purchase_date".to_string(), today.clone()),
                (
                    "supplier_name".to_string(),
                    "Test Hardware Supplier".to_string(),
                ),
                ("invoice_number".to_string(), format!("HW-{}", stamp)),
                ("total_quantity".to_string(), "50".to_string()),
                ("damage_percentage".to_string(), "2.0".to_string()),
                ("cost_per_unit".to_string(), "15.50".to_string()),
                ("transport_cost".to_string(), "200.00".to_string()),
                ("notes".to_string(), "Harness purchase entry".to_string()),
            ];
            let page = session.post_form_followed("other_purchase.php", &form).await?;
            if page.contains(SUCCESS_MSG) {
                results.push(CheckResult::pass(
                    "Other Purchase Entry",
                    &format!("Added purchase entry for item id {}", item_id),
                ));
            } else {
                results.push(CheckResult::fail_with_details(
                    "Other Purchase Entry",
                    "No success message found",
                    page.snippet(),
                ));
            }
        }
    }

    Ok(results)
}
