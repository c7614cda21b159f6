//! Inventory page checks: stock columns, vendor filtering, stock adjustment
//! and QR affordances on the tiles inventory, plus the other-items inventory.

use crate::runner::{Expect, Scenario};

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::get("Tiles Inventory Page", "tiles_inventory.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::NotLoginPage)
            .expect(Expect::contains("Stock (Boxes)"))
            .expect(Expect::contains("Stock (Sq.Ft)"))
            .expect(Expect::contains("Cost/Box"))
            .expect(Expect::contains("Sold Boxes")),
        Scenario::get("Vendor Filtering", "tiles_inventory.php")
            .authenticated()
            .expect(Expect::select("vendor"))
            .expect(Expect::contains("All Vendors"))
            .expect(Expect::contains("No Vendor"))
            .expect(Expect::input("search")),
        Scenario::get("Stock Adjustment Affordances", "tiles_inventory.php")
            .authenticated()
            .expect(Expect::any(&["adjust_stock", "Stock Adjustment"]))
            .expect(Expect::contains("adjustment_reason"))
            .expect(Expect::contains("new_stock")),
        Scenario::get("QR Code Affordances", "tiles_inventory.php")
            .authenticated()
            .expect(Expect::element("qrCodeModal"))
            .expect(Expect::any(&["printQRCodes", "generateQR"])),
        Scenario::get("Other Inventory Page", "other_inventory.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::NotLoginPage)
            .expect(Expect::contains_ci("inventory")),
    ]
}
