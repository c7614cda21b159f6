//! Invoice checks: create form, discount modes, list page and validation.

use crate::runner::{Expect, Scenario};

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::get("Invoice Creation Page", "invoice_enhanced.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::NotLoginPage)
            .expect(Expect::input("customer_name"))
            .expect(Expect::contains_ci("invoice")),
        Scenario::get("Invoice Discount Modes", "invoice_enhanced.php")
            .authenticated()
            .expect(Expect::contains_ci("discount"))
            .expect(Expect::contains_ci("percentage"))
            .expect(Expect::contains_ci("fixed amount")),
        Scenario::get("Invoice Item Management", "invoice_enhanced.php")
            .authenticated()
            .expect(Expect::any(&["editItem", "updateItem"]))
            .expect(Expect::contains("deleteItem")),
        Scenario::get("Invoice List Page", "invoice_list.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::NotLoginPage),
        Scenario::get("Mark As Paid", "invoice_list.php")
            .authenticated()
            .expect(Expect::contains_ci("mark"))
            .expect(Expect::contains_ci("paid")),
        Scenario::post("Invoice Validation", "invoice_enhanced.php")
            .authenticated()
            .form("create_invoice", "1")
            .form("customer_name", "")
            .form("phone", "123")
            .expect(Expect::any(&["required", "Required", "invalid", "Invalid", "error", "Error"])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Method;

    #[test]
    fn test_only_validation_scenario_posts() {
        let all = scenarios();
        let posts: Vec<_> = all.iter().filter(|s| s.method == Method::Post).collect();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].name, "Invoice Validation");
        // The invalid payload must not be flagged as mutating: it is rejected
        // before anything is stored.
        assert!(!posts[0].mutating);
    }
}
