//! Reporting and commission page checks.

use anyhow::{Context, Result};
use chrono::Local;

use crate::client::session::Session;
use crate::core::types::CheckResult;
use crate::runner::{Expect, Scenario};

const DASHBOARD_LINKS: &[&str] = &["Sales Report", "Commission Report", "Daily Business"];

pub fn scenarios() -> Vec<Scenario> {
    let today = Local::now().format("%Y-%m-%d").to_string();

    vec![
        Scenario::get("Sales Report", "report_sales.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::NotLoginPage)
            .expect(Expect::contains_ci("sales")),
        Scenario::get("Sales Report Date Round-Trip", "report_sales.php")
            .authenticated()
            .query("date_from", &today)
            .query("date_to", &today)
            .expect(Expect::status(200))
            .expect(Expect::echoes("date_from", &today))
            .expect(Expect::echoes("date_to", &today)),
        Scenario::get("Daily Business Summary", "report_daily_business.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::contains_ci("daily")),
        Scenario::get("Commission Report", "report_commission.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::contains_ci("commission")),
        Scenario::get("Commission Settings", "commission_settings.php")
            .authenticated()
            .expect(Expect::status(200))
            .expect(Expect::contains_ci("commission")),
    ]
}

/// The dashboard must link at least two of the report pages.
pub async fn check_dashboard(session: &mut Session) -> Result<Vec<CheckResult>> {
    if !session.login().await.context("Login for reports dashboard")? {
        return Ok(vec![CheckResult::fail(
            "Reports Dashboard",
            "Skipped: authentication failed",
        )]);
    }

    let page = session.get("reports_dashboard.php").await?;
    if page.status != 200 || page.is_login_page() {
        return Ok(vec![CheckResult::fail_with_details(
            "Reports Dashboard",
            &format!("Dashboard not accessible: HTTP {}", page.status),
            page.snippet(),
        )]);
    }

    let found: Vec<&str> = DASHBOARD_LINKS
        .iter()
        .copied()
        .filter(|link| page.contains_ignore_case(link))
        .collect();

    let result = if found.len() >= 2 {
        CheckResult::pass(
            "Reports Dashboard",
            &format!("Dashboard accessible with {} report links", found.len()),
        )
    } else {
        CheckResult::fail_with_details(
            "Reports Dashboard",
            &format!("Only {} of {} report links found", found.len(), DASHBOARD_LINKS.len()),
            page.snippet(),
        )
    };

    Ok(vec![result])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip_covers_both_bounds() {
        let all = scenarios();
        let round_trip = all
            .iter()
            .find(|s| s.name == "Sales Report Date Round-Trip")
            .expect("scenario present");
        assert_eq!(round_trip.query.len(), 2);
        let echoed: Vec<&str> = round_trip
            .expects
            .iter()
            .filter_map(|e| match e {
                Expect::InputValueEquals { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(echoed, vec!["date_from", "date_to"]);
    }
}
