//! Sequential scenario runner.
//!
//! A scenario is data: one request plus a list of expectations over the
//! response. The runner owns the single error policy of the harness:
//! nothing escapes a scenario boundary; every failure becomes exactly one
//! failed record and the run continues.

use std::future::Future;

use crate::client::page::Page;
use crate::client::session::Session;
use crate::core::error::Error;
use crate::core::types::CheckResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Expectation over a fetched page.
#[derive(Debug, Clone)]
pub enum Expect {
    Status(u16),
    BodyContains(String),
    BodyContainsIgnoreCase(String),
    BodyLacks(String),
    BodyContainsAny(Vec<String>),
    InputPresent(String),
    SelectPresent(String),
    ElementById(String),
    /// Round-trip: a submitted filter value must be echoed back into the
    /// rendered input's value attribute, byte-equal.
    InputValueEquals { name: String, value: String },
    NotLoginPage,
}

impl Expect {
    pub fn status(code: u16) -> Self {
        Expect::Status(code)
    }

    pub fn contains(text: &str) -> Self {
        Expect::BodyContains(text.to_string())
    }

    pub fn contains_ci(text: &str) -> Self {
        Expect::BodyContainsIgnoreCase(text.to_string())
    }

    pub fn lacks(text: &str) -> Self {
        Expect::BodyLacks(text.to_string())
    }

    pub fn any(texts: &[&str]) -> Self {
        Expect::BodyContainsAny(texts.iter().map(|t| t.to_string()).collect())
    }

    pub fn input(name: &str) -> Self {
        Expect::InputPresent(name.to_string())
    }

    pub fn select(name: &str) -> Self {
        Expect::SelectPresent(name.to_string())
    }

    pub fn element(id: &str) -> Self {
        Expect::ElementById(id.to_string())
    }

    pub fn echoes(name: &str, value: &str) -> Self {
        Expect::InputValueEquals {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub method: Method,
    pub page: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub needs_auth: bool,
    pub mutating: bool,
    pub expects: Vec<Expect>,
}

impl Scenario {
    pub fn get(name: &str, page: &str) -> Self {
        Self::new(name, Method::Get, page)
    }

    pub fn post(name: &str, page: &str) -> Self {
        Self::new(name, Method::Post, page)
    }

    fn new(name: &str, method: Method, page: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            page: page.to_string(),
            query: Vec::new(),
            form: Vec::new(),
            needs_auth: false,
            mutating: false,
            expects: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn form(mut self, key: &str, value: &str) -> Self {
        self.form.push((key.to_string(), value.to_string()));
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.needs_auth = true;
        self
    }

    /// Marks a scenario that creates or changes server-side records.
    pub fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }

    pub fn expect(mut self, expectation: Expect) -> Self {
        self.expects.push(expectation);
        self
    }
}

/// Evaluate all expectations against a page. Returns the number of satisfied
/// expectations, or the first failure as (message, details).
///
/// A server-side error marker in the body is a hard failure regardless of the
/// scenario's own expectations: it means the application is misbehaving, not
/// that a feature is missing.
pub fn evaluate(page: &Page, expects: &[Expect]) -> Result<usize, (String, Option<String>)> {
    if let Some(marker) = page.server_error() {
        return Err((
            format!("Server-side error in response: {}", marker),
            Some(page.snippet()),
        ));
    }

    for expect in expects {
        match expect {
            Expect::Status(want) => {
                if page.status != *want {
                    return Err((
                        format!("Expected HTTP {}, got HTTP {}", want, page.status),
                        Some(page.snippet()),
                    ));
                }
            }
            Expect::BodyContains(text) => {
                if !page.contains(text) {
                    return Err((
                        format!("Expected content missing: \"{}\"", text),
                        Some(page.snippet()),
                    ));
                }
            }
            Expect::BodyContainsIgnoreCase(text) => {
                if !page.contains_ignore_case(text) {
                    return Err((
                        format!("Expected content missing: \"{}\"", text),
                        Some(page.snippet()),
                    ));
                }
            }
            Expect::BodyLacks(text) => {
                if page.contains(text) {
                    return Err((
                        format!("Unexpected content present: \"{}\"", text),
                        Some(page.snippet()),
                    ));
                }
            }
            Expect::BodyContainsAny(texts) => {
                let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
                if !page.contains_any(&refs) {
                    return Err((
                        format!("None of the expected markers present: {:?}", texts),
                        Some(page.snippet()),
                    ));
                }
            }
            Expect::InputPresent(name) => {
                if !page.has_input(name) {
                    return Err((format!("Form field missing: {}", name), None));
                }
            }
            Expect::SelectPresent(name) => {
                if !page.has_select(name) {
                    return Err((format!("Selection dropdown missing: {}", name), None));
                }
            }
            Expect::ElementById(id) => {
                if !page.has_element_id(id) {
                    return Err((format!("Element missing: #{}", id), None));
                }
            }
            Expect::InputValueEquals { name, value } => match page.input_value(name) {
                Some(ref got) if got == value => {}
                got => {
                    return Err((
                        format!(
                            "Filter value not echoed back: {} (sent \"{}\", rendered {:?})",
                            name, value, got
                        ),
                        Some(page.snippet()),
                    ));
                }
            },
            Expect::NotLoginPage => {
                if page.is_login_page() {
                    return Err(("Bounced to login page".to_string(), None));
                }
            }
        }
    }

    Ok(expects.len())
}

/// Run one scenario to a single record. Transport errors and authentication
/// dependencies are converted here, never propagated.
pub async fn run_scenario(session: &mut Session, scenario: &Scenario) -> CheckResult {
    if scenario.needs_auth {
        match session.login().await {
            Ok(true) => {}
            Ok(false) => {
                let reason = session.auth_failure().unwrap_or("unknown").to_string();
                return CheckResult::fail(
                    &scenario.name,
                    &format!("Skipped: authentication failed ({})", reason),
                );
            }
            Err(Error::Transport(detail)) => {
                return CheckResult::fail_with_details(
                    &scenario.name,
                    "Skipped: login unreachable",
                    detail,
                );
            }
            Err(e) => {
                return CheckResult::fail(&scenario.name, &format!("Skipped: {}", e));
            }
        }
    }

    let fetched = match scenario.method {
        Method::Get => {
            if scenario.query.is_empty() {
                session.get(&scenario.page).await
            } else {
                session.get_with_query(&scenario.page, &scenario.query).await
            }
        }
        Method::Post => session.post_form_followed(&scenario.page, &scenario.form).await,
    };

    let page = match fetched {
        Ok(page) => page,
        Err(Error::Transport(detail)) => {
            return CheckResult::fail_with_details(&scenario.name, "Transport error", detail);
        }
        Err(e) => {
            return CheckResult::fail(&scenario.name, &e.to_string());
        }
    };

    match evaluate(&page, &scenario.expects) {
        Ok(count) => {
            log::debug!("{}: {} assertions satisfied", scenario.name, count);
            CheckResult::pass(&scenario.name, &format!("{} assertions satisfied", count))
        }
        Err((message, details)) => match details {
            Some(details) => CheckResult::fail_with_details(&scenario.name, &message, details),
            None => CheckResult::fail(&scenario.name, &message),
        },
    }
}

/// Run scenarios in order, recording results in the same order.
pub async fn run_all(
    session: &mut Session,
    scenarios: &[Scenario],
    skip_mutating: bool,
) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        if skip_mutating && scenario.mutating {
            log::info!("Skipping mutating scenario: {}", scenario.name);
            continue;
        }
        results.push(run_scenario(session, scenario).await);
    }
    results
}

/// Wrap a multi-step check so any error inside it collapses into one failed
/// record instead of aborting the run.
pub async fn run_flow<F>(name: &str, fut: F) -> Vec<CheckResult>
where
    F: Future<Output = anyhow::Result<Vec<CheckResult>>>,
{
    match fut.await {
        Ok(results) => results,
        Err(e) => {
            log::warn!("{}: {:#}", name, e);
            vec![CheckResult::fail_with_details(
                name,
                "Scenario error",
                format!("{:#}", e),
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: u16, body: &str) -> Page {
        Page {
            status,
            final_url: "http://localhost:8080/public/test.php".to_string(),
            location: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_damage_validation_message_both_branches() {
        let expects = vec![Expect::BodyContains(
            "Damage percentage must be between 0 and 100".to_string(),
        )];

        let rejected = page(
            200,
            "<html>...Damage percentage must be between 0 and 100...</html>",
        );
        assert_eq!(evaluate(&rejected, &expects), Ok(1));

        let accepted = page(200, "<html>...Purchase entry added successfully...</html>");
        let err = evaluate(&accepted, &expects).unwrap_err();
        assert!(err.0.contains("Damage percentage must be between 0 and 100"));
    }

    #[test]
    fn test_round_trip_expectation() {
        let expects = vec![Expect::InputValueEquals {
            name: "search_customer".to_string(),
            value: "Priya".to_string(),
        }];

        let echoed = page(200, r#"<input name="search_customer" value="Priya">"#);
        assert_eq!(evaluate(&echoed, &expects), Ok(1));

        let dropped = page(200, r#"<input name="search_customer" value="">"#);
        assert!(evaluate(&dropped, &expects).is_err());
    }

    #[test]
    fn test_server_error_marker_is_hard_failure() {
        // The page satisfies the stated expectation but carries PHP noise.
        let expects = vec![Expect::BodyContains("Sales Report".to_string())];
        let noisy = page(
            200,
            "Warning: Undefined index: date_from in report_sales.php<br>Sales Report",
        );
        let err = evaluate(&noisy, &expects).unwrap_err();
        assert!(err.0.contains("Server-side error"));
    }

    #[test]
    fn test_status_and_content_expectations() {
        let p = page(200, "<html>Reports Dashboard with Sales Report link</html>");
        let expects = vec![
            Expect::Status(200),
            Expect::BodyContains("Reports Dashboard".to_string()),
            Expect::BodyLacks("Invalid username or password".to_string()),
            Expect::BodyContainsAny(vec!["Sales Report".to_string(), "Daily Business".to_string()]),
        ];
        assert_eq!(evaluate(&p, &expects), Ok(4));

        let not_found = page(404, "gone");
        assert!(evaluate(&not_found, &[Expect::Status(200)]).is_err());
    }

    #[test]
    fn test_scenario_builder_collects_plan() {
        let scenario = Scenario::post("Tiles Purchase Entry", "tiles_purchase.php")
            .authenticated()
            .mutating()
            .form("add_purchase", "1")
            .form("damage_percentage", "5.5")
            .expect(Expect::BodyContains(
                "Purchase entry added successfully".to_string(),
            ));

        assert_eq!(scenario.method, Method::Post);
        assert!(scenario.needs_auth);
        assert!(scenario.mutating);
        assert_eq!(scenario.form.len(), 2);
        assert_eq!(scenario.expects.len(), 1);
    }
}
