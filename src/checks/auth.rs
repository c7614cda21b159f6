//! Login form checks.
//!
//! The valid-credentials check shares the run's session so the login it
//! performs is the one every later authenticated scenario reuses. The
//! rejected-login probe uses a throwaway session with a wrong password so it
//! cannot poison the shared cookie jar.

use anyhow::{Context, Result};

use crate::client::session::Session;
use crate::core::config::Config;
use crate::core::types::{CheckBuilder, CheckResult};

pub async fn check_login(session: &mut Session) -> Result<Vec<CheckResult>> {
    let mut results = Vec::new();

    let page = session
        .get("login_clean.php")
        .await
        .context("Login page unreachable")?;

    let status_msg = format!("HTTP {}", page.status);
    results.extend(
        CheckBuilder::new()
            .check_with_msg(
                "Login Page",
                || page.status == 200,
                "Login page reachable",
                &status_msg,
            )
            .check_with_msg(
                "Login Form Fields",
                || page.has_input("username") && page.has_input("password"),
                "Username and password fields present",
                "Login form missing username/password fields",
            )
            .build(),
    );

    match session.login().await {
        Ok(true) => {
            results.push(CheckResult::pass(
                "Admin Login",
                "Successfully authenticated as admin",
            ));
        }
        Ok(false) => {
            let reason = session.auth_failure().unwrap_or("unknown").to_string();
            results.push(CheckResult::fail("Admin Login", &reason));
        }
        Err(e) => {
            results.push(CheckResult::fail_with_details(
                "Admin Login",
                "Login attempt failed",
                e.to_string(),
            ));
        }
    }

    Ok(results)
}

/// Wrong credentials must be rejected, not silently accepted.
pub async fn check_rejected_login(config: &Config) -> Result<Vec<CheckResult>> {
    let mut probe = Session::with_credentials(config, &config.username, "definitely-wrong")
        .context("Failed to build probe session")?;

    let accepted = probe.login().await?;
    let result = if accepted {
        CheckResult::fail(
            "Rejected Login",
            "Application accepted invalid credentials",
        )
    } else {
        let detail = probe.auth_failure().unwrap_or("rejected").to_string();
        CheckResult::pass_with_details(
            "Rejected Login",
            "Invalid credentials rejected",
            detail,
        )
    };

    Ok(vec![result])
}
