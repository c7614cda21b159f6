// CheckResult - the outcome record for one scenario or assertion group

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn pass_with_details(name: &str, message: &str, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: Some(details),
        }
    }

    pub fn fail(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn fail_with_details(name: &str, message: &str, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details: Some(details),
        }
    }
}

/// Fluent accumulator for checks that assert several things about one page.
pub struct CheckBuilder {
    results: Vec<CheckResult>,
}

impl CheckBuilder {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Simple boolean check
    pub fn check<F>(mut self, name: &str, check: F) -> Self
    where
        F: FnOnce() -> bool,
    {
        let result = if check() {
            CheckResult::pass(name, "Present")
        } else {
            CheckResult::fail(name, "Missing")
        };
        self.results.push(result);
        self
    }

    /// Boolean check with custom messages
    pub fn check_with_msg<F>(
        mut self,
        name: &str,
        check: F,
        success_msg: &str,
        fail_msg: &str,
    ) -> Self
    where
        F: FnOnce() -> bool,
    {
        let result = if check() {
            CheckResult::pass(name, success_msg)
        } else {
            CheckResult::fail(name, fail_msg)
        };
        self.results.push(result);
        self
    }

    /// Result<T> check
    pub fn check_result<T, E>(mut self, name: &str, result: Result<T, E>, success_msg: &str) -> Self
    where
        E: std::fmt::Display,
    {
        let result = match result {
            Ok(_) => CheckResult::pass(name, success_msg),
            Err(e) => CheckResult::fail(name, &format!("Failed: {}", e)),
        };
        self.results.push(result);
        self
    }

    /// Option<T> check
    pub fn check_option<T>(
        mut self,
        name: &str,
        opt: Option<T>,
        success_msg: &str,
        fail_msg: &str,
    ) -> Self {
        let result = match opt {
            Some(_) => CheckResult::pass(name, success_msg),
            None => CheckResult::fail(name, fail_msg),
        };
        self.results.push(result);
        self
    }

    pub fn add(mut self, result: CheckResult) -> Self {
        self.results.push(result);
        self
    }

    pub fn build(self) -> Vec<CheckResult> {
        self.results
    }
}

impl Default for CheckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_outcome() {
        let ok = CheckResult::pass("Login Page", "reachable");
        assert!(ok.passed);
        assert_eq!(ok.name, "Login Page");
        assert!(ok.details.is_none());

        let bad = CheckResult::fail_with_details("Login Page", "HTTP 500", "body".to_string());
        assert!(!bad.passed);
        assert_eq!(bad.details.as_deref(), Some("body"));
    }

    #[test]
    fn test_builder_appends_one_record_per_check() {
        let results = CheckBuilder::new()
            .check("a", || true)
            .check_with_msg("b", || false, "yes", "no")
            .check_option("c", Some(1), "some", "none")
            .check_result::<_, std::io::Error>("d", Ok(()), "ok")
            .build();

        assert_eq!(results.len(), 4);
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert_eq!(results[1].message, "no");
        assert!(results[2].passed);
        assert!(results[3].passed);
    }
}
