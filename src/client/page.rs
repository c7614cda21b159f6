use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// PHP runtime noise embedded in a 200 body means the application itself is
// broken, not that a feature is missing. Checked on every scenario.
pub const SERVER_ERROR_MARKERS: &[&str] = &[
    "Fatal error",
    "Parse error:",
    "Warning:",
    "Undefined index",
    "Undefined variable",
    "Uncaught",
    "mysqli_",
    "PDOException",
];

static INPUT: Lazy<Selector> = Lazy::new(|| Selector::parse("input").unwrap());
static SELECT: Lazy<Selector> = Lazy::new(|| Selector::parse("select").unwrap());
static OPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("option").unwrap());

/// Snapshot of one HTTP response.
///
/// `final_url` is where the request ended up after the session followed
/// redirects; `location` is the raw Location header when the response was a
/// redirect that was intentionally not followed (login POSTs).
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub final_url: String,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.body.contains(n))
    }

    /// Case-insensitive variant for loose content probes.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.body.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn has_input(&self, name: &str) -> bool {
        let doc = Html::parse_document(&self.body);
        doc.select(&INPUT)
            .any(|el| el.value().attr("name") == Some(name))
    }

    /// Rendered value of the input with the given name attribute.
    pub fn input_value(&self, name: &str) -> Option<String> {
        let doc = Html::parse_document(&self.body);
        doc.select(&INPUT)
            .find(|el| el.value().attr("name") == Some(name))
            .and_then(|el| el.value().attr("value").map(|v| v.to_string()))
    }

    pub fn has_select(&self, name: &str) -> bool {
        let doc = Html::parse_document(&self.body);
        doc.select(&SELECT)
            .any(|el| el.value().attr("name") == Some(name))
    }

    /// Non-empty option values of the select with the given name, in document
    /// order. The leading placeholder option (empty value) is skipped so the
    /// first entry is usable for a form submission.
    pub fn select_option_values(&self, name: &str) -> Vec<String> {
        let doc = Html::parse_document(&self.body);
        let Some(select) = doc
            .select(&SELECT)
            .find(|el| el.value().attr("name") == Some(name))
        else {
            return Vec::new();
        };
        select
            .select(&OPTION)
            .filter_map(|opt| opt.value().attr("value"))
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .collect()
    }

    /// Visible texts of the options of the select with the given name.
    pub fn select_option_texts(&self, name: &str) -> Vec<String> {
        let doc = Html::parse_document(&self.body);
        let Some(select) = doc
            .select(&SELECT)
            .find(|el| el.value().attr("name") == Some(name))
        else {
            return Vec::new();
        };
        select
            .select(&OPTION)
            .map(|opt| opt.text().collect::<String>().trim().to_string())
            .collect()
    }

    pub fn has_element_id(&self, id: &str) -> bool {
        let doc = Html::parse_document(&self.body);
        let Ok(selector) = Selector::parse(&format!("#{}", id)) else {
            return false;
        };
        doc.select(&selector).next().is_some()
    }

    /// First server-side error marker found in the body, if any.
    pub fn server_error(&self) -> Option<&'static str> {
        SERVER_ERROR_MARKERS
            .iter()
            .find(|m| self.body.contains(**m))
            .copied()
    }

    /// Heuristic for "we got bounced back to the login form".
    pub fn is_login_page(&self) -> bool {
        self.final_url.to_lowercase().contains("login")
            || (self.has_input("username") && self.has_input("password"))
    }

    /// Truncated body for failure diagnostics.
    pub fn snippet(&self) -> String {
        let mut end = self.body.len().min(300);
        while !self.body.is_char_boundary(end) {
            end -= 1;
        }
        self.body[..end].to_string()
    }
}
