//! Encyclopedia access: the lookup seam used by page finding, and a
//! MediaWiki action API client behind it.

use std::cell::OnceCell;

use log::debug;
use serde_json::Value;

use crate::error::LookupError;
use crate::settings::SEARCH_RESULT_LIMIT;

const WIKIPEDIA_ACTION_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const USER_AGENT: &str = concat!(
    "genre-expand/",
    env!("CARGO_PKG_VERSION"),
    " (audio genre tagging)"
);

/// Search, page resolution and rendered content for topic pages.
pub trait Encyclopedia {
    /// Titles matching `query`, best first.
    fn search(&self, query: &str) -> Result<Vec<String>, LookupError>;

    /// Resolve a title or search term to exactly one page.
    ///
    /// Fails with [`LookupError::Ambiguous`] when the name covers several topics.
    fn resolve(&self, title: &str) -> Result<Page, LookupError>;

    /// Rendered HTML of the page with this title.
    fn fetch_html(&self, title: &str) -> Result<String, LookupError>;
}

/// A resolved topic page. Its content is fetched on first use and kept.
#[derive(Debug)]
pub struct Page {
    pub title: String,
    html: OnceCell<String>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html: OnceCell::new(),
        }
    }

    pub fn html<E: Encyclopedia + ?Sized>(&self, wiki: &E) -> Result<&str, LookupError> {
        if let Some(html) = self.html.get() {
            return Ok(html);
        }
        let html = wiki.fetch_html(&self.title)?;
        Ok(self.html.get_or_init(|| html))
    }
}

pub struct Wikipedia {
    agent: ureq::Agent,
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

impl Wikipedia {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self { agent }
    }

    fn get_json(&self, query: &str) -> Result<Value, LookupError> {
        let url = format!("{WIKIPEDIA_ACTION_API_URL}?{query}&format=json&formatversion=2&utf8=1");
        debug!("GET {url}");
        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| LookupError::Request(e.to_string()))?;
        let body = response.into_string()?;
        let value: Value = serde_json::from_str(&body)?;
        if let Some(info) = value["error"]["info"].as_str() {
            return Err(LookupError::Request(info.to_string()));
        }
        Ok(value)
    }

    fn first_page(value: &Value) -> Result<&Value, LookupError> {
        value["query"]["pages"]
            .as_array()
            .and_then(|pages| pages.first())
            .ok_or(LookupError::Malformed("query response missing pages"))
    }

    fn disambiguation_links(&self, title: &str) -> Result<Vec<String>, LookupError> {
        let value = self.get_json(&format!(
            "action=query&prop=links&plnamespace=0&pllimit=max&redirects=1&titles={}",
            urlencoding::encode(title)
        ))?;
        let links = Self::first_page(&value)?["links"]
            .as_array()
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| link["title"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(links)
    }

    fn resolve_exact(&self, title: &str) -> Result<Page, LookupError> {
        let value = self.get_json(&format!(
            "action=query&prop=pageprops&ppprop=disambiguation&redirects=1&titles={}",
            urlencoding::encode(title)
        ))?;
        let page = Self::first_page(&value)?;
        if page["missing"].as_bool().unwrap_or(false) || page["invalid"].as_bool().unwrap_or(false)
        {
            return Err(LookupError::NotFound(title.to_string()));
        }
        let resolved = page["title"].as_str().unwrap_or(title).to_string();
        if page["pageprops"].get("disambiguation").is_some() {
            let options = self.disambiguation_links(&resolved)?;
            return Err(LookupError::Ambiguous {
                title: resolved,
                options,
            });
        }
        Ok(Page::new(resolved))
    }
}

impl Encyclopedia for Wikipedia {
    fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let value = self.get_json(&format!(
            "action=query&list=search&srprop=&srlimit={SEARCH_RESULT_LIMIT}&srsearch={}",
            urlencoding::encode(query)
        ))?;
        Ok(extract_search_titles(&value))
    }

    /// Exact title first, then the top search hit for it.
    fn resolve(&self, title: &str) -> Result<Page, LookupError> {
        match self.resolve_exact(title) {
            Err(LookupError::NotFound(_)) => {
                let suggestion = self
                    .search(title)?
                    .into_iter()
                    .next()
                    .filter(|s| s != title)
                    .ok_or_else(|| LookupError::NotFound(title.to_string()))?;
                debug!("No page named {title}; trying {suggestion}");
                self.resolve_exact(&suggestion)
            }
            other => other,
        }
    }

    fn fetch_html(&self, title: &str) -> Result<String, LookupError> {
        let value = self.get_json(&format!(
            "action=parse&prop=text&redirects=1&page={}",
            urlencoding::encode(title)
        ))?;
        value["parse"]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(LookupError::Malformed("parse response missing text"))
    }
}

fn extract_search_titles(value: &Value) -> Vec<String> {
    let Some(results) = value["query"]["search"].as_array() else {
        return Vec::new();
    };
    results
        .iter()
        .filter_map(|item| item["title"].as_str())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}
