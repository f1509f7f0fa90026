use std::collections::HashSet;

use ln_core::{CleaningRules, Error, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

/// Subtrees that never hold visible text when falling back to the whole page.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Config(format!("Invalid selector {:?}: {}", selector, e)))
}

/// Compiled form of [`CleaningRules`].
#[derive(Debug, Clone)]
pub struct ArticleCleaner {
    container: Selector,
    noise: Vec<Selector>,
    body: Selector,
    hidden: Vec<Selector>,
    byline: Regex,
}

impl ArticleCleaner {
    pub fn new(rules: &CleaningRules) -> Result<Self> {
        let noise = rules
            .noise
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>>>()?;
        let hidden = HIDDEN_ELEMENTS
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>>>()?;
        let byline = Regex::new(&rules.byline)
            .map_err(|e| Error::Config(format!("Invalid byline pattern {:?}: {}", rules.byline, e)))?;

        Ok(Self {
            container: parse_selector(&rules.container)?,
            noise,
            body: parse_selector("body")?,
            hidden,
            byline,
        })
    }

    /// Extract the article text from a full HTML page as a single line.
    ///
    /// When the article container is missing the visible text of the whole
    /// body is used instead, so this never fails.
    pub fn clean(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        let raw = match document.select(&self.container).next() {
            Some(article) => collect_text(article, &self.noise),
            None => {
                tracing::debug!("article container not found, falling back to page body");
                let root = document
                    .select(&self.body)
                    .next()
                    .unwrap_or_else(|| document.root_element());
                collect_text(root, &self.hidden)
            }
        };

        self.normalize(&raw)
    }

    fn normalize(&self, raw: &str) -> String {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.byline.is_match(line))
            .collect::<Vec<_>>()
            .join("\n")
            .replace(|c: char| matches!(c, '\n' | '\r' | '\t'), " ")
    }
}

/// Text nodes under `root` joined by newlines, skipping subtrees matched by `skip`.
fn collect_text(root: ElementRef<'_>, skip: &[Selector]) -> String {
    let skipped: HashSet<_> = skip
        .iter()
        .flat_map(|selector| root.select(selector))
        .map(|el| el.id())
        .collect();

    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            if node.ancestors().any(|a| skipped.contains(&a.id())) {
                continue;
            }
            parts.push(&**text);
        }
    }
    parts.join("\n")
}

fn fragment_text(fragment: &str) -> String {
    Html::parse_fragment(fragment).root_element().text().collect()
}

/// Plain text of a search-result title: entities decoded, markup removed.
///
/// Runs the fragment parser a second time over the decoded text so that
/// markup which was itself entity-escaped (`&lt;b&gt;`) is removed too.
/// Only the part up to the last `>` goes through that pass: a trailing `<`
/// with no closing `>` is literal text (`x&lt;y` stays `x<y`).
pub fn clean_title(raw: &str) -> String {
    let decoded = fragment_text(raw);
    if !decoded.contains('<') {
        return decoded;
    }
    let cut = decoded.rfind('>').map_or(0, |i| i + 1);
    let (tagged, literal) = decoded.split_at(cut);
    let mut title = fragment_text(tagged);
    title.push_str(literal);
    title
}
