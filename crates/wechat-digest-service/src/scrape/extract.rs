use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::dates::normalize_publish_date;
use crate::models::{Keywords, NewArticle, UNKNOWN_CATEGORY};

pub const SUMMARY_MAX_CHARS: usize = 200;

const SEARCH_ORIGIN: &str = "https://weixin.sogou.com/";

struct Selectors {
    list_item: Selector,
    news_box: Selector,
    title_link: Selector,
    summary: Selector,
    account: Selector,
    date: Selector,
    date_text: Selector,
    cover: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| {
    let parse = |css: &str| Selector::parse(css).expect("static selector must parse");
    Selectors {
        list_item: parse(".news-box .news-list > li"),
        news_box: parse(".news-box"),
        title_link: parse(".txt-box h3 a"),
        summary: parse(".txt-box p"),
        account: parse(".account a, a.account"),
        date: parse(".s-p"),
        date_text: parse(".s2"),
        cover: parse(".img-box img"),
    }
});

static SEARCH_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(SEARCH_ORIGIN).expect("static origin must parse"));

/// One listing result, before it is tied to a stored category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub account_name: String,
    pub cover_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub read_count: i64,
    pub like_count: i64,
    pub category: String,
    pub keywords: Keywords,
}

impl ScrapedArticle {
    pub fn into_new_article(self, fetched_at: DateTime<Utc>) -> NewArticle {
        NewArticle {
            url: self.url,
            title: self.title,
            summary: self.summary,
            cover_url: self.cover_url,
            account_name: self.account_name,
            read_count: self.read_count,
            like_count: self.like_count,
            published_at: self.published_at.naive_utc(),
            fetched_at: fetched_at.naive_utc(),
            category: self.category,
            keywords: self.keywords,
        }
    }
}

/// Extracts listing results in document order. `query` is recorded as the
/// result's keyword and `now` anchors relative dates.
pub fn extract_articles(html: &str, query: &str, now: DateTime<Utc>) -> Vec<ScrapedArticle> {
    let document = Html::parse_document(html);

    let mut items: Vec<ElementRef> = document.select(&SELECTORS.list_item).collect();
    if items.is_empty() {
        items = document.select(&SELECTORS.news_box).collect();
    }

    let total = items.len();
    let articles: Vec<ScrapedArticle> = items
        .into_iter()
        .filter_map(|item| extract_item(item, query, now))
        .collect();

    debug!(
        candidates = total,
        extracted = articles.len(),
        query,
        "Extracted listing results"
    );
    articles
}

fn extract_item(item: ElementRef, query: &str, now: DateTime<Utc>) -> Option<ScrapedArticle> {
    let link = item.select(&SELECTORS.title_link).next()?;
    let title = element_text(link);
    let url = link
        .value()
        .attr("href")
        .and_then(resolve_link)?;

    if title.is_empty() {
        return None;
    }

    let summary = item
        .select(&SELECTORS.summary)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let account_name = item
        .select(&SELECTORS.account)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let cover_url = item
        .select(&SELECTORS.cover)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(resolve_link);

    Some(ScrapedArticle {
        title,
        url,
        summary: truncate_chars(&summary, SUMMARY_MAX_CHARS),
        account_name,
        cover_url,
        published_at: normalize_publish_date(&date_token(item), now),
        read_count: 0,
        like_count: 0,
        category: UNKNOWN_CATEGORY.to_string(),
        keywords: Keywords::single(query),
    })
}

/// Prefers the rendered date text, then the node's unix-timestamp attribute.
fn date_token(item: ElementRef) -> String {
    let Some(node) = item.select(&SELECTORS.date).next() else {
        return String::new();
    };

    let text = node
        .select(&SELECTORS.date_text)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    text.or_else(|| node.value().attr("t").map(|t| t.trim().to_string()))
        .unwrap_or_else(|| element_text(node))
}

fn resolve_link(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    SEARCH_BASE.join(href).ok().map(String::from)
}

// Text inside inline scripts is not rendered, so it is not part of the text.
fn element_text(element: ElementRef) -> String {
    let raw: String = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let in_script = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|parent| matches!(parent.name(), "script" | "style"));
            (!in_script).then_some(&**text)
        })
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
