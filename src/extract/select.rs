//! 正文区域选择
//!
//! 先剔除脚本、样式、导航、页眉页脚、侧边栏等非正文结构，再按固定顺序尝试选择策略：
//! `<article>` → class/id 含 content → class/id 含 article → class/id 含 main → body 兜底（启发式剪枝）。
//! 第一个命中的策略胜出，不同策略的文本不会合并；同一 HTML 总是得到同一结果。

use std::sync::OnceLock;

use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};

use super::text::{normalize_whitespace, truncate_chars};

/// 无条件剔除的标签
const PRUNED_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
];

/// 无条件剔除的 class / id（整词匹配）
const PRUNED_NAMES: &[&str] = &["sidebar", "navigation", "menu", "nav", "footer", "header"];

/// body 兜底时，文本短于该长度的元素视为菜单项
const MIN_FALLBACK_TEXT_CHARS: usize = 10;

/// 块级元素：进出时插入分隔空格，避免相邻段落文字粘连
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// 单条选择策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Tag(&'static str),
    ClassContains(&'static str),
    IdContains(&'static str),
}

/// 选择顺序（先 class 后 id，与常见站点结构一致）
pub const STRATEGIES: &[Strategy] = &[
    Strategy::Tag("article"),
    Strategy::ClassContains("content"),
    Strategy::IdContains("content"),
    Strategy::ClassContains("article"),
    Strategy::IdContains("article"),
    Strategy::ClassContains("main"),
    Strategy::IdContains("main"),
];

impl Strategy {
    fn matches(&self, el: &Element) -> bool {
        match self {
            Strategy::Tag(tag) => el.name() == *tag,
            Strategy::ClassContains(kw) => el.attr("class").is_some_and(|c| c.contains(kw)),
            Strategy::IdContains(kw) => el.id().is_some_and(|id| id.contains(kw)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Strategy::Tag(tag) => tag.to_string(),
            Strategy::ClassContains(kw) => format!("[class*={kw}]"),
            Strategy::IdContains(kw) => format!("[id*={kw}]"),
        }
    }
}

/// 选中的正文来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    Strategy(Strategy),
    Body,
}

/// 一次 HTML 解析得到的正文
#[derive(Debug, Clone)]
pub struct MainContent {
    pub selected: Selected,
    pub title: Option<String>,
    /// 已规范化空白并截断
    pub text: String,
}

/// 解析 HTML，选出正文区域并返回规范化、截断后的文本
pub fn extract_main_content(html: &str, max_chars: usize) -> MainContent {
    let document = Html::parse_document(html);
    let title = extract_title(&document);

    for strategy in STRATEGIES {
        let candidate = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| strategy.matches(el.value()) && !is_pruned_or_inside_pruned(*el));
        if let Some(el) = candidate {
            let mut raw = String::new();
            collect_text(el, &|child: ElementRef<'_>| is_pruned(child.value()), &mut raw);
            return MainContent {
                selected: Selected::Strategy(*strategy),
                title,
                text: finish(&raw, max_chars),
            };
        }
    }

    let mut raw = String::new();
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            let skip = |child: ElementRef<'_>| is_pruned(child.value()) || is_fallback_noise(child);
            collect_text(body, &skip, &mut raw);
        }
    }
    MainContent {
        selected: Selected::Body,
        title,
        text: finish(&raw, max_chars),
    }
}

fn finish(raw: &str, max_chars: usize) -> String {
    truncate_chars(&normalize_whitespace(raw), max_chars)
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document.select(&selector).next()?;
    let text = normalize_whitespace(&title.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

fn is_pruned(el: &Element) -> bool {
    if PRUNED_TAGS.contains(&el.name()) {
        return true;
    }
    if el.classes().any(|c| PRUNED_NAMES.contains(&c)) {
        return true;
    }
    el.id().is_some_and(|id| PRUNED_NAMES.contains(&id))
}

fn is_pruned_or_inside_pruned(el: ElementRef<'_>) -> bool {
    is_pruned(el.value())
        || el
            .ancestors()
            .filter_map(|n| n.value().as_element())
            .any(is_pruned)
}

fn nav_hint() -> &'static Regex {
    static NAV_HINT: OnceLock<Regex> = OnceLock::new();
    NAV_HINT.get_or_init(|| {
        Regex::new(r"(?i)(^|[-_\s])(nav|menu|breadcrumb|sidebar|skip-link|toolbar|pagination)")
            .expect("nav hint regex")
    })
}

/// body 兜底时的额外剪枝：导航类 class/id、“跳转/菜单”标题、极短文本元素
fn is_fallback_noise(el: ElementRef<'_>) -> bool {
    let value = el.value();
    let hinted = value.attr("class").is_some_and(|c| nav_hint().is_match(c))
        || value.id().is_some_and(|id| nav_hint().is_match(id));
    if hinted {
        return true;
    }

    let text = el.text().collect::<String>();
    if HEADING_TAGS.contains(&value.name()) {
        let lower = text.to_lowercase();
        if lower.contains("skip to") || lower.contains("menu") || lower.contains("navigation") {
            return true;
        }
    }

    text.trim().chars().count() < MIN_FALLBACK_TEXT_CHARS
}

/// 深度优先收集文本；skip 命中的子树整体跳过，块级子树只留一个分隔空格
fn collect_text(el: ElementRef<'_>, skip: &dyn Fn(ElementRef<'_>) -> bool, out: &mut String) {
    let block = BLOCK_TAGS.contains(&el.value().name());
    if block {
        out.push(' ');
    }
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !skip(child_el) {
                        collect_text(child_el, skip, out);
                    } else if BLOCK_TAGS.contains(&child_el.value().name()) {
                        // 被跳过的块级元素（含 <br>、<hr>）仍起分隔作用
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
    if block {
        out.push(' ');
    }
}
