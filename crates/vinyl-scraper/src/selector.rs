//! Ordered fallback resolution over selector families.
//!
//! A family is tried selector by selector; the first selector that matches
//! anything under the given node decides the result and the remaining
//! selectors are not consulted. Container lookups want every match of that
//! selector, field lookups want only the first.

use scraper::{ElementRef, Selector};
use vinyl_core::{SelectorFamily, SiteProfile};

use crate::error::ScraperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one element: the first match of the winning selector.
    First,
    /// Every match of the winning selector, in document order.
    All,
}

/// Elements produced by the winning selector of a chain.
#[derive(Debug)]
pub struct Resolved<'a> {
    /// Position of the winning selector within its family.
    pub selector_index: usize,
    pub elements: Vec<ElementRef<'a>>,
}

/// A compiled selector family.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    entries: Vec<(String, Selector)>,
}

impl SelectorChain {
    /// Compiles every selector of `family`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] for the first selector that
    /// is not valid CSS.
    pub fn compile(
        store: &str,
        family_name: &'static str,
        family: &SelectorFamily,
    ) -> Result<Self, ScraperError> {
        let entries = family
            .iter()
            .map(|raw| {
                Selector::parse(raw)
                    .map(|selector| (raw.to_owned(), selector))
                    .map_err(|e| ScraperError::InvalidSelector {
                        store: store.to_owned(),
                        family: family_name,
                        selector: raw.to_owned(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// The source text of the selector at `index`.
    #[must_use]
    pub fn selector_text(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(raw, _)| raw.as_str())
    }

    /// Tries each selector in order under `scope`; returns the matches of
    /// the first one that matches anything.
    #[must_use]
    pub fn resolve<'a>(&self, scope: ElementRef<'a>, cardinality: Cardinality) -> Option<Resolved<'a>> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(selector_index, (_, selector))| {
                let mut matches = scope.select(selector);
                let elements: Vec<ElementRef<'a>> = match cardinality {
                    Cardinality::First => matches.next().into_iter().collect(),
                    Cardinality::All => matches.collect(),
                };
                (!elements.is_empty()).then_some(Resolved {
                    selector_index,
                    elements,
                })
            })
    }

    /// All matches of the first successful selector, or an empty vec.
    #[must_use]
    pub fn resolve_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.resolve(scope, Cardinality::All)
            .map(|r| r.elements)
            .unwrap_or_default()
    }

    /// The first match of the first successful selector.
    #[must_use]
    pub fn resolve_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.resolve(scope, Cardinality::First)
            .and_then(|r| r.elements.into_iter().next())
    }

    /// Like [`Self::resolve_first`], but a selector only counts as
    /// successful when its first match satisfies `accept`; otherwise the
    /// next selector is tried.
    pub fn resolve_first_where<'a, P>(&self, scope: ElementRef<'a>, accept: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef<'a>) -> bool,
    {
        self.entries
            .iter()
            .filter_map(|(_, selector)| scope.select(selector).next())
            .find(|element| accept(element))
    }
}

/// All selector families of one profile, compiled once per scan.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub product_container: SelectorChain,
    pub title: SelectorChain,
    pub price: SelectorChain,
    pub link: SelectorChain,
    pub artist: SelectorChain,
}

impl CompiledSelectors {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if any selector of the
    /// profile is not valid CSS.
    pub fn compile(profile: &SiteProfile) -> Result<Self, ScraperError> {
        let store = profile.name.as_str();
        let s = &profile.selectors;
        Ok(Self {
            product_container: SelectorChain::compile(store, "ProductContainer", &s.product_container)?,
            title: SelectorChain::compile(store, "TitleElement", &s.title)?,
            price: SelectorChain::compile(store, "PriceElement", &s.price)?,
            link: SelectorChain::compile(store, "LinkElement", &s.link)?,
            artist: SelectorChain::compile(store, "ArtistElement", &s.artist)?,
        })
    }
}
