//! Bilingual query expansion.
//!
//! Each locale has a table mapping a key term to alternatives: the same
//! concept in the other language plus related local vocabulary. A key matches
//! when the normalized query *contains* it, so "piramide del tepozteco" picks
//! up both the `piramide` and `tepozteco` entries.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;

use crate::catalog::Locale;

use super::normalize::normalize;

type TermTable = &'static [(&'static str, &'static [&'static str])];

/// Spanish key terms. Keys are stored pre-normalized.
const ES_TERMS: TermTable = &[
    ("piramide", &["pyramid", "tepozteco"]),
    ("tepozteco", &["pyramid", "piramide", "tepozteco"]),
    ("cerro", &["hill", "mountain", "hiking"]),
    ("montana", &["mountain", "hill", "hiking"]),
    ("senderismo", &["hiking", "trail", "trek"]),
    ("caminata", &["hike", "hiking", "walk"]),
    ("restaurante", &["restaurant", "food", "dining"]),
    ("comida", &["food", "restaurant", "cuisine"]),
    ("desayuno", &["breakfast", "brunch"]),
    ("cafe", &["coffee", "cafe"]),
    ("nieve", &["ice cream", "sorbet", "helado"]),
    ("helado", &["ice cream", "nieve"]),
    ("hotel", &["hotel", "lodging", "stay"]),
    ("hospedaje", &["lodging", "hotel", "accommodation"]),
    ("cabana", &["cabin", "lodging"]),
    ("mercado", &["market", "tianguis", "crafts"]),
    ("artesania", &["crafts", "handicrafts", "artisan"]),
    ("tienda", &["shop", "store"]),
    ("temazcal", &["sweat lodge", "spa", "wellness"]),
    ("spa", &["spa", "massage", "wellness"]),
    ("masaje", &["massage", "spa"]),
    ("yoga", &["yoga", "meditation", "retreat"]),
    ("museo", &["museum", "exhibit"]),
    ("convento", &["convent", "monastery", "ex-convento"]),
    ("iglesia", &["church", "chapel"]),
    ("bar", &["bar", "drinks", "nightlife"]),
    ("mezcal", &["mezcal", "mezcaleria", "drinks"]),
    ("cerveza", &["beer", "brewery"]),
    ("estacionamiento", &["parking"]),
    ("alberca", &["pool", "swimming"]),
    ("mascota", &["pet", "pet friendly", "dog"]),
    ("vegetariano", &["vegetarian", "vegan"]),
    ("tour", &["tour", "guide", "excursion"]),
];

/// English key terms. Keys are stored pre-normalized.
const EN_TERMS: TermTable = &[
    ("pyramid", &["piramide", "tepozteco"]),
    ("tepozteco", &["piramide", "pyramid", "tepozteco"]),
    ("hill", &["cerro", "montana"]),
    ("mountain", &["montana", "cerro", "senderismo"]),
    ("hiking", &["senderismo", "caminata", "trail"]),
    ("hike", &["caminata", "senderismo"]),
    ("restaurant", &["restaurante", "comida"]),
    ("food", &["comida", "restaurante", "cocina"]),
    ("breakfast", &["desayuno", "almuerzo"]),
    ("coffee", &["cafe", "cafeteria"]),
    ("ice cream", &["nieve", "helado"]),
    ("hotel", &["hotel", "hospedaje"]),
    ("lodging", &["hospedaje", "hotel", "posada"]),
    ("cabin", &["cabana"]),
    ("market", &["mercado", "tianguis"]),
    ("craft", &["artesania", "artesanias", "artesanal"]),
    ("shop", &["tienda", "compras"]),
    ("sweat lodge", &["temazcal"]),
    ("spa", &["spa", "temazcal", "masaje"]),
    ("massage", &["masaje", "spa"]),
    ("yoga", &["yoga", "meditacion", "retiro"]),
    ("museum", &["museo"]),
    ("convent", &["convento", "ex convento"]),
    ("church", &["iglesia", "capilla"]),
    ("bar", &["bar", "cantina", "bebidas"]),
    ("mezcal", &["mezcal", "mezcaleria"]),
    ("beer", &["cerveza", "cerveceria"]),
    ("parking", &["estacionamiento"]),
    ("pool", &["alberca", "piscina"]),
    ("pet", &["mascota", "mascotas"]),
    ("vegetarian", &["vegetariano", "vegano"]),
    ("tour", &["tour", "recorrido", "guia"]),
];

/// Expands normalized queries using the built-in tables plus configured extras.
#[derive(Debug, Clone, Default)]
pub struct TermExpander {
    extra: HashMap<Locale, Vec<(String, Vec<String>)>>,
}

impl TermExpander {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add extra key → alternatives entries for `locale`.
    ///
    /// Keys and alternatives are normalized; entries with an empty key are
    /// ignored.
    #[must_use]
    pub fn with_extra_terms(
        mut self,
        locale: Locale,
        terms: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        let entries = self.extra.entry(locale).or_default();
        for (key, alternatives) in terms {
            let key = normalize(key);
            if key.is_empty() {
                continue;
            }
            let alternatives = alternatives
                .iter()
                .map(|term| normalize(term))
                .filter(|term| !term.is_empty())
                .collect();
            entries.push((key, alternatives));
        }
        self
    }

    /// Expand an already-normalized query into its term set.
    ///
    /// The query itself always comes first, even when empty; alternatives
    /// follow in table order with duplicates removed.
    #[must_use]
    pub fn expand(&self, normalized_query: &str, locale: Locale) -> Vec<String> {
        let builtin = builtin_table(locale)
            .iter()
            .filter(|(key, _)| normalized_query.contains(key))
            .flat_map(|(_, alternatives)| alternatives.iter().map(|term| (*term).to_string()));

        let extra = self
            .extra
            .get(&locale)
            .into_iter()
            .flatten()
            .filter(|(key, _)| normalized_query.contains(key.as_str()))
            .flat_map(|(_, alternatives)| alternatives.iter().cloned());

        std::iter::once(normalized_query.to_string())
            .chain(builtin)
            .chain(extra)
            .unique()
            .collect()
    }
}

const fn builtin_table(locale: Locale) -> TermTable {
    match locale {
        Locale::Es => ES_TERMS,
        Locale::En => EN_TERMS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piramide_expands_to_pyramid_and_tepozteco() {
        let terms = TermExpander::new().expand("piramide", Locale::Es);
        assert_eq!(terms, vec!["piramide", "pyramid", "tepozteco"]);
    }

    #[test]
    fn substring_keys_accumulate() {
        let terms = TermExpander::new().expand("piramide del tepozteco", Locale::Es);
        assert_eq!(terms[0], "piramide del tepozteco");
        assert!(terms.contains(&"pyramid".to_string()));
        assert!(terms.contains(&"piramide".to_string()));
        assert!(terms.contains(&"tepozteco".to_string()));
        let unique: std::collections::HashSet<_> = terms.iter().collect();
        assert_eq!(unique.len(), terms.len());
    }

    #[test]
    fn only_active_locale_table_is_used() {
        // "museum" is an English key only.
        let terms = TermExpander::new().expand("museum", Locale::Es);
        assert_eq!(terms, vec!["museum"]);
        let terms = TermExpander::new().expand("museum", Locale::En);
        assert_eq!(terms, vec!["museum", "museo"]);
    }

    #[test]
    fn empty_query_expands_to_itself() {
        let expander = TermExpander::new();
        assert_eq!(expander.expand(&normalize("   "), Locale::Es), vec![String::new()]);
        assert_eq!(expander.expand("", Locale::En), vec![String::new()]);
    }

    #[test]
    fn builtin_keys_are_normalized() {
        for (key, alternatives) in ES_TERMS.iter().chain(EN_TERMS.iter()) {
            assert_eq!(normalize(key), *key);
            for term in *alternatives {
                assert_eq!(normalize(term), *term, "alternative of {key}");
            }
        }
    }

    #[test]
    fn extra_terms_are_normalized_and_merged() {
        let mut extra = BTreeMap::new();
        extra.insert("Xochicalco".to_string(), vec!["Ruinas".to_string(), String::new()]);
        let expander = TermExpander::new().with_extra_terms(Locale::Es, &extra);

        let terms = expander.expand("zona xochicalco", Locale::Es);
        assert_eq!(terms, vec!["zona xochicalco", "ruinas"]);
        assert_eq!(expander.expand("zona xochicalco", Locale::En), vec!["zona xochicalco"]);
    }
}
